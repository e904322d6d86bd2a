use glam::Mat4;
use rustc_hash::FxHashMap;

/// Palette slot and inverse bind matrix of one skinned joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfo {
    pub id: usize,
    /// Transforms mesh-space vertices into the joint's bind space.
    pub offset: Mat4,
}

pub type BoneInfoMap = FxHashMap<String, BoneInfo>;

/// The one id space shared by a skeleton and every clip animating it.
///
/// Ids are handed out sequentially, so they always cover `[0, len)`.
/// Loading mutates the registry through `&mut`; playback only reads
/// snapshots taken with [`snapshot`](Self::snapshot).
#[derive(Debug, Clone, Default)]
pub struct BoneRegistry {
    infos: BoneInfoMap,
}

impl BoneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a joint with its inverse bind matrix.
    ///
    /// A joint already known keeps its id; its offset is replaced.
    pub fn register(&mut self, name: &str, offset: Mat4) -> usize {
        let next_id = self.infos.len();
        let info = self
            .infos
            .entry(name.to_owned())
            .or_insert(BoneInfo { id: next_id, offset });
        info.offset = offset;
        info.id
    }

    /// Returns the joint's id, appending it with an identity offset when missing.
    pub fn ensure(&mut self, name: &str) -> usize {
        if let Some(info) = self.infos.get(name) {
            return info.id;
        }
        let id = self.infos.len();
        log::debug!("Registering bone '{name}' with id {id}");
        self.infos.insert(
            name.to_owned(),
            BoneInfo {
                id,
                offset: Mat4::IDENTITY,
            },
        );
        id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoneInfo> {
        self.infos.get(name)
    }

    #[inline]
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.infos.get(name).map(|info| info.id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoneInfo)> {
        self.infos.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Copy of the current name → info map.
    #[must_use]
    pub fn snapshot(&self) -> BoneInfoMap {
        self.infos.clone()
    }
}
