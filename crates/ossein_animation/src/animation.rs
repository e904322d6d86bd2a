use std::path::Path;

use ossein_core::{OsseinError, Result};
use rustc_hash::FxHashMap;

use crate::bone::Bone;
use crate::bone_info::{BoneInfo, BoneInfoMap, BoneRegistry};
use crate::hierarchy::{Hierarchy, NodeIndex};
use crate::import::{ImportedClip, ImportedNode, ImportedScene, SceneImporter};

/// One animation clip bound to a skeleton's id space.
///
/// Immutable once built; share it between animators with `Arc<Animation>`.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    bones: Vec<Bone>,
    hierarchy: Hierarchy,
    bone_info: BoneInfoMap,

    // Per hierarchy node, resolved once so playback never hashes names.
    node_bone: Vec<Option<usize>>,
    node_info: Vec<Option<BoneInfo>>,
}

impl Animation {
    /// An animation with no bones and zero duration.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an animation from an imported clip.
    ///
    /// Joints animated by the clip but unknown to `registry` are appended
    /// to it, so the model and all of its clips share one id space.
    pub fn from_clip(root: &ImportedNode, clip: &ImportedClip, registry: &mut BoneRegistry) -> Self {
        let hierarchy = Hierarchy::read_hierarchy_data(root);
        let bones = Self::read_missing_bones(clip, registry);
        let bone_info = registry.snapshot();

        let mut bone_by_name: FxHashMap<&str, usize> = FxHashMap::default();
        for (index, bone) in bones.iter().enumerate() {
            bone_by_name.entry(bone.name()).or_insert(index);
        }

        let node_bone = hierarchy
            .nodes()
            .iter()
            .map(|node| bone_by_name.get(node.name.as_str()).copied())
            .collect();
        let node_info = hierarchy
            .nodes()
            .iter()
            .map(|node| bone_info.get(&node.name).copied())
            .collect();

        log::debug!(
            "Animation '{}': {} channels, {} nodes, {} skinned bones, {} ticks @ {} tps",
            clip.name,
            bones.len(),
            hierarchy.len(),
            bone_info.len(),
            clip.duration,
            clip.ticks_per_second
        );

        Self {
            name: clip.name.clone(),
            duration: clip.duration,
            ticks_per_second: clip.ticks_per_second,
            bones,
            hierarchy,
            bone_info,
            node_bone,
            node_info,
        }
    }

    /// Builds clip `clip_index` of an imported scene.
    pub fn from_scene(
        scene: &ImportedScene,
        clip_index: usize,
        registry: &mut BoneRegistry,
    ) -> Result<Self> {
        if scene.animations.is_empty() {
            return Err(OsseinError::NoAnimations(scene.root.name.clone()));
        }
        let clip = scene
            .animations
            .get(clip_index)
            .ok_or(OsseinError::ClipIndexOutOfRange {
                index: clip_index,
                count: scene.animations.len(),
            })?;
        Ok(Self::from_clip(&scene.root, clip, registry))
    }

    /// Imports `path` and builds clip `clip_index` from it.
    pub fn try_load(
        path: &Path,
        importer: &(impl SceneImporter + ?Sized),
        clip_index: usize,
        registry: &mut BoneRegistry,
    ) -> Result<Self> {
        let scene = importer.import(path)?;
        Self::from_scene(&scene, clip_index, registry).map_err(|err| match err {
            OsseinError::NoAnimations(_) => OsseinError::NoAnimations(path.display().to_string()),
            other => other,
        })
    }

    /// Like [`try_load`](Self::try_load), but a failure is logged and
    /// yields [`Animation::empty`], leaving the model in its bind pose.
    pub fn load(
        path: &Path,
        importer: &(impl SceneImporter + ?Sized),
        clip_index: usize,
        registry: &mut BoneRegistry,
    ) -> Self {
        match Self::try_load(path, importer, clip_index, registry) {
            Ok(animation) => animation,
            Err(err) => {
                log::error!("Failed to load animation from {}: {err}", path.display());
                Self::empty()
            }
        }
    }

    /// One [`Bone`] per channel, registering joints the skeleton lacks.
    fn read_missing_bones(clip: &ImportedClip, registry: &mut BoneRegistry) -> Vec<Bone> {
        clip.channels
            .iter()
            .map(|channel| {
                let id = registry.ensure(&channel.node_name);
                Bone::from_channel(channel, id)
            })
            .collect()
    }

    /// Linear scan by joint name.
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name() == name)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clip length in ticks.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn bone_id_map(&self) -> &BoneInfoMap {
        &self.bone_info
    }

    /// Number of palette slots this clip writes.
    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_info.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty() && self.hierarchy.is_empty()
    }

    #[inline]
    pub(crate) fn node_bone(&self, node: NodeIndex) -> Option<usize> {
        self.node_bone.get(node).copied().flatten()
    }

    #[inline]
    pub(crate) fn node_info(&self, node: NodeIndex) -> Option<BoneInfo> {
        self.node_info.get(node).copied().flatten()
    }
}
