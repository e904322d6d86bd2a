use glam::{Mat4, Quat, Vec3};
use ossein_core::Result;

use crate::import::ImportedChannel;
use crate::tracks::{KeyPosition, KeyRotation, KeyScale, KeyframeCursor, Track};

/// Per-track cursors for sampling a [`Bone`] without mutating it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoneCursor {
    pub position: KeyframeCursor,
    pub rotation: KeyframeCursor,
    pub scale: KeyframeCursor,
}

/// Keyframe tracks for one skeletal joint.
///
/// `id` is the joint's slot in the final matrix palette.
#[derive(Debug, Clone)]
pub struct Bone {
    name: String,
    id: usize,
    positions: Track<Vec3>,
    rotations: Track<Quat>,
    scales: Track<Vec3>,

    local_transform: Mat4,
    cursor: BoneCursor,
}

impl Bone {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        id: usize,
        positions: Vec<KeyPosition>,
        rotations: Vec<KeyRotation>,
        scales: Vec<KeyScale>,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            positions: Track::new(positions),
            rotations: Track::new(rotations),
            scales: Track::new(scales),
            local_transform: Mat4::IDENTITY,
            cursor: BoneCursor::default(),
        }
    }

    #[must_use]
    pub fn from_channel(channel: &ImportedChannel, id: usize) -> Self {
        Self::new(
            channel.node_name.clone(),
            id,
            channel.positions.clone(),
            channel.rotations.clone(),
            channel.scales.clone(),
        )
    }

    /// Recomputes the cached local transform for `time` (in ticks).
    ///
    /// On error the previous local transform is kept.
    pub fn update(&mut self, time: f32) -> Result<()> {
        let mut cursor = self.cursor;
        let local = self.sample(time, &mut cursor)?;
        self.cursor = cursor;
        self.local_transform = local;
        Ok(())
    }

    /// Local transform at `time`, composed as `T * R * S`.
    pub fn sample(&self, time: f32, cursor: &mut BoneCursor) -> Result<Mat4> {
        let translation = self
            .positions
            .sample_with_cursor(time, &mut cursor.position)?;
        let rotation = self
            .rotations
            .sample_with_cursor(time, &mut cursor.rotation)?;
        let scale = self.scales.sample_with_cursor(time, &mut cursor.scale)?;

        Ok(Mat4::from_scale_rotation_translation(
            scale,
            rotation,
            translation,
        ))
    }

    pub fn interpolate_position(&self, time: f32) -> Result<Vec3> {
        self.positions.sample(time)
    }

    pub fn interpolate_rotation(&self, time: f32) -> Result<Quat> {
        self.rotations.sample(time)
    }

    pub fn interpolate_scaling(&self, time: f32) -> Result<Vec3> {
        self.scales.sample(time)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    #[must_use]
    pub fn positions(&self) -> &Track<Vec3> {
        &self.positions
    }

    #[must_use]
    pub fn rotations(&self) -> &Track<Quat> {
        &self.rotations
    }

    #[must_use]
    pub fn scales(&self) -> &Track<Vec3> {
        &self.scales
    }
}
