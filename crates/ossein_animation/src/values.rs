use glam::{Quat, Vec3};

/// A keyframe value that can be blended between two samples.
pub trait Interpolatable: Copy + Sized {
    /// Value used when a track has no keys at all.
    const IDENTITY: Self;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Value of a single-key track. Identity for vectors.
    #[inline]
    #[must_use]
    fn settle(self) -> Self {
        self
    }
}

impl Interpolatable for f32 {
    const IDENTITY: Self = 0.0;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    const IDENTITY: Self = Vec3::ZERO;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    const IDENTITY: Self = Quat::IDENTITY;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t).normalize()
    }

    fn settle(self) -> Self {
        self.normalize()
    }
}
