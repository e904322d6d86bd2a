//! # Ossein
//!
//! Skeletal animation playback for real-time renderers.
//!
//! A [`Model`] is loaded from glTF and owns the bone id space. Each clip
//! becomes an [`Animation`] registered against that space, and an
//! [`Animator`] loops one clip per frame, producing the matrix palette a
//! skinning shader consumes as `final_bones_matrices[i]`.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ossein::prelude::*;
//!
//! let mut model = Model::load("assets/vampire/dancing_vampire.gltf")?;
//! let dance = Arc::new(model.animation_or_empty(0));
//! let mut animator = Animator::with_animation(dance, AnimatorSettings::default());
//!
//! // every frame
//! animator.update_animation(delta_seconds);
//! let bytes = animator.palette().to_bytes();
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use ossein_animation as animation;
pub use ossein_assets as assets;

pub use ossein_core::{OsseinError, Result};
pub use ossein_animation::{
    Animation, Animator, AnimatorSettings, Bone, BoneInfo, BonePalette, BoneRegistry, Hierarchy,
    ImportedScene, SceneImporter,
};
pub use ossein_assets::{AnimationHandle, AnimationLibrary, GltfImporter, Model, SkinnedVertex};

pub mod prelude {
    pub use crate::{
        Animation, AnimationHandle, AnimationLibrary, Animator, AnimatorSettings, BonePalette,
        BoneRegistry, GltfImporter, Model, OsseinError, Result, SceneImporter,
    };
    pub use glam::{Mat4, Quat, Vec3};
}
