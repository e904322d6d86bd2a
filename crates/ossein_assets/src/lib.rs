//! Asset loading for Ossein: glTF scenes, skinned models and the library
//! that owns their animations.

pub mod io;
pub mod library;
pub mod loaders;
pub mod model;

pub use library::{AnimationHandle, AnimationLibrary};
pub use loaders::{GltfDocument, GltfImporter};
pub use model::{MAX_BONE_INFLUENCE, Model, SkinnedMesh, SkinnedVertex};
