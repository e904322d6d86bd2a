//! Skeletal animation playback.
//!
//! - [`Bone`]: keyframe tracks for one joint, sampled into a local `T * R * S` transform
//! - [`Animation`]: an imported clip, its node [`Hierarchy`] and its bones
//! - [`Animator`]: loops a clip and writes the skinning [`BonePalette`]
//!
//! Bone ids come from a [`BoneRegistry`] shared by a model and all of its clips.

pub mod animation;
pub mod animator;
pub mod bone;
pub mod bone_info;
pub mod hierarchy;
pub mod import;
pub mod palette;
pub mod settings;
pub mod tracks;
pub mod values;

pub use animation::Animation;
pub use animator::Animator;
pub use bone::{Bone, BoneCursor};
pub use bone_info::{BoneInfo, BoneInfoMap, BoneRegistry};
pub use hierarchy::{Hierarchy, HierarchyNode, NodeIndex};
pub use import::{ImportedChannel, ImportedClip, ImportedNode, ImportedScene, SceneImporter};
pub use palette::{BonePalette, PALETTE_UNIFORM, uniform_name};
pub use settings::AnimatorSettings;
pub use tracks::{KeyPosition, KeyRotation, KeyScale, Keyframe, KeyframeCursor, Track, scale_factor};
pub use values::Interpolatable;
