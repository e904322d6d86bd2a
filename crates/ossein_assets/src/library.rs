use std::sync::Arc;

use ossein_animation::Animation;
use ossein_core::Result;
use slotmap::{SlotMap, new_key_type};

use crate::model::Model;

new_key_type! {
    pub struct AnimationHandle;
}

/// Owns loaded animations. Animators borrow them as `Arc<Animation>`,
/// so removing a clip here never invalidates one that is still playing.
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    animations: SlotMap<AnimationHandle, Arc<Animation>>,
}

impl AnimationLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, animation: Animation) -> AnimationHandle {
        self.animations.insert(Arc::new(animation))
    }

    /// Loads every clip of `model` against the model's bone registry.
    pub fn load_all(&mut self, model: &mut Model) -> Result<Vec<AnimationHandle>> {
        (0..model.animation_count())
            .map(|index| Ok(self.insert(model.load_animation(index)?)))
            .collect()
    }

    #[must_use]
    pub fn get(&self, handle: AnimationHandle) -> Option<Arc<Animation>> {
        self.animations.get(handle).cloned()
    }

    pub fn remove(&mut self, handle: AnimationHandle) -> Option<Arc<Animation>> {
        self.animations.remove(handle)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<AnimationHandle> {
        self.animations
            .iter()
            .find(|(_, animation)| animation.name() == name)
            .map(|(handle, _)| handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimationHandle, &Arc<Animation>)> {
        self.animations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
