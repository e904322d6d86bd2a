use std::sync::Arc;

use glam::Mat4;
use parking_lot::RwLockReadGuard;

use crate::animation::Animation;
use crate::bone::BoneCursor;
use crate::hierarchy::NodeIndex;
use crate::palette::BonePalette;
use crate::settings::AnimatorSettings;

/// Sampling state the animator keeps per bone of the bound clip.
#[derive(Debug, Clone, Copy, Default)]
struct BoneState {
    cursor: BoneCursor,
    /// Last successfully sampled local transform.
    local: Option<Mat4>,
    warned: bool,
}

/// Plays one [`Animation`] on a loop and fills the skinning palette.
///
/// The animator is idle until [`play_animation`](Self::play_animation)
/// binds a clip. The clip is shared, so whoever loaded it keeps ownership.
#[derive(Debug)]
pub struct Animator {
    animation: Option<Arc<Animation>>,
    current_time: f32,
    delta_time: f32,
    settings: AnimatorSettings,

    states: Vec<BoneState>,
    palette: BonePalette,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimatorSettings::default())
    }
}

impl Animator {
    #[must_use]
    pub fn new(settings: AnimatorSettings) -> Self {
        Self {
            animation: None,
            current_time: 0.0,
            delta_time: 0.0,
            settings,
            states: Vec::new(),
            palette: BonePalette::new(0),
        }
    }

    #[must_use]
    pub fn with_animation(animation: Arc<Animation>, settings: AnimatorSettings) -> Self {
        let mut animator = Self::new(settings);
        animator.play_animation(animation);
        animator
    }

    /// Binds `animation` and rewinds to its first frame.
    ///
    /// The palette is resized to the clip's bone count and every slot is
    /// recomputed before this returns.
    pub fn play_animation(&mut self, animation: Arc<Animation>) {
        let bone_count = animation.bone_count();
        if bone_count > self.settings.max_bones {
            log::warn!(
                "Animation '{}' has {bone_count} bones but the palette holds {}; extra bones will not be uploaded",
                animation.name(),
                self.settings.max_bones
            );
        }

        self.current_time = 0.0;
        self.delta_time = 0.0;
        self.states = vec![BoneState::default(); animation.bones().len()];
        self.animation = Some(animation);

        self.palette.write_with(|matrices| {
            matrices.clear();
            matrices.resize(bone_count, Mat4::IDENTITY);
        });
        self.compute_pose();
    }

    /// Unbinds the current clip. The palette becomes empty.
    pub fn stop(&mut self) {
        self.animation = None;
        self.current_time = 0.0;
        self.delta_time = 0.0;
        self.states.clear();
        self.palette.write_with(Vec::clear);
    }

    /// Advances playback by `dt` seconds and recomputes the palette.
    ///
    /// Time wraps into `[0, duration)`. Does nothing while idle, and a
    /// non-finite advance leaves the pose untouched.
    pub fn update_animation(&mut self, dt: f32) {
        let Some(animation) = &self.animation else {
            return;
        };

        self.delta_time = dt;
        let ticks_per_second = if animation.ticks_per_second() > 0.0 {
            animation.ticks_per_second()
        } else {
            self.settings.default_ticks_per_second
        };

        let duration = animation.duration();
        let advanced = self.current_time + ticks_per_second * dt * self.settings.time_scale;
        if !advanced.is_finite() {
            log::warn!(
                "Ignoring non-finite advance on '{}' (dt {dt}, time scale {})",
                animation.name(),
                self.settings.time_scale
            );
            return;
        }
        self.current_time = if duration > 0.0 {
            let wrapped = advanced.rem_euclid(duration);
            // rem_euclid may round up to `duration` for tiny negative inputs
            if wrapped >= duration { 0.0 } else { wrapped }
        } else {
            0.0
        };

        self.compute_pose();
    }

    fn compute_pose(&mut self) {
        let Some(animation) = self.animation.clone() else {
            return;
        };
        if animation.hierarchy().is_empty() {
            return;
        }

        let time = self.current_time;
        let states = &mut self.states;
        self.palette.write_with(|matrices| {
            Self::calculate_bone_transform(&animation, 0, Mat4::IDENTITY, time, states, matrices);
        });
    }

    /// Depth-first walk writing `global * offset` for every skinned node.
    fn calculate_bone_transform(
        animation: &Animation,
        node_index: NodeIndex,
        parent_transform: Mat4,
        time: f32,
        states: &mut [BoneState],
        matrices: &mut [Mat4],
    ) {
        let Some(node) = animation.hierarchy().node(node_index) else {
            return;
        };

        let local = match animation.node_bone(node_index) {
            Some(bone_index) => {
                let bone = &animation.bones()[bone_index];
                let state = &mut states[bone_index];
                match bone.sample(time, &mut state.cursor) {
                    Ok(local) => {
                        state.local = Some(local);
                        local
                    }
                    Err(err) => {
                        if !state.warned {
                            log::warn!("Bone '{}' in '{}': {err}; holding its last pose", bone.name(), animation.name());
                            state.warned = true;
                        }
                        state.local.unwrap_or(node.transformation)
                    }
                }
            }
            None => node.transformation,
        };

        let global = parent_transform * local;

        if let Some(info) = animation.node_info(node_index)
            && let Some(slot) = matrices.get_mut(info.id)
        {
            *slot = global * info.offset;
        }

        for &child in &node.children {
            Self::calculate_bone_transform(animation, child, global, time, states, matrices);
        }
    }

    /// The palette as of the last update, indexed by bone id.
    pub fn final_bone_matrices(&self) -> RwLockReadGuard<'_, Vec<Mat4>> {
        self.palette.read()
    }

    /// Shareable handle to the palette storage.
    #[must_use]
    pub fn palette(&self) -> &BonePalette {
        &self.palette
    }

    /// Playback position in ticks.
    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// The `dt` passed to the last update, in seconds.
    #[inline]
    #[must_use]
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    #[must_use]
    pub fn animation(&self) -> Option<&Arc<Animation>> {
        self.animation.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &AnimatorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut AnimatorSettings {
        &mut self.settings
    }
}
