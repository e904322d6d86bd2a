//! Animator Settings
//!
//! Playback configuration for [`Animator`](crate::Animator).
//!
//! ```rust,ignore
//! use ossein_animation::AnimatorSettings;
//!
//! // Defaults: real-time playback, 25 ticks/s fallback, 100 palette slots
//! let settings = AnimatorSettings::default();
//!
//! // Half speed, read from a config file
//! let settings = AnimatorSettings::from_json(r#"{ "time_scale": 0.5 }"#)?;
//! ```

use ossein_core::Result;
use serde::Deserialize;

/// Tick rate assumed for clips that do not declare one.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// Length of the `final_bones_matrices` array in the skinning shader.
pub const DEFAULT_MAX_BONES: usize = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimatorSettings {
    /// Playback speed multiplier. Negative values play backwards.
    pub time_scale: f32,
    /// Used when a clip reports zero ticks per second.
    pub default_ticks_per_second: f32,
    /// Palette size the renderer can upload. Larger skeletons log a warning.
    pub max_bones: usize,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            max_bones: DEFAULT_MAX_BONES,
        }
    }
}

impl AnimatorSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
