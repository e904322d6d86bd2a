//! Error Types
//!
//! This module defines the error types shared by every Ossein crate.
//!
//! # Overview
//!
//! The main error type [`OsseinError`] covers:
//! - Asset loading and decoding errors (files, glTF documents, buffers)
//! - Animation clip selection errors
//! - Keyframe lookups outside a track's time range
//! - Settings parsing errors
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, OsseinError>`.
//!
//! ```rust,ignore
//! use ossein_core::{OsseinError, Result};
//!
//! fn load_clip() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for Ossein.
#[derive(Error, Debug)]
pub enum OsseinError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// The imported scene carries no animation clips.
    #[error("Scene has no animations: {0}")]
    NoAnimations(String),

    /// A clip index past the end of the scene's clip list.
    #[error("Animation clip index out of range: {index} (clip count: {count})")]
    ClipIndexOutOfRange {
        /// The requested clip index
        index: usize,
        /// Number of clips in the scene
        count: usize,
    },

    /// No keyframe bracket contains the requested time.
    ///
    /// Raised when sampling a multi-key track at or after its last
    /// timestamp. Callers are expected to wrap time into the clip range.
    #[error("Keyframe lookup out of range: time {time} is not before last key at {last}")]
    KeyframeOutOfRange {
        /// The sampled time, in ticks
        time: f32,
        /// Timestamp of the track's last key, in ticks
        last: f32,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Settings document could not be parsed.
    #[error("Settings parse error: {0}")]
    SettingsError(#[from] serde_json::Error),
}

/// Alias for `Result<T, OsseinError>`.
pub type Result<T> = std::result::Result<T, OsseinError>;
