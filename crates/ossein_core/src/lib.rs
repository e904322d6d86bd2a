//! Core types shared by the Ossein crates.

pub mod errors;

pub use errors::{OsseinError, Result};
