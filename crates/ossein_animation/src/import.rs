//! Imported scene data.
//!
//! The in-memory scene graph an asset importer hands to [`Animation`](crate::Animation).
//! Matrices are already in the engine's column-major convention and key
//! times are in ticks.

use std::path::Path;

use glam::Mat4;
use ossein_core::Result;

use crate::tracks::{KeyPosition, KeyRotation, KeyScale};

/// One node of the imported scene tree.
#[derive(Debug, Clone)]
pub struct ImportedNode {
    pub name: String,
    /// Bind-pose transform relative to the parent node.
    pub transform: Mat4,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: ImportedNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ImportedNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Keyframes animating one joint.
#[derive(Debug, Clone, Default)]
pub struct ImportedChannel {
    pub node_name: String,
    pub positions: Vec<KeyPosition>,
    pub rotations: Vec<KeyRotation>,
    pub scales: Vec<KeyScale>,
}

/// One animation clip.
#[derive(Debug, Clone, Default)]
pub struct ImportedClip {
    pub name: String,
    /// Length of the clip, in ticks.
    pub duration: f32,
    /// Tick rate. Zero means the source did not specify one.
    pub ticks_per_second: f32,
    pub channels: Vec<ImportedChannel>,
}

#[derive(Debug, Clone)]
pub struct ImportedScene {
    pub root: ImportedNode,
    pub animations: Vec<ImportedClip>,
}

/// Loads a scene file into an [`ImportedScene`].
pub trait SceneImporter {
    fn import(&self, path: &Path) -> Result<ImportedScene>;
}
