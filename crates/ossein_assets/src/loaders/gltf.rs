//! glTF 2.0 import.
//!
//! Turns a `.gltf` / `.glb` file into the [`ImportedScene`] the animation
//! crate consumes. glTF and glam share the column-major convention, so node
//! matrices are copied without a transpose. Key times stay in seconds and
//! clips report [`TICKS_PER_SECOND`].

use std::collections::BTreeMap;
use std::fs;
use std::io::BufReader;
use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use gltf::animation::Interpolation;
use gltf::animation::util::ReadOutputs;
use ossein_animation::{
    ImportedChannel, ImportedClip, ImportedNode, ImportedScene, Interpolatable, Keyframe,
    SceneImporter,
};
use ossein_core::{OsseinError, Result};

use crate::io::{FileAssetReader, not_found_or_io};

/// Name of the synthetic node parenting the scene's root nodes.
pub const ROOT_NODE_NAME: &str = "gltf_root";

/// glTF key times are seconds.
pub const TICKS_PER_SECOND: f32 = 1.0;

/// Engine-side name of a glTF node. Unnamed nodes are `Node_{index}`.
#[must_use]
pub fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string)
}

/// A parsed glTF document with its buffers resolved.
pub struct GltfDocument {
    pub gltf: gltf::Gltf,
    pub buffers: Vec<Vec<u8>>,
}

impl GltfDocument {
    /// Parses and validates `path`. Dangling node, skin or accessor
    /// indices are reported as [`OsseinError::GltfError`].
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|err| not_found_or_io(err, path))?;
        let reader = BufReader::new(file);
        let gltf = gltf::Gltf::from_reader(reader)
            .map_err(|err| OsseinError::GltfError(format!("{}: {err}", path.display())))?;

        let files = FileAssetReader::new(path);
        let buffers = Self::load_buffers(&gltf, &files)?;

        log::debug!(
            "Opened glTF {}: {} nodes, {} skins, {} animations",
            path.display(),
            gltf.nodes().count(),
            gltf.skins().count(),
            gltf.animations().count()
        );

        Ok(Self { gltf, buffers })
    }

    fn load_buffers(gltf: &gltf::Gltf, files: &FileAssetReader) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let blob = gltf.blob.as_deref().ok_or_else(|| {
                        OsseinError::GltfError("Missing GLB binary chunk".to_owned())
                    })?;
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) => {
                    buffer_data.push(files.read_bytes(uri)?);
                }
            }
        }
        Ok(buffer_data)
    }

    /// Buffer lookup for gltf's accessor readers.
    pub(crate) fn buffer(&self, buffer: &gltf::Buffer) -> Option<&[u8]> {
        self.buffers.get(buffer.index()).map(Vec::as_slice)
    }

    pub fn to_scene(&self) -> ImportedScene {
        ImportedScene {
            root: self.read_root(),
            animations: self.gltf.animations().map(|anim| self.read_clip(&anim)).collect(),
        }
    }

    /// Builds the synthetic root over the default scene (or every
    /// parentless node when the file declares no scene).
    fn read_root(&self) -> ImportedNode {
        let roots: Vec<gltf::Node> = match self.gltf.default_scene().or_else(|| self.gltf.scenes().next()) {
            Some(scene) => scene.nodes().collect(),
            None => {
                let mut has_parent = vec![false; self.gltf.nodes().count()];
                for node in self.gltf.nodes() {
                    for child in node.children() {
                        has_parent[child.index()] = true;
                    }
                }
                self.gltf.nodes().filter(|node| !has_parent[node.index()]).collect()
            }
        };

        let mut visited = vec![false; self.gltf.nodes().count()];
        let mut root = ImportedNode::new(ROOT_NODE_NAME, Mat4::IDENTITY);
        for node in roots {
            if let Some(child) = Self::read_node(&node, &mut visited) {
                root.children.push(child);
            }
        }
        root
    }

    fn read_node(node: &gltf::Node, visited: &mut [bool]) -> Option<ImportedNode> {
        let seen = visited.get_mut(node.index())?;
        if *seen {
            log::warn!("glTF node {} is reachable twice; skipping the repeat", node.index());
            return None;
        }
        *seen = true;

        let mut imported = ImportedNode::new(
            node_name(node),
            Mat4::from_cols_array_2d(&node.transform().matrix()),
        );
        for child in node.children() {
            if let Some(child) = Self::read_node(&child, visited) {
                imported.children.push(child);
            }
        }
        Some(imported)
    }

    /// Merges the per-property glTF channels into one channel per node.
    fn read_clip(&self, anim: &gltf::Animation) -> ImportedClip {
        let mut channels: BTreeMap<usize, ImportedChannel> = BTreeMap::new();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| self.buffer(&buffer));
            let node = channel.target().node();

            let Some(inputs) = reader.read_inputs() else {
                log::warn!("Animation channel on '{}' has no key times", node_name(&node));
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            let interpolation = channel.sampler().interpolation();
            let cubic = matches!(interpolation, Interpolation::CubicSpline);
            if matches!(interpolation, Interpolation::Step) {
                log::debug!("Step interpolation on '{}' is sampled linearly", node_name(&node));
            }

            let entry = channels
                .entry(node.index())
                .or_insert_with(|| rest_channel(&node));

            match reader.read_outputs() {
                Some(ReadOutputs::Translations(iter)) => {
                    entry.positions = keyframes(&times, iter.map(Vec3::from_array), cubic);
                }
                Some(ReadOutputs::Rotations(iter)) => {
                    entry.rotations =
                        keyframes(&times, iter.into_f32().map(Quat::from_array), cubic);
                }
                Some(ReadOutputs::Scales(iter)) => {
                    entry.scales = keyframes(&times, iter.map(Vec3::from_array), cubic);
                }
                Some(ReadOutputs::MorphTargetWeights(_)) => {
                    log::debug!("Skipping morph target weights on '{}'", entry.node_name);
                }
                None => {
                    log::warn!("Animation channel on '{}' has no output values", entry.node_name);
                }
            }
        }

        let duration = channels
            .values()
            .flat_map(|channel| {
                let position = channel.positions.last().map(|k| k.time_stamp);
                let rotation = channel.rotations.last().map(|k| k.time_stamp);
                let scale = channel.scales.last().map(|k| k.time_stamp);
                [position, rotation, scale]
            })
            .flatten()
            .fold(0.0_f32, f32::max);

        let mut channels: Vec<ImportedChannel> = channels.into_values().collect();
        for channel in &mut channels {
            hold_until(&mut channel.positions, duration);
            hold_until(&mut channel.rotations, duration);
            hold_until(&mut channel.scales, duration);
        }

        ImportedClip {
            name: anim.name().unwrap_or("anim").to_owned(),
            duration,
            ticks_per_second: TICKS_PER_SECOND,
            channels,
        }
    }
}

/// A channel holding the node's rest pose, one key per component.
fn rest_channel(node: &gltf::Node) -> ImportedChannel {
    let (translation, rotation, scale) = node.transform().decomposed();
    ImportedChannel {
        node_name: node_name(node),
        positions: vec![Keyframe::new(0.0, Vec3::from_array(translation))],
        rotations: vec![Keyframe::new(0.0, Quat::from_array(rotation))],
        scales: vec![Keyframe::new(0.0, Vec3::from_array(scale))],
    }
}

/// Pairs key times with values. Cubic spline outputs come as
/// `[in_tangent, value, out_tangent]` triplets; only the value is kept.
fn keyframes<T>(times: &[f32], values: impl Iterator<Item = T>, cubic: bool) -> Vec<Keyframe<T>> {
    let values: Vec<T> = if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    };
    times
        .iter()
        .zip(values)
        .map(|(&time, value)| Keyframe::new(time, value))
        .collect()
}

/// glTF holds a track's last value until the clip ends.
fn hold_until<T: Interpolatable>(keys: &mut Vec<Keyframe<T>>, duration: f32) {
    if keys.len() < 2 {
        return;
    }
    if let Some(last) = keys.last().copied()
        && last.time_stamp < duration
    {
        keys.push(Keyframe::new(duration, last.value));
    }
}

/// [`SceneImporter`] for glTF 2.0 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl SceneImporter for GltfImporter {
    fn import(&self, path: &Path) -> Result<ImportedScene> {
        Ok(GltfDocument::open(path)?.to_scene())
    }
}
