use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use ossein_animation::{Animation, BoneRegistry, ImportedScene};
use ossein_core::Result;

use crate::loaders::gltf::{GltfDocument, GltfImporter, node_name};

/// Bone slots per vertex, matching the skinning shader's `ivec4`/`vec4` inputs.
pub const MAX_BONE_INFLUENCE: usize = 4;

/// Interleaved vertex layout for skinned meshes.
///
/// Unused influence slots hold bone id -1 and weight 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub weights: [f32; MAX_BONE_INFLUENCE],
}

impl Default for SkinnedVertex {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0; 3],
            tex_coords: [0.0; 2],
            bone_ids: [-1; MAX_BONE_INFLUENCE],
            weights: [0.0; MAX_BONE_INFLUENCE],
        }
    }
}

impl SkinnedVertex {
    /// Stores an influence in the first free slot. Returns `false` when all
    /// slots are taken.
    pub fn set_bone_data(&mut self, bone_id: i32, weight: f32) -> bool {
        match self.bone_ids.iter().position(|&id| id < 0) {
            Some(slot) => {
                self.bone_ids[slot] = bone_id;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    /// Like [`set_bone_data`](Self::set_bone_data) for a registry id.
    /// Ids that do not fit the shader's `int` are skipped.
    pub fn add_influence(&mut self, bone_id: usize, weight: f32) -> bool {
        match i32::try_from(bone_id) {
            Ok(bone_id) => self.set_bone_data(bone_id, weight),
            Err(_) => {
                log::warn!("Bone id {bone_id} does not fit a vertex influence slot");
                false
            }
        }
    }

    /// Rescales the weights to sum to one. Unskinned vertices are left alone.
    pub fn normalize_weights(&mut self) {
        let total: f32 = self.weights.iter().sum();
        if total > f32::EPSILON {
            for weight in &mut self.weights {
                *weight /= total;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    pub name: String,
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u32>,
}

/// A skinned model: meshes, the imported node tree and the bone id space
/// its animations write into.
#[derive(Debug, Clone)]
pub struct Model {
    path: PathBuf,
    scene: ImportedScene,
    meshes: Vec<SkinnedMesh>,
    bone_registry: BoneRegistry,
}

impl Model {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = GltfDocument::open(path)?;

        let mut bone_registry = BoneRegistry::new();
        let skin_bone_ids = Self::read_skins(&document, &mut bone_registry);
        let meshes = Self::read_meshes(&document, &skin_bone_ids);
        let scene = document.to_scene();

        log::info!(
            "Loaded model {}: {} meshes, {} bones, {} animations",
            path.display(),
            meshes.len(),
            bone_registry.len(),
            scene.animations.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            scene,
            meshes,
            bone_registry,
        })
    }

    /// Registers every skin joint with its inverse bind matrix.
    ///
    /// Returns, per skin, the bone id of each joint in skin order.
    fn read_skins(document: &GltfDocument, registry: &mut BoneRegistry) -> Vec<Vec<usize>> {
        document
            .gltf
            .skins()
            .map(|skin| {
                let reader = skin.reader(|buffer| document.buffer(&buffer));
                let inverse_bind_matrices: Vec<Mat4> = reader
                    .read_inverse_bind_matrices()
                    .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
                    .unwrap_or_default();

                skin.joints()
                    .enumerate()
                    .map(|(i, joint)| {
                        let offset = inverse_bind_matrices
                            .get(i)
                            .copied()
                            .unwrap_or(Mat4::IDENTITY);
                        registry.register(&node_name(&joint), offset)
                    })
                    .collect()
            })
            .collect()
    }

    fn read_meshes(document: &GltfDocument, skin_bone_ids: &[Vec<usize>]) -> Vec<SkinnedMesh> {
        let mut meshes = Vec::new();
        for node in document.gltf.nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            let bone_ids = node
                .skin()
                .and_then(|skin| skin_bone_ids.get(skin.index()))
                .map(Vec::as_slice);
            let mesh_name = mesh.name().map_or_else(|| node_name(&node), ToString::to_string);

            for primitive in mesh.primitives() {
                if let Some(skinned) = Self::read_primitive(document, &primitive, bone_ids) {
                    meshes.push(SkinnedMesh {
                        name: format!("{mesh_name}_{}", primitive.index()),
                        ..skinned
                    });
                }
            }
        }
        meshes
    }

    fn read_primitive(
        document: &GltfDocument,
        primitive: &gltf::Primitive,
        bone_ids: Option<&[usize]>,
    ) -> Option<SkinnedMesh> {
        let reader = primitive.reader(|buffer| document.buffer(&buffer));

        let Some(positions) = reader.read_positions() else {
            log::warn!("Skipping primitive {} without positions", primitive.index());
            return None;
        };
        let mut vertices: Vec<SkinnedVertex> = positions
            .map(|position| SkinnedVertex {
                position,
                ..SkinnedVertex::default()
            })
            .collect();

        if let Some(normals) = reader.read_normals() {
            for (vertex, normal) in vertices.iter_mut().zip(normals) {
                vertex.normal = normal;
            }
        }
        if let Some(tex_coords) = reader.read_tex_coords(0) {
            for (vertex, uv) in vertices.iter_mut().zip(tex_coords.into_f32()) {
                vertex.tex_coords = uv;
            }
        }

        if let (Some(joints), Some(weights), Some(bone_ids)) =
            (reader.read_joints(0), reader.read_weights(0), bone_ids)
        {
            for ((vertex, joints), weights) in vertices
                .iter_mut()
                .zip(joints.into_u16())
                .zip(weights.into_f32())
            {
                for (&joint, &weight) in joints.iter().zip(&weights) {
                    if weight <= 0.0 {
                        continue;
                    }
                    if let Some(&bone_id) = bone_ids.get(usize::from(joint)) {
                        vertex.add_influence(bone_id, weight);
                    }
                }
                vertex.normalize_weights();
            }
        }

        let indices = reader.read_indices().map_or_else(
            || (0..vertices.len() as u32).collect(),
            |indices| indices.into_u32().collect(),
        );

        Some(SkinnedMesh {
            name: String::new(),
            vertices,
            indices,
        })
    }

    /// Builds clip `clip_index` of this model's own file.
    ///
    /// Joints the clip animates but the skin lacks are added to the
    /// model's registry.
    pub fn load_animation(&mut self, clip_index: usize) -> Result<Animation> {
        Animation::from_scene(&self.scene, clip_index, &mut self.bone_registry)
    }

    /// Like [`load_animation`](Self::load_animation); failures are logged
    /// and yield an empty animation.
    pub fn animation_or_empty(&mut self, clip_index: usize) -> Animation {
        self.load_animation(clip_index).unwrap_or_else(|err| {
            log::error!(
                "Failed to load animation {clip_index} of {}: {err}",
                self.path.display()
            );
            Animation::empty()
        })
    }

    /// Loads a clip stored in a separate file against this model's skeleton.
    pub fn load_external_animation(&mut self, path: &Path, clip_index: usize) -> Animation {
        Animation::load(path, &GltfImporter, clip_index, &mut self.bone_registry)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn scene(&self) -> &ImportedScene {
        &self.scene
    }

    #[must_use]
    pub fn meshes(&self) -> &[SkinnedMesh] {
        &self.meshes
    }

    #[must_use]
    pub fn bone_registry(&self) -> &BoneRegistry {
        &self.bone_registry
    }

    pub fn bone_registry_mut(&mut self) -> &mut BoneRegistry {
        &mut self.bone_registry
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_registry.len()
    }

    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.scene.animations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SkinnedVertex>(), 64);
    }

    #[test]
    fn bone_slots_fill_in_order() {
        let mut vertex = SkinnedVertex::default();
        assert!(vertex.set_bone_data(4, 0.5));
        assert!(vertex.set_bone_data(7, 0.5));
        assert_eq!(vertex.bone_ids, [4, 7, -1, -1]);

        assert!(vertex.set_bone_data(1, 0.1));
        assert!(vertex.set_bone_data(2, 0.1));
        assert!(!vertex.set_bone_data(3, 0.1));
    }

    #[test]
    fn weights_normalize_to_one() {
        let mut vertex = SkinnedVertex::default();
        vertex.set_bone_data(0, 2.0);
        vertex.set_bone_data(1, 6.0);
        vertex.normalize_weights();
        assert!((vertex.weights[0] - 0.25).abs() < 1e-6);
        assert!((vertex.weights[1] - 0.75).abs() < 1e-6);

        let mut unskinned = SkinnedVertex::default();
        unskinned.normalize_weights();
        assert_eq!(unskinned.weights, [0.0; MAX_BONE_INFLUENCE]);
    }

    #[test]
    fn oversized_bone_id_is_skipped() {
        let mut vertex = SkinnedVertex::default();
        assert!(!vertex.add_influence(usize::MAX, 0.5));
        assert_eq!(vertex.bone_ids, [-1; MAX_BONE_INFLUENCE]);

        assert!(vertex.add_influence(3, 0.5));
        assert_eq!(vertex.bone_ids, [3, -1, -1, -1]);
    }
}
