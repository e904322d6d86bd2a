//! glTF Import Tests
//!
//! Tests for:
//! - Node tree import under the synthetic `gltf_root`
//! - Skin joints registering ids and inverse bind matrices
//! - Skinned vertex influences
//! - Clip import, including tracks padded to the clip length
//! - End-to-end playback of an imported clip
//! - Invalid documents failing without a panic
//!
//! Fixtures are tiny two-joint legs written to a temp dir.

use std::f32::consts::FRAC_1_SQRT_2;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use glam::{Mat4, Vec3};
use serde_json::{Value, json};
use tempfile::TempDir;

use ossein::animation::BoneRegistry;
use ossein::{Animation, AnimationLibrary, Animator, AnimatorSettings, GltfImporter, Model, OsseinError, SceneImporter};

const FLOAT: u32 = 5126;
const UNSIGNED_SHORT: u32 = 5123;

#[derive(Default)]
struct BufferBuilder {
    bytes: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn push(&mut self, raw: &[u8], component_type: u32, count: usize, ty: &str) -> usize {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(raw);
        self.views.push(json!({ "buffer": 0, "byteOffset": offset, "byteLength": raw.len() }));
        self.accessors.push(json!({
            "bufferView": self.views.len() - 1,
            "componentType": component_type,
            "count": count,
            "type": ty,
        }));
        self.accessors.len() - 1
    }

    fn bounds(&mut self, accessor: usize, min: &[f32], max: &[f32]) {
        self.accessors[accessor]["min"] = json!(min);
        self.accessors[accessor]["max"] = json!(max);
    }

    fn floats(&mut self, data: &[f32], components: usize, ty: &str) -> usize {
        let raw: Vec<u8> = data.iter().flat_map(|f| f.to_le_bytes()).collect();
        self.push(&raw, FLOAT, data.len() / components, ty)
    }

    fn shorts(&mut self, data: &[u16], components: usize, ty: &str) -> usize {
        let raw: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(&raw, UNSIGNED_SHORT, data.len() / components, ty)
    }
}

/// Armature → Hip (y=1) → Knee (y=1), plus a skinned three-vertex Body.
///
/// The clip "stride" slides Hip from x=0 to x=2 over one second and turns
/// Knee 90° about Y in the first half second.
fn leg_document(buffer_uri: &str, builder: &BufferBuilder, with_animation: bool) -> Value {
    let mut document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 3] }],
        "nodes": [
            { "name": "Armature", "children": [1] },
            { "name": "Hip", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "Knee", "translation": [0.0, 1.0, 0.0] },
            { "name": "Body", "mesh": 0, "skin": 0 }
        ],
        "skins": [{ "joints": [1, 2], "inverseBindMatrices": 4 }],
        "meshes": [{
            "name": "Body",
            "primitives": [{ "attributes": { "POSITION": 5, "JOINTS_0": 6, "WEIGHTS_0": 7 } }]
        }],
        "buffers": [{ "byteLength": builder.bytes.len(), "uri": buffer_uri }],
        "bufferViews": builder.views,
        "accessors": builder.accessors,
    });

    if with_animation {
        document["animations"] = json!([{
            "name": "stride",
            "samplers": [
                { "input": 0, "output": 1, "interpolation": "LINEAR" },
                { "input": 2, "output": 3, "interpolation": "LINEAR" }
            ],
            "channels": [
                { "sampler": 0, "target": { "node": 1, "path": "translation" } },
                { "sampler": 1, "target": { "node": 2, "path": "rotation" } }
            ]
        }]);
    }
    document
}

fn leg_buffers() -> BufferBuilder {
    let mut b = BufferBuilder::default();
    // 0, 1: Hip translation
    let hip_times = b.floats(&[0.0, 1.0], 1, "SCALAR");
    b.bounds(hip_times, &[0.0], &[1.0]);
    b.floats(&[0.0, 1.0, 0.0, 2.0, 1.0, 0.0], 3, "VEC3");
    // 2, 3: Knee rotation
    let knee_times = b.floats(&[0.0, 0.5], 1, "SCALAR");
    b.bounds(knee_times, &[0.0], &[0.5]);
    b.floats(&[0.0, 0.0, 0.0, 1.0, 0.0, FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2], 4, "VEC4");
    // 4: inverse bind matrices
    let hip = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)).to_cols_array();
    let knee = Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0)).to_cols_array();
    b.floats(&[hip, knee].concat(), 16, "MAT4");
    // 5, 6, 7: mesh
    let positions = b.floats(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0], 3, "VEC3");
    b.bounds(positions, &[0.0, 0.0, 0.0], &[0.0, 2.0, 0.0]);
    b.shorts(&[0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0], 4, "VEC4");
    b.floats(&[1.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0], 4, "VEC4");
    b
}

fn write_leg(dir: &TempDir, embedded: bool, with_animation: bool) -> PathBuf {
    let builder = leg_buffers();
    let uri = if embedded {
        format!("data:application/octet-stream;base64,{}", STANDARD.encode(&builder.bytes))
    } else {
        fs::write(dir.path().join("leg.bin"), &builder.bytes).unwrap();
        "leg.bin".to_owned()
    };

    let path = dir.path().join("leg.gltf");
    let document = leg_document(&uri, &builder, with_animation);
    fs::write(&path, serde_json::to_vec_pretty(&document).unwrap()).unwrap();
    path
}

fn translation(m: Mat4) -> Vec3 {
    m.w_axis.truncate()
}

// ============================================================================
// Scene Import
// ============================================================================

#[test]
fn imports_node_tree_under_synthetic_root() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_leg(&dir, true, true);

    let scene = GltfImporter.import(&path)?;

    assert_eq!(scene.root.name, "gltf_root");
    let names: Vec<_> = scene.root.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["Armature", "Body"]);
    let knee = scene.root.find("Knee").expect("Knee imported");
    assert!(knee.transform.abs_diff_eq(Mat4::from_translation(Vec3::Y), 1e-6));
    Ok(())
}

#[test]
fn imports_clip_merged_per_node() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_leg(&dir, false, true);

    let scene = GltfImporter.import(&path)?;
    let clip = &scene.animations[0];

    assert_eq!(clip.name, "stride");
    assert_eq!(clip.duration, 1.0);
    assert_eq!(clip.channels.len(), 2);

    let hip = &clip.channels[0];
    assert_eq!(hip.node_name, "Hip");
    assert_eq!(hip.positions.len(), 2);
    // rest pose fills the untouched components
    assert_eq!(hip.scales.len(), 1);
    assert_eq!(hip.scales[0].value, Vec3::ONE);

    let knee = &clip.channels[1];
    assert_eq!(knee.positions[0].value, Vec3::Y);
    // the half-second rotation track holds until the clip ends
    assert_eq!(knee.rotations.len(), 3);
    assert_eq!(knee.rotations[2].time_stamp, 1.0);
    Ok(())
}

// ============================================================================
// Model
// ============================================================================

#[test]
fn model_registers_skin_joints() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let model = Model::load(write_leg(&dir, true, true))?;

    let registry = model.bone_registry();
    assert_eq!(model.bone_count(), 2);
    assert_eq!(registry.id_of("Hip"), Some(0));
    assert_eq!(registry.id_of("Knee"), Some(1));
    assert_eq!(
        registry.get("Knee").unwrap().offset,
        Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0))
    );
    Ok(())
}

#[test]
fn model_reads_vertex_influences() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let model = Model::load(write_leg(&dir, false, true))?;

    let meshes = model.meshes();
    assert_eq!(meshes.len(), 1);
    let mesh = &meshes[0];
    assert_eq!(mesh.indices, [0, 1, 2]);

    let v = &mesh.vertices;
    assert_eq!(v[0].bone_ids, [0, -1, -1, -1]);
    assert_eq!(v[0].weights, [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(v[1].bone_ids, [0, 1, -1, -1]);
    assert_eq!(v[2].bone_ids, [1, -1, -1, -1]);
    assert!((v[2].weights[0] - 1.0).abs() < 1e-6);
    assert_eq!(v[2].position, [0.0, 2.0, 0.0]);
    Ok(())
}

// ============================================================================
// Playback
// ============================================================================

#[test]
fn imported_clip_drives_palette() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut model = Model::load(write_leg(&dir, true, true))?;

    let animation = Arc::new(model.load_animation(0)?);
    assert_eq!(animation.bone_count(), model.bone_count());

    let mut animator = Animator::with_animation(animation, AnimatorSettings::default());

    // bind pose: skinning matrices are identity
    for m in animator.final_bone_matrices().iter() {
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    animator.update_animation(0.5);
    let palette = animator.final_bone_matrices();

    let hip = palette[model.bone_registry().id_of("Hip").unwrap()];
    assert!(translation(hip).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-4));

    // Knee turns about Y around its own joint, which sits on the bone axis
    let knee = palette[model.bone_registry().id_of("Knee").unwrap()];
    assert!(translation(knee).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-4));
    let turned = knee.transform_vector3(Vec3::X);
    assert!(turned.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-4), "got {turned:?}");
    Ok(())
}

#[test]
fn library_loads_every_clip() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut model = Model::load(write_leg(&dir, true, true))?;

    let mut library = AnimationLibrary::new();
    let handles = library.load_all(&mut model)?;

    assert_eq!(handles.len(), 1);
    assert_eq!(library.find_by_name("stride"), Some(handles[0]));
    Ok(())
}

// ============================================================================
// Failure Paths
// ============================================================================

#[test]
fn file_without_clips_yields_empty_animation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_leg(&dir, true, false);

    let mut registry = BoneRegistry::new();
    let animation = Animation::load(&path, &GltfImporter, 0, &mut registry);
    assert!(animation.bones().is_empty());
    assert_eq!(animation.duration(), 0.0);

    let result = Animation::try_load(&path, &GltfImporter, 0, &mut registry);
    assert!(matches!(result, Err(OsseinError::NoAnimations(_))));

    let mut model = Model::load(&path)?;
    let empty = model.animation_or_empty(0);
    assert!(empty.is_empty());
    Ok(())
}

#[test]
fn missing_external_buffer_is_reported() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_leg(&dir, false, true);
    fs::remove_file(dir.path().join("leg.bin"))?;

    let err = GltfImporter.import(&path).unwrap_err();
    assert!(matches!(err, OsseinError::AssetNotFound(_)));
    Ok(())
}

#[test]
fn malformed_document_is_a_gltf_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path: &Path = &dir.path().join("broken.gltf");
    fs::write(path, b"{ not json")?;

    assert!(matches!(
        GltfImporter.import(path),
        Err(OsseinError::GltfError(_))
    ));
    Ok(())
}

fn write_document(dir: &TempDir, name: &str, document: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_vec(document).unwrap()).unwrap();
    path
}

#[test]
fn dangling_scene_node_yields_empty_animation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "dangling_scene.gltf",
        &json!({
            "asset": { "version": "2.0" },
            "scenes": [{ "nodes": [5] }],
            "nodes": [{ "name": "Only" }]
        }),
    );

    let mut registry = BoneRegistry::new();
    let animation = Animation::load(&path, &GltfImporter, 0, &mut registry);
    assert!(animation.is_empty());
    assert_eq!(animation.duration(), 0.0);
    assert!(registry.is_empty());

    assert!(matches!(
        GltfImporter.import(&path),
        Err(OsseinError::GltfError(_))
    ));
    Ok(())
}

#[test]
fn dangling_skin_joint_fails_model_load() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(
        &dir,
        "dangling_joint.gltf",
        &json!({
            "asset": { "version": "2.0" },
            "nodes": [{ "name": "Only" }],
            "skins": [{ "joints": [7] }]
        }),
    );

    assert!(matches!(Model::load(&path), Err(OsseinError::GltfError(_))));
    Ok(())
}

