pub mod gltf;

pub use self::gltf::{GltfDocument, GltfImporter, ROOT_NODE_NAME, TICKS_PER_SECOND, node_name};
