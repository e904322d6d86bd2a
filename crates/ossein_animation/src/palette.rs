use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;
use parking_lot::{RwLock, RwLockReadGuard};

/// Name of the uniform array the skinning shader declares.
pub const PALETTE_UNIFORM: &str = "final_bones_matrices";

/// Uniform location name for palette slot `index`, e.g. `final_bones_matrices[3]`.
#[must_use]
pub fn uniform_name(index: usize) -> String {
    format!("{PALETTE_UNIFORM}[{index}]")
}

#[derive(Debug, Default)]
struct PaletteData {
    version: AtomicU64,
    matrices: RwLock<Vec<Mat4>>,
}

/// Final bone matrices, indexed by bone id.
///
/// Cloning shares the same storage, so a render thread can hold a handle
/// while the animator writes into it. The version increases on every write.
#[derive(Debug, Clone, Default)]
pub struct BonePalette(Arc<PaletteData>);

impl BonePalette {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self(Arc::new(PaletteData {
            version: AtomicU64::new(0),
            matrices: RwLock::new(vec![Mat4::IDENTITY; len]),
        }))
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.0.version.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.matrices.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.matrices.read().is_empty()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<Mat4>> {
        self.0.matrices.read()
    }

    /// Column-major `f32` bytes, 64 per matrix, ready for a uniform upload.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(self.0.matrices.read().as_slice()).to_vec()
    }

    /// Runs `f` under the write lock, then bumps the version.
    pub(crate) fn write_with<R>(&self, f: impl FnOnce(&mut Vec<Mat4>) -> R) -> R {
        let result = {
            let mut matrices = self.0.matrices.write();
            f(&mut matrices)
        };
        self.0.version.fetch_add(1, Ordering::Release);
        result
    }
}
