use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ossein_core::{OsseinError, Result};

/// Reads files relative to the directory of a source asset.
///
/// `data:` URIs are decoded in place instead of touching the disk.
#[derive(Debug, Clone)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        if let Some(data) = uri.strip_prefix("data:") {
            return decode_data_uri(data);
        }
        read_file(&self.root_path.join(uri))
    }
}

/// Reads a whole file, reporting a missing file as [`OsseinError::AssetNotFound`].
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|err| not_found_or_io(err, path))
}

pub(crate) fn not_found_or_io(err: std::io::Error, path: &Path) -> OsseinError {
    if err.kind() == ErrorKind::NotFound {
        OsseinError::AssetNotFound(path.display().to_string())
    } else {
        OsseinError::IoError(err)
    }
}

/// Decodes the part of a data URI after `data:`.
fn decode_data_uri(data: &str) -> Result<Vec<u8>> {
    let (header, payload) = data
        .split_once(',')
        .ok_or_else(|| OsseinError::DataUriError("missing ',' separator".to_owned()))?;

    if !header.ends_with(";base64") {
        return Err(OsseinError::DataUriError(format!(
            "unsupported encoding '{header}', only base64 is supported"
        )));
    }

    STANDARD
        .decode(payload)
        .map_err(|err| OsseinError::DataUriError(err.to_string()))
}
