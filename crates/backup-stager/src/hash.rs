use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// Size of the buffer files are streamed through.
pub const CHUNK_BYTES: usize = 8 * 1024;

/// Hash a file's contents with SHA-256, returning the lowercase hex digest.
pub fn hash_file(path: &Path) -> Result<String, HashError> {
    hash_file_with::<Sha256>(path)
}

/// Hash a file's contents with any digest, returning the lowercase hex digest.
///
/// The file is streamed in [`CHUNK_BYTES`] chunks and never read into memory whole.
pub fn hash_file_with<D: Digest>(path: &Path) -> Result<String, HashError> {
    debug!("Hashing {path:?}");

    let mut file = File::open(path).map_err(|e| HashError::Open(e, path.to_path_buf()))?;

    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_BYTES];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(bytes_read) => bytes_read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HashError::Read(e, path.to_path_buf())),
        };

        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }

    let digest = hex::encode(hasher.finalize());
    debug!("Hash: {digest}");

    Ok(digest)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Failed to open {1:?} for hashing:\n{0}")]
    Open(#[source] io::Error, PathBuf),

    #[error("Failed to read {1:?} while hashing:\n{0}")]
    Read(#[source] io::Error, PathBuf),
}
