//! Storage sinks for downloaded documents.
mod local;
mod object;

pub use local::{ensure_output_dir, AtomicFileWriter, LocalFsSink, PersistError};
pub use object::{ObjectStoreSink, S3Settings};

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage path {0:?}")]
    InvalidPath(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Destination for document bytes, keyed by a `/`-separated relative path.
///
/// Writes create any missing directories or prefixes; an existing entry at the
/// same path is replaced.
#[async_trait::async_trait]
pub trait StorageSink: Send + Sync {
    async fn write(&self, path: &str, content: &[u8]) -> Result<(), StorageError>;
}

/// Rejects empty, absolute and parent-escaping paths.
fn validate_relative(path: &str) -> Result<(), StorageError> {
    let escapes = path
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..");
    if path.is_empty() || path.starts_with('/') || path.contains('\\') || escapes {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}
