use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use boib_logging::boib_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::{validate_relative, StorageError, StorageSink};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write bytes to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // persist() replaces an existing target, so the last write wins.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Stores documents below a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFsSink {
    base_dir: PathBuf,
}

impl LocalFsSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn split(&self, path: &str) -> Result<(PathBuf, String), StorageError> {
        validate_relative(path)?;
        let (dir, filename) = match path.rsplit_once('/') {
            Some((dir, filename)) => (self.base_dir.join(dir), filename),
            None => (self.base_dir.clone(), path),
        };
        Ok((dir, filename.to_string()))
    }
}

#[async_trait::async_trait]
impl StorageSink for LocalFsSink {
    async fn write(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let (dir, filename) = self.split(path)?;
        let content = content.to_vec();
        let target = tokio::task::spawn_blocking(move || {
            AtomicFileWriter::new(dir).write(&filename, &content)
        })
        .await
        .map_err(io::Error::other)??;
        boib_debug!("wrote {}", target.display());
        Ok(())
    }
}
