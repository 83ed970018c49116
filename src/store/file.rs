//! Write-to-temp-then-rename file implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ReadResult, StoreError};

/// A file that is only ever replaced atomically.
///
/// Writes go to `{path}.tmp` first and are then renamed over `{path}`,
/// so the file is either the old content or the new content. Missing
/// parent directories are created on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    /// Creates a handle for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current content.
    pub async fn read(&self) -> ReadResult {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_blocking(&path))
            .await
            .unwrap_or_else(|e| ReadResult::Unreadable {
                reason: e.to_string(),
            })
    }

    /// Replaces the content with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any filesystem step fails.
    pub async fn write(&self, bytes: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_blocking(&path, &bytes))
            .await
            .map_err(StoreError::Worker)?
    }

    /// Replaces the content only when it differs from `bytes`.
    ///
    /// Returns `true` if the file was written. An unreadable existing file
    /// counts as different.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    pub async fn write_if_changed(&self, bytes: Vec<u8>) -> Result<bool, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            if read_blocking(&path).matches(&bytes) {
                return Ok(false);
            }
            write_blocking(&path, &bytes).map(|()| true)
        })
        .await
        .map_err(StoreError::Worker)?
    }
}

fn read_blocking(path: &Path) -> ReadResult {
    match std::fs::read(path) {
        Ok(bytes) => ReadResult::Found(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => ReadResult::NotFound,
        Err(e) => ReadResult::Unreadable {
            reason: e.to_string(),
        },
    }
}

fn write_blocking(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let fail = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(fail)?;
        }
    }

    // ipfilter.dat -> ipfilter.dat.tmp, never ipfilter.tmp
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, bytes).map_err(fail)?;
    std::fs::rename(&temp_path, path).map_err(fail)?;

    tracing::trace!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}
