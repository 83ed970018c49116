//! Crash-safe file writes for rule lists.
//!
//! Every list the tool produces (download cache, merged output, A/B
//! slots) goes through [`AtomicFile`], so readers such as qBittorrent
//! never observe a half-written file.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::AtomicFile;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result of reading a stored file.
///
/// Read-side problems are values rather than errors; callers treat a
/// missing or unreadable file as "nothing stored yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// The file content.
    Found(Vec<u8>),

    /// No file exists at the path.
    NotFound,

    /// The file exists but could not be read.
    Unreadable {
        /// Reason, for logging.
        reason: String,
    },
}

impl ReadResult {
    /// Returns the content if the file was read.
    #[must_use]
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Found(bytes) => Some(bytes),
            Self::NotFound | Self::Unreadable { .. } => None,
        }
    }

    /// Returns `true` if the file was read and equals `other`.
    #[must_use]
    pub fn matches(&self, other: &[u8]) -> bool {
        matches!(self, Self::Found(bytes) if bytes == other)
    }
}

/// Errors from writing a stored file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Creating the directory, writing the temp file or renaming it failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The blocking writer task panicked.
    #[error("File writer task failed: {0}")]
    Worker(#[source] tokio::task::JoinError),
}
