//! Per-source download cache.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::store::{AtomicFile, StoreError};

/// File name of the merged list inside the cache directory.
const MERGED_FILE: &str = "ipfilter-merged.dat";

/// Directory holding the last good copy of every remote list.
///
/// Each URL maps to `ipfilter-<sha256(url) hex>.dat`, so a failed download
/// can fall back to what was fetched before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCache {
    dir: PathBuf,
}

impl SourceCache {
    /// Creates a cache rooted at `dir`. Nothing is created until the first store.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the cache file for `url`.
    #[must_use]
    pub fn path_for(&self, url: &url::Url) -> PathBuf {
        let digest = Sha256::digest(url.as_str().as_bytes());
        let mut name = String::with_capacity(8 + digest.len() * 2 + 4);
        name.push_str("ipfilter-");
        for byte in digest {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".dat");
        self.dir.join(name)
    }

    /// Returns the path of the merged list.
    #[must_use]
    pub fn merged_path(&self) -> PathBuf {
        self.dir.join(MERGED_FILE)
    }

    /// Stores a freshly downloaded list. Returns `true` if the cached copy changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub async fn store(&self, url: &url::Url, bytes: Vec<u8>) -> Result<bool, StoreError> {
        AtomicFile::new(self.path_for(url))
            .write_if_changed(bytes)
            .await
    }

    /// Returns the cache files of `urls` that exist on disk.
    #[must_use]
    pub fn existing_paths<'a>(&self, urls: impl IntoIterator<Item = &'a url::Url>) -> Vec<PathBuf> {
        urls.into_iter()
            .map(|url| self.path_for(url))
            .filter(|path| path.is_file())
            .collect()
    }
}
