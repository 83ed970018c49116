//! Local rule file discovery.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Expands file paths and glob patterns into a sorted, duplicate-free list.
///
/// Invalid patterns and patterns matching nothing are logged and skipped.
/// Directories are never returned.
#[must_use]
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = match ::glob::glob(pattern) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Invalid file pattern '{pattern}': {e}");
                continue;
            }
        };

        let before = found.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => {
                    tracing::debug!("Skipping directory {}", path.display());
                }
                Ok(path) => {
                    found.insert(path);
                }
                Err(e) => tracing::warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }

        if found.len() == before {
            tracing::warn!("No new files matched '{pattern}'");
        }
    }

    found.into_iter().collect()
}
