//! Concurrent rule collection from many files.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::parser::{ParseStats, parse_rules};
use crate::iprange::Intervals;

/// Failure of the collection as a whole.
///
/// Individual unreadable files are not errors; they are logged and skipped.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A parsing worker panicked or was cancelled.
    #[error("Rule parsing worker for {path} failed: {source}")]
    Worker {
        /// File the worker was parsing
        path: PathBuf,
        /// Underlying join failure
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Unmerged rules gathered from a set of files.
#[derive(Debug, Default)]
pub struct Collection {
    /// All accepted intervals, concatenated in input file order.
    pub intervals: Intervals,
    /// Files that were read successfully.
    pub files: usize,
    /// Rule counters summed over every file.
    pub stats: ParseStats,
}

/// Reads and parses every file on its own blocking worker.
///
/// Each worker fills a private [`Intervals`]; the results are joined only
/// after all workers have finished, so no set is ever shared between tasks.
///
/// # Errors
///
/// Returns [`CollectError::Worker`] if a worker panics.
pub async fn collect_files(paths: &[PathBuf]) -> Result<Collection, CollectError> {
    let workers: Vec<_> = paths
        .iter()
        .map(|path| {
            let owned = path.clone();
            (path, tokio::task::spawn_blocking(move || read_file(&owned)))
        })
        .collect();

    let mut collection = Collection::default();
    for (path, handle) in workers {
        let result = handle.await.map_err(|source| CollectError::Worker {
            path: path.clone(),
            source,
        })?;

        match result {
            Ok((intervals, stats)) => {
                tracing::debug!(
                    "{}: {} rules read, {} accepted",
                    path.display(),
                    stats.read,
                    stats.accepted
                );
                collection.files += 1;
                collection.stats += stats;
                collection.intervals.extend(intervals);
            }
            Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
        }
    }

    Ok(collection)
}

fn read_file(path: &Path) -> std::io::Result<(Intervals, ParseStats)> {
    let bytes = std::fs::read(path)?;
    // Published lists carry descriptions in assorted legacy encodings
    let text = String::from_utf8_lossy(&bytes);

    let mut intervals = Intervals::new();
    let stats = parse_rules(&text, &mut intervals);
    Ok((intervals, stats))
}
