//! Sync pass errors.

use thiserror::Error;

use crate::dat::CollectError;
use crate::qbittorrent::QbError;
use crate::store::StoreError;

/// Reasons a pass did not publish a filter.
///
/// Failed downloads are not listed; they fall back to the cached copy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Parsing the cached lists failed.
    #[error(transparent)]
    Collect(#[from] CollectError),

    /// No source yielded a single valid rule.
    #[error("No rules available from {sources} source(s); refusing to publish an empty filter")]
    NoRules {
        /// Number of configured sources
        sources: usize,
    },

    /// The merged list or a slot file could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// qBittorrent could not be switched to the new list.
    #[error("Failed to switch qBittorrent filter: {0}")]
    Notify(#[source] QbError),
}
