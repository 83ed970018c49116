//! The sync pass.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::dat::{self, Collection};
use crate::qbittorrent::QbClient;
use crate::slots::SlotPair;
use crate::source::{Downloader, SourceCache};
use crate::store::AtomicFile;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::HttpClient;

use super::SyncError;

/// What happened to the output slots in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// New content was written to `path`.
    Switched {
        /// Slot that received the list
        path: PathBuf,
        /// Whether qBittorrent was told to use it
        notified: bool,
    },
    /// The published slot already held the merged list.
    Unchanged {
        /// Slot already holding the list
        path: PathBuf,
    },
}

/// Summary of one successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Configured sources
    pub sources: usize,
    /// Sources fetched successfully this pass
    pub downloaded: usize,
    /// Sources whose cached copy changed
    pub updated: usize,
    /// Cache files parsed
    pub files: usize,
    /// Rules accepted from those files
    pub rules: usize,
    /// Rules after merging
    pub merged: usize,
    /// Slot result
    pub slot: SlotOutcome,
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} sources downloaded ({} updated), {} rules from {} files merged to {}, ",
            self.downloaded, self.sources, self.updated, self.rules, self.files, self.merged
        )?;
        match &self.slot {
            SlotOutcome::Switched { path, notified: true } => {
                write!(f, "qBittorrent switched to {}", path.display())
            }
            SlotOutcome::Switched { path, notified: false } => {
                write!(f, "written to {}", path.display())
            }
            SlotOutcome::Unchanged { path } => write!(f, "{} unchanged", path.display()),
        }
    }
}

/// Runs sync passes and remembers which slot qBittorrent reads.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct Syncer<H, S = TokioSleeper> {
    sources: Vec<url::Url>,
    downloader: Downloader<H, S>,
    cache: SourceCache,
    slots: SlotPair,
    notifier: Option<QbClient<H, S>>,
    in_use: Option<PathBuf>,
}

impl<H, S> Syncer<H, S> {
    /// Creates a syncer without a qBittorrent notifier.
    #[must_use]
    pub const fn new(
        sources: Vec<url::Url>,
        downloader: Downloader<H, S>,
        cache: SourceCache,
        slots: SlotPair,
    ) -> Self {
        Self {
            sources,
            downloader,
            cache,
            slots,
            notifier: None,
            in_use: None,
        }
    }

    /// Attaches a notifier. `in_use` is the filter path qBittorrent reads now.
    #[must_use]
    pub fn with_notifier(mut self, notifier: QbClient<H, S>, in_use: Option<PathBuf>) -> Self {
        self.notifier = Some(notifier);
        self.in_use = in_use;
        self
    }

    /// Returns the filter path qBittorrent is known to read.
    #[must_use]
    pub fn in_use(&self) -> Option<&Path> {
        self.in_use.as_deref()
    }
}

impl<H: HttpClient, S: Sleeper> Syncer<H, S> {
    /// Runs one pass.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if no rules are available, a file cannot be
    /// written, or qBittorrent cannot be switched.
    pub async fn run_pass(&mut self) -> Result<PassReport, SyncError> {
        let (downloaded, updated) = self.refresh_cache().await;

        let paths = self.cache.existing_paths(&self.sources);
        let Collection {
            intervals,
            files,
            stats,
        } = dat::collect_files(&paths).await?;
        tracing::info!("{} rules collected from {files} files", stats.accepted);

        if stats.accepted == 0 {
            return Err(SyncError::NoRules {
                sources: self.sources.len(),
            });
        }

        let merged = intervals.merge();
        tracing::info!("merged to {} rules", merged.len());
        let bytes = dat::render(&merged).into_bytes();

        AtomicFile::new(self.cache.merged_path())
            .write(bytes.clone())
            .await?;

        let slot = self.publish(bytes).await?;

        Ok(PassReport {
            sources: self.sources.len(),
            downloaded,
            updated,
            files,
            rules: stats.accepted,
            merged: merged.len(),
            slot,
        })
    }

    /// Downloads every source into the cache. Returns (downloaded, updated).
    async fn refresh_cache(&self) -> (usize, usize) {
        let mut downloaded = 0;
        let mut updated = 0;

        for url in &self.sources {
            let bytes = match self.downloader.fetch(url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("{e}; using cached copy if any");
                    continue;
                }
            };
            downloaded += 1;

            match self.cache.store(url, bytes).await {
                Ok(true) => {
                    updated += 1;
                    tracing::debug!("{url} changed");
                }
                Ok(false) => tracing::debug!("{url} unchanged"),
                Err(e) => tracing::warn!("Failed to cache {url}: {e}"),
            }
        }

        (downloaded, updated)
    }

    /// Writes the merged list to the free slot and switches qBittorrent to it.
    async fn publish(&mut self, bytes: Vec<u8>) -> Result<SlotOutcome, SyncError> {
        let selection = self.slots.select(self.in_use.as_deref());

        if AtomicFile::new(&selection.current).read().await.matches(&bytes) {
            tracing::info!(
                "{} already holds the merged list, switch cancelled",
                selection.current.display()
            );
            // A previous switch may have failed after the write
            if self.notifier.is_some() && self.in_use.as_deref() != Some(selection.current.as_path()) {
                self.notify(&selection.current).await?;
            }
            return Ok(SlotOutcome::Unchanged {
                path: selection.current,
            });
        }

        AtomicFile::new(&selection.target).write(bytes).await?;
        tracing::info!("Filter written to {}", selection.target.display());

        let notified = self.notify(&selection.target).await?;
        Ok(SlotOutcome::Switched {
            path: selection.target,
            notified,
        })
    }

    /// Points qBittorrent at `path`. Returns `false` when no notifier is set.
    async fn notify(&mut self, path: &Path) -> Result<bool, SyncError> {
        let Some(notifier) = &mut self.notifier else {
            return Ok(false);
        };

        notifier.set_ip_filter(path).await.map_err(SyncError::Notify)?;
        tracing::info!("qBittorrent filter switched to {}", path.display());
        self.in_use = Some(path.to_path_buf());
        Ok(true)
    }
}
