//! Application execution logic.
//!
//! This module runs the selected command: a one-shot merge of local rule
//! files, or the periodic sync loop that downloads lists, publishes them to
//! the output slots and points qBittorrent at the result.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

use ipfilter::config::{MergeConfig, Mode, SyncConfig, ValidatedConfig, WebUiConfig, format_interval};
use ipfilter::dat::{self, CollectError, Collection};
use ipfilter::qbittorrent::QbClient;
use ipfilter::slots::SlotPair;
use ipfilter::source::{self, Downloader, SourceCache};
use ipfilter::store::{AtomicFile, StoreError};
use ipfilter::sync::{SyncError, Syncer};
use ipfilter::time::Sleeper;
use ipfilter::transport::{HttpClient, ReqwestClient, RequestSender};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// No input pattern matched a readable file.
    #[error("No input files matched the given paths or patterns")]
    NoInputFiles,

    /// Input files were found but none held a valid rule.
    #[error("No valid rules found in {files} input file(s)")]
    NoRules {
        /// Number of files read
        files: usize,
    },

    /// Reading the input files failed.
    #[error("Failed to read input files: {0}")]
    Collect(#[source] CollectError),

    /// The merged list could not be written.
    #[error("Failed to write merged list: {0}")]
    Output(#[source] StoreError),

    /// The slot directory could not be resolved.
    #[error("Invalid output directory {}: {source}", path.display())]
    OutputDir {
        /// Directory as configured
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A single-pass sync failed.
    #[error("Sync failed: {0}")]
    Sync(#[source] SyncError),
}

/// Counters of a finished merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Files read
    pub files: usize,
    /// Rules accepted before merging
    pub rules: usize,
    /// Rules written
    pub merged: usize,
}

/// Executes the configured command.
///
/// # Errors
///
/// Returns an error if the merge fails or a single-pass sync fails.
/// A periodic sync only returns on shutdown.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires real
/// network access and signal handling in sync mode.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    match config.mode {
        Mode::Merge(merge) => {
            let summary = merge_files(&merge).await?;
            tracing::info!(
                "{} rules from {} files merged to {}, written to {}",
                summary.rules,
                summary.files,
                summary.merged,
                merge.output.display()
            );
            Ok(())
        }
        Mode::Sync(sync) => run_sync(sync).await,
    }
}

/// Merges every file matched by the configured patterns into one output file.
async fn merge_files(config: &MergeConfig) -> Result<MergeSummary, RunError> {
    let paths = source::expand_patterns(&config.patterns);
    if paths.is_empty() {
        return Err(RunError::NoInputFiles);
    }

    let Collection {
        intervals,
        files,
        stats,
    } = dat::collect_files(&paths)
        .await
        .map_err(RunError::Collect)?;
    tracing::info!("{} rules collected from {files} files", stats.accepted);

    if files == 0 {
        return Err(RunError::NoInputFiles);
    }
    if stats.accepted == 0 {
        return Err(RunError::NoRules { files });
    }

    let merged = intervals.merge();
    tracing::info!("merged to {} rules", merged.len());

    AtomicFile::new(&config.output)
        .write(dat::render(&merged).into_bytes())
        .await
        .map_err(RunError::Output)?;

    Ok(MergeSummary {
        files,
        rules: stats.accepted,
        merged: merged.len(),
    })
}

/// Builds the syncer from configuration and runs it until shutdown.
///
/// Excluded from coverage - requires network access and signal handling.
#[cfg(not(tarpaulin_include))]
async fn run_sync(config: SyncConfig) -> Result<(), RunError> {
    for skipped in &config.skipped_sources {
        tracing::warn!("Skipping source {skipped}");
    }

    let sender = RequestSender::new(ReqwestClient::new()).with_retry_policy(config.retry_policy.clone());
    let slots = SlotPair::in_dir(&config.output_dir).map_err(|source| RunError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut syncer = Syncer::new(
        config.sources.clone(),
        Downloader::new(sender.clone()),
        SourceCache::new(&config.cache_dir),
        slots,
    );

    if let Some(webui) = &config.webui {
        if let Some((client, in_use)) = connect_notifier(sender, webui).await {
            syncer = syncer.with_notifier(client, in_use);
        }
    }

    sync_loop(&mut syncer, config.interval, shutdown_signal()).await
}

/// Logs in to qBittorrent and reads the filter path it currently uses.
///
/// Returns `None` and disables notifications if either step fails.
async fn connect_notifier<H: HttpClient, S: Sleeper>(
    sender: RequestSender<H, S>,
    webui: &WebUiConfig,
) -> Option<(QbClient<H, S>, Option<PathBuf>)> {
    let mut client = match QbClient::connect(sender, webui.url.clone(), &webui.credentials).await {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("qBittorrent notifications disabled: {e}");
            return None;
        }
    };

    match client.preferences().await {
        Ok(prefs) => {
            let in_use = (!prefs.ip_filter_path.is_empty()).then(|| PathBuf::from(&prefs.ip_filter_path));
            tracing::info!(
                "qBittorrent filter {} ({})",
                if prefs.ip_filter_enabled { "enabled" } else { "disabled" },
                in_use.as_ref().map_or_else(|| "no path".to_string(), |p| p.display().to_string())
            );
            Some((client, in_use))
        }
        Err(e) => {
            tracing::warn!("qBittorrent notifications disabled: {e}");
            None
        }
    }
}

/// Runs sync passes until `shutdown` completes.
///
/// The first pass starts immediately. A zero `interval` runs that pass
/// only and reports its failure; otherwise failures are logged and the
/// next pass waits for the following tick.
async fn sync_loop<H, S, F>(
    syncer: &mut Syncer<H, S>,
    interval: Duration,
    shutdown: F,
) -> Result<(), RunError>
where
    H: HttpClient,
    S: Sleeper,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    if interval.is_zero() {
        return tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                Ok(())
            }

            result = syncer.run_pass() => match result {
                Ok(report) => {
                    tracing::info!("{report}");
                    Ok(())
                }
                Err(e) => Err(RunError::Sync(e)),
            },
        };
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(ticker);
    let next = format_interval(interval);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            tick = ticks.next() => {
                if tick.is_none() {
                    return Ok(());
                }
            }
        }

        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            result = syncer.run_pass() => match result {
                Ok(report) => tracing::info!("{report}; next pass in {next}"),
                Err(e) => tracing::error!("Sync pass failed: {e}; retry in {next}"),
            },
        }
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed the error is logged and that signal
/// is ignored.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
