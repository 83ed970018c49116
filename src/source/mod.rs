//! Where rule lists come from.
//!
//! - Local files named by paths or glob patterns ([`expand_patterns`])
//! - Remote lists fetched over HTTP ([`Downloader`])
//! - The on-disk copy of each remote list ([`SourceCache`])

mod cache;
mod download;
mod files;

#[cfg(test)]
mod download_tests;
#[cfg(test)]
mod files_tests;

pub use cache::SourceCache;
pub use download::{DownloadError, Downloader, MAX_LIST_BYTES};
pub use files::expand_patterns;
