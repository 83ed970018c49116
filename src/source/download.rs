//! Remote rule list download.

use thiserror::Error;

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, RequestSender, RetryableError, SendError};

/// Largest rule list accepted from a remote source (64 MiB).
pub const MAX_LIST_BYTES: usize = 64 * 1024 * 1024;

/// Errors from downloading a rule list.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request failed after all retries.
    #[error("Failed to download {url}: {source}")]
    Request {
        /// Source URL
        url: url::Url,
        /// Transport failure
        #[source]
        source: SendError,
    },

    /// The list exceeds the size limit.
    #[error("{url} is at least {size} bytes, over the {limit} byte limit")]
    TooLarge {
        /// Source URL
        url: url::Url,
        /// Announced length, or bytes read before giving up
        size: u64,
        /// Configured limit
        limit: usize,
    },
}

/// Fetches rule lists with retries and a size limit.
#[derive(Debug, Clone)]
pub struct Downloader<H, S = TokioSleeper> {
    sender: RequestSender<H, S>,
    max_bytes: usize,
}

impl<H, S> Downloader<H, S> {
    /// Creates a downloader using `sender` and the default size limit.
    #[must_use]
    pub const fn new(sender: RequestSender<H, S>) -> Self {
        Self {
            sender,
            max_bytes: MAX_LIST_BYTES,
        }
    }

    /// Overrides the size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl<H: HttpClient, S: Sleeper> Downloader<H, S> {
    /// Downloads `url` and returns the body.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Request`] on transport failure or a non-2xx
    /// status, and [`DownloadError::TooLarge`] when the announced or
    /// received body exceeds the limit. Oversized bodies are not retried.
    pub async fn fetch(&self, url: &url::Url) -> Result<Vec<u8>, DownloadError> {
        tracing::debug!("Downloading {url}");

        let request = HttpRequest::get(url.clone()).with_max_body(self.max_bytes);
        let response = self
            .sender
            .send(&request)
            .await
            .map_err(|source| download_error(url, source))?;

        tracing::debug!("Downloaded {} bytes from {url}", response.body.len());
        Ok(response.body)
    }
}

fn download_error(url: &url::Url, source: SendError) -> DownloadError {
    if let RetryableError::Http(HttpError::BodyTooLarge { size, limit }) = *source.last_error() {
        return DownloadError::TooLarge {
            url: url.clone(),
            size,
            limit,
        };
    }
    DownloadError::Request {
        url: url.clone(),
        source,
    }
}
