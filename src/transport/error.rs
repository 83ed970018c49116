//! Transport failures, from one attempt up to a whole retried exchange.

use thiserror::Error;

/// No usable response was received.
#[derive(Debug, Error)]
pub enum HttpError {
    /// DNS, TCP, TLS or protocol failure.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not answer within the client timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built from the URL. Never retried.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body was abandoned for exceeding the request's limit. Never retried.
    #[error("Response body of {size} bytes exceeds the {limit} byte limit")]
    BodyTooLarge {
        /// Announced length, or bytes received when the limit was crossed
        size: u64,
        /// Limit set on the request
        limit: usize,
    },
}

/// Failure of a single request attempt.
#[derive(Debug, Error)]
pub enum RetryableError {
    /// The request could not be completed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The server answered with a non-2xx status.
    #[error("Server returned {status}{}", body_suffix(.body.as_deref()))]
    NonSuccessStatus {
        /// Response status
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },
}

fn body_suffix(body: Option<&str>) -> String {
    match body {
        Some(b) if !b.trim().is_empty() => format!(": {}", b.trim()),
        _ => String::new(),
    }
}

/// Final outcome of a request sent through [`RequestSender`](super::RequestSender).
#[derive(Debug, Error)]
pub enum SendError {
    /// A non-retryable failure ended the exchange immediately.
    #[error("Request failed: {0}")]
    Failed(#[source] RetryableError),

    /// Every attempt failed with a retryable error.
    #[error("Request failed after {attempts} attempt(s): {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made
        attempts: u32,
        /// Error from the last attempt
        #[source]
        last_error: RetryableError,
    },
}

impl SendError {
    /// Returns the error of the last attempt.
    #[must_use]
    pub const fn last_error(&self) -> &RetryableError {
        match self {
            Self::Failed(e) | Self::MaxRetriesExceeded { last_error: e, .. } => e,
        }
    }

    /// Returns the response status if the last attempt got one.
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        match self.last_error() {
            RetryableError::NonSuccessStatus { status, .. } => Some(*status),
            RetryableError::Http(_) => None,
        }
    }
}
