//! HTTP transport shared by the downloader and the qBittorrent client.
//!
//! This module provides:
//! - Request and response value types ([`HttpRequest`], [`HttpResponse`])
//! - An HTTP client abstraction ([`HttpClient`])
//! - The production client ([`ReqwestClient`])
//! - Retry policy configuration ([`RetryPolicy`])
//! - Sending with retries and status checking ([`RequestSender`])

mod body;
mod client;
mod error;
mod request;
mod retry;
mod sender;

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod body_tests;
#[cfg(test)]
mod request_tests;

pub use client::ReqwestClient;
pub use error::{HttpError, RetryableError, SendError};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
pub use sender::{IsRetryable, RequestSender};
