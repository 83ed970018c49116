//! Error types for the WebUI client.

use thiserror::Error;

use crate::transport::SendError;

/// Errors talking to the qBittorrent WebUI.
#[derive(Debug, Error)]
pub enum QbError {
    /// An API request failed.
    #[error("WebUI {action} failed: {source}")]
    Request {
        /// Which call failed ("login", "preferences", ...)
        action: &'static str,
        /// Transport failure
        #[source]
        source: SendError,
    },

    /// The WebUI rejected the username or password.
    #[error("WebUI login rejected for user '{username}'")]
    LoginRejected {
        /// User that tried to log in
        username: String,
    },

    /// The preferences response was not the expected JSON.
    #[error("Invalid WebUI preferences: {0}")]
    InvalidPreferences(#[source] serde_json::Error),
}
