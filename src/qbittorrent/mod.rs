//! qBittorrent WebUI client.
//!
//! Only the calls needed to publish a new IP filter are implemented:
//! login, reading preferences and updating the filter path.

mod client;
mod error;


pub use client::{Credentials, Preferences, QbClient, parse_webui_url};
pub use error::QbError;
