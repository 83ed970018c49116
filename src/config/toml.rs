//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Logging switches
    #[serde(default)]
    pub global: GlobalSection,

    /// `merge` command settings
    #[serde(default)]
    pub merge: MergeSection,

    /// `sync` command settings
    #[serde(default)]
    pub sync: SyncSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,
}

/// Logging section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalSection {
    /// Debug-level logging
    #[serde(default)]
    pub verbose: bool,

    /// Trace-level logging
    #[serde(default)]
    pub debug: bool,
}

/// `merge` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeSection {
    /// Output file
    pub output: Option<PathBuf>,
}

/// `sync` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    /// Time between passes: seconds, or a string such as "12h"
    pub interval: Option<IntervalValue>,

    /// Download cache directory
    pub cache_dir: Option<PathBuf>,

    /// Slot directory
    pub output_dir: Option<PathBuf>,

    /// Source list URLs
    #[serde(default)]
    pub dat_urls: Vec<String>,

    /// qBittorrent WebUI address
    pub webui_url: Option<String>,

    /// WebUI username
    pub username: Option<String>,

    /// WebUI password
    pub password: Option<String>,
}

/// An interval written either as a bare number of seconds or as text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntervalValue {
    /// Whole seconds
    Seconds(u64),
    /// Duration text such as "1h 30m"
    Text(String),
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of attempts
    pub max_attempts: Option<u32>,

    /// Initial retry delay in seconds
    pub initial_delay: Option<u64>,

    /// Maximum retry delay in seconds
    pub max_delay: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ipfilter configuration file
# Command line arguments override the values below.

[global]
# Debug-level logging (same as --verbose)
# verbose = false

# Per-rule trace logging (same as --debug)
# debug = false

[merge]
# Output file of `ipfilter merge` (default: ipfilter.dat)
# output = "ipfilter.dat"

[sync]
# Time between passes: seconds or a duration such as "30m", "12h", "1d", "1h 30m".
# 0 runs a single pass and exits. (default: "1d")
interval = "1d"

# Where downloaded lists and the merged list are kept (default: cache)
# cache_dir = "cache"

# Where ipfilter-a.dat / ipfilter-b.dat are written (default: .)
# Must be readable by qBittorrent.
# output_dir = "."

# Source lists. URLs given on the command line REPLACE this list.
dat_urls = [
    "https://github.com/DavidMoore/ipfilter/releases/download/lite/ipfilter.dat",
]

# qBittorrent WebUI. Leave unset to only write the slot files.
# webui_url = "http://localhost:8080"
# username = "admin"
# password = ""

[retry]
# Maximum number of attempts per request (default: 3)
# max_attempts = 3

# Initial retry delay in seconds (default: 5)
# initial_delay = 5

# Maximum retry delay in seconds (default: 60)
# max_delay = 60

# Backoff multiplier (default: 2.0)
# multiplier = 2.0
"#
    .to_string()
}
