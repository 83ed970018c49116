//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ipfilter: merge and publish IP block lists
///
/// Merges ipfilter.dat rule files into a minimal set of ranges and keeps
/// qBittorrent's IP filter up to date with remote lists.
#[derive(Debug, Parser)]
#[command(name = "ipfilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (default: ./ipfilter.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Enable per-rule (trace) logging
    #[arg(long, short, global = true)]
    pub debug: bool,
}

/// Subcommands for ipfilter
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge local rule files into one minimal list
    Merge(MergeArgs),

    /// Download remote lists periodically and switch qBittorrent to the merged result
    Sync(SyncArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ipfilter.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

/// Arguments of `merge`.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Rule files or glob patterns
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Output file
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Arguments of `sync`.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Source list URLs (replace the configured ones)
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Time between passes, e.g. 3600, 30m, 12h, 1d (0 = run once)
    #[arg(long, short)]
    pub interval: Option<String>,

    /// Directory for downloaded and merged lists
    #[arg(long = "cache-dir", short)]
    pub cache_dir: Option<PathBuf>,

    /// Directory for the A/B filter slots
    #[arg(long = "output-dir", short)]
    pub output_dir: Option<PathBuf>,

    /// qBittorrent WebUI address
    #[arg(long = "webui-url", short)]
    pub webui_url: Option<String>,

    /// qBittorrent WebUI username
    #[arg(long, short)]
    pub username: Option<String>,

    /// qBittorrent WebUI password
    #[arg(long, short)]
    pub password: Option<String>,

    /// Maximum number of attempts per request
    #[arg(long = "retry-max")]
    pub retry_max: Option<u32>,

    /// Initial retry delay in seconds
    #[arg(long = "retry-delay")]
    pub retry_delay: Option<u64>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
