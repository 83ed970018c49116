//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use ipfilter::config::{ConfigError, Verbosity};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, bad config file, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - unreadable inputs, failed sync pass, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            eprintln!("\nRun 'ipfilter init' to generate a configuration template.");
        }
        ConfigError::NoSources => {
            eprintln!("\nPass list URLs to 'ipfilter sync' or set sync.dat_urls in the config file.");
        }
        ConfigError::FileExists(_) => {
            eprintln!("\nUse 'ipfilter init --force' to overwrite it.");
        }
        _ => {}
    }
}

/// Maps the configured verbosity to a default log level.
pub const fn level_for(verbosity: Verbosity) -> Level {
    match verbosity {
        Verbosity::Normal => Level::INFO,
        Verbosity::Verbose => Level::DEBUG,
        Verbosity::Debug => Level::TRACE,
    }
}

/// Sets up the tracing subscriber for logging.
///
/// `RUST_LOG` overrides the level derived from `verbosity`.
pub fn setup_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
