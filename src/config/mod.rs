//! Configuration layer for ipfilter.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - `--config`, or `ipfilter.toml` in the working directory
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Source URLs given on the command line **replace** the `sync.dat_urls` list
//! entirely (not merged).
//!
//! # Boolean Flag Semantics
//!
//! `--verbose` and `--debug` use OR semantics: set in either CLI or TOML,
//! the result is `true`. `--debug` wins over `--verbose`.
//!
//! # TOML-Only Options
//!
//! `retry.max_delay` and `retry.multiplier` have no CLI flag.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, MergeArgs, SyncArgs};
pub use error::ConfigError;
pub use toml::{IntervalValue, TomlConfig, default_config_template};
pub use validated::{
    MergeConfig, Mode, SyncConfig, ValidatedConfig, Verbosity, WebUiConfig, format_interval,
    parse_interval, write_default_config,
};
