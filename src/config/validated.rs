//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::qbittorrent::{Credentials, parse_webui_url};
use crate::transport::RetryPolicy;

use super::cli::{Cli, Command, MergeArgs, SyncArgs};
use super::defaults;
use super::error::ConfigError;
use super::toml::{IntervalValue, TomlConfig};

/// How much the binary logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Progress and warnings
    #[default]
    Normal,
    /// Adds per-file and per-request detail
    Verbose,
    /// Adds per-rule events
    Debug,
}

/// Fully validated configuration ready for use by the application.
///
/// Use [`ValidatedConfig::load`] or [`ValidatedConfig::from_raw`] to build one.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Logging level
    pub verbosity: Verbosity,

    /// What to run
    pub mode: Mode,
}

/// The command to run with its settings.
#[derive(Debug)]
pub enum Mode {
    /// One-shot merge of local files
    Merge(MergeConfig),
    /// Periodic download and publish
    Sync(SyncConfig),
}

/// Settings of `merge`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// File paths or glob patterns, as given
    pub patterns: Vec<String>,
    /// Output file
    pub output: PathBuf,
}

/// Settings of `sync`.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Validated source URLs, duplicates removed
    pub sources: Vec<Url>,
    /// Sources dropped during validation, with the reason
    pub skipped_sources: Vec<String>,
    /// Time between passes; zero runs a single pass
    pub interval: Duration,
    /// Download cache directory
    pub cache_dir: PathBuf,
    /// Slot directory
    pub output_dir: PathBuf,
    /// qBittorrent WebUI, if configured
    pub webui: Option<WebUiConfig>,
    /// Retry policy for downloads and WebUI calls
    pub retry_policy: RetryPolicy,
}

impl SyncConfig {
    /// Returns true when only a single pass should run.
    #[must_use]
    pub const fn run_once(&self) -> bool {
        self.interval.is_zero()
    }
}

/// qBittorrent WebUI settings.
#[derive(Debug, Clone)]
pub struct WebUiConfig {
    /// API base URL
    pub url: Url,
    /// Login credentials
    pub credentials: Credentials,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            Mode::Merge(merge) => write!(
                f,
                "Config {{ command: merge, inputs: {}, output: {}, log: {:?} }}",
                merge.patterns.len(),
                merge.output.display(),
                self.verbosity,
            ),
            Mode::Sync(sync) => {
                let webui = sync.webui.as_ref().map_or_else(
                    || "none".to_string(),
                    |w| format!("{} as {}", w.url, w.credentials.username),
                );
                write!(
                    f,
                    "Config {{ command: sync, sources: {}, interval: {}, cache_dir: {}, \
                     output_dir: {}, webui: {}, retry: {}x/{}s, log: {:?} }}",
                    sync.sources.len(),
                    format_interval(sync.interval),
                    sync.cache_dir.display(),
                    sync.output_dir.display(),
                    webui,
                    sync.retry_policy.max_attempts,
                    sync.retry_policy.initial_delay.as_secs(),
                    self.verbosity,
                )
            }
        }
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The command is `init`
    /// - No valid source URL remains (sync)
    /// - The WebUI URL or interval is malformed
    /// - The retry settings are inconsistent
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let debug = cli.debug || toml.is_some_and(|t| t.global.debug);
        let verbose = cli.verbose || toml.is_some_and(|t| t.global.verbose);
        let verbosity = if debug {
            Verbosity::Debug
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        let mode = match &cli.command {
            Command::Merge(args) => Mode::Merge(Self::resolve_merge(args, toml)),
            Command::Sync(args) => Mode::Sync(Self::resolve_sync(args, toml)?),
            Command::Init { .. } => return Err(ConfigError::NotRunnable("init")),
        };

        Ok(Self { verbosity, mode })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// The TOML file is `--config` if given, otherwise `ipfilter.toml` in
    /// the working directory when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli.config.clone().or_else(|| {
            let fallback = PathBuf::from(defaults::CONFIG_FILE);
            fallback.is_file().then_some(fallback)
        });

        let toml = match path {
            Some(path) => Some(TomlConfig::load(&path)?),
            None => None,
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_merge(args: &MergeArgs, toml: Option<&TomlConfig>) -> MergeConfig {
        let output = args
            .output
            .clone()
            .or_else(|| toml.and_then(|t| t.merge.output.clone()))
            .unwrap_or_else(|| PathBuf::from(defaults::MERGE_OUTPUT));

        MergeConfig {
            patterns: args.files.clone(),
            output: expand_tilde(&output),
        }
    }

    fn resolve_sync(args: &SyncArgs, toml: Option<&TomlConfig>) -> Result<SyncConfig, ConfigError> {
        let section = toml.map(|t| &t.sync);

        let interval = Self::resolve_interval(args, toml)?;
        let (sources, skipped_sources) = Self::resolve_sources(args, toml)?;

        let cache_dir = args
            .cache_dir
            .clone()
            .or_else(|| section.and_then(|s| s.cache_dir.clone()))
            .unwrap_or_else(|| PathBuf::from(defaults::CACHE_DIR));

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| section.and_then(|s| s.output_dir.clone()))
            .unwrap_or_else(|| PathBuf::from(defaults::OUTPUT_DIR));

        Ok(SyncConfig {
            sources,
            skipped_sources,
            interval,
            cache_dir: expand_tilde(&cache_dir),
            output_dir: expand_tilde(&output_dir),
            webui: Self::resolve_webui(args, toml)?,
            retry_policy: Self::build_retry_policy(args, toml)?,
        })
    }

    fn resolve_interval(args: &SyncArgs, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        if let Some(text) = &args.interval {
            return parse_interval(text);
        }

        match toml.and_then(|t| t.sync.interval.as_ref()) {
            Some(IntervalValue::Seconds(secs)) => Ok(Duration::from_secs(*secs)),
            Some(IntervalValue::Text(text)) => parse_interval(text),
            None => Ok(defaults::sync_interval()),
        }
    }

    fn resolve_sources(
        args: &SyncArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<(Vec<Url>, Vec<String>), ConfigError> {
        // CLI URLs replace TOML URLs entirely
        let raw: Vec<&str> = if !args.urls.is_empty() {
            args.urls.iter().map(String::as_str).collect()
        } else if let Some(t) = toml.filter(|t| !t.sync.dat_urls.is_empty()) {
            t.sync.dat_urls.iter().map(String::as_str).collect()
        } else {
            vec![defaults::DAT_URL]
        };

        let mut sources: Vec<Url> = Vec::with_capacity(raw.len());
        let mut skipped = Vec::new();
        for text in raw {
            match parse_source_url(text) {
                Ok(url) if !sources.contains(&url) => sources.push(url),
                Ok(_) => {}
                Err(reason) => skipped.push(format!("{text}: {reason}")),
            }
        }

        if sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        Ok((sources, skipped))
    }

    fn resolve_webui(
        args: &SyncArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<WebUiConfig>, ConfigError> {
        let section = toml.map(|t| &t.sync);

        let Some(raw) = args
            .webui_url
            .as_deref()
            .or_else(|| section.and_then(|s| s.webui_url.as_deref()))
            .filter(|s| !s.trim().is_empty())
        else {
            return Ok(None);
        };

        let (url, embedded) = parse_webui_url(raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        let embedded = embedded.unwrap_or_default();

        // Priority: CLI > TOML > credentials in the URL > default
        let username = args
            .username
            .clone()
            .or_else(|| section.and_then(|s| s.username.clone()))
            .or_else(|| (!embedded.username.is_empty()).then(|| embedded.username.clone()))
            .unwrap_or_else(|| defaults::USERNAME.to_string());
        let password = args
            .password
            .clone()
            .or_else(|| section.and_then(|s| s.password.clone()))
            .unwrap_or(embedded.password);

        Ok(Some(WebUiConfig {
            url,
            credentials: Credentials::new(username, password),
        }))
    }

    fn build_retry_policy(
        args: &SyncArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_attempts = args
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let initial_delay_secs = args
            .retry_delay
            .or_else(|| retry.and_then(|r| r.initial_delay))
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_SECS);

        let max_delay_secs = retry
            .and_then(|r| r.max_delay)
            .unwrap_or(defaults::RETRY_MAX_DELAY_SECS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if initial_delay_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "initial_delay must be greater than 0".to_string(),
            ));
        }

        if multiplier <= 0.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a positive finite number".to_string(),
            ));
        }

        if max_delay_secs < initial_delay_secs {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay ({max_delay_secs}s) must be >= initial_delay ({initial_delay_secs}s)"
            )));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_initial_delay(Duration::from_secs(initial_delay_secs))
            .with_max_delay(Duration::from_secs(max_delay_secs))
            .with_multiplier(multiplier))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns [`ConfigError::FileExists`] if the file exists and `force` is
/// false, or [`ConfigError::FileWrite`] if it cannot be written.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if !force && path.exists() {
        return Err(ConfigError::FileExists(path.to_path_buf()));
    }

    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parses an interval such as `90`, `30m`, `12h`, `1d` or `1h 30m`.
///
/// A bare integer is a number of seconds; anything else goes through
/// [`humantime::parse_duration`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidDuration`] for empty or malformed input.
///
/// # Example
///
/// ```
/// use ipfilter::config::parse_interval;
/// use std::time::Duration;
///
/// assert_eq!(parse_interval("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_interval("0").unwrap(), Duration::ZERO);
/// ```
pub fn parse_interval(text: &str) -> Result<Duration, ConfigError> {
    let text = text.trim();
    if let Ok(secs) = text.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    humantime::parse_duration(text).map_err(|e| ConfigError::InvalidDuration {
        field: "interval",
        reason: format!("'{text}': {e}"),
    })
}

/// Renders an interval for logs, e.g. `1day`, `1h 30m`, `45s`.
#[must_use]
pub fn format_interval(interval: Duration) -> String {
    humantime::format_duration(interval).to_string()
}

/// Replaces a leading `~` with the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

fn parse_source_url(text: &str) -> Result<Url, String> {
    let url = Url::parse(text.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}
