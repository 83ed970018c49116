//! Default values for configuration options.

use std::time::Duration;

/// Default output file of `merge`.
pub const MERGE_OUTPUT: &str = "ipfilter.dat";

/// Config file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "ipfilter.toml";

/// Default source list.
pub const DAT_URL: &str = "https://github.com/DavidMoore/ipfilter/releases/download/lite/ipfilter.dat";

/// Default time between sync passes in seconds (one day).
pub const SYNC_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Default download cache directory.
pub const CACHE_DIR: &str = "cache";

/// Default slot directory.
pub const OUTPUT_DIR: &str = ".";

/// Default WebUI username.
pub const USERNAME: &str = "admin";

/// Default maximum number of retry attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default initial retry delay in seconds.
pub const RETRY_INITIAL_DELAY_SECS: u64 = 5;

/// Default maximum retry delay in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 60;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default sync interval as Duration.
#[must_use]
pub const fn sync_interval() -> Duration {
    Duration::from_secs(SYNC_INTERVAL_SECS)
}
