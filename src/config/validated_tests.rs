//! Tests for validated configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{
    MergeConfig, Mode, SyncConfig, ValidatedConfig, Verbosity, format_interval, parse_interval,
    write_default_config,
};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["ipfilter"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn merge_config(args: &[&str], toml: Option<&TomlConfig>) -> MergeConfig {
    match ValidatedConfig::from_raw(&cli(args), toml).unwrap().mode {
        Mode::Merge(merge) => merge,
        Mode::Sync(_) => panic!("expected merge mode"),
    }
}

fn sync_config(args: &[&str], toml: Option<&TomlConfig>) -> SyncConfig {
    match ValidatedConfig::from_raw(&cli(args), toml).unwrap().mode {
        Mode::Sync(sync) => sync,
        Mode::Merge(_) => panic!("expected sync mode"),
    }
}

mod verbosity {
    use super::*;

    #[test]
    fn defaults_to_normal() {
        let config = ValidatedConfig::from_raw(&cli(&["merge", "a.dat"]), None).unwrap();
        assert_eq!(config.verbosity, Verbosity::Normal);
    }

    #[test]
    fn flags_use_or_semantics() {
        let t = toml("[global]\nverbose = true");
        let from_toml = ValidatedConfig::from_raw(&cli(&["merge", "a.dat"]), Some(&t)).unwrap();
        let from_cli = ValidatedConfig::from_raw(&cli(&["-v", "merge", "a.dat"]), None).unwrap();

        assert_eq!(from_toml.verbosity, Verbosity::Verbose);
        assert_eq!(from_cli.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn debug_wins_over_verbose() {
        let t = toml("[global]\ndebug = true");
        let config = ValidatedConfig::from_raw(&cli(&["-v", "merge", "a.dat"]), Some(&t)).unwrap();

        assert_eq!(config.verbosity, Verbosity::Debug);
    }
}

mod merge {
    use super::*;

    #[test]
    fn output_defaults_to_ipfilter_dat() {
        let merge = merge_config(&["merge", "a.dat", "b/*.dat"], None);

        assert_eq!(merge.patterns, vec!["a.dat", "b/*.dat"]);
        assert_eq!(merge.output, PathBuf::from("ipfilter.dat"));
    }

    #[test]
    fn cli_output_beats_toml() {
        let t = toml("[merge]\noutput = \"from-toml.dat\"");

        assert_eq!(
            merge_config(&["merge", "a.dat"], Some(&t)).output,
            PathBuf::from("from-toml.dat")
        );
        assert_eq!(
            merge_config(&["merge", "a.dat", "-o", "cli.dat"], Some(&t)).output,
            PathBuf::from("cli.dat")
        );
    }

    #[test]
    fn tilde_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let merge = merge_config(&["merge", "a.dat", "-o", "~/lists/out.dat"], None);

        assert_eq!(merge.output, home.join("lists").join("out.dat"));
    }

    #[test]
    fn init_is_not_runnable() {
        let result = ValidatedConfig::from_raw(&cli(&["init"]), None);
        assert!(matches!(result, Err(ConfigError::NotRunnable("init"))));
    }
}

mod sync_defaults {
    use super::*;

    #[test]
    fn bare_sync_uses_builtin_defaults() {
        let sync = sync_config(&["sync"], None);

        assert_eq!(sync.sources.len(), 1);
        assert_eq!(
            sync.sources[0].as_str(),
            "https://github.com/DavidMoore/ipfilter/releases/download/lite/ipfilter.dat"
        );
        assert_eq!(sync.interval, Duration::from_secs(86_400));
        assert!(!sync.run_once());
        assert_eq!(sync.cache_dir, PathBuf::from("cache"));
        assert_eq!(sync.output_dir, PathBuf::from("."));
        assert!(sync.webui.is_none());
        assert_eq!(sync.retry_policy.max_attempts, 3);
        assert_eq!(sync.retry_policy.initial_delay, Duration::from_secs(5));
    }

    #[test]
    fn toml_values_apply_without_cli() {
        let t = toml(
            r#"
            [sync]
            interval = 600
            cache_dir = "/var/cache/ipfilter"
            output_dir = "/srv/qb"
            "#,
        );
        let sync = sync_config(&["sync"], Some(&t));

        assert_eq!(sync.interval, Duration::from_secs(600));
        assert_eq!(sync.cache_dir, PathBuf::from("/var/cache/ipfilter"));
        assert_eq!(sync.output_dir, PathBuf::from("/srv/qb"));
    }

    #[test]
    fn cli_beats_toml() {
        let t = toml("[sync]\ninterval = \"1d\"\ncache_dir = \"a\"\noutput_dir = \"b\"");
        let sync = sync_config(&["sync", "-i", "30m", "-c", "c", "-o", "d"], Some(&t));

        assert_eq!(sync.interval, Duration::from_secs(1800));
        assert_eq!(sync.cache_dir, PathBuf::from("c"));
        assert_eq!(sync.output_dir, PathBuf::from("d"));
    }

    #[test]
    fn zero_interval_runs_once() {
        assert!(sync_config(&["sync", "-i", "0"], None).run_once());
    }

    #[test]
    fn malformed_interval_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&["sync", "-i", "soon"]), None);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration { field: "interval", .. })
        ));
    }
}

mod sources {
    use super::*;

    #[test]
    fn cli_urls_replace_toml_urls() {
        let t = toml("[sync]\ndat_urls = [\"https://toml.example/a.dat\"]");
        let sync = sync_config(&["sync", "https://cli.example/b.dat"], Some(&t));

        assert_eq!(sync.sources.len(), 1);
        assert_eq!(sync.sources[0].host_str(), Some("cli.example"));
    }

    #[test]
    fn toml_urls_used_when_cli_has_none() {
        let t = toml("[sync]\ndat_urls = [\"https://a.example/1.dat\", \"https://b.example/2.dat\"]");
        assert_eq!(sync_config(&["sync"], Some(&t)).sources.len(), 2);
    }

    #[test]
    fn duplicates_are_removed() {
        let sync = sync_config(
            &["sync", "https://a.example/1.dat", "https://a.example/1.dat"],
            None,
        );
        assert_eq!(sync.sources.len(), 1);
    }

    #[test]
    fn invalid_urls_are_skipped_with_reason() {
        let sync = sync_config(
            &["sync", "not a url", "ftp://a.example/x.dat", "https://ok.example/x.dat"],
            None,
        );

        assert_eq!(sync.sources.len(), 1);
        assert_eq!(sync.skipped_sources.len(), 2);
        assert!(sync.skipped_sources[1].contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn no_valid_url_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&["sync", "nope"]), None);
        assert!(matches!(result, Err(ConfigError::NoSources)));
    }
}

mod webui {
    use super::*;

    #[test]
    fn default_username_and_empty_password() {
        let sync = sync_config(&["sync", "-w", "localhost:8080"], None);
        let webui = sync.webui.unwrap();

        assert_eq!(webui.url.as_str(), "http://localhost:8080/");
        assert_eq!(webui.credentials.username, "admin");
        assert_eq!(webui.credentials.password, "");
    }

    #[test]
    fn cli_credentials_beat_toml() {
        let t = toml(
            "[sync]\nwebui_url = \"http://nas:8080\"\nusername = \"toml\"\npassword = \"toml-pw\"",
        );
        let sync = sync_config(&["sync", "-u", "cli", "-p", "cli-pw"], Some(&t));
        let webui = sync.webui.unwrap();

        assert_eq!(webui.url.host_str(), Some("nas"));
        assert_eq!(webui.credentials.username, "cli");
        assert_eq!(webui.credentials.password, "cli-pw");
    }

    #[test]
    fn embedded_credentials_fill_gaps() {
        let sync = sync_config(&["sync", "-w", "http://root:pw@nas:8080"], None);
        let webui = sync.webui.unwrap();

        assert_eq!(webui.url.as_str(), "http://nas:8080/");
        assert_eq!(webui.credentials.username, "root");
        assert_eq!(webui.credentials.password, "pw");
    }

    #[test]
    fn invalid_webui_url_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&["sync", "-w", "http://"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn blank_webui_url_disables_notifier() {
        let t = toml("[sync]\nwebui_url = \"\"");
        assert!(sync_config(&["sync"], Some(&t)).webui.is_none());
    }
}

mod retry {
    use super::*;

    #[test]
    fn cli_and_toml_combine() {
        let t = toml("[retry]\nmax_attempts = 7\ninitial_delay = 3\nmax_delay = 90\nmultiplier = 1.5");
        let sync = sync_config(&["sync", "--retry-max", "4"], Some(&t));
        let policy = sync.retry_policy;

        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_delay, Duration::from_secs(3));
        assert_eq!(policy.max_delay, Duration::from_secs(90));
        assert!((policy.multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_attempts_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&["sync", "--retry-max", "0"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn zero_delay_is_error() {
        let result = ValidatedConfig::from_raw(&cli(&["sync", "--retry-delay", "0"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn max_delay_below_initial_is_error() {
        let t = toml("[retry]\ninitial_delay = 30\nmax_delay = 10");
        let result = ValidatedConfig::from_raw(&cli(&["sync"]), Some(&t));
        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn non_positive_multiplier_is_error() {
        let t = toml("[retry]\nmultiplier = 0.0");
        let result = ValidatedConfig::from_raw(&cli(&["sync"]), Some(&t));
        assert!(matches!(result, Err(ConfigError::InvalidRetry(_))));
    }
}

mod intervals {
    use super::*;

    #[test]
    fn parses_plain_seconds_and_units() {
        assert_eq!(parse_interval("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_interval("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_interval("12h").unwrap(), Duration::from_secs(43_200));
        assert_eq!(parse_interval("1d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_interval("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval("1h 30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval(" 2h ").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_interval(" 600 ").unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "h", "1x", "10m5", "-5", "soon"] {
            assert!(parse_interval(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_interval("999999999999999999d").is_err());
    }

    #[test]
    fn formats_with_units() {
        assert_eq!(format_interval(Duration::ZERO), "0s");
        assert_eq!(format_interval(Duration::from_secs(45)), "45s");
        assert_eq!(format_interval(Duration::from_secs(5400)), "1h 30m");
        assert_eq!(format_interval(Duration::from_secs(86_400)), "1day");
        assert_eq!(format_interval(Duration::from_secs(90_061)), "1day 1h 1m 1s");
    }

    #[test]
    fn format_parses_back() {
        for secs in [1, 59, 60, 3661, 86_400, 200_000] {
            let d = Duration::from_secs(secs);
            assert_eq!(parse_interval(&format_interval(d)).unwrap(), d);
        }
    }
}

mod display {
    use super::*;

    #[test]
    fn sync_display_hides_password() {
        let config = ValidatedConfig::from_raw(
            &cli(&["sync", "-w", "localhost:8080", "-p", "hunter2", "-i", "12h"]),
            None,
        )
        .unwrap();
        let text = config.to_string();

        assert!(text.contains("command: sync"));
        assert!(text.contains("interval: 12h"));
        assert!(text.contains("http://localhost:8080/ as admin"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn merge_display_names_output() {
        let config = ValidatedConfig::from_raw(&cli(&["merge", "a.dat", "-o", "x.dat"]), None).unwrap();
        assert!(config.to_string().contains("output: x.dat"));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_uses_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[merge]\noutput = \"from-file.dat\"").unwrap();
        let path_str = path.to_str().unwrap();

        let config = ValidatedConfig::load(&cli(&["--config", path_str, "merge", "a.dat"])).unwrap();

        let Mode::Merge(merge) = config.mode else {
            panic!("expected merge mode");
        };
        assert_eq!(merge.output, PathBuf::from("from-file.dat"));
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let result = ValidatedConfig::load(&cli(&["--config", "/nonexistent/ipfilter.toml", "sync"]));
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn write_default_config_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ipfilter.toml");

        write_default_config(&path, false).unwrap();
        assert!(matches!(
            write_default_config(&path, false),
            Err(ConfigError::FileExists(_))
        ));
        write_default_config(&path, true).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(TomlConfig::parse(&written).is_ok());
    }
}
