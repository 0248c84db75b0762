//! Configuration lifecycle: load file config, merge CLI and environment into run settings.

use std::path::PathBuf;
use std::time::Duration;

use akakce_search_core::batch::ThrottleWindow;
use akakce_search_core::resolver::{BackoffPolicy, DEFAULT_BASE_WAIT, DEFAULT_MAX_ATTEMPTS};
use akakce_search_core::search::{DEFAULT_RESULT_CAP, ProxyConfig};
use akakce_search_core::table::default_output_path;
use anyhow::Result;

use crate::app_config::{FileConfig, VerbositySetting, load_config};
use crate::cli::Args;

/// Log file used when neither CLI nor config names one.
pub(crate) const DEFAULT_LOG_FILE: &str = "automation.log";

/// Console verbosity after merging CLI flags and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verbosity {
    Quiet,
    Default,
    Debug,
    Trace,
}

impl Verbosity {
    /// Default `EnvFilter` directive for this verbosity.
    pub(crate) fn level(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Default => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    fn from_setting(setting: VerbositySetting) -> Self {
        match setting {
            VerbositySetting::Default => Self::Default,
            VerbositySetting::Verbose => Self::Debug,
            VerbositySetting::Quiet => Self::Quiet,
            VerbositySetting::Debug => Self::Trace,
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) log_file: PathBuf,
    pub(crate) proxy: ProxyConfig,
    pub(crate) policy: BackoffPolicy,
    pub(crate) throttle: ThrottleWindow,
    pub(crate) result_cap: usize,
    pub(crate) verbosity: Verbosity,
    pub(crate) no_color: bool,
    pub(crate) no_progress: bool,
    pub(crate) config_path: Option<PathBuf>,
}

/// Loads the config file named by `args` (or the default one) and merges it.
pub(crate) fn resolve_config(args: Args) -> Result<RunSettings> {
    let loaded = load_config(args.config.as_deref())?;
    let config_path = if loaded.loaded_from_file() {
        loaded.path.clone()
    } else {
        None
    };
    let mut settings = merge_settings(args, loaded.config.as_ref(), ProxyConfig::from_env());
    settings.config_path = config_path;
    Ok(settings)
}

/// Merges with precedence CLI > config file > environment proxies > defaults.
pub(crate) fn merge_settings(
    args: Args,
    file_config: Option<&FileConfig>,
    env_proxy: ProxyConfig,
) -> RunSettings {
    let defaults = FileConfig::default();
    let file = file_config.unwrap_or(&defaults);

    let cli_proxy = ProxyConfig::new(args.http_proxy.clone(), args.https_proxy.clone());
    let file_proxy = ProxyConfig::new(file.http_proxy.clone(), file.https_proxy.clone());
    let proxy = cli_proxy.or(file_proxy).or(env_proxy);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, file.output_dir.as_deref()));
    let log_file = args
        .log_file
        .clone()
        .or_else(|| file.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    let policy = BackoffPolicy::new(
        file.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        file.backoff_base_secs
            .map_or(DEFAULT_BASE_WAIT, Duration::from_secs),
    );

    let default_throttle = ThrottleWindow::default();
    let throttle = ThrottleWindow::new(
        file.throttle_min_ms
            .map_or(default_throttle.min(), Duration::from_millis),
        file.throttle_max_ms
            .map_or(default_throttle.max(), Duration::from_millis),
    );

    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else if args.verbose > 0 {
        if args.verbose == 1 {
            Verbosity::Debug
        } else {
            Verbosity::Trace
        }
    } else {
        file.verbosity
            .map_or(Verbosity::Default, Verbosity::from_setting)
    };

    RunSettings {
        input: args.input,
        output,
        log_file,
        proxy,
        policy,
        throttle,
        result_cap: file.result_cap.unwrap_or(DEFAULT_RESULT_CAP),
        verbosity,
        no_color: args.no_color,
        no_progress: args.no_progress,
        config_path: None,
    }
}
