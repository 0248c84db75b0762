use std::path::Path;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Timestamp layout shared by the console and the log file.
pub(crate) const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_disable_color(
    no_color_flag: bool,
    no_color_env: bool,
    dumb_terminal: bool,
) -> bool {
    no_color_flag || no_color_env || dumb_terminal
}

pub(crate) fn is_no_color_requested(no_color_flag: bool) -> bool {
    should_disable_color(no_color_flag, no_color_env_requested(), is_dumb_terminal())
}

pub(crate) fn should_use_progress(
    stderr_is_terminal: bool,
    quiet: bool,
    no_progress: bool,
    dumb_terminal: bool,
) -> bool {
    stderr_is_terminal && !quiet && !no_progress && !dumb_terminal
}

/// Lowest level the log file records, whatever the console shows.
pub(crate) const FILE_LOG_LEVEL: &str = "info";

/// Level directive for the log file: the console level when it is more
/// verbose than [`FILE_LOG_LEVEL`], otherwise [`FILE_LOG_LEVEL`].
fn file_level(console_level: &str) -> &str {
    match console_level {
        "debug" | "trace" => console_level,
        _ => FILE_LOG_LEVEL,
    }
}

/// Installs the global subscriber: console on stdout plus a plain log file.
///
/// `RUST_LOG` overrides `default_level` on the console only. The file always
/// records at least [`FILE_LOG_LEVEL`], so `--quiet` keeps the run timeline in
/// the log. The returned guard flushes the file writer on drop and must live
/// until the run ends.
pub(crate) fn init_tracing(
    default_level: &str,
    no_color: bool,
    log_file: &Path,
) -> Result<WorkerGuard> {
    let (subscriber, guard) = build_subscriber(default_level, no_color, log_file)?;
    let _ = subscriber.try_init();
    Ok(guard)
}

fn build_subscriber(
    default_level: &str,
    no_color: bool,
    log_file: &Path,
) -> Result<(impl Subscriber + Send + Sync + use<>, WorkerGuard)> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let file_filter = EnvFilter::new(file_level(default_level));

    let (writer, guard) = tracing_appender::non_blocking(open_log_file(log_file)?);

    let console = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(!no_color)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .with_filter(console_filter);
    let file = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .with_filter(file_filter);

    let subscriber = tracing_subscriber::registry().with(console).with(file);
    Ok((subscriber, guard))
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path '{}' has no file name", path.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))
}
