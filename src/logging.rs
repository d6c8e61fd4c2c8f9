//! Tracing setup for the two front ends.
//!
//! The TUI owns the terminal, so it logs to a file through a non-blocking
//! writer. CLI subcommands log to stderr.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::model::LogConfig;

/// Environment variable holding a filter directive; wins over `[log] level`
pub const LOG_ENV: &str = "PIPEBOARD_LOG";

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send logs to `log.file`, or `pipeboard.log` in `default_dir`.
///
/// The returned guard flushes on drop and must live until exit. Returns
/// `None` when the log file can't be opened or a subscriber is already set.
pub fn init_file(log: &LogConfig, default_dir: &Path) -> Option<WorkerGuard> {
    let path = log
        .file
        .clone()
        .unwrap_or_else(|| default_dir.join("pipeboard.log"));
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    let file_name = path.file_name()?.to_os_string();
    fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter_or(&log.level))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Log to stderr, at `warn` unless `PIPEBOARD_LOG` says otherwise.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_or("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log panics before the default hook runs.
pub fn install_panic_logging() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(target: "pipeboard::panic", %info, "panic");
        default_panic(info);
    }));
}
