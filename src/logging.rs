//! Tracing setup for the poller binary.
//!
//! Two layers share one registry: a console layer filtered by
//! [`env_filter`], and a file layer that only receives `ERROR` events. The
//! file layer is the error log: one line per failed cycle with timestamp,
//! level, source location and message.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Guards required to keep background logging workers alive.
pub struct LoggingGuards {
    _file_guard: WorkerGuard,
}

/// Console filter: `RUST_LOG` when set and valid, `level` otherwise.
pub fn env_filter(level: &str) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// The returned guards flush the error log on drop and must be held for the
/// life of the process.
pub fn init_logging(level: &str, error_log: &Path) -> Result<LoggingGuards> {
    let dir = error_log
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = error_log
        .file_name()
        .unwrap_or_else(|| OsStr::new("errorlog.log"));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let console = fmt::layer()
        .with_target(false)
        .with_filter(env_filter(level));

    let errors = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(console)
        .with(errors)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LoggingGuards {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_uses_configured_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert_eq!(env_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(env_filter("warn").max_level_hint(), Some(LevelFilter::WARN));
    }
}
