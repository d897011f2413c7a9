//! Logging setup
//!
//! stderr always, plus a daily rolling file when a log directory is set.
//! `RUST_LOG` overrides the configured level.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_PREFIX: &str = "ac-desk.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_prefix: LOG_FILE_PREFIX.to_string(),
            ansi: true,
        }
    }
}

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Filter directive for a level: our crates at `level`, HTTP internals quieter.
pub fn default_directive(level: &str) -> String {
    format!("warn,ac_desk={level},ac_desk_lib={level},ac_client={level},shared={level}")
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

/// Create the log directory if needed.
pub fn prepare_log_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory {}", dir.display()))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process, or buffered
/// file output is lost.
pub fn init_logger(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            prepare_log_dir(dir)?;
            let appender = rolling::daily(dir, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(LocalTimer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(config.ansi)
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = &config.log_dir {
        tracing::info!(path = %dir.display(), "File logging enabled");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_parses() {
        let directive = default_directive("debug");
        assert!(directive.contains("ac_client=debug"));
        assert!(directive.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn prepare_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs").join("desk");
        prepare_log_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // idempotent
        prepare_log_dir(&dir).unwrap();
    }

    #[test]
    fn init_writes_to_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_dir: Some(tmp.path().join("logs")),
            ansi: false,
            ..LogConfig::default()
        };
        // Another test in this binary may have installed a subscriber first.
        if let Ok(guard) = init_logger(&config) {
            assert!(guard.is_some());
            tracing::warn!("log file probe");
            drop(guard);
            let entries: Vec<_> = std::fs::read_dir(tmp.path().join("logs")).unwrap().collect();
            assert!(!entries.is_empty());
        }
    }
}
