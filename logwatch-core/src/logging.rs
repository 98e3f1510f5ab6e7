use anyhow::{Context, Result};
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// JSON logs to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_normal_logging() {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .json()
        .flatten_event(true)
        .init();
}

pub fn init_logging() {
    // tokio-console replaces the normal subscriber entirely
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_normal_logging();
    }
}

fn init_console_logging() {
    console_subscriber::init();
}

/// JSON logs to a daily-rotated file under `dir`, leaving the terminal to
/// the dashboard. Keep the returned guard alive until exit or buffered
/// lines are lost. Fails if `dir` cannot be created or written to.
pub fn init_file_logging(dir: &Path) -> Result<WorkerGuard> {
    let appender = file_appender(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .json()
        .flatten_event(true)
        .init();

    Ok(guard)
}

/// Daily-rotated `logwatch.log.<date>` files under `dir`.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("logwatch.log")
        .build(dir)
        .with_context(|| format!("cannot open log directory {}", dir.display()))
}

/// How `logwatch watch` presents the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// One JSON snapshot per line on stdout.
    Json,
    /// Full-screen console dashboard.
    Dashboard,
}

pub fn default_log_mode() -> LogMode {
    if io::stdout().is_terminal() {
        LogMode::Dashboard
    } else {
        LogMode::Json
    }
}
