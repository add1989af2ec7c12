//! Tracing subscriber setup for the `gantt` binary.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::GanttError;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// stderr, for plain CLI commands.
    Console,
    /// A file in the configured directory only; the terminal belongs to the UI.
    FileOnly,
}

/// Environment variable holding a log filter.
pub const LOG_ENV: &str = "GANTT_LOG";

/// Pick the filter directive: explicit flag, then `GANTT_LOG`, then the config level.
fn filter_directive(cli_level: Option<&str>, env_level: Option<String>, logging: &LoggingConfig) -> String {
    cli_level
        .map(str::to_string)
        .or(env_level.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| logging.level.clone())
}

fn build_filter(cli_level: Option<&str>, env_level: Option<String>, logging: &LoggingConfig) -> Result<EnvFilter, GanttError> {
    let directive = filter_directive(cli_level, env_level, logging);
    EnvFilter::try_new(&directive).map_err(|e| GanttError::Logging(format!("'{directive}': {e}")))
}

/// Install the global subscriber.
pub fn init(cli_level: Option<&str>, logging: &LoggingConfig, target: LogTarget) -> Result<(), GanttError> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok(), logging)?;

    let dir = logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let file_writer = match dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| GanttError::Logging(format!("create log dir failed: {e}")))?;
            let appender = tracing_appender::rolling::never(dir, "gantt.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(writer)
        }
        None => None,
    };

    if target == LogTarget::FileOnly && file_writer.is_none() {
        return Ok(());
    }

    let console_layer = (target == LogTarget::Console)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let file_layer = file_writer.map(|w| tracing_subscriber::fmt::layer().with_writer(w).with_ansi(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| GanttError::Logging(e.to_string()))
}
