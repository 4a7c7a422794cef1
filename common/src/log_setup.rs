use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset, e.g. `"info"` or `"tessera=debug"`.
    pub base_level: String,
    /// Directory for daily-rotated log files. `None` logs to the console only.
    pub log_dir: Option<String>,
    pub file_prefix: String,
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: "info".to_string(),
            log_dir: Some("logs".to_string()),
            file_prefix: "tessera".to_string(),
            max_log_files: 5,
        }
    }
}

impl LogConfig {
    pub fn console_only(base_level: &str) -> Self {
        Self {
            base_level: base_level.to_string(),
            log_dir: None,
            ..Self::default()
        }
    }
}

/// Install the global tracing subscriber. Warnings and errors also go to stderr.
///
/// # Panics
/// If the filter is invalid, the log directory cannot be created, or a
/// subscriber is already installed.
pub fn setup_logging(config: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e));

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = config.log_dir.as_deref().map(|dir| {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create log directory {dir}: {}", e));

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(&config.file_prefix)
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(dir)
            .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        if LOG_GUARD.set(guard).is_err() {
            panic!("Logging already initialized");
        }

        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_logs_to_rolling_files() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, "info");
        assert_eq!(config.log_dir.as_deref(), Some("logs"));
        assert_eq!(config.file_prefix, "tessera");
        assert_eq!(config.max_log_files, 5);
    }

    #[test]
    fn test_console_only_setup_installs_subscriber() {
        let config = LogConfig::console_only("warn");
        assert!(config.log_dir.is_none());
        setup_logging(&config);
        tracing::warn!("console logging installed");
    }
}
