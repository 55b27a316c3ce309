use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

const LOG_FILE: &str = "musicblue.log";

/// Directory for daily log files: the configured one, else the platform data dir.
pub fn log_directory(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .directory
        .clone()
        .or_else(|| dirs::data_local_dir().map(|d| d.join("musicblue").join("logs")))
}

/// Install a file-backed subscriber. The terminal belongs to the TUI, so
/// nothing is written to stdout or stderr once this succeeds.
///
/// The returned guard must live until shutdown or buffered lines are lost.
pub fn init_logging(
    settings: &LoggingSettings,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_dir = log_directory(settings).ok_or("no data directory for log files")?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured directive.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}
