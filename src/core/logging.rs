use super::config::Config;
use super::error::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "penseek.log";

/// Initialize file logging under the configured log directory.
///
/// The terminal is owned by the TUI, so nothing is written to stdout/stderr.
pub fn init_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_dir.join(LOG_FILE_NAME))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}
