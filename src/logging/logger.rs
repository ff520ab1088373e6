use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the daily rolling log file
pub const LOG_FILE_NAME: &str = "itemscroller.log";

/// Install the global subscriber: stdout plus a daily rolling file in `dir`.
///
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logger(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_target(false)
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
        )
        .try_init()
        .context("Failed to install the log subscriber")?;

    tracing::info!("Logger initialized, writing to {:?}", dir.join(LOG_FILE_NAME));
    Ok(())
}
