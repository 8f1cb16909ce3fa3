use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::shared::config::{resolve_path, LoggingConfig};

/// Filter used when RUST_LOG is not set: application logs, but no SQL noise
const DEFAULT_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Install the global subscriber: console output plus an appending log file.
///
/// Every run appends to the same file, so earlier runs stay available for
/// comparison.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = resolve_path(&config.dir);
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(&config.file))?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}
