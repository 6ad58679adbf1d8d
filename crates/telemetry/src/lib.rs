//! Logging and tracing bootstrap for biblio.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use biblio_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured fallback filter is
/// used. Safe to call only once per process.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.clone()));

    let result = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
    };

    result.map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::debug!(format = ?settings.log_format, "telemetry initialized");
    Ok(())
}
