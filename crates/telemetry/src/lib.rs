//! Tracing/logging bootstrap for shelf.

use tracing_subscriber::EnvFilter;

use shelf_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the global tracing subscriber from telemetry settings.
///
/// `RUST_LOG` takes precedence over the default `info` filter. Safe to call
/// more than once; later calls are no-ops.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!(target: "shelf-telemetry", "tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let settings = TelemetrySettings::default();
        init(&settings);
        init(&settings);
    }
}
