//! Tracing subscriber setup.

use super::exporter::{create_tracer_provider, SERVICE_NAME};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// Log lines go to stderr so they never interleave with the rendered screen on
/// stdout. When `config.trace_file` is set, finished spans are also exported to
/// that file.
///
/// Idempotent: only the first call in a process takes effect. Never fails; an
/// unusable filter directive falls back to `info`, and an unwritable trace file
/// only produces export errors.
///
/// # Example
///
/// ```rust
/// use tokotrends::observability::init_tracing;
/// use tokotrends::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or("info");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let otel_layer = config.trace_file.clone().map(|path| {
        let provider = create_tracer_provider(path);
        let tracer = provider.tracer(SERVICE_NAME);
        // Provider lives for the rest of the process.
        opentelemetry::global::set_tracer_provider(provider);
        OpenTelemetryLayer::new(tracer)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(otel_layer);

    if subscriber.try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
