use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::telemetry::config::{LogFormat, LogSettings};
use crate::telemetry::error::TelemetryError;
use crate::telemetry::provider::Tracing;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the OpenTelemetry tracing layer
pub fn build_otel_layer<S>(
    provider: &SdkTracerProvider,
    tracer_name: &str,
) -> OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let tracer = provider.tracer(tracer_name.to_string());
    tracing_opentelemetry::layer().with_tracer(tracer)
}

/// Build the JSON fmt layer for structured logging (cloud environments)
pub fn build_json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_current_span(true)
}

/// Build the pretty fmt layer for human-readable output (local dev)
pub fn build_pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

/// Build the env filter; `RUST_LOG` wins over the configured level.
pub fn build_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| settings_filter(settings))
}

/// Filter for the configured level alone.
pub fn settings_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::new(&settings.level)
}

/// Filter, optional OpenTelemetry bridge, then the fmt layer.
///
/// The bridge is only added when `tracing` is active.
pub fn build_layers(settings: &LogSettings, tracing: &Tracing) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = vec![build_filter(settings).boxed()];

    if let Some(provider) = tracing.provider() {
        layers.push(build_otel_layer::<Registry>(provider, &tracer_name(tracing)).boxed());
    }

    layers.push(match settings.format {
        LogFormat::Pretty => build_pretty_layer::<Registry>().boxed(),
        LogFormat::Json => build_json_layer::<Registry>().boxed(),
    });

    layers
}

/// Subscriber used while bundles are applied, before the provider exists.
pub fn startup_subscriber(settings: &LogSettings) -> impl Subscriber + Send + Sync {
    tracing_subscriber::registry().with(build_layers(settings, &Tracing::Disabled))
}

/// Install the global tracing subscriber with all layers.
pub fn init_subscriber(settings: &LogSettings, tracing: &Tracing) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(build_layers(settings, tracing))
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

fn tracer_name(tracing: &Tracing) -> String {
    tracing
        .resource()
        .and_then(|r| r.get(&opentelemetry::Key::new("service.name")))
        .map(|v| v.to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
