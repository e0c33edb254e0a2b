use std::time::Duration;

use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::trace::SpanExporter as SdkSpanExporter;
use tracing::debug;

use crate::telemetry::config::{keys, ConfigSource};
use crate::telemetry::endpoint::Endpoint;
use crate::telemetry::error::TelemetryError;

pub const DEFAULT_AGENT_HOST: &str = "localhost";
pub const DEFAULT_AGENT_PORT: &str = "4317";

/// Builds the span exporter for an [`Endpoint`].
pub trait SpanExporterFactory: Send + Sync {
    type Exporter: SdkSpanExporter + 'static;

    fn build_exporter(&self, endpoint: &Endpoint) -> Result<Self::Exporter, TelemetryError>;
}

/// Jaeger exporter speaking OTLP.
///
/// The collector is reached over OTLP/HTTP and the agent over OTLP/gRPC.
/// Building the gRPC channel needs a Tokio runtime in scope.
#[derive(Debug, Clone, Default)]
pub struct JaegerOtlpExporter {
    timeout: Option<Duration>,
}

impl JaegerOtlpExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `otel.export_timeout_ms`; an unparseable value is ignored.
    pub fn from_config(config: &dyn ConfigSource) -> Self {
        let mut exporter = Self::new();
        if let Some(raw) = config.get_string(keys::EXPORT_TIMEOUT_MS) {
            match raw.parse::<u64>() {
                Ok(ms) => exporter.timeout = Some(Duration::from_millis(ms)),
                Err(_) => debug!(value = %raw, "ignoring invalid export timeout"),
            }
        }
        exporter
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl SpanExporterFactory for JaegerOtlpExporter {
    type Exporter = SpanExporter;

    fn build_exporter(&self, endpoint: &Endpoint) -> Result<SpanExporter, TelemetryError> {
        let exporter = match endpoint {
            Endpoint::Collector { endpoint } => {
                let mut builder = SpanExporter::builder()
                    .with_http()
                    .with_protocol(Protocol::HttpBinary);
                if !endpoint.is_empty() {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.with_timeout(timeout);
                }
                builder.build()?
            }
            Endpoint::Agent { host, port } => {
                // The gRPC channel is spawned onto the current runtime.
                if tokio::runtime::Handle::try_current().is_err() {
                    return Err(TelemetryError::ExporterInit(
                        "agent transport requires a Tokio runtime".to_string(),
                    ));
                }
                let mut builder = SpanExporter::builder().with_tonic();
                if let Some(url) = agent_url(host.as_deref(), port.as_deref()) {
                    builder = builder.with_endpoint(url);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.with_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(exporter)
    }
}

/// Agent URL, or `None` when neither host nor port is configured.
pub fn agent_url(host: Option<&str>, port: Option<&str>) -> Option<String> {
    if host.is_none() && port.is_none() {
        return None;
    }
    Some(format!(
        "http://{}:{}",
        host.unwrap_or(DEFAULT_AGENT_HOST),
        port.unwrap_or(DEFAULT_AGENT_PORT)
    ))
}
