use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `otel.connection_type` was neither `collector` nor `agent`.
    #[error("Unsupported connection type: {0:?}")]
    UnsupportedConnectionType(String),
    #[error("Exporter error: {0}")]
    ExporterInit(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Initialization error: {0}")]
    Init(String),
    #[error("Shutdown error: {0}")]
    Shutdown(String),
}

impl From<opentelemetry_otlp::ExporterBuildError> for TelemetryError {
    fn from(err: opentelemetry_otlp::ExporterBuildError) -> Self {
        Self::ExporterInit(err.to_string())
    }
}

impl From<opentelemetry_sdk::error::OTelSdkError> for TelemetryError {
    fn from(err: opentelemetry_sdk::error::OTelSdkError) -> Self {
        Self::Shutdown(err.to_string())
    }
}
