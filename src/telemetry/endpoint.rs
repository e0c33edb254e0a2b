use crate::telemetry::config::{keys, ConfigSource};
use crate::telemetry::error::TelemetryError;

pub const CONNECTION_COLLECTOR: &str = "collector";
pub const CONNECTION_AGENT: &str = "agent";

/// Where finished spans are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Jaeger collector reached over HTTP. The URL is passed through unchecked.
    Collector { endpoint: String },
    /// Local Jaeger agent. `None` leaves the exporter default in place.
    Agent {
        host: Option<String>,
        port: Option<String>,
    },
}

impl Endpoint {
    /// Select the transport from `otel.connection_type`.
    pub fn from_config(config: &dyn ConfigSource) -> Result<Self, TelemetryError> {
        let connection_type = config.get_string_or_default(keys::CONNECTION_TYPE);

        match connection_type.as_str() {
            CONNECTION_COLLECTOR => Ok(Self::Collector {
                endpoint: config.get_string_or_default(keys::COLLECTOR_ENDPOINT),
            }),
            CONNECTION_AGENT => Ok(Self::Agent {
                host: non_empty(config.get_string(keys::AGENT_HOST)),
                port: non_empty(config.get_string(keys::AGENT_PORT)),
            }),
            _ => Err(TelemetryError::UnsupportedConnectionType(connection_type)),
        }
    }

    pub fn connection_type(&self) -> &'static str {
        match self {
            Self::Collector { .. } => CONNECTION_COLLECTOR,
            Self::Agent { .. } => CONNECTION_AGENT,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
