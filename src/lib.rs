//! Configuration-driven Jaeger tracing for applications composed from bundles.

pub mod app;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use app::{AppContext, Bundle, Container, ContainerError};
pub use telemetry::{
    ConfigBundle, LoggingBundle, MapConfig, OtelBundle, TelemetryError, TracerProviderFactory,
    Tracing,
};
