use std::sync::Arc;

use crate::app::{Bundle, Container, ContainerError};
use crate::telemetry::config::{ConfigSource, LogSettings, SharedConfig};
use crate::telemetry::exporter::JaegerOtlpExporter;
use crate::telemetry::provider::TracerProviderFactory;

pub const CONFIG_BUNDLE: &str = "config";
pub const LOGGING_BUNDLE: &str = "logging";
pub const OTEL_BUNDLE: &str = "otel";

/// Provides the [`SharedConfig`] every other bundle reads.
pub struct ConfigBundle {
    config: SharedConfig,
}

impl ConfigBundle {
    pub fn new<C: ConfigSource + 'static>(config: C) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn shared(config: SharedConfig) -> Self {
        Self { config }
    }
}

impl Bundle for ConfigBundle {
    fn name(&self) -> &'static str {
        CONFIG_BUNDLE
    }

    fn build(&self, container: &mut Container) -> Result<(), ContainerError> {
        container.provide(self.config.clone());
        Ok(())
    }
}

/// Provides [`LogSettings`] read from `log.*`.
pub struct LoggingBundle;

impl Bundle for LoggingBundle {
    fn name(&self) -> &'static str {
        LOGGING_BUNDLE
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[CONFIG_BUNDLE]
    }

    fn build(&self, container: &mut Container) -> Result<(), ContainerError> {
        let config = container.get::<SharedConfig>()?;
        container.provide(LogSettings::from_config(config.as_ref()));
        Ok(())
    }
}

/// Builds the Jaeger tracer provider and registers the resulting
/// [`Tracing`](crate::telemetry::Tracing) in the container.
///
/// Never fails because of tracing itself: a misconfigured exporter is
/// registered as `Tracing::Disabled`.
pub struct OtelBundle {
    install_global: bool,
}

impl Default for OtelBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl OtelBundle {
    pub fn new() -> Self {
        Self {
            install_global: true,
        }
    }

    pub fn install_global(mut self, install: bool) -> Self {
        self.install_global = install;
        self
    }
}

impl Bundle for OtelBundle {
    fn name(&self) -> &'static str {
        OTEL_BUNDLE
    }

    fn depends_on(&self) -> &'static [&'static str] {
        &[CONFIG_BUNDLE, LOGGING_BUNDLE]
    }

    fn build(&self, container: &mut Container) -> Result<(), ContainerError> {
        let config = container.get::<SharedConfig>()?;
        let tracing = TracerProviderFactory::new()
            .with_exporter_factory(JaegerOtlpExporter::from_config(config.as_ref()))
            .install_global(self.install_global)
            .build(config.as_ref(), container.context());
        container.provide(tracing);
        Ok(())
    }
}
