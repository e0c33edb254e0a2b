use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::{error, info, warn};

use crate::app::AppContext;
use crate::telemetry::config::ConfigSource;
use crate::telemetry::endpoint::Endpoint;
use crate::telemetry::error::TelemetryError;
use crate::telemetry::exporter::{JaegerOtlpExporter, SpanExporterFactory};
use crate::telemetry::resource::ResourceLabels;

/// A configured provider together with the resource it was built with.
#[derive(Debug, Clone)]
pub struct ActiveTracing {
    pub provider: SdkTracerProvider,
    pub resource: Resource,
}

/// Outcome of building the tracer provider.
///
/// `Disabled` means tracing was not configured or could not be set up;
/// nothing is recorded or exported in that state.
#[derive(Debug, Clone)]
pub enum Tracing {
    Active(ActiveTracing),
    Disabled,
}

impl Tracing {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn provider(&self) -> Option<&SdkTracerProvider> {
        match self {
            Self::Active(active) => Some(&active.provider),
            Self::Disabled => None,
        }
    }

    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Self::Active(active) => Some(&active.resource),
            Self::Disabled => None,
        }
    }

    pub fn force_flush(&self) -> Result<(), TelemetryError> {
        match self {
            Self::Active(active) => Ok(active.provider.force_flush()?),
            Self::Disabled => Ok(()),
        }
    }

    /// Flush pending spans and stop the export pipeline.
    pub fn shutdown(&self) -> Result<(), TelemetryError> {
        match self {
            Self::Active(active) => Ok(active.provider.shutdown()?),
            Self::Disabled => Ok(()),
        }
    }
}

/// Builds the Jaeger tracer provider from configuration.
pub struct TracerProviderFactory<E = JaegerOtlpExporter> {
    exporter: E,
    install_global: bool,
}

impl Default for TracerProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TracerProviderFactory {
    pub fn new() -> Self {
        Self {
            exporter: JaegerOtlpExporter::default(),
            install_global: true,
        }
    }
}

impl<E: SpanExporterFactory> TracerProviderFactory<E> {
    /// Replace the exporter seam.
    pub fn with_exporter_factory<F: SpanExporterFactory>(self, exporter: F) -> TracerProviderFactory<F> {
        TracerProviderFactory {
            exporter,
            install_global: self.install_global,
        }
    }

    /// Whether a successful build also becomes the process-wide provider.
    pub fn install_global(mut self, install: bool) -> Self {
        self.install_global = install;
        self
    }

    /// Build the provider, degrading to [`Tracing::Disabled`] on any failure.
    ///
    /// Logs one warning for an unsupported connection type and one error
    /// when the exporter cannot be built.
    pub fn build(&self, config: &dyn ConfigSource, context: &AppContext) -> Tracing {
        match self.try_build(config, context) {
            Ok(active) => Tracing::Active(active),
            Err(TelemetryError::UnsupportedConnectionType(connection_type)) => {
                warn!(connection_type = %connection_type, "unknown connection type");
                Tracing::Disabled
            }
            Err(err) => {
                error!(error = %err, "init jaeger exporter failed");
                Tracing::Disabled
            }
        }
    }

    fn try_build(
        &self,
        config: &dyn ConfigSource,
        context: &AppContext,
    ) -> Result<ActiveTracing, TelemetryError> {
        let endpoint = Endpoint::from_config(config)?;
        let exporter = self.exporter.build_exporter(&endpoint)?;

        let labels = ResourceLabels::from_config(config, context);
        let resource = labels.to_resource();

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(resource.clone())
            .build();

        if self.install_global {
            opentelemetry::global::set_tracer_provider(provider.clone());
        }

        info!(
            connection_type = endpoint.connection_type(),
            service = %labels.service_name,
            version = %labels.version,
            "jaeger tracer provider ready"
        );

        Ok(ActiveTracing { provider, resource })
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::trace::{Tracer, TracerProvider as _};
    use opentelemetry::{Key, Value};
    use opentelemetry_sdk::trace::InMemorySpanExporter;

    use super::*;
    use crate::telemetry::config::{keys, MapConfig};
    use crate::telemetry::resource::APP_VERSION_KEY;
    use crate::test_support::{capture_logs, CapturedEvent};

    struct FailingExporter;

    impl SpanExporterFactory for FailingExporter {
        type Exporter = InMemorySpanExporter;

        fn build_exporter(&self, _endpoint: &Endpoint) -> Result<Self::Exporter, TelemetryError> {
            Err(TelemetryError::ExporterInit("connection refused".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct InMemory(InMemorySpanExporter);

    impl SpanExporterFactory for InMemory {
        type Exporter = InMemorySpanExporter;

        fn build_exporter(&self, _endpoint: &Endpoint) -> Result<Self::Exporter, TelemetryError> {
            Ok(self.0.clone())
        }
    }

    fn local_factory() -> TracerProviderFactory {
        TracerProviderFactory::new().install_global(false)
    }

    fn collector_config() -> MapConfig {
        MapConfig::new()
            .with(keys::CONNECTION_TYPE, "collector")
            .with(keys::COLLECTOR_ENDPOINT, "http://localhost:4318/v1/traces")
            .with(keys::SERVICE, "checkout")
            .with(keys::ENV, "staging")
    }

    fn version_of(tracing: &Tracing) -> Option<Value> {
        tracing.resource().and_then(|r| r.get(&Key::new("version")))
    }

    fn errors(events: &[CapturedEvent]) -> usize {
        events.iter().filter(|e| e.level == tracing::Level::ERROR).count()
    }

    fn warnings(events: &[CapturedEvent]) -> Vec<&CapturedEvent> {
        events
            .iter()
            .filter(|e| e.level == tracing::Level::WARN)
            .collect()
    }

    #[test]
    fn collector_builds_active_provider_without_errors() {
        let (tracing, events) =
            capture_logs(|| local_factory().build(&collector_config(), &AppContext::new()));

        assert!(tracing.is_enabled());
        assert!(tracing.provider().is_some());
        assert_eq!(errors(&events), 0);
        assert!(warnings(&events).is_empty());
    }

    #[tokio::test]
    async fn agent_without_host_and_port_uses_exporter_defaults() {
        let config = MapConfig::new()
            .with(keys::CONNECTION_TYPE, "agent")
            .with(keys::AGENT_HOST, "")
            .with(keys::AGENT_PORT, "");

        let (tracing, events) = capture_logs(|| local_factory().build(&config, &AppContext::new()));

        assert!(tracing.is_enabled());
        assert_eq!(errors(&events), 0);
    }

    #[test]
    fn agent_outside_runtime_is_disabled_with_one_error() {
        let config = MapConfig::new().with(keys::CONNECTION_TYPE, "agent");

        let (tracing, events) = capture_logs(|| local_factory().build(&config, &AppContext::new()));

        assert!(!tracing.is_enabled());
        assert_eq!(errors(&events), 1);
        assert!(warnings(&events).is_empty());
    }

    #[test]
    fn bogus_connection_type_is_disabled_with_one_warning() {
        let config = MapConfig::new().with(keys::CONNECTION_TYPE, "bogus");

        let (tracing, events) = capture_logs(|| local_factory().build(&config, &AppContext::new()));

        assert!(!tracing.is_enabled());
        assert!(tracing.provider().is_none());
        let warnings = warnings(&events);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].rendered().contains("bogus"));
        assert!(warnings[0].target.ends_with("telemetry::provider"));
        assert_eq!(errors(&events), 0);
    }

    #[test]
    fn missing_connection_type_is_disabled() {
        let (tracing, events) =
            capture_logs(|| local_factory().build(&MapConfig::new(), &AppContext::new()));

        assert!(!tracing.is_enabled());
        assert_eq!(warnings(&events).len(), 1);
    }

    #[test]
    fn missing_version_defaults_to_unknown() {
        let tracing = local_factory().build(&collector_config(), &AppContext::new());

        assert_eq!(version_of(&tracing), Some(Value::from("unknown")));
    }

    #[test]
    fn version_comes_from_context() {
        let context = AppContext::new().with_value(APP_VERSION_KEY, "1.2.3".to_string());

        let tracing = local_factory().build(&collector_config(), &context);

        assert_eq!(version_of(&tracing), Some(Value::from("1.2.3")));
    }

    #[test]
    fn resource_carries_service_and_environment() {
        let tracing = local_factory().build(&collector_config(), &AppContext::new());
        let resource = tracing.resource().unwrap();

        assert_eq!(resource.get(&Key::new("service.name")), Some(Value::from("checkout")));
        assert_eq!(resource.get(&Key::new("environment")), Some(Value::from("staging")));
    }

    #[test]
    fn malformed_collector_endpoint_is_disabled_with_one_error() {
        let config = MapConfig::new()
            .with(keys::CONNECTION_TYPE, "collector")
            .with(keys::COLLECTOR_ENDPOINT, "http://bad host:4318");

        let (tracing, events) = capture_logs(|| local_factory().build(&config, &AppContext::new()));

        assert!(!tracing.is_enabled());
        assert_eq!(errors(&events), 1);
        assert!(warnings(&events).is_empty());
    }

    #[test]
    fn failing_exporter_factory_is_disabled_with_one_error() {
        let factory = local_factory().with_exporter_factory(FailingExporter);

        let (tracing, events) =
            capture_logs(|| factory.build(&collector_config(), &AppContext::new()));

        assert!(!tracing.is_enabled());
        assert_eq!(errors(&events), 1);
        assert!(events
            .iter()
            .any(|e| e.level == tracing::Level::ERROR && e.rendered().contains("connection refused")));
    }

    #[test]
    fn spans_flow_through_the_batch_processor() {
        let exporter = InMemory::default();
        let factory = local_factory().with_exporter_factory(exporter.clone());

        let tracing = factory.build(&collector_config(), &AppContext::new());
        let provider = tracing.provider().unwrap();
        provider.tracer("test").in_span("checkout.pay", |_cx| {});
        tracing.force_flush().unwrap();

        let spans = exporter.0.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "checkout.pay");
    }

    #[test]
    fn disabled_flush_and_shutdown_are_noops() {
        let tracing = Tracing::Disabled;

        assert!(tracing.force_flush().is_ok());
        assert!(tracing.shutdown().is_ok());
        assert!(tracing.resource().is_none());
    }

    #[test]
    fn shutdown_active_provider() {
        let factory = local_factory().with_exporter_factory(InMemory::default());
        let tracing = factory.build(&collector_config(), &AppContext::new());

        assert!(tracing.shutdown().is_ok());
    }
}
