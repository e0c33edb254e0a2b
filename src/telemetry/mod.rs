//! Jaeger tracing wired from configuration.
//!
//! The [`OtelBundle`] reads `otel.*` keys, builds a batching tracer
//! provider that exports to Jaeger over OTLP, and registers the resulting
//! [`Tracing`] in the application [`Container`](crate::app::Container).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! let mut container = Container::new(AppContext::new().with_value(APP_VERSION_KEY, "1.2.3"));
//! container
//!     .apply(ConfigBundle::new(MapConfig::from_env()))?
//!     .apply(LoggingBundle)?
//!     .apply(OtelBundle::new())?;
//!
//! match container.get::<Tracing>()? {
//!     Tracing::Active(active) => { /* spans are exported */ }
//!     Tracing::Disabled => { /* nothing is recorded */ }
//! }
//! ```
//!
//! # Configuration
//!
//! | Key | Description | Default |
//! |-----|-------------|---------|
//! | `otel.connection_type` | `collector` or `agent`; anything else disables tracing | - |
//! | `otel.collector.endpoint` | Collector URL (OTLP/HTTP) | SDK default |
//! | `otel.agent.host` | Agent host (OTLP/gRPC) | `localhost` |
//! | `otel.agent.port` | Agent port | `4317` |
//! | `otel.export_timeout_ms` | Export timeout | SDK default |
//! | `service` | `service.name` resource attribute | empty |
//! | `env` | `environment` resource attribute | empty |
//! | `log.level` | Log level when `RUST_LOG` is unset | `info` |
//! | `log.format` | `pretty` or `json` | `pretty` |
//!
//! # Module Structure
//!
//! - [`bundle`]: Config, logging and otel bundles
//! - [`config`]: Configuration sources and log settings
//! - [`endpoint`]: Collector/agent selection
//! - [`exporter`]: Span exporter construction
//! - [`provider`]: Tracer provider factory and [`Tracing`]
//! - [`resource`]: Resource attributes
//! - [`trace`]: `tracing-subscriber` setup

pub mod bundle;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod exporter;
pub mod provider;
pub mod resource;
pub mod trace;

// Re-exports
pub use bundle::{ConfigBundle, LoggingBundle, OtelBundle};
pub use config::{ConfigSource, LogFormat, LogSettings, MapConfig, SharedConfig};
pub use endpoint::Endpoint;
pub use error::TelemetryError;
pub use exporter::{JaegerOtlpExporter, SpanExporterFactory};
pub use provider::{ActiveTracing, TracerProviderFactory, Tracing};
pub use resource::{ResourceLabels, APP_VERSION_KEY};
pub use trace::{init_subscriber, startup_subscriber};
