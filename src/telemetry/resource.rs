use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use opentelemetry_semantic_conventions::SCHEMA_URL;

use crate::app::AppContext;
use crate::telemetry::config::{keys, ConfigSource};

/// Context key holding the application version.
pub const APP_VERSION_KEY: &str = "app.version";

/// Version reported when the context does not carry one.
pub const UNKNOWN_VERSION: &str = "unknown";

pub const ENVIRONMENT: &str = "environment";
pub const VERSION: &str = "version";

/// Static labels describing the traced service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLabels {
    pub service_name: String,
    pub environment: String,
    pub version: String,
}

impl ResourceLabels {
    pub fn new(
        service_name: impl Into<String>,
        environment: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            environment: environment.into(),
            version: version.into(),
        }
    }

    /// `service` and `env` come from config and may be empty.
    pub fn from_config(config: &dyn ConfigSource, context: &AppContext) -> Self {
        Self::new(
            config.get_string_or_default(keys::SERVICE),
            config.get_string_or_default(keys::ENV),
            app_version(context),
        )
    }

    pub fn attributes(&self) -> Vec<KeyValue> {
        vec![
            KeyValue::new(SERVICE_NAME, self.service_name.clone()),
            KeyValue::new(ENVIRONMENT, self.environment.clone()),
            KeyValue::new(VERSION, self.version.clone()),
        ]
    }

    /// Only these labels are attached; SDK detectors and `OTEL_SERVICE_NAME`
    /// cannot override the configured service name.
    pub fn to_resource(&self) -> Resource {
        Resource::builder_empty()
            .with_schema_url(self.attributes(), SCHEMA_URL)
            .build()
    }
}

/// Version string stored under [`APP_VERSION_KEY`], or [`UNKNOWN_VERSION`].
pub fn app_version(context: &AppContext) -> String {
    context
        .get::<String>(APP_VERSION_KEY)
        .cloned()
        .or_else(|| {
            context
                .get::<&'static str>(APP_VERSION_KEY)
                .map(|v| v.to_string())
        })
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
