use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use serde_json::Value;

use crate::telemetry::error::TelemetryError;

/// Configuration keys read by the telemetry bundles.
pub mod keys {
    pub const CONNECTION_TYPE: &str = "otel.connection_type";
    pub const COLLECTOR_ENDPOINT: &str = "otel.collector.endpoint";
    pub const AGENT_HOST: &str = "otel.agent.host";
    pub const AGENT_PORT: &str = "otel.agent.port";
    pub const EXPORT_TIMEOUT_MS: &str = "otel.export_timeout_ms";
    pub const SERVICE: &str = "service";
    pub const ENV: &str = "env";
    pub const LOG_LEVEL: &str = "log.level";
    pub const LOG_FORMAT: &str = "log.format";

    /// Every key the bundles understand, used when loading from the environment.
    pub const ALL: &[&str] = &[
        CONNECTION_TYPE,
        COLLECTOR_ENDPOINT,
        AGENT_HOST,
        AGENT_PORT,
        EXPORT_TIMEOUT_MS,
        SERVICE,
        ENV,
        LOG_LEVEL,
        LOG_FORMAT,
    ];
}

/// Read-only string-keyed configuration lookup.
pub trait ConfigSource: Send + Sync {
    /// Value for `key`, or `None` when the key is absent.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Value for `key`, or an empty string when the key is absent.
    fn get_string_or_default(&self, key: &str) -> String {
        self.get_string(key).unwrap_or_default()
    }
}

/// Configuration handle shared through the application container.
pub type SharedConfig = Arc<dyn ConfigSource>;

/// In-memory configuration with dotted keys (`otel.agent.host`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a JSON document, flattening nested objects into dotted keys.
    ///
    /// `{"otel": {"agent": {"port": 6831}}}` yields `otel.agent.port = "6831"`.
    /// Nulls are skipped and arrays are kept as their JSON text.
    pub fn from_json(input: &str) -> Result<Self, TelemetryError> {
        let root: Value = serde_json::from_str(input)
            .map_err(|e| TelemetryError::Config(format!("Invalid JSON: {}", e)))?;

        let Value::Object(map) = root else {
            return Err(TelemetryError::Config(
                "JSON configuration root must be an object".to_string(),
            ));
        };

        let mut config = Self::new();
        for (key, value) in map {
            flatten_into(&mut config.values, key, value);
        }
        Ok(config)
    }

    /// Load every known key from environment variables.
    ///
    /// `otel.agent.host` is read from `OTEL_AGENT_HOST`.
    pub fn from_env() -> Self {
        Self::collect_env(None)
    }

    /// Like [`MapConfig::from_env`], with a prefix: `APP` reads `APP_OTEL_AGENT_HOST`.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        Self::collect_env(Some(prefix))
    }

    fn collect_env(prefix: Option<&str>) -> Self {
        let mut config = Self::new();
        for key in keys::ALL {
            if let Ok(value) = env::var(env_var_name(prefix, key)) {
                config.set(*key, value);
            }
        }
        config
    }

    /// Overlay `other` on top of `self`; keys from `other` win.
    pub fn merge(mut self, other: MapConfig) -> Self {
        self.values.extend(other.values);
        self
    }
}

impl ConfigSource for MapConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn flatten_into(values: &mut HashMap<String, String>, key: String, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            values.insert(key, s);
        }
        Value::Object(map) => {
            for (child, value) in map {
                flatten_into(values, format!("{}.{}", key, child), value);
            }
        }
        other => {
            values.insert(key, other.to_string());
        }
    }
}

/// Environment variable holding `key`.
pub fn env_var_name(prefix: Option<&str>, key: &str) -> String {
    let name = key.replace('.', "_").to_uppercase();
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}_{}", prefix.to_uppercase(), name),
        _ => name,
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty human-readable format with colors (for local dev)
    #[default]
    Pretty,
    /// JSON structured format (for cloud environments)
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Settings for the `tracing-subscriber` stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LogSettings {
    /// Read `log.level` and `log.format`, keeping defaults for missing keys.
    pub fn from_config(config: &dyn ConfigSource) -> Self {
        let defaults = Self::default();
        Self {
            level: config
                .get_string(keys::LOG_LEVEL)
                .filter(|level| !level.is_empty())
                .unwrap_or(defaults.level),
            format: config
                .get_string(keys::LOG_FORMAT)
                .map(|format| LogFormat::parse(&format))
                .unwrap_or(defaults.format),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}
