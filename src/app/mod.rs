//! Application composition: context values and the component container.
//!
//! Bundles are applied once at startup, in dependency order:
//!
//! ```rust,ignore
//! let mut container = Container::new(AppContext::new().with_value("app.version", "1.0.0"));
//! container
//!     .apply(ConfigBundle::new(MapConfig::from_env()))?
//!     .apply(LoggingBundle)?
//!     .apply(OtelBundle::new())?;
//! let tracing = container.get::<Tracing>()?;
//! ```

pub mod container;
pub mod context;

pub use container::{Bundle, Container, ContainerError};
pub use context::AppContext;
