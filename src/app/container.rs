use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::app::context::AppContext;

/// A named unit of wiring applied to a [`Container`].
pub trait Bundle {
    fn name(&self) -> &'static str;

    /// Bundles that must be applied before this one.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    fn build(&self, container: &mut Container) -> Result<(), ContainerError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("Bundle '{0}' applied twice")]
    DuplicateBundle(String),
    #[error("Bundle '{bundle}' depends on '{dependency}', which has not been applied")]
    MissingDependency { bundle: String, dependency: String },
    #[error("Component of type '{0}' is not registered")]
    MissingComponent(&'static str),
}

/// Application-scoped registry of components keyed by type.
///
/// Components are written while bundles are applied at startup and only
/// read afterwards.
#[derive(Default)]
pub struct Container {
    context: AppContext,
    components: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    bundles: Vec<&'static str>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("context", &self.context)
            .field("component_count", &self.components.len())
            .field("bundles", &self.bundles)
            .finish()
    }
}

impl Container {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Register `value`, replacing any earlier component of the same type.
    pub fn provide<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.components.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn get<T: Clone + 'static>(&self) -> Result<T, ContainerError> {
        self.try_get::<T>()
            .ok_or(ContainerError::MissingComponent(type_name::<T>()))
    }

    pub fn try_get<T: Clone + 'static>(&self) -> Option<T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .cloned()
    }

    /// Apply `bundle` after checking its name and dependencies.
    pub fn apply<B: Bundle>(&mut self, bundle: B) -> Result<&mut Self, ContainerError> {
        let name = bundle.name();
        if self.has_bundle(name) {
            return Err(ContainerError::DuplicateBundle(name.to_string()));
        }
        if let Some(missing) = bundle
            .depends_on()
            .iter()
            .find(|dependency| !self.has_bundle(dependency))
        {
            return Err(ContainerError::MissingDependency {
                bundle: name.to_string(),
                dependency: missing.to_string(),
            });
        }

        bundle.build(self)?;
        self.bundles.push(name);
        debug!(bundle = name, "bundle applied");
        Ok(self)
    }

    pub fn has_bundle(&self, name: &str) -> bool {
        self.bundles.iter().any(|b| *b == name)
    }

    /// Names of applied bundles, in application order.
    pub fn bundles(&self) -> &[&'static str] {
        &self.bundles
    }
}
