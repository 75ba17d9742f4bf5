use core::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument as _};

use crate::{
    any::TypeInfo,
    config::Config,
    entry::Entry,
    errors::{AddErrorKind, InjectErrorKind, ResolveErrorKind, ScopeErrorKind, ValidateErrorKind},
    hooks::Hooks,
    inject::Injectable,
    registry::Registry,
    resolver, validator,
};

/// Type-keyed container of values and lazily realized constructors.
///
/// Every constructor runs at most once per container, the first time its type is needed,
/// and independent constructors run concurrently on the Tokio runtime.
/// Resolving operations must be awaited inside a Tokio runtime.
///
/// Cloning a container yields an independent container with the same definitions:
/// constructors realized so far keep their value, every other constructor runs again in the clone.
pub struct Container {
    registry: Arc<Registry>,
    hooks: Hooks,
}

impl Container {
    /// Creates an empty container with the default config.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[inline]
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            registry: Arc::new(Registry::root(config)),
            hooks: Hooks::default(),
        }
    }

    /// Creates a container filled with `entries`.
    ///
    /// # Errors
    /// Returns [`AddErrorKind::AlreadyRegistered`] if two entries provide the same type.
    pub fn with_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self, AddErrorKind> {
        let container = Self::new();
        container.add(entries)?;
        Ok(container)
    }

    /// Registers a batch of entries, all or nothing.
    /// Registration stays possible after the container was used.
    /// Child scopes are not consulted: a child entry registered earlier keeps shadowing this one
    /// for lookups from the child.
    ///
    /// # Errors
    /// Returns [`AddErrorKind::AlreadyRegistered`] if a type is already provided by this container,
    /// one of its parent scopes, or an earlier entry of the batch. Nothing is registered then.
    pub fn add(&self, entries: impl IntoIterator<Item = Entry>) -> Result<(), AddErrorKind> {
        self.registry.register(entries.into_iter().collect())
    }

    /// Fills the fields of `target`.
    ///
    /// # Errors
    /// See [`Self::inject_all`].
    pub async fn inject<T>(&self, target: &mut T) -> Result<(), InjectErrorKind>
    where
        T: Injectable,
    {
        self.inject_all(&mut [target as &mut dyn Injectable]).await
    }

    /// Fills the fields of every target, resolving all fields of all targets concurrently.
    ///
    /// A field whose type has no constructor or value is left untouched, unless the
    /// `no_value_for_field` hook fails. Every resolution is awaited before returning,
    /// and the successfully resolved fields are assigned even if another field fails.
    ///
    /// # Errors
    /// Returns the first error in target order, then field declaration order:
    /// [`InjectErrorKind::Field`] if resolving a field failed, or
    /// [`InjectErrorKind::NoValueForField`] if the hook rejected a field without value.
    pub async fn inject_all(&self, targets: &mut [&mut dyn Injectable]) -> Result<(), InjectErrorKind> {
        let span = info_span!("inject", targets = targets.len(), scope = %self.registry.name);
        resolver::inject(&self.registry, &self.hooks, targets).instrument(span).await
    }

    /// Resolves the value of type `T`.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoEntry`] if nothing provides `T`
    /// - Returns [`ResolveErrorKind::Instantiator`] if the constructor of `T` or of one of its dependencies failed
    /// - Returns [`ResolveErrorKind::Graph`] if `T` depends on itself
    pub async fn get<T>(&self) -> Result<T, ResolveErrorKind>
    where
        T: Clone + Send + Sync + 'static,
    {
        let type_info = TypeInfo::of::<T>();
        let span = info_span!("get", injection_type = %type_info, scope = %self.registry.name);

        let value = resolver::get_value(self.registry.clone(), type_info).instrument(span).await?;
        match value.downcast_ref::<T>() {
            Some(value) => Ok(value.clone()),
            None => {
                let err = ResolveErrorKind::IncorrectType { expected: type_info };
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Checks that every constructor input can be satisfied and that no type depends on itself.
    /// Nothing is constructed.
    ///
    /// The result does not depend on registration order: constructors are checked in type order,
    /// inputs in declared order, and missing inputs are reported before cycles.
    ///
    /// # Errors
    /// - Returns [`ValidateErrorKind::Missing`] for the first input without constructor or value
    /// - Returns [`ValidateErrorKind::Cycle`] for the first dependency cycle
    pub fn validate(&self) -> Result<(), ValidateErrorKind> {
        let result = validator::validate(&self.registry);
        match &result {
            Ok(()) => debug!(scope = %self.registry.name, "Validated"),
            Err(err) => error!("{}", err),
        }
        result
    }

    /// Creates a child container named `name`.
    ///
    /// The child resolves the types it doesn't provide from this container, sharing its realized values.
    /// Constructors of this container never see the child's entries.
    /// Config and hooks are inherited.
    ///
    /// # Errors
    /// Returns [`ScopeErrorKind::AlreadyDefined`] if `name` is already used by this container or one of its parents.
    pub fn scope(&self, name: impl Into<String>) -> Result<Self, ScopeErrorKind> {
        let name = name.into();
        if self.registry.layers().any(|registry| registry.name == name) {
            let err = ScopeErrorKind::AlreadyDefined { name };
            error!("{}", err);
            return Err(err);
        }

        debug!(scope = %name, parent = %self.registry.name, "Scope created");

        Ok(Self {
            registry: Arc::new(Registry::child(self.registry.clone(), name)),
            hooks: self.hooks.clone(),
        })
    }

    #[inline]
    #[must_use]
    pub fn scope_name(&self) -> &str {
        &self.registry.name
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> Config {
        self.registry.config
    }

    #[inline]
    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    #[inline]
    pub fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("scope", &self.registry.name)
            .field("config", &self.registry.config)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::new(self.registry.fork()),
            hooks: self.hooks.clone(),
        }
    }
}
