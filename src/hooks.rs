use core::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::inject::FieldInfo;

pub type NoValueForField = dyn Fn(&str, &FieldInfo) -> anyhow::Result<()> + Send + Sync;

/// Callbacks consulted while injecting.
///
/// Inherited by clones and scopes, replaceable per container with
/// [`Container::set_hooks`](crate::Container::set_hooks).
#[derive(Clone, Default)]
pub struct Hooks {
    /// Called once for every target field whose injection type has no constructor or value,
    /// with the target name and the field. Returning an error fails the injection.
    /// Without it such fields are left untouched.
    pub no_value_for_field: Option<Arc<NoValueForField>>,
}

impl Hooks {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_no_value_for_field<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &FieldInfo) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.no_value_for_field = Some(Arc::new(hook));
        self
    }

    pub(crate) fn no_value_for_field(&self, target: &str, field: &FieldInfo) -> anyhow::Result<()> {
        match &self.no_value_for_field {
            Some(hook) => hook(target, field),
            None => Ok(()),
        }
    }
}

impl Debug for Hooks {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("no_value_for_field", &self.no_value_for_field.is_some())
            .finish()
    }
}
