use core::any::type_name;

use crate::any::{short_type_name, TypeInfo, Value};

/// A structure whose fields are filled from a container.
///
/// Usually derived with `#[derive(Injectable)]`, which lists every field in declaration order.
///
/// # Examples
/// ```rust
/// use psyringe::{Field, Injectable};
///
/// struct Handler {
///     name: String,
///     retries: u8,
/// }
///
/// impl Injectable for Handler {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![Field::new("name", &mut self.name), Field::new("retries", &mut self.retries)]
///     }
/// }
/// ```
pub trait Injectable: Send {
    /// Injection points in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Name used in errors and passed to hooks.
    #[must_use]
    fn target_name(&self) -> String {
        short_type_name(type_name::<Self>())
    }
}

/// Name and injection type of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub type_info: TypeInfo,
}

/// A mutable injection point of a target.
pub struct Field<'a> {
    info: FieldInfo,
    slot: &'a mut dyn Slot,
}

impl<'a> Field<'a> {
    #[inline]
    #[must_use]
    pub fn new<T>(name: &'static str, slot: &'a mut T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self {
            info: FieldInfo {
                name,
                type_info: TypeInfo::of::<T>(),
            },
            slot,
        }
    }

    #[inline]
    #[must_use]
    pub const fn info(&self) -> &FieldInfo {
        &self.info
    }

    /// Returns `false` if the value holds another type, leaving the field untouched.
    pub(crate) fn assign(&mut self, value: &Value) -> bool {
        self.slot.assign(value)
    }
}

trait Slot: Send {
    fn assign(&mut self, value: &Value) -> bool;
}

impl<T> Slot for T
where
    T: Clone + Send + Sync + 'static,
{
    fn assign(&mut self, value: &Value) -> bool {
        match value.downcast_ref::<T>() {
            Some(value) => {
                *self = value.clone();
                true
            }
            None => false,
        }
    }
}
