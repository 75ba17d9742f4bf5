use std::sync::Arc;

use crate::{
    any::{TypeInfo, Value},
    dependency_resolver::DependencyResolver,
    instantiator::{Constructor, Instantiator, Signature},
};

/// Registration item: a pre-built value or a constructor, keyed by the type it provides.
pub struct Entry {
    pub(crate) type_info: TypeInfo,
    pub(crate) kind: EntryKind,
}

pub(crate) enum EntryKind {
    Value(Value),
    Constructor(Arc<Constructor>),
}

impl Entry {
    /// Pre-realized value keyed by its own type.
    #[inline]
    #[must_use]
    pub fn value<T>(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            kind: EntryKind::Value(Arc::new(value)),
        }
    }

    /// Constructor keyed by the type it produces.
    /// It runs at most once per container, when its type is first needed.
    #[inline]
    #[must_use]
    pub fn constructor<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps>,
        Deps: DependencyResolver,
    {
        let constructor = Constructor::new(instantiator);
        Self {
            type_info: constructor.signature.provides,
            kind: EntryKind::Constructor(Arc::new(constructor)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn signature(&self) -> Option<&Signature> {
        match &self.kind {
            EntryKind::Value(_) => None,
            EntryKind::Constructor(constructor) => Some(&constructor.signature),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match &self.kind {
            EntryKind::Value(_) => format!("{} value", self.type_info),
            EntryKind::Constructor(constructor) => format!("constructor {}", constructor.signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::Entry;
    use crate::any::TypeInfo;

    #[test]
    fn test_describe() {
        let value = Entry::value(String::from("hello"));
        assert_eq!(value.type_info(), TypeInfo::of::<String>());
        assert!(value.signature().is_none());
        assert_eq!(value.describe(), "String value");

        let constructor = Entry::constructor(|number: i32| Ok::<_, Infallible>(i64::from(number)));
        assert_eq!(constructor.type_info(), TypeInfo::of::<i64>());
        assert_eq!(constructor.describe(), "constructor fn(i32) -> i64");
    }

    #[test]
    fn test_entries_macro() {
        let entries = entries![value(1_u8), provide(|number: u8| Ok::<_, Infallible>(u16::from(number)))];

        assert_eq!(
            entries.iter().map(Entry::type_info).collect::<Vec<_>>(),
            [TypeInfo::of::<u8>(), TypeInfo::of::<u16>()]
        );
    }
}
