use core::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};
use std::sync::Arc;

/// Injection key: the identity of a type together with its canonical name.
///
/// Keys compare equal by [`TypeId`] and are ordered by the canonical name first,
/// so iteration over a keyed map is the same on every run.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then_with(|| self.id.cmp(&other.id))
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Name with every module path stripped, generic arguments included.
    #[must_use]
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

pub(crate) fn short_type_name(name: &str) -> String {
    let mut short = String::with_capacity(name.len());
    let mut segment_start = 0;
    let mut chars = name.chars().peekable();

    while let Some(char) = chars.next() {
        match char {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                short.truncate(segment_start);
            }
            char if char.is_alphanumeric() || matches!(char, '_' | '{' | '}') => short.push(char),
            char => {
                short.push(char);
                segment_start = short.len();
            }
        }
    }

    short
}

pub(crate) type Value = Arc<dyn Any + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::{short_type_name, TypeInfo};

    use std::{collections::BTreeSet, sync::Arc};

    struct Buffer;

    #[test]
    fn test_short_name() {
        assert_eq!(TypeInfo::of::<i32>().to_string(), "i32");
        assert_eq!(TypeInfo::of::<String>().to_string(), "String");
        assert_eq!(TypeInfo::of::<Arc<Buffer>>().to_string(), "Arc<Buffer>");
        assert_eq!(TypeInfo::of::<(u8, Vec<String>)>().to_string(), "(u8, Vec<String>)");
        assert_eq!(short_type_name("a::b::C<d::E, [f::G; 2]>"), "C<E, [G; 2]>");
        assert_eq!(short_type_name("&dyn core::any::Any"), "&dyn Any");
    }

    #[test]
    fn test_short_name_of_local_type() {
        #[derive(Clone)]
        struct Local;

        assert_eq!(short_type_name("app::main::{{closure}}::Local"), "Local");
        assert_eq!(short_type_name("a::f::{{closure}}::A<b::g::{{closure}}::B>"), "A<B>");
        assert_eq!(TypeInfo::of::<Local>().to_string(), "Local");
        assert_eq!(TypeInfo::of::<Arc<Local>>().to_string(), "Arc<Local>");
    }

    #[test]
    fn test_order_by_name() {
        let keys = [TypeInfo::of::<u8>(), TypeInfo::of::<String>(), TypeInfo::of::<i32>()]
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|type_info| type_info.name)
            .collect::<Vec<_>>();

        assert_eq!(keys, ["alloc::string::String", "i32", "u8"]);
    }
}
