use crate::{
    any::{TypeInfo, Value},
    errors::InstantiateErrorKind,
};

/// Tuple of constructor inputs.
///
/// Lists the injection types of its elements in declared order and rebuilds itself
/// from the realized values of those types.
pub trait DependencyResolver: Sized + Send + 'static {
    fn type_infos() -> Box<[TypeInfo]>;

    /// # Errors
    /// Returns [`InstantiateErrorKind::IncorrectType`] if a value is missing or holds another type.
    fn resolve(values: &[Value]) -> Result<Self, InstantiateErrorKind>;
}

#[inline]
fn downcast<T: Clone + 'static>(value: Option<&Value>) -> Result<T, InstantiateErrorKind> {
    value
        .and_then(|value| value.downcast_ref::<T>())
        .cloned()
        .ok_or(InstantiateErrorKind::IncorrectType {
            expected: TypeInfo::of::<T>(),
        })
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: Clone + Send + Sync + 'static, )*
        {
            #[inline]
            fn type_infos() -> Box<[TypeInfo]> {
                vec![$(TypeInfo::of::<$ty>(),)*].into_boxed_slice()
            }

            #[inline]
            #[allow(unused_variables)]
            fn resolve(values: &[Value]) -> Result<Self, InstantiateErrorKind> {
                let mut values = values.iter();
                Ok(($(downcast::<$ty>(values.next())?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);
