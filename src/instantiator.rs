use core::{
    fmt::{self, Display, Formatter},
    panic::AssertUnwindSafe,
};
use std::{any::Any, panic::catch_unwind, sync::Arc};
use tracing::debug;

use super::{
    any::{TypeInfo, Value},
    dependency_resolver::DependencyResolver,
    errors::InstantiateErrorKind,
    service::{service_fn, BoxCloneService, Service as _},
};

/// A constructor: a callable taking its inputs as a tuple and producing one value or an error.
///
/// Implemented for every `FnMut(T1, ..., Tn) -> Result<R, E>` function or closure
/// (up to twelve inputs) that is `Clone + Send + Sync + 'static`.
/// The produced type `R` is the injection type the constructor registers under,
/// and `T1..Tn` are the injection types it depends on, in declared order.
pub trait Instantiator<Deps>: Clone + Send + Sync + 'static
where
    Deps: DependencyResolver,
{
    type Provides: Clone + Send + Sync + 'static;
    type Error: Into<anyhow::Error>;

    fn instantiate(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;

    #[inline]
    #[must_use]
    fn signature() -> Signature
    where
        Self: Sized,
    {
        Signature {
            provides: TypeInfo::of::<Self::Provides>(),
            dependencies: Deps::type_infos(),
        }
    }
}

/// Injection type a constructor produces and the injection types it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub provides: TypeInfo,
    pub dependencies: Box<[TypeInfo]>,
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (index, dependency) in self.dependencies.iter().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dependency}")?;
        }
        write!(f, ") -> {}", self.provides)
    }
}

pub(crate) type BoxedCloneInstantiator = BoxCloneService<Vec<Value>, Value, InstantiateErrorKind>;

/// Classified constructor, shared by every container holding it.
pub(crate) struct Constructor {
    pub(crate) signature: Signature,
    instantiator: BoxedCloneInstantiator,
}

impl Constructor {
    #[must_use]
    pub(crate) fn new<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps>,
        Deps: DependencyResolver,
    {
        Self {
            signature: Inst::signature(),
            instantiator: boxed_instantiator_factory(instantiator),
        }
    }

    /// Invokes a fresh copy of the constructor with realized inputs in declared order.
    /// A panic is caught and reported as [`InstantiateErrorKind::Panicked`].
    pub(crate) fn invoke(&self, values: Vec<Value>) -> Result<Value, InstantiateErrorKind> {
        let mut instantiator = self.instantiator.clone();
        match catch_unwind(AssertUnwindSafe(move || instantiator.call(values))) {
            Ok(result) => result,
            Err(payload) => Err(InstantiateErrorKind::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}

#[must_use]
fn boxed_instantiator_factory<Inst, Deps>(instantiator: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator<Deps>,
    Deps: DependencyResolver,
{
    BoxCloneService(Box::new(service_fn({
        move |values: Vec<Value>| {
            let dependencies = Deps::resolve(&values)?;
            let dependency = match instantiator.clone().instantiate(dependencies) {
                Ok(dependency) => dependency,
                Err(err) => return Err(InstantiateErrorKind::custom(err)),
            };

            debug!("Instantiated");

            Ok(Arc::new(dependency) as Value)
        }
    })))
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Result<Response, Err> + Clone + Send + Sync + 'static,
            Response: Clone + Send + Sync + 'static,
            Err: Into<anyhow::Error>,
            $( $ty: Clone + Send + Sync + 'static, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);
