use std::sync::Arc;

use super::resolve::ResolveErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug, Clone)]
pub enum InstantiatorErrorKind {
    #[error("getting argument {position} failed: {source}")]
    Deps { position: usize, source: Arc<ResolveErrorKind> },
    #[error(transparent)]
    Factory(InstantiateErrorKind),
}

/// Failure of the constructor body itself.
#[derive(thiserror::Error, Debug, Clone)]
pub enum InstantiateErrorKind {
    #[error("{0}")]
    Custom(Arc<anyhow::Error>),
    #[error("constructor panicked: {0}")]
    Panicked(String),
    #[error("incorrect argument type, expected {expected}")]
    IncorrectType { expected: TypeInfo },
}

impl InstantiateErrorKind {
    #[must_use]
    pub fn custom(err: impl Into<anyhow::Error>) -> Self {
        Self::Custom(Arc::new(err.into()))
    }
}
