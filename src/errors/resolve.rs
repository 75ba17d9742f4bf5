use super::{instantiator::InstantiatorErrorKind, validate::ValidateErrorKind};
use crate::{any::TypeInfo, instantiator::Signature};

/// Error of resolving a single injection type.
///
/// Cloned to every caller waiting on the same realization.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ResolveErrorKind {
    #[error("no constructor or value for {type_info}")]
    NoEntry { type_info: TypeInfo },
    #[error("invoking {} constructor ({signature}) failed: {source}", .signature.provides)]
    Instantiator {
        signature: Signature,
        source: InstantiatorErrorKind,
    },
    #[error("realizing {type_info} failed: {source}")]
    Graph { type_info: TypeInfo, source: ValidateErrorKind },
    #[error("realization of {type_info} was interrupted")]
    Interrupted { type_info: TypeInfo },
    #[error("incorrect value type for {expected}")]
    IncorrectType { expected: TypeInfo },
}

impl ResolveErrorKind {
    /// Whether the injection type has no entry at all, as opposed to a failed realization.
    #[inline]
    #[must_use]
    pub const fn is_no_entry(&self) -> bool {
        matches!(self, Self::NoEntry { .. })
    }
}
