use super::resolve::ResolveErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum InjectErrorKind {
    #[error("inject into {target} target failed: getting field {field} ({type_info}) failed: {source}")]
    Field {
        target: String,
        field: &'static str,
        type_info: TypeInfo,
        source: ResolveErrorKind,
    },
    /// Escalated by the `no_value_for_field` hook
    #[error("inject into {target} target failed: {error}")]
    NoValueForField {
        target: String,
        field: &'static str,
        error: anyhow::Error,
    },
}
