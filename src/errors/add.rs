use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum AddErrorKind {
    #[error("adding {entry} failed: injection type {type_info} already registered (scope {scope})")]
    AlreadyRegistered {
        /// Description of the rejected entry, e.g. `constructor fn() -> i32` or `String value`
        entry: String,
        type_info: TypeInfo,
        /// Name of the scope already holding the injection type
        scope: String,
    },
}
