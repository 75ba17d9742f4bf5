#[derive(thiserror::Error, Debug)]
pub enum ScopeErrorKind {
    #[error("scope {name:?} already defined")]
    AlreadyDefined { name: String },
}
