mod add;
mod inject;
mod instantiator;
mod resolve;
mod scope;
mod validate;

pub use add::AddErrorKind;
pub use inject::InjectErrorKind;
pub use instantiator::{InstantiateErrorKind, InstantiatorErrorKind};
pub use resolve::ResolveErrorKind;
pub use scope::ScopeErrorKind;
pub use validate::ValidateErrorKind;
