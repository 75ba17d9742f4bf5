//! Lazy, concurrent, type-keyed dependency injection.
//!
//! A [`Container`] maps types to pre-built values or constructors. Constructors run lazily,
//! at most once per container, with independent dependencies realized concurrently.
//! [`Container::inject`] fills the fields of an [`Injectable`] target and
//! [`Container::validate`] checks the dependency graph without constructing anything.
//!
//! ```rust
//! use core::convert::Infallible;
//! use psyringe::{entries, Container, Injectable};
//! use std::sync::Arc;
//!
//! struct Buffer;
//!
//! #[derive(Injectable, Default)]
//! struct Handler {
//!     number: i32,
//!     text: String,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = Container::with_entries(entries![
//!     provide(|| Ok::<_, Infallible>(2_i32)),
//!     provide(|| Ok::<_, Infallible>(Arc::new(Buffer))),
//!     provide(|number: i32, _: Arc<Buffer>| Ok::<_, Infallible>(format!("{number}"))),
//! ])?;
//! container.validate()?;
//!
//! let mut handler = Handler::default();
//! container.inject(&mut handler).await?;
//!
//! assert_eq!(handler.number, 2);
//! assert_eq!(handler.text, "2");
//! # Ok(())
//! # }
//! ```

extern crate self as psyringe;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dependency_resolver;
pub(crate) mod entry;
pub(crate) mod errors;
pub(crate) mod hooks;
pub(crate) mod inject;
pub(crate) mod instantiator;
pub(crate) mod node;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod service;
pub(crate) mod utils;
pub(crate) mod validator;

pub use any::TypeInfo;
pub use config::Config;
pub use container::Container;
pub use dependency_resolver::DependencyResolver;
pub use entry::Entry;
pub use errors::{
    AddErrorKind, InjectErrorKind, InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind, ScopeErrorKind, ValidateErrorKind,
};
pub use hooks::{Hooks, NoValueForField};
pub use inject::{Field, FieldInfo, Injectable};
pub use instantiator::{Instantiator, Signature};

#[cfg(feature = "macros")]
pub use psyringe_macros::Injectable;
