//! Shadow/framework resolution.
//!
//! Builds an index of which shadow classes stand in for which framework
//! classes and answers the two navigation queries: from a shadow method to
//! the framework methods it replaces, and from a framework method to the
//! shadow methods replacing it.

pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod query;
pub mod runtime;
pub mod util;

#[cfg(test)]
mod testing;

pub use config::ShadowscopeConfig;
pub use error::{Result, ShadowscopeError};
pub use index::{ShadowIndex, build_index};
pub use model::{FrameworkRef, LayeredClassModel, ShadowAnnotation, ShadowAnnotations};
pub use query::{LineMarker, MarkerDirection, MethodQuery, QueryEngine, SourceElement};
pub use runtime::ShadowResolver;
