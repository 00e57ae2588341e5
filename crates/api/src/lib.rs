//! Shared data model and collaborator contracts for Shadowscope.
//!
//! The resolver in `shadowscope-core` never talks to a parser or an archive
//! directly. It sees classes through [`ClassModel`] and finds annotated
//! classes through [`AnnotationSearch`]; everything it returns is expressed in
//! the types of [`models`].

pub mod error;
pub mod models;
pub mod search;

pub use error::{ApiError, ApiResult};
pub use models::*;
pub use search::{AnnotationSearch, ClassModel};
