//! Java source support: a tree-sitter based parser and an in-memory class
//! model over parsed files.

pub mod error;
pub mod model;
pub mod naming;
pub mod parser;
pub mod scanner;
pub mod workspace;

pub use error::{JavaError, Result};
pub use parser::JavaParser;
pub use workspace::{FileDelta, JavaWorkspace, LoadSummary};
