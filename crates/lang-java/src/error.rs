use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JavaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load Java grammar: {0}")]
    Language(String),
    #[error("Failed to parse {0}")]
    Parse(PathBuf),
}

pub type Result<T> = std::result::Result<T, JavaError>;
