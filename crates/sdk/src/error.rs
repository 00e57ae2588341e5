use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Java(#[from] shadowscope_java::JavaError),
    #[error("No SDK known for API level {0}")]
    UnknownApiLevel(u32),
    #[error("Source archive not found: {0}")]
    MissingArchive(PathBuf),
}

pub type Result<T> = std::result::Result<T, SdkError>;
