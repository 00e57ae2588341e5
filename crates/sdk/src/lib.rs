//! Versioned framework archives: which SDKs exist, where their archives are,
//! and a class model over the sources of the one in use.

pub mod archive;
pub mod catalog;
pub mod error;
pub mod finder;
pub mod navigation;

pub use archive::SourceArchive;
pub use catalog::{AndroidSdk, SdkCatalog};
pub use error::{Result, SdkError};
pub use finder::SdkClassFinder;
pub use navigation::navigation_target;
