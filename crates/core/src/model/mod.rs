pub mod layered;
pub mod shadow;

pub use layered::LayeredClassModel;
pub use shadow::{FrameworkRef, ShadowAnnotation, ShadowAnnotations, resolve_framework};
