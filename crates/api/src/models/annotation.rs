use super::class::{AnnotationInfo, ClassHandle};
use serde::{Deserialize, Serialize};

pub const ANNOTATION_PACKAGE: &str = "org.robolectric.annotation";

/// Marks a shadow class and names the framework class it stands in for.
pub const IMPLEMENTS: &str = "org.robolectric.annotation.Implements";

/// Marks a shadow method that replaces a framework method.
pub const IMPLEMENTATION: &str = "org.robolectric.annotation.Implementation";

pub const REAL_OBJECT: &str = "org.robolectric.annotation.RealObject";

pub const RESETTER: &str = "org.robolectric.annotation.Resetter";

/// Annotations a model may resolve through a wildcard import even when the
/// annotation type itself is not part of the model.
pub const WELL_KNOWN_ANNOTATIONS: &[&str] = &[IMPLEMENTS, IMPLEMENTATION, REAL_OBJECT, RESETTER];

/// One hit of an annotation search: the annotated class and the annotation as
/// it appears on that class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSite {
    pub owner: ClassHandle,
    pub annotation: AnnotationInfo,
}
