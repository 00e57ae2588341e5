use shadowscope_api::{AnnotationInfo, ClassHandle, MethodTarget, Range};
use serde::Serialize;

/// An element the editor asks about, before any navigation semantics apply.
#[derive(Debug, Clone)]
pub enum SourceElement {
    Method(MethodTarget),
    Field { class: ClassHandle, name: String },
    Annotation(AnnotationInfo),
    Class(ClassHandle),
}

/// A navigation query, classified once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodQuery {
    /// From a shadow method to the framework methods it replaces.
    ShadowMethod(MethodTarget),
    /// From a framework method to the shadow methods replacing it.
    FrameworkMethod(MethodTarget),
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerDirection {
    ToFramework,
    ToShadows,
}

/// A gutter marker: clicking it navigates from `target` in `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMarker {
    pub target: MethodTarget,
    pub direction: MarkerDirection,
    pub range: Option<Range>,
}
