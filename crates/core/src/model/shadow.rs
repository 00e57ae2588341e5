use crate::config::ShadowscopeConfig;
use shadowscope_api::{
    AnnotationInfo, AnnotationSite, ClassHandle, ClassInfo, ClassModel, IMPLEMENTATION,
    IMPLEMENTS, TypeReference,
};

/// The annotation names that drive shadow detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowAnnotations {
    pub implements: String,
    pub implementation: String,
}

impl Default for ShadowAnnotations {
    fn default() -> Self {
        Self {
            implements: IMPLEMENTS.to_string(),
            implementation: IMPLEMENTATION.to_string(),
        }
    }
}

impl From<&ShadowscopeConfig> for ShadowAnnotations {
    fn from(config: &ShadowscopeConfig) -> Self {
        Self {
            implements: config.implements_annotation.clone(),
            implementation: config.implementation_annotation.clone(),
        }
    }
}

/// How a shadow class names its framework class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameworkRef {
    /// `@Implements(Foo.class)`
    Type(TypeReference),
    /// `@Implements(className = "a.b.Foo")`, used for classes that are not
    /// visible to the shadow at compile time.
    Name(String),
}

/// One occurrence of the Implements annotation on a shadow class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowAnnotation {
    pub shadow: ClassHandle,
    pub framework: FrameworkRef,
}

impl ShadowAnnotation {
    /// `None` when the annotation names no framework class at all.
    pub fn from_site(site: AnnotationSite) -> Option<Self> {
        Self::from_annotation(site.owner, site.annotation)
    }

    /// The shadow annotation carried by `class`, if any.
    pub fn of_class(class: &ClassInfo, annotations: &ShadowAnnotations) -> Option<Self> {
        let annotation = class.annotation(&annotations.implements)?;
        Self::from_annotation(class.handle.clone(), annotation.clone())
    }

    fn from_annotation(shadow: ClassHandle, annotation: AnnotationInfo) -> Option<Self> {
        let framework = match (annotation.class_value, annotation.class_name) {
            (Some(reference), _) => FrameworkRef::Type(reference),
            (None, Some(name)) if !name.trim().is_empty() => FrameworkRef::Name(name.trim().to_string()),
            _ => return None,
        };
        Some(Self { shadow, framework })
    }
}

/// Fully qualified name of the framework class `annotation` points at.
///
/// Fails (returns `None`) whenever the referenced class is not available in
/// `model`; such a declaration simply contributes nothing.
pub fn resolve_framework(model: &dyn ClassModel, annotation: &ShadowAnnotation) -> Option<String> {
    let candidate = match &annotation.framework {
        FrameworkRef::Type(reference) => model.qualify(reference, &|fqn| model.contains(fqn))?,
        FrameworkRef::Name(name) => normalize_binary_name(name),
    };
    model.contains(&candidate).then_some(candidate)
}

/// `a.b.Outer$Inner` is how nested classes appear in `className` strings.
fn normalize_binary_name(name: &str) -> String {
    name.replace('$', ".")
}
