use super::symbol::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name a shadow class gives to a method that stands in for a constructor of
/// the framework class.
pub const CONSTRUCTOR_SENTINEL: &str = "__constructor__";

/// Identity of a class as observed by one parse of its declaring file.
///
/// The `generation` is minted when the file is loaded. Reloading or removing
/// the file makes every handle with the old generation stale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassHandle {
    pub fqn: String,
    pub generation: u64,
}

impl ClassHandle {
    pub fn new(fqn: impl Into<String>, generation: u64) -> Self {
        Self {
            fqn: fqn.into(),
            generation,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.fqn.rsplit('.').next().unwrap_or(&self.fqn)
    }
}

impl fmt::Display for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqn)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// Ordered canonical parameter type names of a method.
///
/// Two signatures are equal iff the sequences are literally equal. There is no
/// erasure, boxing or varargs normalisation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct MethodSignature {
    pub parameters: Vec<String>,
}

impl MethodSignature {
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.parameters.join(","))
    }
}

/// Reference to a type as written in source, together with the class whose
/// lexical scope (package, imports, enclosing classes) gives it meaning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    pub name: String,
    pub from: ClassHandle,
}

/// One annotation occurrence on a class or method.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInfo {
    /// Fully qualified when the model could resolve it, as written otherwise.
    pub name: String,
    /// `value = Foo.class` (or the single positional argument).
    pub class_value: Option<TypeReference>,
    /// `className = "a.b.Foo"`.
    pub class_name: Option<String>,
}

impl AnnotationInfo {
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_value: None,
            class_name: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: String,
    pub signature: MethodSignature,
    pub is_constructor: bool,
    pub annotations: Vec<String>,
    pub location: Option<Location>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, signature: MethodSignature) -> Self {
        Self {
            name: name.into(),
            signature,
            is_constructor: false,
            annotations: Vec::new(),
            location: None,
        }
    }

    pub fn constructor(name: impl Into<String>, signature: MethodSignature) -> Self {
        Self {
            is_constructor: true,
            ..Self::new(name, signature)
        }
    }

    pub fn with_annotation(mut self, name: impl Into<String>) -> Self {
        self.annotations.push(name.into());
        self
    }

    pub fn has_annotation(&self, fqn: &str) -> bool {
        self.annotations.iter().any(|a| a == fqn)
    }
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub handle: ClassHandle,
    pub kind: ClassKind,
    pub annotations: Vec<AnnotationInfo>,
    pub methods: Vec<MethodInfo>,
    pub location: Option<Location>,
}

impl ClassInfo {
    pub fn new(handle: ClassHandle, kind: ClassKind) -> Self {
        Self {
            handle,
            kind,
            annotations: Vec::new(),
            methods: Vec::new(),
            location: None,
        }
    }

    pub fn fqn(&self) -> &str {
        &self.handle.fqn
    }

    pub fn name(&self) -> &str {
        self.handle.simple_name()
    }

    pub fn annotation(&self, fqn: &str) -> Option<&AnnotationInfo> {
        self.annotations.iter().find(|a| a.name == fqn)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodInfo> + 'a {
        self.methods
            .iter()
            .filter(move |m| !m.is_constructor && m.name == name)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodInfo> + '_ {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    pub fn target(&self, method: &MethodInfo) -> MethodTarget {
        MethodTarget {
            class: self.handle.clone(),
            method: method.clone(),
        }
    }
}

/// A method together with the class it was found in. One entry of a match
/// result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MethodTarget {
    pub class: ClassHandle,
    pub method: MethodInfo,
}

impl MethodTarget {
    pub fn new(class: ClassHandle, method: MethodInfo) -> Self {
        Self { class, method }
    }

    /// `a.b.Class#name(params)`
    pub fn display_name(&self) -> String {
        format!("{}#{}", self.class.fqn, self.method)
    }
}

impl fmt::Display for MethodTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
