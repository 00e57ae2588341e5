//! Syntactic model of a Java source file, as extracted by the parser.
//!
//! Names here are exactly as written. Resolution against imports and other
//! classes happens in the workspace, when a class is looked up.

use serde::{Deserialize, Serialize};
use shadowscope_api::{ClassKind, Range};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JavaTypeRef {
    Raw(String),
    Generic {
        base: Box<JavaTypeRef>,
        args: Vec<JavaTypeRef>,
    },
    Array {
        element: Box<JavaTypeRef>,
        dimensions: usize,
    },
    /// `T...` in the last parameter position.
    Varargs(Box<JavaTypeRef>),
    Wildcard {
        bound: Option<Box<JavaTypeRef>>,
        is_upper_bound: bool,
    },
    Unknown,
}

impl JavaTypeRef {
    pub fn raw(name: impl Into<String>) -> Self {
        JavaTypeRef::Raw(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaImport {
    pub path: String,
    pub is_wildcard: bool,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaAnnotation {
    pub name: String,
    /// Type named by a class literal in `value`, generic arguments dropped.
    pub class_value: Option<String>,
    /// String given as `className`.
    pub class_name: Option<String>,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaParameter {
    pub name: String,
    pub type_ref: JavaTypeRef,
    pub is_varargs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaMethodDecl {
    pub name: String,
    pub parameters: Vec<JavaParameter>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<JavaAnnotation>,
    pub is_constructor: bool,
    pub name_range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaClassDecl {
    pub fqn: String,
    pub name: String,
    pub kind: ClassKind,
    pub annotations: Vec<JavaAnnotation>,
    pub type_parameters: Vec<String>,
    pub methods: Vec<JavaMethodDecl>,
    /// Enclosing classes, innermost first.
    pub enclosing: Vec<String>,
    pub range: Range,
    pub name_range: Range,
}

/// Everything the parser extracts from one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaFileModel {
    pub package: Option<String>,
    pub imports: Vec<JavaImport>,
    pub classes: Vec<JavaClassDecl>,
}

impl JavaFileModel {
    pub fn class(&self, fqn: &str) -> Option<&JavaClassDecl> {
        self.classes.iter().find(|c| c.fqn == fqn)
    }
}
