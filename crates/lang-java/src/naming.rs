//! Canonical type names, as a Java IDE prints them: fully qualified,
//! generic arguments joined by `,`, arrays as `[]` and varargs as `...`.

use crate::model::{JavaImport, JavaTypeRef};
use shadowscope_api::WELL_KNOWN_ANNOTATIONS;

pub const PRIMITIVES: &[&str] = &[
    "int", "long", "short", "byte", "float", "double", "boolean", "char", "void",
];

/// Types of `java.lang`, which every compilation unit imports implicitly.
pub const JAVA_LANG_CLASSES: &[&str] = &[
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassLoader",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "FunctionalInterface",
    "IllegalArgumentException",
    "IllegalStateException",
    "Integer",
    "Iterable",
    "Long",
    "Math",
    "Number",
    "Object",
    "Override",
    "Process",
    "Record",
    "Runnable",
    "RuntimeException",
    "SafeVarargs",
    "Short",
    "StackTraceElement",
    "String",
    "StringBuffer",
    "StringBuilder",
    "SuppressWarnings",
    "System",
    "Thread",
    "ThreadLocal",
    "Throwable",
    "Void",
];

/// Lexical scope a type name is written in.
pub struct TypeScope<'a> {
    pub package: Option<&'a str>,
    pub imports: &'a [JavaImport],
    /// The declaring class first, then its enclosing classes.
    pub classes: Vec<&'a str>,
    /// Type variables visible at the use site.
    pub type_parameters: Vec<&'a str>,
    pub exists: &'a dyn Fn(&str) -> bool,
}

impl<'a> TypeScope<'a> {
    pub fn canonical(&self, type_ref: &JavaTypeRef) -> String {
        match type_ref {
            JavaTypeRef::Raw(name) => self.resolve_type_name(name),
            JavaTypeRef::Generic { base, args } => {
                let args: Vec<String> = args.iter().map(|a| self.canonical(a)).collect();
                format!("{}<{}>", self.canonical(base), args.join(","))
            }
            JavaTypeRef::Array {
                element,
                dimensions,
            } => format!("{}{}", self.canonical(element), "[]".repeat(*dimensions)),
            JavaTypeRef::Varargs(element) => format!("{}...", self.canonical(element)),
            JavaTypeRef::Wildcard {
                bound: None, ..
            } => "?".to_string(),
            JavaTypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => format!(
                "? {} {}",
                if *is_upper_bound { "extends" } else { "super" },
                self.canonical(bound)
            ),
            JavaTypeRef::Unknown => "?".to_string(),
        }
    }

    /// Fully qualified name of a type written as `name`, or `name` itself
    /// when nothing in scope declares it.
    pub fn resolve_type_name(&self, name: &str) -> String {
        self.try_resolve(name, false).unwrap_or_else(|| name.to_string())
    }

    /// Like [`Self::resolve_type_name`], but wildcard imports of the
    /// well-known annotation package resolve even when the annotation types
    /// are not in the model.
    pub fn resolve_annotation_name(&self, name: &str) -> String {
        self.try_resolve(name, true).unwrap_or_else(|| name.to_string())
    }

    fn try_resolve(&self, name: &str, annotation: bool) -> Option<String> {
        // 1. Primitives and type variables
        if PRIMITIVES.contains(&name) || self.type_parameters.contains(&name) {
            return Some(name.to_string());
        }

        // 2. Dotted names: resolve the head as a simple name, else the
        //    name is already qualified.
        if let Some((head, rest)) = name.split_once('.') {
            return match self.try_resolve_simple(head, false) {
                Some(outer) if outer != head => Some(format!("{}.{}", outer, rest)),
                _ => Some(name.to_string()),
            };
        }

        self.try_resolve_simple(name, annotation)
    }

    fn try_resolve_simple(&self, name: &str, annotation: bool) -> Option<String> {
        let exists = self.exists;

        // 3. Member types of the declaring class and its outer classes
        for class in &self.classes {
            if class.rsplit('.').next() == Some(name) {
                return Some(class.to_string());
            }
            let candidate = format!("{}.{}", class, name);
            if exists(&candidate) {
                return Some(candidate);
            }
        }

        // 4. Single-type imports
        let suffix = format!(".{}", name);
        if let Some(import) = self
            .imports
            .iter()
            .find(|i| !i.is_wildcard && !i.is_static && i.path.ends_with(&suffix))
        {
            return Some(import.path.clone());
        }

        // 5. Current package
        let same_package = match self.package {
            Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg, name),
            _ => name.to_string(),
        };
        if exists(&same_package) {
            return Some(same_package);
        }

        // 6. On-demand imports
        for import in self.imports.iter().filter(|i| i.is_wildcard && !i.is_static) {
            let candidate = format!("{}.{}", import.path, name);
            if exists(&candidate) || (annotation && WELL_KNOWN_ANNOTATIONS.contains(&candidate.as_str())) {
                return Some(candidate);
            }
        }

        // 7. java.lang
        let java_lang = format!("java.lang.{}", name);
        if JAVA_LANG_CLASSES.contains(&name) || exists(&java_lang) {
            return Some(java_lang);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(path: &str, is_wildcard: bool) -> JavaImport {
        JavaImport {
            path: path.to_string(),
            is_wildcard,
            is_static: false,
        }
    }

    fn known(name: &str) -> bool {
        matches!(
            name,
            "com.app.Sibling" | "com.app.Host.Inner" | "java.util.Map" | "java.util.Map.Entry"
        )
    }

    fn with_scope<T>(f: impl FnOnce(&TypeScope<'_>) -> T) -> T {
        let imports = vec![
            import("android.view.View", false),
            import("java.util", true),
            import("org.robolectric.annotation", true),
        ];
        let scope = TypeScope {
            package: Some("com.app"),
            imports: &imports,
            classes: vec!["com.app.Host"],
            type_parameters: vec!["T"],
            exists: &known,
        };
        f(&scope)
    }

    #[test]
    fn simple_names_follow_java_scoping() {
        with_scope(|scope| {
            assert_eq!(scope.resolve_type_name("int"), "int");
            assert_eq!(scope.resolve_type_name("T"), "T");
            assert_eq!(scope.resolve_type_name("Host"), "com.app.Host");
            assert_eq!(scope.resolve_type_name("Inner"), "com.app.Host.Inner");
            assert_eq!(scope.resolve_type_name("View"), "android.view.View");
            assert_eq!(scope.resolve_type_name("Sibling"), "com.app.Sibling");
            assert_eq!(scope.resolve_type_name("Map"), "java.util.Map");
            assert_eq!(scope.resolve_type_name("String"), "java.lang.String");
            assert_eq!(scope.resolve_type_name("Nowhere"), "Nowhere");
        });
    }

    #[test]
    fn dotted_names_resolve_their_head() {
        with_scope(|scope| {
            assert_eq!(scope.resolve_type_name("Map.Entry"), "java.util.Map.Entry");
            assert_eq!(scope.resolve_type_name("android.os.Bundle"), "android.os.Bundle");
        });
    }

    #[test]
    fn well_known_annotations_resolve_through_wildcards() {
        with_scope(|scope| {
            assert_eq!(
                scope.resolve_annotation_name("Implements"),
                "org.robolectric.annotation.Implements"
            );
            assert_eq!(scope.resolve_type_name("Implements"), "Implements");
            assert_eq!(scope.resolve_annotation_name("Override"), "java.lang.Override");
        });
    }

    #[test]
    fn composite_types_are_printed_canonically() {
        with_scope(|scope| {
            let map = JavaTypeRef::Generic {
                base: Box::new(JavaTypeRef::raw("Map")),
                args: vec![
                    JavaTypeRef::raw("String"),
                    JavaTypeRef::Wildcard {
                        bound: Some(Box::new(JavaTypeRef::raw("View"))),
                        is_upper_bound: true,
                    },
                ],
            };
            assert_eq!(
                scope.canonical(&map),
                "java.util.Map<java.lang.String,? extends android.view.View>"
            );

            let grid = JavaTypeRef::Array {
                element: Box::new(JavaTypeRef::raw("int")),
                dimensions: 2,
            };
            assert_eq!(scope.canonical(&grid), "int[][]");

            let rest = JavaTypeRef::Varargs(Box::new(JavaTypeRef::raw("Object")));
            assert_eq!(scope.canonical(&rest), "java.lang.Object...");
        });
    }
}
