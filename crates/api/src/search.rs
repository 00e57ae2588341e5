use crate::models::{AnnotationSite, ClassHandle, ClassInfo, TypeReference};

/// Read access to a class model: lookup by name, revalidation of previously
/// obtained handles, and resolution of type references in their lexical scope.
pub trait ClassModel: Send + Sync {
    /// The class behind `handle`, or `None` once the handle went stale.
    fn class(&self, handle: &ClassHandle) -> Option<ClassInfo>;

    fn find_class(&self, fqn: &str) -> Option<ClassInfo>;

    /// Canonical fully qualified name of `reference`.
    ///
    /// `exists` answers whether a candidate name is a class known somewhere,
    /// possibly outside this model. Returns `None` when the model does not own
    /// the scope the reference was written in.
    fn qualify(&self, reference: &TypeReference, exists: &dyn Fn(&str) -> bool) -> Option<String>;

    fn is_valid(&self, handle: &ClassHandle) -> bool {
        self.class(handle).is_some()
    }

    fn contains(&self, fqn: &str) -> bool {
        self.find_class(fqn).is_some()
    }
}

/// Finds the classes annotated with a given annotation.
pub trait AnnotationSearch: Send + Sync {
    /// A lazy, finite sequence of annotation occurrences.
    fn references<'a>(
        &'a self,
        annotation_fqn: &'a str,
    ) -> Box<dyn Iterator<Item = AnnotationSite> + 'a>;
}
