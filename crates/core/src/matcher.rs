//! Decides whether two methods correspond for navigation purposes.

use shadowscope_api::{CONSTRUCTOR_SENTINEL, MethodInfo, MethodSignature};

/// True iff both methods take the same canonical parameter types in the same
/// order. Generics, varargs and boxing are compared literally.
pub fn same_parameters(a: &MethodSignature, b: &MethodSignature) -> bool {
    a.parameters == b.parameters
}

/// True iff `method` is a shadow of a framework constructor.
pub fn is_constructor_like(method: &MethodInfo) -> bool {
    method.name == CONSTRUCTOR_SENTINEL
}

/// Same name and same parameters.
pub fn same_signature(a: &MethodInfo, b: &MethodInfo) -> bool {
    a.name == b.name && same_parameters(&a.signature, &b.signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(params: &[&str]) -> MethodSignature {
        MethodSignature::new(params.iter().copied())
    }

    #[test]
    fn identical_sequences_match() {
        assert!(same_parameters(&sig(&["int", "java.lang.String"]), &sig(&["int", "java.lang.String"])));
        assert!(same_parameters(&sig(&[]), &sig(&[])));
    }

    #[test]
    fn order_and_length_matter() {
        assert!(!same_parameters(&sig(&["int", "long"]), &sig(&["long", "int"])));
        assert!(!same_parameters(&sig(&["int"]), &sig(&["int", "int"])));
        assert!(!same_parameters(&sig(&[]), &sig(&["int"])));
    }

    #[test]
    fn no_boxing_or_varargs_normalisation() {
        assert!(!same_parameters(&sig(&["int"]), &sig(&["java.lang.Integer"])));
        assert!(!same_parameters(&sig(&["int..."]), &sig(&["int[]"])));
        assert!(!same_parameters(&sig(&["java.util.List<java.lang.String>"]), &sig(&["java.util.List"])));
    }

    #[test]
    fn constructor_sentinel() {
        assert!(is_constructor_like(&MethodInfo::new("__constructor__", sig(&["int"]))));
        assert!(!is_constructor_like(&MethodInfo::new("constructor", sig(&[]))));
        // A real constructor is not a shadow constructor.
        assert!(!is_constructor_like(&MethodInfo::constructor("View", sig(&[]))));
    }

    #[test]
    fn signature_includes_name() {
        let a = MethodInfo::new("setAlpha", sig(&["float"]));
        let b = MethodInfo::new("setAlpha", sig(&["float"]));
        let c = MethodInfo::new("setBeta", sig(&["float"]));
        assert!(same_signature(&a, &b));
        assert!(!same_signature(&a, &c));
    }
}
