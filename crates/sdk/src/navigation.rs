use shadowscope_api::{ClassModel, MethodInfo, MethodTarget};

/// The source counterpart of a compiled framework method: same declaring
/// class, same name, same parameters. Constructors match constructors.
pub fn navigation_target(
    model: &dyn ClassModel,
    class_fqn: &str,
    method: &MethodInfo,
) -> Option<MethodTarget> {
    let class = model.find_class(class_fqn)?;
    let found = class.methods.iter().find(|candidate| {
        candidate.is_constructor == method.is_constructor
            && (method.is_constructor || candidate.name == method.name)
            && candidate.signature == method.signature
    })?;
    Some(class.target(found))
}
