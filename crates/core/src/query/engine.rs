use crate::index::ShadowIndex;
use crate::matcher::{is_constructor_like, same_parameters, same_signature};
use crate::model::{ShadowAnnotation, ShadowAnnotations, resolve_framework};
use shadowscope_api::{ClassInfo, ClassModel, MethodInfo, MethodSignature, MethodTarget};

/// Answers shadow/framework navigation queries against one index snapshot.
///
/// Queries never fail: "nothing to navigate to" is an empty result.
pub struct QueryEngine<'a> {
    model: &'a dyn ClassModel,
    index: &'a ShadowIndex,
    annotations: &'a ShadowAnnotations,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        model: &'a dyn ClassModel,
        index: &'a ShadowIndex,
        annotations: &'a ShadowAnnotations,
    ) -> Self {
        Self {
            model,
            index,
            annotations,
        }
    }

    pub fn model(&self) -> &'a dyn ClassModel {
        self.model
    }

    pub fn index(&self) -> &'a ShadowIndex {
        self.index
    }

    /// The framework class shadowed by the class declaring `method`.
    pub fn framework_class(&self, method: &MethodTarget) -> Option<ClassInfo> {
        let shadow_class = self.model.class(&method.class)?;
        let annotation = ShadowAnnotation::of_class(&shadow_class, self.annotations)?;
        let framework_fqn = resolve_framework(self.model, &annotation)?;
        self.model.find_class(&framework_fqn)
    }

    /// Whether `method` is a shadow method: declared in a shadow class and
    /// either a constructor shadow or marked as an implementation.
    pub fn is_shadow(&self, method: &MethodTarget) -> bool {
        let Some(class) = self.model.class(&method.class) else {
            return false;
        };
        class.annotation(&self.annotations.implements).is_some()
            && (is_constructor_like(&method.method)
                || method.method.has_annotation(&self.annotations.implementation))
    }

    /// Framework methods corresponding to the shadow method `method`.
    ///
    /// Constructor shadows match framework constructors by parameters, falling
    /// back to every constructor. Other methods match by exact signature,
    /// falling back to every overload with the same name.
    pub fn framework(&self, method: &MethodTarget) -> Vec<MethodTarget> {
        let Some(framework) = self.framework_class(method) else {
            return Vec::new();
        };
        let wanted = &method.method;

        if is_constructor_like(wanted) {
            let constructors: Vec<&MethodInfo> = framework.constructors().collect();
            let matching: Vec<&MethodInfo> = constructors
                .iter()
                .copied()
                .filter(|c| same_parameters(&c.signature, &wanted.signature))
                .collect();
            let chosen = if matching.is_empty() {
                constructors
            } else {
                matching
            };
            return targets(&framework, chosen);
        }

        if let Some(exact) = framework
            .methods_named(&wanted.name)
            .find(|m| same_parameters(&m.signature, &wanted.signature))
        {
            return vec![framework.target(exact)];
        }

        targets(&framework, framework.methods_named(&wanted.name))
    }

    /// Shadow methods, across every shadow class of the declaring class, that
    /// stand in for the framework method `method`.
    ///
    /// Non-constructors require an exact signature match. A framework
    /// constructor matches shadow constructors with the same parameters; when
    /// a shadow class has none, its shadow constructors that correspond to no
    /// framework constructor at all are offered instead.
    pub fn shadows(&self, method: &MethodTarget) -> Vec<MethodTarget> {
        let framework_fqn = &method.class.fqn;
        if !self.index.is_shadowed(framework_fqn) {
            return Vec::new();
        }
        let wanted = &method.method;
        let framework_constructors = if wanted.is_constructor {
            self.framework_constructor_signatures(method)
        } else {
            Vec::new()
        };

        let mut result = Vec::new();
        for handle in self.index.shadows_for(framework_fqn) {
            let Some(shadow) = self.model.class(handle) else {
                tracing::trace!("Skipping stale shadow class {}", handle);
                continue;
            };

            if wanted.is_constructor {
                let constructors: Vec<&MethodInfo> =
                    shadow.methods.iter().filter(|m| is_constructor_like(m)).collect();
                let matching: Vec<&MethodInfo> = constructors
                    .iter()
                    .copied()
                    .filter(|c| same_parameters(&c.signature, &wanted.signature))
                    .collect();
                let chosen: Vec<&MethodInfo> = if matching.is_empty() {
                    constructors
                        .into_iter()
                        .filter(|c| {
                            !framework_constructors
                                .iter()
                                .any(|sig| same_parameters(sig, &c.signature))
                        })
                        .collect()
                } else {
                    matching
                };
                result.extend(targets(&shadow, chosen));
            } else {
                result.extend(targets(
                    &shadow,
                    shadow
                        .methods
                        .iter()
                        .filter(|m| !m.is_constructor && same_signature(m, wanted)),
                ));
            }
        }
        dedup_targets(result)
    }

    /// Whether any shadow method stands in for the framework method `method`.
    pub fn is_shadowed(&self, method: &MethodTarget) -> bool {
        !self.shadows(method).is_empty()
    }

    fn framework_constructor_signatures(&self, method: &MethodTarget) -> Vec<MethodSignature> {
        self.model
            .class(&method.class)
            .or_else(|| self.model.find_class(&method.class.fqn))
            .map(|class| class.constructors().map(|c| c.signature.clone()).collect())
            .unwrap_or_default()
    }
}

fn targets<'m>(
    class: &ClassInfo,
    methods: impl IntoIterator<Item = &'m MethodInfo>,
) -> Vec<MethodTarget> {
    methods.into_iter().map(|m| class.target(m)).collect()
}

/// Keeps the first occurrence of each (class, name, signature).
fn dedup_targets(targets: Vec<MethodTarget>) -> Vec<MethodTarget> {
    let mut seen = indexmap::IndexSet::new();
    targets
        .into_iter()
        .filter(|t| {
            seen.insert((
                t.class.clone(),
                t.method.name.clone(),
                t.method.signature.clone(),
                t.method.is_constructor,
            ))
        })
        .collect()
}

/// Orders targets the way a chooser list presents them: by class, then
/// method name, then parameters.
pub fn sort_for_presentation(targets: &mut [MethodTarget]) {
    targets.sort_by(|a, b| {
        a.class
            .fqn
            .cmp(&b.class.fqn)
            .then_with(|| a.method.name.cmp(&b.method.name))
            .then_with(|| a.method.signature.cmp(&b.method.signature))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use crate::model::ShadowAnnotation;
    use crate::testing::{FakeModel, ctor, implementation, method};
    use shadowscope_api::{AnnotationSearch, ClassHandle, ClassKind, IMPLEMENTS};

    struct Fixture {
        model: FakeModel,
        annotations: ShadowAnnotations,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                model: FakeModel::new(),
                annotations: ShadowAnnotations::default(),
            }
        }

        fn index(&self) -> ShadowIndex {
            let declarations = self
                .model
                .references(IMPLEMENTS)
                .filter_map(ShadowAnnotation::from_site);
            build_index(declarations, &self.model, 0)
        }

        fn target(&self, handle: &ClassHandle, name: &str, params: &[&str]) -> MethodTarget {
            let class = self.model.class(handle).unwrap();
            let m = class
                .methods
                .iter()
                .find(|m| {
                    m.name == name
                        && m.signature.parameters.iter().map(String::as_str).eq(params.iter().copied())
                })
                .unwrap();
            class.target(m)
        }
    }

    fn names(targets: &[MethodTarget]) -> Vec<String> {
        targets.iter().map(MethodTarget::display_name).collect()
    }

    #[test]
    fn constructor_shadow_matches_constructor_by_parameters() {
        let fx = Fixture::new();
        let f = fx.model.add(
            "android.widget.F",
            ClassKind::Class,
            vec![ctor("F", &["int"]), ctor("F", &["java.lang.String"])],
        );
        let s = fx.model.add_shadow(
            "org.shadows.S",
            "android.widget.F",
            vec![method("__constructor__", &["int"])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let framework = engine.framework(&fx.target(&s, "__constructor__", &["int"]));
        assert_eq!(names(&framework), vec!["android.widget.F#F(int)"]);

        let shadows = engine.shadows(&fx.target(&f, "F", &["int"]));
        assert_eq!(names(&shadows), vec!["org.shadows.S#__constructor__(int)"]);

        let shadows = engine.shadows(&fx.target(&f, "F", &["java.lang.String"]));
        assert!(shadows.is_empty());
    }

    #[test]
    fn constructor_shadow_falls_back_to_every_constructor() {
        let fx = Fixture::new();
        fx.model.add(
            "android.widget.F",
            ClassKind::Class,
            vec![ctor("F", &["int"]), ctor("F", &["long"])],
        );
        let s = fx.model.add_shadow(
            "org.shadows.S",
            "android.widget.F",
            vec![method("__constructor__", &["java.lang.Object"])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let framework = engine.framework(&fx.target(&s, "__constructor__", &["java.lang.Object"]));
        assert_eq!(
            names(&framework),
            vec!["android.widget.F#F(int)", "android.widget.F#F(long)"]
        );
    }

    #[test]
    fn unmatched_shadow_constructors_are_offered_for_any_constructor() {
        let fx = Fixture::new();
        let f = fx.model.add(
            "android.widget.F",
            ClassKind::Class,
            vec![ctor("F", &["int"]), ctor("F", &["long"])],
        );
        fx.model.add_shadow(
            "org.shadows.S",
            "android.widget.F",
            vec![method("__constructor__", &["java.lang.Object"])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let shadows = engine.shadows(&fx.target(&f, "F", &["long"]));
        assert_eq!(
            names(&shadows),
            vec!["org.shadows.S#__constructor__(java.lang.Object)"]
        );
    }

    #[test]
    fn exact_signature_wins() {
        let fx = Fixture::new();
        fx.model.add(
            "android.view.View",
            ClassKind::Class,
            vec![method("setAlpha", &["float"]), method("setAlpha", &["int"])],
        );
        let s = fx.model.add_shadow(
            "org.shadows.ShadowView",
            "android.view.View",
            vec![implementation("setAlpha", &["float"])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let framework = engine.framework(&fx.target(&s, "setAlpha", &["float"]));
        assert_eq!(names(&framework), vec!["android.view.View#setAlpha(float)"]);
    }

    #[test]
    fn name_only_fallback_lists_every_overload() {
        let fx = Fixture::new();
        fx.model.add(
            "android.app.F",
            ClassKind::Class,
            vec![
                method("foo", &["int", "int"]),
                method("bar", &["int"]),
                method("foo", &["java.lang.String"]),
            ],
        );
        let s = fx.model.add_shadow(
            "org.shadows.S",
            "android.app.F",
            vec![implementation("foo", &["int"])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let framework = engine.framework(&fx.target(&s, "foo", &["int"]));
        assert_eq!(
            names(&framework),
            vec!["android.app.F#foo(int,int)", "android.app.F#foo(java.lang.String)"]
        );
    }

    #[test]
    fn shadows_require_an_exact_signature() {
        let fx = Fixture::new();
        let f = fx.model.add(
            "android.app.F",
            ClassKind::Class,
            vec![method("foo", &["int", "int"])],
        );
        fx.model.add_shadow(
            "org.shadows.S",
            "android.app.F",
            vec![implementation("foo", &["int"])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        assert!(engine.shadows(&fx.target(&f, "foo", &["int", "int"])).is_empty());
    }

    #[test]
    fn shadows_are_collected_across_shadow_classes_in_index_order() {
        let fx = Fixture::new();
        let f = fx.model.add(
            "android.view.View",
            ClassKind::Class,
            vec![method("invalidate", &[])],
        );
        fx.model.add_shadow(
            "org.shadows.ShadowView",
            "android.view.View",
            vec![implementation("invalidate", &[])],
        );
        fx.model.add_shadow(
            "com.app.AppShadowView",
            "android.view.View",
            vec![implementation("invalidate", &[]), implementation("other", &[])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let shadows = engine.shadows(&fx.target(&f, "invalidate", &[]));
        assert_eq!(
            names(&shadows),
            vec![
                "org.shadows.ShadowView#invalidate()",
                "com.app.AppShadowView#invalidate()"
            ]
        );
        assert!(engine.is_shadowed(&fx.target(&f, "invalidate", &[])));
    }

    #[test]
    fn stale_shadow_classes_are_skipped() {
        let fx = Fixture::new();
        let f = fx.model.add(
            "android.view.View",
            ClassKind::Class,
            vec![method("invalidate", &[])],
        );
        let stale = fx.model.add_shadow(
            "org.shadows.ShadowView",
            "android.view.View",
            vec![implementation("invalidate", &[])],
        );
        fx.model.add_shadow(
            "com.app.AppShadowView",
            "android.view.View",
            vec![implementation("invalidate", &[])],
        );
        let index = fx.index();
        let query = fx.target(&f, "invalidate", &[]);
        fx.model.invalidate(&stale.fqn);

        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);
        assert_eq!(
            names(&engine.shadows(&query)),
            vec!["com.app.AppShadowView#invalidate()"]
        );
    }

    #[test]
    fn non_shadow_classes_have_no_framework_methods() {
        let fx = Fixture::new();
        let plain = fx.model.add(
            "com.app.Plain",
            ClassKind::Class,
            vec![implementation("foo", &[])],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        let target = fx.target(&plain, "foo", &[]);
        assert!(engine.framework(&target).is_empty());
        assert!(!engine.is_shadow(&target));
        assert!(engine.shadows(&target).is_empty());
    }

    #[test]
    fn is_shadow_needs_implementation_or_constructor_sentinel() {
        let fx = Fixture::new();
        fx.model.add("android.app.F", ClassKind::Class, vec![]);
        let s = fx.model.add_shadow(
            "org.shadows.S",
            "android.app.F",
            vec![
                implementation("foo", &[]),
                method("helper", &[]),
                method("__constructor__", &[]),
            ],
        );
        let index = fx.index();
        let engine = QueryEngine::new(&fx.model, &index, &fx.annotations);

        assert!(engine.is_shadow(&fx.target(&s, "foo", &[])));
        assert!(!engine.is_shadow(&fx.target(&s, "helper", &[])));
        assert!(engine.is_shadow(&fx.target(&s, "__constructor__", &[])));
    }

    #[test]
    fn presentation_order_sorts_by_class_then_method() {
        let mut targets = vec![
            MethodTarget::new(ClassHandle::new("b.B", 1), method("x", &[])),
            MethodTarget::new(ClassHandle::new("a.A", 1), method("y", &["int"])),
            MethodTarget::new(ClassHandle::new("a.A", 1), method("y", &[])),
        ];
        sort_for_presentation(&mut targets);
        assert_eq!(names(&targets), vec!["a.A#y()", "a.A#y(int)", "b.B#x()"]);
    }
}
