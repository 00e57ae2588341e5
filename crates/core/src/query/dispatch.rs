use super::engine::QueryEngine;
use super::model::{LineMarker, MarkerDirection, MethodQuery, SourceElement};
use shadowscope_api::{ClassInfo, MethodTarget};

impl QueryEngine<'_> {
    /// Shadow methods query towards the framework; every other method is
    /// treated as a possible framework method. Fields, annotations and classes
    /// are not navigable.
    pub fn classify(&self, element: SourceElement) -> MethodQuery {
        match element {
            SourceElement::Method(target) if self.is_shadow(&target) => {
                MethodQuery::ShadowMethod(target)
            }
            SourceElement::Method(target) => MethodQuery::FrameworkMethod(target),
            SourceElement::Field { .. } | SourceElement::Annotation(_) | SourceElement::Class(_) => {
                MethodQuery::Unsupported
            }
        }
    }

    pub fn answer(&self, query: &MethodQuery) -> Vec<MethodTarget> {
        match query {
            MethodQuery::ShadowMethod(target) => self.framework(target),
            MethodQuery::FrameworkMethod(target) => self.shadows(target),
            MethodQuery::Unsupported => Vec::new(),
        }
    }

    /// Shadow methods are always marked; framework methods only when some
    /// shadow replaces them.
    pub fn marker(&self, target: &MethodTarget) -> Option<LineMarker> {
        let range = target.method.location.as_ref().map(|l| l.range);
        match self.classify(SourceElement::Method(target.clone())) {
            MethodQuery::ShadowMethod(target) => Some(LineMarker {
                target,
                direction: MarkerDirection::ToFramework,
                range,
            }),
            MethodQuery::FrameworkMethod(target) if self.is_shadowed(&target) => Some(LineMarker {
                target,
                direction: MarkerDirection::ToShadows,
                range,
            }),
            _ => None,
        }
    }

    pub fn markers_for_class(&self, class: &ClassInfo) -> Vec<LineMarker> {
        class
            .methods
            .iter()
            .filter_map(|m| self.marker(&class.target(m)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use crate::model::{ShadowAnnotation, ShadowAnnotations};
    use crate::testing::{FakeModel, ctor, implementation, method};
    use shadowscope_api::{AnnotationInfo, AnnotationSearch, ClassKind, ClassModel, IMPLEMENTS};

    #[test]
    fn dispatch_and_markers() {
        let model = FakeModel::new();
        let framework = model.add(
            "android.app.F",
            ClassKind::Class,
            vec![ctor("F", &[]), method("foo", &[]), method("bar", &[])],
        );
        let shadow = model.add_shadow(
            "org.shadows.S",
            "android.app.F",
            vec![implementation("foo", &[]), method("helper", &[])],
        );
        let declarations = model
            .references(IMPLEMENTS)
            .filter_map(ShadowAnnotation::from_site);
        let index = build_index(declarations, &model, 0);
        let annotations = ShadowAnnotations::default();
        let engine = QueryEngine::new(&model, &index, &annotations);

        let shadow_class = model.class(&shadow).unwrap();
        let markers = engine.markers_for_class(&shadow_class);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].direction, MarkerDirection::ToFramework);
        assert_eq!(markers[0].target.method.name, "foo");

        let framework_class = model.class(&framework).unwrap();
        let markers = engine.markers_for_class(&framework_class);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].direction, MarkerDirection::ToShadows);
        assert_eq!(markers[0].target.method.name, "foo");

        let foo = shadow_class.target(&shadow_class.methods[0]);
        let query = engine.classify(SourceElement::Method(foo));
        assert!(matches!(query, MethodQuery::ShadowMethod(_)));
        assert_eq!(engine.answer(&query).len(), 1);

        let unsupported = engine.classify(SourceElement::Annotation(AnnotationInfo::marker(IMPLEMENTS)));
        assert_eq!(unsupported, MethodQuery::Unsupported);
        assert!(engine.answer(&unsupported).is_empty());
        assert_eq!(
            engine.classify(SourceElement::Class(shadow.clone())),
            MethodQuery::Unsupported
        );
    }
}
