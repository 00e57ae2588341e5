//! The shadow index: framework class name -> shadow classes.

use crate::model::{ShadowAnnotation, resolve_framework};
use crate::util::timed;
use indexmap::{IndexMap, IndexSet};
use shadowscope_api::{ClassHandle, ClassModel};

/// Immutable snapshot mapping each framework class to the shadow classes
/// that declare themselves its substitute.
///
/// Keys and the shadow sets are kept in discovery order so every query over
/// the same snapshot answers in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowIndex {
    shadows: IndexMap<String, IndexSet<ClassHandle>>,
    epoch: u64,
}

impl ShadowIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shadow classes recorded for `framework_fqn`, in discovery order.
    pub fn shadows_for(&self, framework_fqn: &str) -> impl Iterator<Item = &ClassHandle> + '_ {
        self.shadows.get(framework_fqn).into_iter().flatten()
    }

    pub fn is_shadowed(&self, framework_fqn: &str) -> bool {
        self.shadows.contains_key(framework_fqn)
    }

    pub fn framework_classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.shadows.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &IndexSet<ClassHandle>)> + '_ {
        self.shadows.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of framework classes with at least one shadow.
    pub fn len(&self) -> usize {
        self.shadows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shadows.is_empty()
    }

    pub fn shadow_class_count(&self) -> usize {
        self.shadows.values().map(IndexSet::len).sum()
    }

    /// Corpus epoch this snapshot was built for.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Builds a [`ShadowIndex`] from the shadow declarations of a corpus.
///
/// Declarations whose framework class cannot be resolved in `model` are
/// skipped. The same shadow class declared twice for one framework class is
/// recorded once.
pub fn build_index<I>(declarations: I, model: &dyn ClassModel, epoch: u64) -> ShadowIndex
where
    I: IntoIterator<Item = ShadowAnnotation>,
{
    timed("build_index", || {
        let mut shadows: IndexMap<String, IndexSet<ClassHandle>> = IndexMap::new();
        let mut skipped = 0usize;

        for declaration in declarations {
            match resolve_framework(model, &declaration) {
                Some(framework_fqn) => {
                    shadows
                        .entry(framework_fqn)
                        .or_default()
                        .insert(declaration.shadow);
                }
                None => {
                    skipped += 1;
                    tracing::trace!(
                        "Skipping {}: framework class {:?} is not available",
                        declaration.shadow,
                        declaration.framework
                    );
                }
            }
        }

        if skipped > 0 {
            tracing::debug!("{} shadow declarations did not resolve", skipped);
        }
        ShadowIndex { shadows, epoch }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FrameworkRef;
    use crate::testing::FakeModel;
    use shadowscope_api::{ClassKind, TypeReference};

    fn declaration(shadow: &ClassHandle, framework: &str) -> ShadowAnnotation {
        ShadowAnnotation {
            shadow: shadow.clone(),
            framework: FrameworkRef::Type(TypeReference {
                name: framework.to_string(),
                from: shadow.clone(),
            }),
        }
    }

    #[test]
    fn empty_corpus_builds_empty_index() {
        let model = FakeModel::new();
        let index = build_index(Vec::new(), &model, 0);
        assert!(index.is_empty());
        assert_eq!(index.shadows_for("android.view.View").count(), 0);
    }

    #[test]
    fn unresolvable_framework_is_excluded() {
        let model = FakeModel::new();
        let shadow = model.add("org.shadows.ShadowGone", ClassKind::Class, vec![]);
        let index = build_index(vec![declaration(&shadow, "android.gone.Gone")], &model, 0);
        assert!(index.is_empty());
        assert!(!index.is_shadowed("android.gone.Gone"));
    }

    #[test]
    fn duplicate_declarations_are_recorded_once() {
        let model = FakeModel::new();
        model.add("android.view.View", ClassKind::Class, vec![]);
        let shadow = model.add("org.shadows.ShadowView", ClassKind::Class, vec![]);

        let decl = declaration(&shadow, "android.view.View");
        let index = build_index(vec![decl.clone(), decl], &model, 0);

        assert_eq!(index.len(), 1);
        assert_eq!(index.shadow_class_count(), 1);
    }

    #[test]
    fn building_twice_gives_the_same_index() {
        let model = FakeModel::new();
        model.add("android.view.View", ClassKind::Class, vec![]);
        model.add("android.app.Activity", ClassKind::Class, vec![]);
        let a = model.add("org.shadows.ShadowView", ClassKind::Class, vec![]);
        let b = model.add("org.shadows.ShadowActivity", ClassKind::Class, vec![]);
        let corpus = vec![
            declaration(&a, "android.view.View"),
            declaration(&b, "android.app.Activity"),
        ];

        let first = build_index(corpus.clone(), &model, 3);
        let second = build_index(corpus, &model, 3);
        assert_eq!(first, second);
        assert_eq!(first.epoch(), 3);
    }

    #[test]
    fn several_shadows_share_one_framework_class() {
        let model = FakeModel::new();
        model.add("android.view.View", ClassKind::Class, vec![]);
        let a = model.add("org.shadows.ShadowView", ClassKind::Class, vec![]);
        let b = model.add("org.other.OtherShadowView", ClassKind::Class, vec![]);

        let index = build_index(
            vec![
                declaration(&a, "android.view.View"),
                declaration(&b, "android.view.View"),
            ],
            &model,
            0,
        );
        let found: Vec<_> = index.shadows_for("android.view.View").cloned().collect();
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn class_name_declarations_resolve_by_name() {
        let model = FakeModel::new();
        model.add("android.os.Outer.Hidden", ClassKind::Class, vec![]);
        let shadow = model.add("org.shadows.ShadowHidden", ClassKind::Class, vec![]);

        let index = build_index(
            vec![ShadowAnnotation {
                shadow: shadow.clone(),
                framework: FrameworkRef::Name("android.os.Outer$Hidden".into()),
            }],
            &model,
            0,
        );
        assert_eq!(
            index.shadows_for("android.os.Outer.Hidden").collect::<Vec<_>>(),
            vec![&shadow]
        );
    }
}
