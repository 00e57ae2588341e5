use shadowscope_api::{ClassHandle, ClassInfo, ClassModel, TypeReference};
use std::sync::Arc;

/// A stack of class models consulted in order.
///
/// The first layer that knows a class wins, so a version-specific source
/// archive placed before the project sources shadows whatever default sources
/// the project carries.
#[derive(Clone, Default)]
pub struct LayeredClassModel {
    layers: Vec<Arc<dyn ClassModel>>,
}

impl LayeredClassModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: Arc<dyn ClassModel>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn push(&mut self, layer: Arc<dyn ClassModel>) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ClassModel for LayeredClassModel {
    fn class(&self, handle: &ClassHandle) -> Option<ClassInfo> {
        self.layers.iter().find_map(|layer| layer.class(handle))
    }

    fn find_class(&self, fqn: &str) -> Option<ClassInfo> {
        self.layers.iter().find_map(|layer| layer.find_class(fqn))
    }

    fn qualify(&self, reference: &TypeReference, exists: &dyn Fn(&str) -> bool) -> Option<String> {
        let known = |fqn: &str| exists(fqn) || self.contains(fqn);
        self.layers
            .iter()
            .find_map(|layer| layer.qualify(reference, &known))
    }

    fn is_valid(&self, handle: &ClassHandle) -> bool {
        self.layers.iter().any(|layer| layer.is_valid(handle))
    }

    fn contains(&self, fqn: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains(fqn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeModel;
    use shadowscope_api::{ClassKind, MethodInfo, MethodSignature};

    #[test]
    fn earlier_layer_wins() {
        let archive = FakeModel::new();
        archive.add(
            "android.view.View",
            ClassKind::Class,
            vec![MethodInfo::new("fromArchive", MethodSignature::default())],
        );
        let project = FakeModel::new();
        project.add(
            "android.view.View",
            ClassKind::Class,
            vec![MethodInfo::new("fromProject", MethodSignature::default())],
        );
        project.add("com.example.Only", ClassKind::Class, vec![]);

        let layered = LayeredClassModel::new()
            .with_layer(Arc::new(archive))
            .with_layer(Arc::new(project));

        let view = layered.find_class("android.view.View").unwrap();
        assert_eq!(view.methods[0].name, "fromArchive");
        assert!(layered.contains("com.example.Only"));
        assert!(!layered.contains("com.example.Missing"));
    }

    #[test]
    fn handles_validate_against_their_owning_layer() {
        let archive = FakeModel::new();
        let project = FakeModel::new();
        let shadow = project.add("org.shadows.ShadowView", ClassKind::Class, vec![]);
        let project = Arc::new(project);
        let layered = LayeredClassModel::new()
            .with_layer(Arc::new(archive))
            .with_layer(project.clone());

        assert!(layered.is_valid(&shadow));
        project.invalidate(&shadow.fqn);
        assert!(!layered.is_valid(&shadow));
    }

    #[test]
    fn qualification_sees_classes_of_every_layer() {
        let archive = FakeModel::new();
        archive.add("android.view.View", ClassKind::Class, vec![]);
        let project = FakeModel::new();
        let shadow = project.add("org.shadows.ShadowView", ClassKind::Class, vec![]);
        project.import("android.view.View");

        let layered = LayeredClassModel::new()
            .with_layer(Arc::new(archive))
            .with_layer(Arc::new(project));
        let reference = TypeReference {
            name: "View".into(),
            from: shadow,
        };
        assert_eq!(
            layered.qualify(&reference, &|_| false),
            Some("android.view.View".to_string())
        );
    }
}
