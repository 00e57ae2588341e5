//! In-memory class model for unit tests.

use indexmap::IndexMap;
use shadowscope_api::{
    AnnotationInfo, AnnotationSearch, AnnotationSite, ClassHandle, ClassInfo, ClassKind,
    ClassModel, IMPLEMENTATION, IMPLEMENTS, MethodInfo, MethodSignature, TypeReference,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

static GENERATION: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
pub(crate) struct FakeModel {
    classes: Mutex<IndexMap<String, ClassInfo>>,
    imports: Mutex<Vec<String>>,
}

impl FakeModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self, fqn: &str, kind: ClassKind, methods: Vec<MethodInfo>) -> ClassHandle {
        let handle = ClassHandle::new(fqn, GENERATION.fetch_add(1, Ordering::Relaxed));
        let mut class = ClassInfo::new(handle.clone(), kind);
        class.methods = methods;
        self.classes.lock().unwrap().insert(fqn.to_string(), class);
        handle
    }

    /// Adds `shadow_fqn` annotated with `@Implements(<framework_name>.class)`.
    pub(crate) fn add_shadow(
        &self,
        shadow_fqn: &str,
        framework_name: &str,
        methods: Vec<MethodInfo>,
    ) -> ClassHandle {
        let handle = self.add(shadow_fqn, ClassKind::Class, methods);
        self.annotate(
            &handle,
            AnnotationInfo {
                name: IMPLEMENTS.to_string(),
                class_value: Some(TypeReference {
                    name: framework_name.to_string(),
                    from: handle.clone(),
                }),
                class_name: None,
            },
        );
        handle
    }

    pub(crate) fn annotate(&self, handle: &ClassHandle, annotation: AnnotationInfo) {
        if let Some(class) = self.classes.lock().unwrap().get_mut(&handle.fqn) {
            class.annotations.push(annotation);
        }
    }

    pub(crate) fn import(&self, fqn: &str) {
        self.imports.lock().unwrap().push(fqn.to_string());
    }

    pub(crate) fn invalidate(&self, fqn: &str) {
        self.classes.lock().unwrap().shift_remove(fqn);
    }
}

impl ClassModel for FakeModel {
    fn class(&self, handle: &ClassHandle) -> Option<ClassInfo> {
        self.classes
            .lock()
            .unwrap()
            .get(&handle.fqn)
            .filter(|c| c.handle.generation == handle.generation)
            .cloned()
    }

    fn find_class(&self, fqn: &str) -> Option<ClassInfo> {
        self.classes.lock().unwrap().get(fqn).cloned()
    }

    fn qualify(&self, reference: &TypeReference, exists: &dyn Fn(&str) -> bool) -> Option<String> {
        if !self.is_valid(&reference.from) {
            return None;
        }
        if reference.name.contains('.') {
            return Some(reference.name.clone());
        }
        let suffix = format!(".{}", reference.name);
        if let Some(import) = self.imports.lock().unwrap().iter().find(|i| i.ends_with(&suffix)) {
            return Some(import.clone());
        }
        let package = reference
            .from
            .fqn
            .rsplit_once('.')
            .map(|(p, _)| p)
            .unwrap_or("");
        let candidate = format!("{package}.{}", reference.name);
        if exists(&candidate) || self.contains(&candidate) {
            Some(candidate)
        } else {
            Some(reference.name.clone())
        }
    }
}

impl AnnotationSearch for FakeModel {
    fn references<'a>(
        &'a self,
        annotation_fqn: &'a str,
    ) -> Box<dyn Iterator<Item = AnnotationSite> + 'a> {
        let sites: Vec<AnnotationSite> = self
            .classes
            .lock()
            .unwrap()
            .values()
            .flat_map(|class| {
                class
                    .annotations
                    .iter()
                    .filter(|a| a.name == annotation_fqn)
                    .map(|a| AnnotationSite {
                        owner: class.handle.clone(),
                        annotation: a.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Box::new(sites.into_iter())
    }
}

pub(crate) fn sig(params: &[&str]) -> MethodSignature {
    MethodSignature::new(params.iter().copied())
}

pub(crate) fn method(name: &str, params: &[&str]) -> MethodInfo {
    MethodInfo::new(name, sig(params))
}

pub(crate) fn implementation(name: &str, params: &[&str]) -> MethodInfo {
    method(name, params).with_annotation(IMPLEMENTATION)
}

pub(crate) fn ctor(class_simple_name: &str, params: &[&str]) -> MethodInfo {
    MethodInfo::constructor(class_simple_name, sig(params))
}
