//! In-memory Java class model backed by parsed source files.

use crate::error::Result;
use crate::model::{JavaAnnotation, JavaClassDecl, JavaFileModel, JavaMethodDecl};
use crate::naming::TypeScope;
use crate::parser::JavaParser;
use crate::scanner::Scanner;
use dashmap::DashMap;
use rayon::prelude::*;
use shadowscope_api::{
    AnnotationInfo, AnnotationSearch, AnnotationSite, ClassHandle, ClassInfo, ClassModel, Location,
    MethodInfo, MethodSignature, TypeReference,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generations are unique across workspaces, so a handle from one workspace
/// is never valid in another.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Which file currently declares a class, and the generation handles to it
/// must carry.
#[derive(Debug, Clone)]
struct ClassSlot {
    path: PathBuf,
    generation: u64,
}

/// Classes that appeared in or disappeared from a file on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl FileDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: usize,
    pub classes: usize,
    pub failed: Vec<PathBuf>,
}

pub struct JavaWorkspace {
    parser: JavaParser,
    files: DashMap<PathBuf, Arc<JavaFileModel>>,
    classes: DashMap<String, ClassSlot>,
}

impl JavaWorkspace {
    pub fn new() -> Result<Self> {
        Ok(Self::with_parser(JavaParser::new()?))
    }

    pub fn with_parser(parser: JavaParser) -> Self {
        Self {
            parser,
            files: DashMap::new(),
            classes: DashMap::new(),
        }
    }

    /// Parses `source` as the content of `path`, replacing what was loaded
    /// from that path before.
    ///
    /// A class that is still declared by the same file keeps its generation,
    /// so handles to it stay valid across edits.
    pub fn load_source(&self, path: &Path, source: &str) -> Result<FileDelta> {
        let model = self.parser.parse_file(source, Some(path))?;
        Ok(self.install(path, model))
    }

    pub fn load_file(&self, path: &Path) -> Result<FileDelta> {
        let source = std::fs::read_to_string(path)?;
        self.load_source(path, &source)
    }

    /// Loads every Java file under `root` in parallel.
    pub fn load_directory(&self, root: &Path) -> LoadSummary {
        let paths = Scanner::collect_java_files(root);
        let results: Vec<(PathBuf, Result<FileDelta>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = self.load_file(&path);
                (path, result)
            })
            .collect();

        let mut summary = LoadSummary::default();
        for (path, result) in results {
            match result {
                Ok(delta) => {
                    summary.files += 1;
                    summary.classes += delta.added.len();
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                    summary.failed.push(path);
                }
            }
        }
        tracing::debug!(
            "Loaded {} files ({} classes) from {}",
            summary.files,
            summary.classes,
            root.display()
        );
        summary
    }

    /// Forgets `path`. Returns the classes it declared.
    pub fn remove_file(&self, path: &Path) -> Vec<String> {
        let Some((_, model)) = self.files.remove(path) else {
            return vec![];
        };
        let removed: Vec<String> = model.classes.iter().map(|c| c.fqn.clone()).collect();
        for fqn in &removed {
            self.release(fqn, path);
        }
        removed
    }

    /// Drops `path`'s claim on `fqn`. Another file still declaring the class
    /// takes it over under a fresh generation.
    fn release(&self, fqn: &str, path: &Path) {
        if self.classes.remove_if(fqn, |_, slot| slot.path == path).is_none() {
            return;
        }
        let successor = self
            .files
            .iter()
            .filter(|entry| entry.key() != path && entry.value().class(fqn).is_some())
            .map(|entry| entry.key().clone())
            .min();
        if let Some(successor) = successor {
            self.classes.entry(fqn.to_string()).or_insert_with(|| ClassSlot {
                path: successor,
                generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            });
        }
    }

    fn install(&self, path: &Path, model: JavaFileModel) -> FileDelta {
        let previous: HashSet<String> = self
            .files
            .get(path)
            .map(|m| m.classes.iter().map(|c| c.fqn.clone()).collect())
            .unwrap_or_default();
        let current: HashSet<&str> = model.classes.iter().map(|c| c.fqn.as_str()).collect();

        let mut delta = FileDelta::default();
        for class in &model.classes {
            let reused = self
                .classes
                .get(&class.fqn)
                .filter(|slot| slot.path == path)
                .is_some();
            if !reused {
                let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
                self.classes.insert(
                    class.fqn.clone(),
                    ClassSlot {
                        path: path.to_path_buf(),
                        generation,
                    },
                );
            }
            if !previous.contains(&class.fqn) {
                delta.added.push(class.fqn.clone());
            }
        }
        for fqn in previous {
            if !current.contains(fqn.as_str()) {
                self.release(&fqn, path);
                delta.removed.push(fqn);
            }
        }
        delta.removed.sort();

        self.files.insert(path.to_path_buf(), Arc::new(model));
        delta
    }

    /// Handles of the classes declared by `path`, in declaration order.
    pub fn classes_in_file(&self, path: &Path) -> Vec<ClassHandle> {
        let Some(model) = self.files.get(path).map(|m| Arc::clone(m.value())) else {
            return vec![];
        };
        model
            .classes
            .iter()
            .filter_map(|c| {
                let slot = self.classes.get(&c.fqn)?;
                (slot.path == path).then(|| ClassHandle::new(c.fqn.clone(), slot.generation))
            })
            .collect()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Every loaded file, sorted by path.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    fn lookup(&self, fqn: &str) -> Option<(ClassHandle, Arc<JavaFileModel>, PathBuf)> {
        let slot = self.classes.get(fqn)?.clone();
        let model = self.files.get(&slot.path).map(|m| Arc::clone(m.value()))?;
        Some((ClassHandle::new(fqn, slot.generation), model, slot.path))
    }

    fn scope<'a>(
        &self,
        file: &'a JavaFileModel,
        class: &'a JavaClassDecl,
        exists: &'a dyn Fn(&str) -> bool,
    ) -> TypeScope<'a> {
        let mut classes = vec![class.fqn.as_str()];
        let mut type_parameters: Vec<&str> =
            class.type_parameters.iter().map(String::as_str).collect();
        for outer in &class.enclosing {
            classes.push(outer.as_str());
            if let Some(decl) = file.class(outer) {
                type_parameters.extend(decl.type_parameters.iter().map(String::as_str));
            }
        }
        TypeScope {
            package: file.package.as_deref(),
            imports: &file.imports,
            classes,
            type_parameters,
            exists,
        }
    }

    fn build_class(&self, handle: ClassHandle, file: &JavaFileModel, path: &Path) -> Option<ClassInfo> {
        let decl = file.class(&handle.fqn)?;
        let exists = |name: &str| self.classes.contains_key(name);
        let scope = self.scope(file, decl, &exists);

        let mut info = ClassInfo::new(handle.clone(), decl.kind);
        info.annotations = decl
            .annotations
            .iter()
            .map(|a| annotation_info(&scope, a, &handle))
            .collect();
        info.methods = decl
            .methods
            .iter()
            .map(|m| method_info(&scope, decl, m, path))
            .collect();
        info.location = Some(Location {
            path: path.to_path_buf(),
            range: decl.name_range,
        });
        Some(info)
    }

    fn annotation_sites_in(&self, path: &Path, annotation_fqn: &str) -> Vec<AnnotationSite> {
        let Some(file) = self.files.get(path).map(|m| Arc::clone(m.value())) else {
            return vec![];
        };
        let simple = annotation_fqn.rsplit('.').next().unwrap_or(annotation_fqn);
        let exists = |name: &str| self.classes.contains_key(name);

        let mut sites = Vec::new();
        for decl in &file.classes {
            // Cheap textual filter before resolving anything.
            let candidates: Vec<&JavaAnnotation> = decl
                .annotations
                .iter()
                .filter(|a| a.name == annotation_fqn || a.name.rsplit('.').next() == Some(simple))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let Some(slot) = self.classes.get(&decl.fqn).map(|s| s.clone()) else {
                continue;
            };
            if slot.path != path {
                continue;
            }
            let owner = ClassHandle::new(decl.fqn.clone(), slot.generation);
            let scope = self.scope(&file, decl, &exists);
            for annotation in candidates {
                let info = annotation_info(&scope, annotation, &owner);
                if info.name == annotation_fqn {
                    sites.push(AnnotationSite {
                        owner: owner.clone(),
                        annotation: info,
                    });
                }
            }
        }
        sites
    }
}

fn annotation_info(scope: &TypeScope<'_>, annotation: &JavaAnnotation, owner: &ClassHandle) -> AnnotationInfo {
    AnnotationInfo {
        name: scope.resolve_annotation_name(&annotation.name),
        class_value: annotation.class_value.as_ref().map(|name| TypeReference {
            name: name.clone(),
            from: owner.clone(),
        }),
        class_name: annotation.class_name.clone(),
    }
}

fn method_info(scope: &TypeScope<'_>, class: &JavaClassDecl, method: &JavaMethodDecl, path: &Path) -> MethodInfo {
    let method_scope = TypeScope {
        package: scope.package,
        imports: scope.imports,
        classes: scope.classes.clone(),
        type_parameters: scope
            .type_parameters
            .iter()
            .copied()
            .chain(method.type_parameters.iter().map(String::as_str))
            .collect(),
        exists: scope.exists,
    };
    let signature = MethodSignature::new(
        method
            .parameters
            .iter()
            .map(|p| method_scope.canonical(&p.type_ref)),
    );

    let mut info = if method.is_constructor {
        MethodInfo::constructor(class.name.clone(), signature)
    } else {
        MethodInfo::new(method.name.clone(), signature)
    };
    info.annotations = method
        .annotations
        .iter()
        .map(|a| scope.resolve_annotation_name(&a.name))
        .collect();
    info.location = Some(Location {
        path: path.to_path_buf(),
        range: method.name_range,
    });
    info
}

impl ClassModel for JavaWorkspace {
    fn class(&self, handle: &ClassHandle) -> Option<ClassInfo> {
        let (current, file, path) = self.lookup(&handle.fqn)?;
        if current.generation != handle.generation {
            return None;
        }
        self.build_class(current, &file, &path)
    }

    fn find_class(&self, fqn: &str) -> Option<ClassInfo> {
        let (handle, file, path) = self.lookup(fqn)?;
        self.build_class(handle, &file, &path)
    }

    fn qualify(&self, reference: &TypeReference, exists: &dyn Fn(&str) -> bool) -> Option<String> {
        let (current, file, _) = self.lookup(&reference.from.fqn)?;
        if current.generation != reference.from.generation {
            return None;
        }
        let decl = file.class(&current.fqn)?;
        let probe = |name: &str| self.classes.contains_key(name) || exists(name);
        let scope = self.scope(&file, decl, &probe);
        Some(scope.resolve_type_name(&reference.name))
    }

    fn is_valid(&self, handle: &ClassHandle) -> bool {
        self.classes
            .get(&handle.fqn)
            .is_some_and(|slot| slot.generation == handle.generation)
    }

    fn contains(&self, fqn: &str) -> bool {
        self.classes.contains_key(fqn)
    }
}

impl AnnotationSearch for JavaWorkspace {
    /// Walks files in path order so repeated searches over an unchanged
    /// workspace yield the same sequence.
    fn references<'a>(
        &'a self,
        annotation_fqn: &'a str,
    ) -> Box<dyn Iterator<Item = AnnotationSite> + 'a> {
        Box::new(
            self.paths()
                .into_iter()
                .flat_map(move |path| self.annotation_sites_in(&path, annotation_fqn)),
        )
    }
}
