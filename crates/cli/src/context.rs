use crate::CliResult;
use shadowscope_api::{ApiError, ClassModel, MethodSelector, MethodTarget};
use shadowscope_core::{LayeredClassModel, ShadowAnnotations, ShadowResolver, ShadowscopeConfig};
use shadowscope_java::JavaWorkspace;
use shadowscope_sdk::{SdkCatalog, SdkClassFinder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a command needs about one project.
pub struct ProjectContext {
    pub root: PathBuf,
    pub catalog: SdkCatalog,
    pub project: Arc<JavaWorkspace>,
    /// Sources under the configured framework roots, when there are any.
    pub framework: Option<Arc<JavaWorkspace>>,
    pub framework_roots: Vec<PathBuf>,
    pub sdk: Arc<SdkClassFinder>,
    pub model: Arc<LayeredClassModel>,
    pub resolver: Arc<ShadowResolver>,
}

impl ProjectContext {
    /// Loads configuration, project sources and, when an API level is
    /// selected, that SDK's source archive.
    pub fn open(root: &Path, api_level: Option<u32>) -> CliResult<Self> {
        let root = &root.canonicalize()?;
        let config = ShadowscopeConfig::load(root)?;
        let catalog = SdkCatalog::builtin(&config.m2_repository);

        let sdk = Arc::new(SdkClassFinder::new(&config.m2_repository));
        if let Some(level) = api_level.or(config.api_level) {
            let android = catalog.require(level)?.clone();
            if let Err(e) = sdk.set_active(Some(android)) {
                warn!("API {} sources unavailable, using project sources: {}", level, e);
            }
        }

        let project = Arc::new(JavaWorkspace::new()?);
        let summary = project.load_directory(root);
        info!(
            "Loaded {} classes from {} files in {}",
            summary.classes,
            summary.files,
            root.display()
        );

        let framework_roots: Vec<PathBuf> = config
            .framework_source_roots
            .iter()
            .map(|source_root| root.join(source_root))
            .collect();
        let mut model = LayeredClassModel::new().with_layer(sdk.clone());
        let framework = if framework_roots.is_empty() {
            None
        } else {
            let framework = Arc::new(JavaWorkspace::new()?);
            for source_root in &framework_roots {
                framework.load_directory(source_root);
            }
            model.push(framework.clone());
            Some(framework)
        };
        model.push(project.clone());
        let model = Arc::new(model);

        let resolver = Arc::new(ShadowResolver::new(
            model.clone(),
            project.clone(),
            ShadowAnnotations::from(&config),
        ));

        Ok(Self {
            root: root.to_path_buf(),
            catalog,
            project,
            framework,
            framework_roots,
            sdk,
            model,
            resolver,
        })
    }

    /// Methods picked by a `Class#name(params)` selector.
    pub fn select(&self, selector: &str) -> CliResult<Vec<MethodTarget>> {
        let selector: MethodSelector = selector.parse()?;
        let class = self
            .model
            .find_class(&selector.class_fqn)
            .ok_or_else(|| ApiError::NotFound(format!("class {}", selector.class_fqn)))?;
        let targets: Vec<MethodTarget> = class
            .methods
            .iter()
            .filter(|m| selector.matches(m))
            .map(|m| class.target(m))
            .collect();
        if targets.is_empty() {
            return Err(ApiError::NotFound(format!("method {}", selector)).into());
        }
        Ok(targets)
    }

    /// Whether `path` lies under one of the framework source roots.
    pub fn is_framework_source(&self, path: &Path) -> bool {
        self.framework_roots.iter().any(|root| path.starts_with(root))
    }

    /// `file` as the workspace keys it.
    pub fn source_file(&self, file: &Path) -> CliResult<PathBuf> {
        Ok(file.canonicalize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn select_reports_missing_classes_and_methods() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Toast.java"),
            "package android.widget; public class Toast { public void show() {} }",
        )
        .unwrap();
        let ctx = ProjectContext::open(dir.path(), None).unwrap();

        assert_eq!(ctx.select("android.widget.Toast#show").unwrap().len(), 1);
        for selector in ["android.widget.Gone#show", "android.widget.Toast#cancel()"] {
            let err = ctx.select(selector).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ApiError>(),
                Some(ApiError::NotFound(_))
            ));
        }
    }
}
