//! Framework classes served from the active SDK's source archive.

use crate::archive::SourceArchive;
use crate::catalog::AndroidSdk;
use crate::error::Result;
use shadowscope_api::{ClassHandle, ClassInfo, ClassModel, TypeReference};
use shadowscope_java::JavaWorkspace;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Classes of one SDK, parsed on first use.
struct ActiveSdk {
    sdk: AndroidSdk,
    archive: SourceArchive,
    workspace: JavaWorkspace,
    /// Entries already parsed into `workspace`, including ones that failed.
    loaded: Mutex<HashSet<String>>,
}

impl ActiveSdk {
    fn ensure_loaded(&self, fqn: &str) -> bool {
        let Some(entry) = self.archive.entry_name(fqn) else {
            return false;
        };
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if loaded.contains(&entry) {
            return true;
        }
        loaded.insert(entry.clone());

        match self.archive.read_source(fqn) {
            Ok(Some((entry, source))) => {
                let path = self.archive.entry_path(&entry);
                if let Err(e) = self.workspace.load_source(&path, &source) {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read {} from {}: {}", entry, self.archive.path().display(), e),
        }
        true
    }
}

/// A [`ClassModel`] over the source archive of the SDK the running session
/// reported, if any.
///
/// Switching SDKs drops everything parsed so far, so handles obtained before
/// the switch go stale.
pub struct SdkClassFinder {
    m2_repository: PathBuf,
    active: RwLock<Option<Arc<ActiveSdk>>>,
}

impl SdkClassFinder {
    pub fn new(m2_repository: impl Into<PathBuf>) -> Self {
        Self {
            m2_repository: m2_repository.into(),
            active: RwLock::new(None),
        }
    }

    pub fn m2_repository(&self) -> &Path {
        &self.m2_repository
    }

    /// Makes `sdk` the active one, or clears the selection with `None`.
    pub fn set_active(&self, sdk: Option<AndroidSdk>) -> Result<()> {
        let next = match sdk {
            Some(sdk) => {
                let archive = SourceArchive::open(&sdk.source_jar_file(&self.m2_repository))?;
                tracing::info!(
                    "Using sources of API {} ({}), {} classes",
                    sdk.api_level,
                    sdk.coordinates(),
                    archive.len()
                );
                Some(Arc::new(ActiveSdk {
                    sdk,
                    archive,
                    workspace: JavaWorkspace::new()?,
                    loaded: Mutex::new(HashSet::new()),
                }))
            }
            None => None,
        };
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    pub fn active(&self) -> Option<AndroidSdk> {
        self.current().map(|a| a.sdk.clone())
    }

    /// Drops every parsed class; the archive stays open.
    pub fn clear_cache(&self) -> Result<()> {
        self.set_active(self.active())
    }

    fn current(&self) -> Option<Arc<ActiveSdk>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The active SDK when it can answer for `fqn`. JDK classes never come
    /// from an SDK archive.
    fn for_class(&self, fqn: &str) -> Option<Arc<ActiveSdk>> {
        if fqn.starts_with("java") {
            return None;
        }
        let active = self.current()?;
        active.ensure_loaded(fqn).then_some(active)
    }

    /// Location of the source file declaring `fqn` in the active archive.
    pub fn source_path(&self, fqn: &str) -> Option<PathBuf> {
        let active = self.current()?;
        let entry = active.archive.entry_name(fqn)?;
        Some(active.archive.entry_path(&entry))
    }
}

impl ClassModel for SdkClassFinder {
    fn class(&self, handle: &ClassHandle) -> Option<ClassInfo> {
        self.for_class(&handle.fqn)?.workspace.class(handle)
    }

    fn find_class(&self, fqn: &str) -> Option<ClassInfo> {
        self.for_class(fqn)?.workspace.find_class(fqn)
    }

    fn qualify(&self, reference: &TypeReference, exists: &dyn Fn(&str) -> bool) -> Option<String> {
        let active = self.for_class(&reference.from.fqn)?;
        let probe = |name: &str| exists(name) || self.contains(name);
        active.workspace.qualify(reference, &probe)
    }

    fn is_valid(&self, handle: &ClassHandle) -> bool {
        self.current()
            .is_some_and(|active| active.workspace.is_valid(handle))
    }

    fn contains(&self, fqn: &str) -> bool {
        if fqn.starts_with("java") {
            return false;
        }
        let Some(active) = self.current() else {
            return false;
        };
        // Top-level classes are known from the archive listing alone.
        if active.archive.top_level_class(fqn) == Some(fqn) {
            return true;
        }
        active.ensure_loaded(fqn) && active.workspace.contains(fqn)
    }
}
