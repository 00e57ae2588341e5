//! Lazily built, snapshot-swapped shadow index.

use crate::index::{ShadowIndex, build_index};
use crate::model::{ShadowAnnotation, ShadowAnnotations};
use crate::query::{LineMarker, MethodQuery, QueryEngine, SourceElement};
use shadowscope_api::{AnnotationSearch, ClassInfo, ClassModel, MethodTarget};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;
use std::time::Instant;

/// Owns the current [`ShadowIndex`] snapshot of a corpus.
///
/// - Readers get cheap snapshots (Arc clone) and never see a half-built index
/// - At most one build runs at a time; callers arriving during a build wait
///   for it and share its result
/// - `invalidate` bumps the corpus epoch; the next read rebuilds
pub struct ShadowResolver {
    model: Arc<dyn ClassModel>,
    search: Arc<dyn AnnotationSearch>,
    annotations: ShadowAnnotations,

    /// Latest snapshot, tagged with the epoch it was built for.
    current: RwLock<Option<Arc<ShadowIndex>>>,

    /// Held for the whole build-or-reuse decision.
    build_lock: Mutex<()>,

    epoch: AtomicU64,
}

impl ShadowResolver {
    pub fn new(
        model: Arc<dyn ClassModel>,
        search: Arc<dyn AnnotationSearch>,
        annotations: ShadowAnnotations,
    ) -> Self {
        Self {
            model,
            search,
            annotations,
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn model(&self) -> &Arc<dyn ClassModel> {
        &self.model
    }

    pub fn annotations(&self) -> &ShadowAnnotations {
        &self.annotations
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// The snapshot for the current epoch, if one has been built.
    pub fn current(&self) -> Option<Arc<ShadowIndex>> {
        let epoch = self.epoch();
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|index| index.epoch() == epoch)
            .cloned()
    }

    /// The snapshot for the current epoch, building it first if needed.
    pub fn index(&self) -> Arc<ShadowIndex> {
        if let Some(index) = self.current() {
            return index;
        }

        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished a build while we waited.
        if let Some(index) = self.current() {
            return index;
        }

        let epoch = self.epoch();
        let started_at = Instant::now();
        let declarations = self
            .search
            .references(&self.annotations.implements)
            .filter_map(ShadowAnnotation::from_site);
        let index = Arc::new(build_index(declarations, self.model.as_ref(), epoch));
        tracing::info!(
            "Found {} shadowed classes ({} shadow classes) in {:.1}ms",
            index.len(),
            index.shadow_class_count(),
            started_at.elapsed().as_secs_f64() * 1000.0
        );

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(index.clone());
        index
    }

    /// Marks the cached snapshot stale. Snapshots already handed out stay
    /// usable; the next read builds a new one.
    pub fn invalidate(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!("Shadow index invalidated (epoch {})", epoch);
    }

    /// Builds the index on a background thread.
    pub fn spawn_build(self: &Arc<Self>) -> std::io::Result<JoinHandle<Arc<ShadowIndex>>> {
        let resolver = Arc::clone(self);
        std::thread::Builder::new()
            .name("find-shadowed-classes".to_string())
            .spawn(move || resolver.index())
    }

    /// Runs `f` against a query engine over the current snapshot.
    pub fn with_engine<T>(&self, f: impl FnOnce(&QueryEngine<'_>) -> T) -> T {
        let index = self.index();
        let engine = QueryEngine::new(self.model.as_ref(), &index, &self.annotations);
        f(&engine)
    }

    pub fn framework(&self, method: &MethodTarget) -> Vec<MethodTarget> {
        self.with_engine(|engine| engine.framework(method))
    }

    pub fn shadows(&self, method: &MethodTarget) -> Vec<MethodTarget> {
        self.with_engine(|engine| engine.shadows(method))
    }

    pub fn navigate(&self, element: SourceElement) -> (MethodQuery, Vec<MethodTarget>) {
        self.with_engine(|engine| {
            let query = engine.classify(element);
            let targets = engine.answer(&query);
            (query, targets)
        })
    }

    pub fn markers(&self, class: &ClassInfo) -> Vec<LineMarker> {
        self.with_engine(|engine| engine.markers_for_class(class))
    }
}
