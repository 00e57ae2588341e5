use crate::CliResult;
use crate::context::ProjectContext;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use shadowscope_java::{JavaWorkspace, scanner::is_java_path};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(500);

struct FsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FsWatcher {
    fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await? {
                Ok(event) => return Some(event),
                Err(e) => tracing::warn!("Watch error: {}", e),
            }
        }
    }
}

/// Reloads `paths` into `workspace`; paths that no longer exist are
/// removed. Returns whether the workspace changed.
pub(crate) fn reload(workspace: &JavaWorkspace, paths: &[PathBuf]) -> bool {
    let mut changed = false;
    for path in paths {
        if path.is_file() {
            match workspace.load_file(path) {
                Ok(delta) => {
                    for fqn in &delta.added {
                        tracing::info!("+ {}", fqn);
                    }
                    for fqn in &delta.removed {
                        tracing::info!("- {}", fqn);
                    }
                    // Edits inside a file can change annotations without
                    // adding or removing classes.
                    changed = true;
                }
                Err(e) => tracing::warn!("Failed to reload {}: {}", path.display(), e),
            }
        } else {
            let removed = workspace.remove_file(path);
            for fqn in &removed {
                tracing::info!("- {}", fqn);
            }
            changed |= !removed.is_empty();
        }
    }
    changed
}

/// Applies changed `paths` to the project and, for framework sources, to the
/// framework layer as well.
pub(crate) fn apply_changes(ctx: &ProjectContext, paths: &[PathBuf]) -> bool {
    let mut changed = reload(&ctx.project, paths);
    if let Some(framework) = &ctx.framework {
        let framework_paths: Vec<PathBuf> = paths
            .iter()
            .filter(|path| ctx.is_framework_source(path))
            .cloned()
            .collect();
        if !framework_paths.is_empty() {
            changed |= reload(framework, &framework_paths);
        }
    }
    changed
}

pub async fn watch(root: PathBuf, api_level: Option<u32>) -> CliResult<()> {
    let ctx = ProjectContext::open(&root, api_level)?;
    ctx.resolver.spawn_build()?;

    let mut watcher = FsWatcher::new(&ctx.root)?;
    let cancel_token = CancellationToken::new();
    {
        let token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    tracing::info!("Started watching {}", ctx.root.display());
    let mut pending_events: Vec<Event> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                break;
            }
            event = watcher.next_event() => {
                match event {
                    Some(e) => pending_events.push(e),
                    None => break,
                }
            }
            _ = tokio::time::sleep(DEBOUNCE_INTERVAL), if !pending_events.is_empty() => {
                let paths: HashSet<PathBuf> = pending_events
                    .drain(..)
                    .flat_map(|event| event.paths)
                    .filter(|path| is_java_path(path))
                    .collect();
                if paths.is_empty() {
                    continue;
                }

                let mut paths: Vec<PathBuf> = paths.into_iter().collect();
                paths.sort();
                tracing::info!("Detected changes in {} files. Updating...", paths.len());
                if apply_changes(&ctx, &paths) {
                    ctx.resolver.invalidate();
                    ctx.resolver.spawn_build()?;
                }
            }
        }
    }

    tracing::info!("File watcher ended for {}", ctx.root.display());
    Ok(())
}
