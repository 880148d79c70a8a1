//! Watch handles that survive their target being deleted and recreated.

use std::path::PathBuf;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// How often detached roots are checked for while nothing else wakes the loop.
pub(super) const RETRY: Duration = Duration::from_millis(500);

/// A directory the watcher attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub path: PathBuf,
    /// Whole subtree, or direct entries only.
    pub recursive: bool,
}

impl WatchRoot {
    pub fn tree(path: PathBuf) -> Self {
        Self {
            path,
            recursive: true,
        }
    }

    pub fn shallow(path: PathBuf) -> Self {
        Self {
            path,
            recursive: false,
        }
    }

    fn mode(&self) -> RecursiveMode {
        if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        }
    }
}

pub(super) struct WatchRoots {
    roots: Vec<WatchRoot>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(roots: Vec<WatchRoot>) -> Self {
        Self {
            roots,
            attached: FxHashSet::default(),
        }
    }

    /// Attach every root that exists now. Missing ones are retried by
    /// [`maintain`](Self::maintain).
    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        for root in &self.roots {
            if !root.path.is_dir() {
                crate::debug!("watch"; "not yet present: {}", root.path.display());
                continue;
            }
            watcher.watch(&root.path, root.mode())?;
            self.attached.insert(root.path.clone());
        }
        Ok(())
    }

    /// Any root currently without a live watch.
    pub(super) fn has_missing(&self) -> bool {
        self.roots.iter().any(|root| !self.attached.contains(&root.path))
    }

    /// Drop the watch on a root whose own directory was removed.
    ///
    /// A root deleted and recreated inside one debounce window still passes
    /// `is_dir`, but the old watch points at the dead inode.
    pub(super) fn observe(&mut self, event: &notify::Event, watcher: &mut RecommendedWatcher) {
        if !matches!(event.kind, EventKind::Remove(_)) {
            return;
        }
        for path in &event.paths {
            if self.attached.remove(path) {
                crate::debug!("watch"; "root removed: {}", path.display());
                let _ = watcher.unwatch(path);
            }
        }
    }

    /// Forget roots that vanished and re-attach ones that came back.
    ///
    /// Returns the roots attached by this call. Their contents may have
    /// changed while nothing was watching.
    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) -> Vec<PathBuf> {
        self.attached.retain(|path| {
            let alive = path.is_dir();
            if !alive {
                crate::debug!("watch"; "root gone: {}", path.display());
                let _ = watcher.unwatch(path);
            }
            alive
        });

        let mut revived = Vec::new();
        for root in &self.roots {
            if self.attached.contains(&root.path) || !root.path.is_dir() {
                continue;
            }
            match watcher.watch(&root.path, root.mode()) {
                Ok(()) => {
                    crate::debug!("watch"; "re-attached {}", root.path.display());
                    self.attached.insert(root.path.clone());
                    revived.push(root.path.clone());
                }
                Err(e) => crate::debug!("watch"; "re-attach {} failed: {}", root.path.display(), e),
            }
        }
        revived
    }

    /// Time until the loop must look at the roots again.
    pub(super) fn next_check(&self, pending: Duration) -> Duration {
        if self.has_missing() { pending.min(RETRY) } else { pending }
    }
}
