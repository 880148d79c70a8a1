use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::types::{ChangeKind, ChangeSet};
use super::watch_roots::WatchRoot;

/// Decides which debounced paths matter to route synthesis.
///
/// Pipeline: correct_by_existence → select
#[derive(Debug, Clone)]
pub struct WatchFilter {
    pub routes_dir: PathBuf,
    pub extensions: Vec<String>,
    pub meta_source: Option<PathBuf>,
}

impl WatchFilter {
    /// Directories the watcher attaches to.
    ///
    /// The metadata source is watched through its parent so that editors
    /// replacing the file by rename are still seen.
    pub fn roots(&self) -> Vec<WatchRoot> {
        let mut roots = vec![WatchRoot::tree(self.routes_dir.clone())];
        if let Some(parent) = self.meta_source.as_deref().and_then(Path::parent)
            && !parent.starts_with(&self.routes_dir)
        {
            roots.push(WatchRoot::shallow(parent.to_path_buf()));
        }
        roots
    }

    pub(super) fn classify(&self, raw: FxHashMap<PathBuf, ChangeKind>) -> Option<ChangeSet> {
        let mut changes = raw;
        correct_by_existence(&mut changes);

        let mut set = ChangeSet::default();
        for (path, kind) in changes {
            if self.is_meta_source(&path) {
                set.metadata = true;
            } else if self.is_route_file(&path) {
                set.routes.push((path, kind));
            } else {
                crate::debug!("watch"; "ignored {}: {}", kind.label(), path.display());
            }
        }
        set.routes.sort_by(|a, b| a.0.cmp(&b.0));

        (!set.is_empty()).then_some(set)
    }

    /// Mark what a re-attached root may hide: files written while it was
    /// detached produce no events.
    pub(super) fn revive(&self, roots: &[PathBuf], set: &mut ChangeSet) {
        for root in roots {
            if self.routes_dir.starts_with(root) {
                set.rescan = true;
            }
            if self.meta_source.as_deref().is_some_and(|source| source.starts_with(root)) {
                set.metadata = true;
            }
        }
    }

    fn is_route_file(&self, path: &Path) -> bool {
        if !path.starts_with(&self.routes_dir) {
            return false;
        }
        let name = path.to_string_lossy();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn is_meta_source(&self, path: &Path) -> bool {
        self.meta_source.as_deref() == Some(path)
    }
}

/// Reconcile event kinds with what is on disk now.
///
/// Atomic saves often arrive as remove + create, or as a stale create for a
/// file that is already gone.
fn correct_by_existence(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
    changes.retain(|path, kind| {
        let exists = path.exists();
        match *kind {
            ChangeKind::Created if !exists => {
                crate::debug!("watch"; "discard created (gone): {}", path.display());
                false
            }
            ChangeKind::Modified if !exists => {
                *kind = ChangeKind::Removed;
                true
            }
            ChangeKind::Removed if exists => {
                *kind = ChangeKind::Modified;
                true
            }
            _ => true,
        }
    });
}
