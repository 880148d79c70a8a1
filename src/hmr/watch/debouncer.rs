//! Event coalescing for the watch loop.
//!
//! Only timing and per-path merging live here; deciding which paths matter
//! is [`WatchFilter`](super::WatchFilter)'s job.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::ModifyKind;
use rustc_hash::FxHashMap;

use super::types::ChangeKind;

pub(super) const DEBOUNCE_MS: u64 = 100;

/// Sleep used while nothing is pending.
const IDLE: Duration = Duration::from_secs(86400);

pub(super) struct Debouncer {
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    /// When the current window closes; pushed back by every accepted event.
    pub(super) deadline: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            deadline: None,
        }
    }

    pub(super) fn add_event(&mut self, event: &notify::Event) {
        let Some(kind) = change_kind(&event.kind) else {
            return;
        };
        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        let mut accepted = false;
        for path in event.paths.iter().filter(|path| !is_temp_file(path)) {
            accepted = true;
            let merged = match self.changes.get(path) {
                Some(&pending) => merge(pending, kind),
                None => Some(kind),
            };
            match merged {
                Some(kind) => {
                    self.changes.insert(path.clone(), kind);
                }
                None => {
                    crate::debug!("watch"; "created then removed: {}", path.display());
                    self.changes.remove(path);
                }
            }
        }

        if self.changes.is_empty() {
            self.deadline = None;
        } else if accepted {
            self.deadline = Some(Instant::now() + Duration::from_millis(DEBOUNCE_MS));
        }
    }

    /// Pending changes, once the window has closed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        self.deadline = None;
        Some(std::mem::take(&mut self.changes))
    }

    pub(super) fn is_ready(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline && !self.changes.is_empty())
    }

    pub(super) fn sleep_duration(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .max(Duration::from_millis(1)),
            None => IDLE,
        }
    }
}

fn change_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        // mtime/chmod noise
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        _ => None,
    }
}

/// Fold a new event into the kind already pending for the same path.
///
/// `None` means the path nets out to no change at all.
fn merge(pending: ChangeKind, incoming: ChangeKind) -> Option<ChangeKind> {
    use ChangeKind::*;
    match (pending, incoming) {
        (Created, Removed) => None,
        // restored after a delete, as atomic saves do
        (Removed, Created | Modified) => Some(incoming),
        (Modified, Removed) => Some(Removed),
        (pending, _) => Some(pending),
    }
}

/// Editor swap/backup artifacts.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
        || name.starts_with(".~")
}
