//! Route directory watcher.
//!
//! The watcher attaches before the initial pass so nothing changed during
//! that pass is lost; events buffer in the notify channel until `run`.
//!
//! ```text
//! notify → Debouncer (timing, dedup) → WatchFilter (route files, meta source) → ChangeSet
//! ```

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

mod classifier;
mod debouncer;
mod types;
mod watch_roots;


pub use classifier::WatchFilter;
pub use types::ChangeSet;

use debouncer::Debouncer;
use watch_roots::WatchRoots;

pub struct RouteWatcher {
    /// sync → async bridge for notify
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// must stay alive for events to flow
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    filter: WatchFilter,
    changes_tx: mpsc::Sender<ChangeSet>,
}

impl RouteWatcher {
    pub fn new(filter: WatchFilter, changes_tx: mpsc::Sender<ChangeSet>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(filter.roots());
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            filter,
            changes_tx,
        })
    }

    /// Forward debounced change sets until the receiver goes away.
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            filter,
            changes_tx,
        } = self;
        let mut debouncer = Debouncer::new();
        let mut async_rx = bridge(notify_rx);

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => {
                    watch_roots.observe(&event, &mut watcher);
                    debouncer.add_event(&event);
                }
                _ = tokio::time::sleep(watch_roots.next_check(debouncer.sleep_duration())) => {
                    let revived = watch_roots.maintain(&mut watcher);
                    let mut changes = debouncer
                        .take_if_ready()
                        .and_then(|raw| filter.classify(raw))
                        .unwrap_or_default();
                    filter.revive(&revived, &mut changes);
                    if changes.is_empty() {
                        continue;
                    }
                    log_changes(&changes);
                    if changes_tx.send(changes).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Move notify's blocking channel onto a tokio one via a plain thread.
fn bridge(
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
) -> mpsc::Receiver<notify::Event> {
    let (tx, rx) = mpsc::channel(64);
    std::thread::spawn(move || {
        for result in notify_rx {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    crate::log!("watch"; "notify error: {}", e);
                    continue;
                }
            };
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });
    rx
}

fn log_changes(changes: &ChangeSet) {
    for (path, kind) in &changes.routes {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        crate::log!("watch"; "{} {}", kind.label(), name);
    }
    if changes.metadata {
        crate::log!("watch"; "route metadata changed");
    }
    if changes.rescan {
        crate::log!("watch"; "routes directory re-attached, rescanning");
    }
}
