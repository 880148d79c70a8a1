//! Process-wide run state.
//!
//! - `SHUTDOWN`: has Ctrl+C been received?
//! - `WATCHING`: is a watch loop waiting on the shutdown signal?

use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// A watch loop is running and will drain itself on shutdown
static WATCHING: AtomicBool = AtomicBool::new(false);

/// Wakes the watch loop; `notify_one` keeps a permit if nobody waits yet.
static SHUTDOWN_SIGNAL: LazyLock<Notify> = LazyLock::new(Notify::new);

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Outside watch mode: exit immediately, nothing to drain
/// - In watch mode: set the flag and wake the loop
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        request_shutdown();
        if is_watching() {
            crate::log!("watch"; "shutting down...");
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    SHUTDOWN_SIGNAL.notify_one();
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Resolves once shutdown is requested.
pub async fn shutdown_requested() {
    if is_shutdown() {
        return;
    }
    SHUTDOWN_SIGNAL.notified().await;
}

// =============================================================================
// WATCHING state
// =============================================================================

pub fn set_watching(watching: bool) {
    WATCHING.store(watching, Ordering::SeqCst);
}

pub fn is_watching() -> bool {
    WATCHING.load(Ordering::SeqCst)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_watching() {
        set_watching(true);
        assert!(is_watching());
        set_watching(false);
        assert!(!is_watching());
    }

    #[tokio::test]
    async fn test_shutdown_wakes_waiter() {
        let waiter = tokio::spawn(shutdown_requested());
        tokio::time::sleep(Duration::from_millis(10)).await;
        request_shutdown();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke")
            .unwrap();
        assert!(is_shutdown());

        // already requested: returns immediately
        tokio::time::timeout(Duration::from_millis(100), shutdown_requested())
            .await
            .expect("no wait after shutdown");
    }
}
