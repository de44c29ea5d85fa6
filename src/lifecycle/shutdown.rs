//! Shutdown coordination for listener teardown.
//!
//! The at-exit cleanup is an explicit, composable registration: create a
//! [`Shutdown`], wire the lifecycle manager to it with
//! [`ServerLifecycleManager::drain_on`](crate::lifecycle::ServerLifecycleManager::drain_on),
//! and trigger it from whatever owns the process lifecycle.
//! `close_all_servers` stays independently callable for hosts that manage
//! their own exit path.

use tokio::sync::broadcast;

/// Coordinator for normal-shutdown teardown.
///
/// Provides a broadcast channel that teardown tasks subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of teardown tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Trigger the signal when the process receives Ctrl-C.
    ///
    /// Covers normal interactive shutdown only; a killed process leaves
    /// its listener ports for the OS to reclaim.
    pub fn trigger_on_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(());
            }
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
