//! Process-wide listener bookkeeping.
//!
//! # Data Flow
//! ```text
//! start_server → Registry::insert
//!     servers:   port → Listener
//!     app_ports: app tag → port → owning pids
//!
//! close_server → Registry::remove
//!     both tables scrubbed together
//! ```
//!
//! # Design Decisions
//! - One owned state object; the lifecycle manager wraps it in a single
//!   mutex instead of scattering global statics
//! - Duplicate prevention is advisory and process-local: the pid lists
//!   under each app tag exist for logging, not cross-process coordination
//! - BTreeMaps keep port order deterministic, so "first port for an app"
//!   is stable across calls

use std::collections::BTreeMap;
use tokio::task::JoinHandle;

use crate::runtime::{ListenerControl, SpawnedListener};

/// One running background accept loop, keyed by its bound port.
///
/// Exclusively owned by the [`Registry`] once inserted; closing removes
/// it and consumes it.
pub struct Listener {
    port: u16,
    control: Box<dyn ListenerControl>,
    task: JoinHandle<()>,
}

impl Listener {
    /// Wrap a runtime-spawned listener under its bound port.
    pub fn new(port: u16, spawned: SpawnedListener) -> Self {
        Self {
            port,
            control: spawned.control,
            task: spawned.task,
        }
    }

    /// The bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether the accept loop task is still live.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the accept loop and wait for its task to fully exit.
    ///
    /// The one designed blocking join point: the runtime guarantees that
    /// `stop` causes prompt exit, so no timeout is applied. A panicked
    /// accept task is logged rather than propagated.
    pub async fn shutdown(self) {
        self.control.stop().await;
        if let Err(err) = self.task.await {
            tracing::warn!(port = self.port, error = %err, "accept loop did not exit cleanly");
        }
    }
}

/// In-memory tables of active listeners and per-app port ownership.
///
/// Invariants: a port appears at most once in `servers`; every port
/// listed under an app tag also exists in `servers` while the listener
/// is alive; both entries are removed together on close.
#[derive(Default)]
pub struct Registry {
    servers: BTreeMap<u16, Listener>,
    app_ports: BTreeMap<String, BTreeMap<u16, Vec<u32>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener under `app`, appending `pid` as an owner.
    pub fn insert(&mut self, app: &str, listener: Listener, pid: u32) {
        let port = listener.port();
        self.app_ports
            .entry(app.to_string())
            .or_default()
            .entry(port)
            .or_default()
            .push(pid);
        self.servers.insert(port, listener);
    }

    /// Deregister `port`, scrubbing it from every app tag's sub-map.
    ///
    /// Ports are globally unique, so this is a scan-and-delete over all
    /// tags; tags left with no ports are pruned.
    pub fn remove(&mut self, port: u16) -> Option<Listener> {
        let listener = self.servers.remove(&port)?;
        for ports in self.app_ports.values_mut() {
            ports.remove(&port);
        }
        self.app_ports.retain(|_, ports| !ports.is_empty());
        Some(listener)
    }

    /// Live ports registered under `app`, lowest first.
    pub fn ports_for_app(&self, app: &str) -> Vec<u16> {
        self.app_ports
            .get(app)
            .map(|ports| ports.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every registered port.
    pub fn all_ports(&self) -> Vec<u16> {
        self.servers.keys().copied().collect()
    }

    /// True when no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
