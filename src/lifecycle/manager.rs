//! Listener lifecycle orchestration.
//!
//! # Responsibilities
//! - Start listeners with per-app duplicate prevention and bind retry
//! - Close listeners, joining their accept loops
//! - Drain every listener at normal shutdown
//!
//! # Design Decisions
//! - One mutex over the registry, held across the whole of start_server,
//!   so the duplicate check and the registration are atomic
//! - An explicit port gets exactly one attempt; an OS-chosen port gets
//!   five, because the probe-to-bind gap can lose the port to another
//!   process
//! - close joins the accept task with no timeout: the runtime contract
//!   is that stop causes prompt exit

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::RpcError;
use crate::lifecycle::Shutdown;
use crate::net::PortAllocator;
use crate::registry::{Listener, Registry};
use crate::runtime::ListenerRuntime;

/// Listener start attempts when the OS picks the port.
const RANDOM_PORT_ATTEMPTS: u32 = 5;

/// Options for one `start_server` call.
#[derive(Debug, Clone)]
pub struct StartOptions {
    /// Explicit port to bind; `None` lets the OS pick.
    pub port: Option<u16>,

    /// Suppress runtime logging for this listener.
    pub quiet: bool,

    /// Skip startup when the app tag already has a live listener.
    pub prevent_duplicates: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            port: None,
            quiet: true,
            prevent_duplicates: true,
        }
    }
}

/// Outcome of `start_server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedServer {
    /// The application tag the listener is registered under.
    pub app: String,

    /// The bound port.
    pub port: u16,

    /// False when duplicate prevention returned an existing listener
    /// instead of starting a new one.
    pub newly_started: bool,
}

/// Orchestrates listener startup, close, and at-shutdown draining.
///
/// All registry access goes through one internal mutex; callers never
/// see registry internals, only port numbers and [`StartedServer`]
/// summaries.
pub struct ServerLifecycleManager {
    config: ServerConfig,
    runtime: Arc<dyn ListenerRuntime>,
    state: Mutex<Registry>,
}

impl ServerLifecycleManager {
    /// Create a manager that starts listeners through `runtime`.
    pub fn new(runtime: Arc<dyn ListenerRuntime>, config: ServerConfig) -> Self {
        Self {
            config,
            runtime,
            state: Mutex::new(Registry::new()),
        }
    }

    /// Start a listener for `app`.
    ///
    /// With duplicate prevention on (the default), a second start for the
    /// same tag is a no-op that reports the already-open port. Otherwise
    /// a port is allocated (or the explicit one validated) and the
    /// runtime's listener started on it, retrying with a fresh allocation
    /// on any failure up to the attempt bound. Exhaustion fails with
    /// [`RpcError::ServerStartFailed`] listing every tried port in
    /// attempt order.
    pub async fn start_server(
        &self,
        app: &str,
        opts: StartOptions,
    ) -> Result<StartedServer, RpcError> {
        let mut registry = self.state.lock().await;

        if opts.prevent_duplicates {
            let open = registry.ports_for_app(app);
            if let Some(first) = open.first().copied() {
                warn!(app, ports = ?open, "server already started, suppressing duplicate");
                return Ok(StartedServer {
                    app: app.to_string(),
                    port: first,
                    newly_started: false,
                });
            }
        }

        let max_attempts = if opts.port.is_some() {
            1
        } else {
            RANDOM_PORT_ATTEMPTS
        };

        let mut effective = self.config.clone();
        effective.quiet = opts.quiet;

        let mut tried = Vec::new();
        for _ in 0..max_attempts {
            let port = match PortAllocator::allocate(&effective.host, opts.port).await {
                Ok(port) => port,
                Err(RpcError::PortUnavailable { port, reason }) => {
                    debug!(app, port, %reason, "port allocation failed");
                    tried.push(port);
                    continue;
                }
                Err(other) => return Err(other),
            };

            match self.runtime.start_listener(&effective, port).await {
                Ok(spawned) => {
                    debug!(app, port, "started listener");
                    registry.insert(app, Listener::new(port, spawned), std::process::id());
                    return Ok(StartedServer {
                        app: app.to_string(),
                        port,
                        newly_started: true,
                    });
                }
                Err(err) => {
                    debug!(app, port, error = %err, "listener start attempt failed");
                    tried.push(port);
                }
            }
        }

        Err(RpcError::ServerStartFailed {
            app: app.to_string(),
            tried,
        })
    }

    /// Close the listener on `port`, blocking until its accept loop has
    /// fully exited.
    ///
    /// Not idempotent: a second close of the same port fails with
    /// [`RpcError::UnknownPort`]. Callers track what they started.
    pub async fn close_server(&self, port: u16) -> Result<(), RpcError> {
        let listener = {
            let mut registry = self.state.lock().await;
            registry.remove(port).ok_or(RpcError::UnknownPort(port))?
        };

        listener.shutdown().await;
        debug!(port, "closed listener");
        Ok(())
    }

    /// Close every listener, attempting all of them even when some fail.
    ///
    /// A no-op with zero listeners. Individual failures are collected
    /// and surfaced together as [`RpcError::ShutdownIncomplete`].
    pub async fn close_all_servers(&self) -> Result<(), RpcError> {
        let ports = self.state.lock().await.all_ports();
        if ports.is_empty() {
            return Ok(());
        }

        info!(count = ports.len(), "closing all listeners");
        let mut failures = Vec::new();
        for port in ports {
            if let Err(err) = self.close_server(port).await {
                warn!(port, error = %err, "failed to close listener");
                failures.push(format!("port {port}: {err}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RpcError::ShutdownIncomplete { failures })
        }
    }

    /// A representative port for `app`: the lowest registered one.
    ///
    /// Callers that need every port must not rely on this helper; it
    /// warns when the tag has more than one.
    pub async fn port_from_app(&self, app: &str) -> Result<u16, RpcError> {
        let registry = self.state.lock().await;
        let ports = registry.ports_for_app(app);
        match ports.split_first() {
            None => Err(RpcError::NoServerForApp(app.to_string())),
            Some((first, rest)) => {
                if !rest.is_empty() {
                    warn!(app, ports = ?ports, "multiple open ports for app, returning first");
                }
                Ok(*first)
            }
        }
    }

    /// Number of registered listeners.
    pub async fn server_count(&self) -> usize {
        self.state.lock().await.all_ports().len()
    }

    /// Drain every listener when `shutdown` fires.
    ///
    /// Teardown stays an explicit registration; hosts that own their exit
    /// path can call [`Self::close_all_servers`] directly instead.
    pub fn drain_on(self: Arc<Self>, shutdown: &Shutdown) -> tokio::task::JoinHandle<()> {
        let manager = self;
        let mut rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = rx.recv().await;
            if let Err(err) = manager.close_all_servers().await {
                warn!(error = %err, "shutdown drain left listeners behind");
            }
        })
    }
}
