//! Seams to the external RPC runtime.
//!
//! # Data Flow
//! ```text
//! Server side:
//!     lifecycle manager → ListenerRuntime::start_listener(config, port)
//!         → SpawnedListener { control: stop signal, task: accept loop }
//!
//! Client side:
//!     connector → RemoteRuntime::connect(host, port) → RemoteSession
//!         → RemoteSession::resolve_module per requested name
//! ```
//!
//! # Design Decisions
//! - The transport, serialization, and dispatch engine live behind these
//!   traits; this crate only orchestrates lifecycle around them
//! - Connect failure signals are split (Timeout vs Io vs Eof) because the
//!   connector retries only the transient one
//! - stop must cause prompt accept-loop exit; close joins the task with
//!   no timeout on the strength of that contract

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;

/// Failure starting a listener.
///
/// Every variant is a retryable attempt failure for the lifecycle
/// manager's start loop, including an OS-level address-in-use.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The runtime could not bind the requested port.
    #[error("failed to bind: {0}")]
    Bind(#[from] std::io::Error),

    /// The runtime bound the port but failed to bring up its service.
    #[error("failed to start: {0}")]
    Start(String),
}

/// Failure establishing a client connection, distinguishable by cause.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The connection attempt timed out. The only transient case: the
    /// listener process may still be starting its accept loop.
    #[error("connection timed out")]
    Timeout,

    /// A transport-level I/O error; not expected to be transient.
    #[error("I/O error: {message}")]
    Io {
        errno: Option<i32>,
        message: String,
    },

    /// The remote end closed the stream during connect.
    #[error("unexpected end of stream")]
    Eof,
}

/// Failure resolving a remote module name.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The name is not (yet) present in the remote module namespace. The
    /// host application may still be importing it; retryable.
    #[error("no such module '{0}'")]
    UnknownModule(String),

    /// The session broke while resolving; not retryable.
    #[error("transport error: {0}")]
    Transport(String),
}

/// A listener the runtime has started: a stop control plus the accept
/// loop running as a spawned task.
pub struct SpawnedListener {
    /// Stop signal for the accept loop.
    pub control: Box<dyn ListenerControl>,
    /// The accept loop itself; completes promptly after `stop`.
    pub task: JoinHandle<()>,
}

/// Server-side runtime: starts accept loops on demand.
#[async_trait]
pub trait ListenerRuntime: Send + Sync {
    /// Start an accept loop bound to exactly `port` on `config.host`.
    async fn start_listener(
        &self,
        config: &ServerConfig,
        port: u16,
    ) -> Result<SpawnedListener, ListenerError>;
}

/// Stop handle for a running accept loop.
#[async_trait]
pub trait ListenerControl: Send + Sync {
    /// Signal the accept loop to exit.
    async fn stop(&self);
}

/// Client-side runtime: opens sessions to remote listeners.
#[async_trait]
pub trait RemoteRuntime: Send + Sync {
    /// Open a session to `(host, port)`.
    async fn connect(&self, host: &str, port: u16) -> Result<Arc<dyn RemoteSession>, ConnectError>;
}

/// One live client session. Module proxies obtained through it are valid
/// only while the session is alive.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Check that `name` resolves in the remote module namespace.
    async fn resolve_module(&self, name: &str) -> Result<(), ResolveError>;
}
