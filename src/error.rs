//! Crate-wide error taxonomy.
//!
//! Flat by design: every lifecycle failure is one [`RpcError`] variant so
//! callers match on kind without unwrapping a hierarchy. Transient
//! failures (bind races, connect timeouts, startup-timing module misses)
//! are retried internally up to documented bounds; what surfaces here is
//! what remains after those bounds are exhausted, carrying the port, app
//! tag, or module names involved.

use thiserror::Error;

/// Errors surfaced by the server lifecycle and the remote connector.
#[derive(Debug, Error)]
pub enum RpcError {
    /// An explicitly requested port could not be bound. Never retried
    /// here; retry policy belongs to the lifecycle manager.
    #[error("port {port} unavailable: {reason}")]
    PortUnavailable { port: u16, reason: String },

    /// Every listener start attempt failed. `tried` lists the port of
    /// each attempt, in attempt order.
    #[error("server start failed for '{app}', tried ports: {tried:?}")]
    ServerStartFailed { app: String, tried: Vec<u16> },

    /// No listener is registered under the given application tag.
    #[error("no server started for '{0}'")]
    NoServerForApp(String),

    /// No listener is registered on the given port.
    #[error("no listener registered on port {0}")]
    UnknownPort(u16),

    /// Connection establishment failed past the retry bound, or failed
    /// with a non-transient transport error.
    #[error("connect to port {port} failed: {reason}")]
    ConnectFailed { port: u16, reason: String },

    /// The remote end closed the stream during connect.
    #[error("connection to port {port} ended unexpectedly (EOF)")]
    UnexpectedEof { port: u16 },

    /// One or more requested modules never became resolvable.
    #[error("no such module(s): {modules:?}")]
    ModuleNotFound { modules: Vec<String> },

    /// A malformed argument, rejected before any retry or connection.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `close_all_servers` could not close every listener. Each entry
    /// names the port and the failure; the remaining listeners were
    /// still attempted.
    #[error("shutdown incomplete, {} listener(s) failed to close: {failures:?}", .failures.len())]
    ShutdownIncomplete { failures: Vec<String> },
}
