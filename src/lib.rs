//! Lifecycle and resilience layer around an external RPC runtime.
//!
//! Starts background remote-execution listeners inside long-running host
//! applications (one per application tag) and lets other processes
//! connect to them to import application-resident code modules. The wire
//! protocol is someone else's job and lives behind the [`runtime`]
//! traits; this crate owns the orchestration around it: port
//! allocation, duplicate prevention per application tag, bind retry
//! across the probe-to-bind race window, registry bookkeeping,
//! at-shutdown draining, and connect/resolve retry with a distinct
//! policy per failure class.
//!
//! ```text
//! server process                           client process
//! ──────────────                           ──────────────
//! ServerLifecycleManager                   RemoteConnector
//!   → net::PortAllocator (probe/validate)    → runtime::RemoteRuntime::connect
//!   → runtime::ListenerRuntime (accept loop)     timeout → fixed-interval retry
//!   → registry::Registry (port + app tag)    → runtime::RemoteSession::resolve_module
//!   → lifecycle::Shutdown (drain at exit)        miss → sticky-backoff retry
//! ```

// Core subsystems
pub mod config;
pub mod connector;
pub mod error;
pub mod lifecycle;
pub mod net;
pub mod registry;
pub mod runtime;

// Cross-cutting concerns
pub mod observability;
pub mod resilience;

pub use config::{BridgeConfig, ConnectConfig, ServerConfig};
pub use connector::{Connection, ImportOptions, ModuleRef, RemoteConnector};
pub use error::RpcError;
pub use lifecycle::{ServerLifecycleManager, Shutdown, StartOptions, StartedServer};
