//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (manager.rs):
//!     allocate port → start accept loop → register under app tag
//!
//! Close (manager.rs):
//!     deregister → stop signal → join accept task
//!
//! Shutdown (shutdown.rs):
//!     Shutdown::trigger → drain task → close_all_servers
//! ```
//!
//! # Design Decisions
//! - Registry mutations serialize through one mutex
//! - close blocks until the accept loop has fully exited
//! - At-exit draining is an explicit registration, not a hidden global

pub mod manager;
pub mod shutdown;

pub use manager::{ServerLifecycleManager, StartOptions, StartedServer};
pub use shutdown::Shutdown;
