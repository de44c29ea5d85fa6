//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! start_server
//!     → allocator.rs (probe for a free port, or validate an explicit one)
//!     → runtime::ListenerRuntime binds the real listener on that port
//! ```
//!
//! # Design Decisions
//! - Probing and binding are separate steps with a documented race
//!   window between them; the allocator never pretends to reserve
//! - The allocator is the only place this crate touches raw sockets

pub mod allocator;

pub use allocator::PortAllocator;
