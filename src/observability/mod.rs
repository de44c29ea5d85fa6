//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: app, port, attempt, error)
//!
//! Consumers:
//!     → stderr via the fmt layer, or a logfile when configured
//! ```
//!
//! # Design Decisions
//! - Structured logging throughout; failures always log the port, app
//!   tag, or module names involved
//! - Metrics are out of scope; tracing is the one output channel

pub mod logging;
