//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! connector resolve loop:
//!     attempt fails → RetrySchedule::delay_for(attempt) → sleep → retry
//! ```
//!
//! # Design Decisions
//! - Sticky clamped schedule, not exponential growth: the dominant
//!   failure mode is a host application still importing its modules, and
//!   a steady probe interval recovers faster than ever-longer waits
//! - Connect timeouts use a fixed short interval instead; the two retry
//!   loops deliberately have different policies

pub mod backoff;

pub use backoff::RetrySchedule;
