//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → handed to the lifecycle manager / connector at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; per-call overrides (quiet, port,
//!   attempt counts) travel in option structs, not by mutating config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::BridgeConfig;
pub use schema::ConnectConfig;
pub use schema::ObservabilityConfig;
pub use schema::RegistrarConfig;
pub use schema::RegistryKind;
pub use schema::ServerConfig;
