//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check cross-field requirements (TCP registrar needs a host)
//! - Validate value ranges (attempt counts, backoff schedule)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::{BridgeConfig, RegistryKind};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `server.host` or `connect.host` is empty.
    EmptyHost(&'static str),
    /// A TCP registrar was configured without a registry host.
    TcpRegistrarWithoutHost,
    /// An attempt count is zero.
    ZeroAttempts(&'static str),
    /// The resolve backoff schedule has no entries.
    EmptyBackoffSchedule,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyHost(field) => write!(f, "{} must not be empty", field),
            ValidationError::TcpRegistrarWithoutHost => {
                write!(f, "a tcp registrar requires an explicit registry host")
            }
            ValidationError::ZeroAttempts(field) => write!(f, "{} must be at least 1", field),
            ValidationError::EmptyBackoffSchedule => {
                write!(f, "connect.resolve_backoff_secs must not be empty")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a configuration for semantic problems.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.is_empty() {
        errors.push(ValidationError::EmptyHost("server.host"));
    }
    if config.connect.host.is_empty() {
        errors.push(ValidationError::EmptyHost("connect.host"));
    }

    if let Some(registrar) = &config.server.registrar {
        if registrar.kind == RegistryKind::Tcp && registrar.host.is_none() {
            errors.push(ValidationError::TcpRegistrarWithoutHost);
        }
    }

    if config.connect.max_connect_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts("connect.max_connect_attempts"));
    }
    if config.connect.max_resolve_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts("connect.max_resolve_attempts"));
    }
    if config.connect.resolve_backoff_secs.is_empty() {
        errors.push(ValidationError::EmptyBackoffSchedule);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
