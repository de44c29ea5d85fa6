//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! bridge. All types derive Serde traits for deserialization from config
//! files, and every field has a documented default so a minimal (or
//! empty) config is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default service-registry port.
pub const DEFAULT_REGISTRY_PORT: u16 = 18811;

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener-side settings handed to the RPC runtime.
    pub server: ServerConfig,

    /// Client-side connect and module-resolve retry settings.
    pub connect: ConnectConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Listener startup options.
///
/// Replaces the loose option bag the wrapped runtime used to parse off a
/// command line: every knob is an explicit field with a documented
/// effect and default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind listeners on.
    pub host: String,

    /// Default requested port; 0 asks the OS for a free one.
    pub port: u16,

    /// Suppress the runtime's per-connection logging.
    pub quiet: bool,

    /// Redirect logging to a file instead of stderr.
    pub logfile: Option<PathBuf>,

    /// Credentials file for an authenticated listener; `None` starts an
    /// open (unauthenticated) one.
    pub authenticator: Option<PathBuf>,

    /// Service-registry client the runtime should announce through.
    pub registrar: Option<RegistrarConfig>,

    /// Whether the runtime announces the listener to the registry.
    pub auto_register: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 0,
            quiet: true,
            logfile: None,
            authenticator: None,
            registrar: None,
            auto_register: false,
        }
    }
}

/// Service-registry client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Discovery transport.
    pub kind: RegistryKind,

    /// Registry host. Required for TCP; UDP falls back to broadcast.
    pub host: Option<String>,

    /// Registry port.
    pub port: u16,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            kind: RegistryKind::Udp,
            host: None,
            port: DEFAULT_REGISTRY_PORT,
        }
    }
}

/// Discovery transport for the service registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    Udp,
    Tcp,
}

/// Client-side connection and module-resolve settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Remote host to connect to.
    pub host: String,

    /// Total connection attempts before a timeout becomes fatal.
    pub max_connect_attempts: u32,

    /// Total module-resolve attempts before giving up.
    pub max_resolve_attempts: u32,

    /// Fixed wait between timed-out connection attempts, in milliseconds.
    pub connect_retry_ms: u64,

    /// Backoff between resolve attempts, in seconds; the last entry
    /// repeats once attempts run past the end of the list.
    pub resolve_backoff_secs: Vec<u64>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            max_connect_attempts: 5,
            max_resolve_attempts: 5,
            connect_retry_ms: 500,
            resolve_backoff_secs: vec![1, 3, 5, 10],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). Capped at warn when
    /// the server config asks for quiet.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
