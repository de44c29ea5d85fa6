//! Client-side connection and remote module import.
//!
//! # Data Flow
//! ```text
//! import_remote_modules(port, names)
//!     → validate names (fail fast, no connect attempt)
//!     → connect loop: timeout → fixed 500ms wait → retry
//!     → resolve loop: any miss → sticky [1,3,5,10]s backoff → re-resolve batch
//!     → (Connection, ModuleRefs)
//! ```
//!
//! # Design Decisions
//! - Two independent retry loops: a listener whose accept loop has not
//!   come up yet and a host application that has not imported a module
//!   yet have different causes and different sensible waits
//! - Module references hold a weak handle to the session, so dropping
//!   the Connection observably detaches every reference instead of
//!   leaving dangling proxies
//! - Non-timeout I/O errors and EOF during connect fail immediately;
//!   they are not startup races

use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;

use crate::config::ConnectConfig;
use crate::error::RpcError;
use crate::resilience::RetrySchedule;
use crate::runtime::{ConnectError, RemoteRuntime, RemoteSession, ResolveError};

/// Per-call overrides for `import_remote_modules`. Unset fields fall
/// back to the connector's [`ConnectConfig`].
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Remote host.
    pub host: Option<String>,

    /// Total connection attempts before a timeout becomes fatal.
    pub max_connect_attempts: Option<u32>,

    /// Total module-resolve attempts; values below 1 are clamped to 1.
    pub max_resolve_attempts: Option<u32>,
}

/// A live client session to a remote listener.
///
/// Module references resolved through it are valid only while this value
/// is alive; dropping it detaches every [`ModuleRef`].
pub struct Connection {
    session: Arc<dyn RemoteSession>,
    host: String,
    port: u16,
}

impl Connection {
    /// The session handle, for issuing calls through the runtime.
    pub fn session(&self) -> &Arc<dyn RemoteSession> {
        &self.session
    }

    /// The remote host this connection targets.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The remote port this connection targets.
    pub fn port(&self) -> u16 {
        self.port
    }
}

/// A named unit of remote code, pinned to its owning [`Connection`].
#[derive(Clone)]
pub struct ModuleRef {
    name: String,
    session: Weak<dyn RemoteSession>,
}

impl ModuleRef {
    /// The remote module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the owning connection is still alive.
    pub fn is_attached(&self) -> bool {
        self.session.strong_count() > 0
    }

    /// The owning session, while the connection is still alive.
    pub fn session(&self) -> Option<Arc<dyn RemoteSession>> {
        self.session.upgrade()
    }
}

impl std::fmt::Debug for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRef")
            .field("name", &self.name)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Establishes connections to remote listeners and imports modules with
/// bounded retry.
pub struct RemoteConnector {
    runtime: Arc<dyn RemoteRuntime>,
    config: ConnectConfig,
    resolve_schedule: RetrySchedule,
}

impl RemoteConnector {
    /// Create a connector that opens sessions through `runtime`.
    ///
    /// Fails with [`RpcError::InvalidArgument`] when the configured
    /// resolve backoff schedule is empty.
    pub fn new(runtime: Arc<dyn RemoteRuntime>, config: ConnectConfig) -> Result<Self, RpcError> {
        let resolve_schedule = RetrySchedule::from_secs(&config.resolve_backoff_secs)?;
        Ok(Self {
            runtime,
            config,
            resolve_schedule,
        })
    }

    /// Connect to `port` and resolve `modules` in the given order.
    ///
    /// Returns the connection together with the resolved references. The
    /// connection must be kept alive for as long as the references are
    /// used; dropping it detaches them.
    pub async fn import_remote_modules(
        &self,
        port: u16,
        modules: &[&str],
        opts: ImportOptions,
    ) -> Result<(Connection, Vec<ModuleRef>), RpcError> {
        if modules.is_empty() {
            return Err(RpcError::InvalidArgument(
                "expected a non-empty list of module names".to_string(),
            ));
        }

        let host = opts.host.unwrap_or_else(|| self.config.host.clone());
        let max_connect = opts
            .max_connect_attempts
            .unwrap_or(self.config.max_connect_attempts)
            .max(1);
        let max_resolve = opts
            .max_resolve_attempts
            .unwrap_or(self.config.max_resolve_attempts)
            .max(1);

        let session = self.connect_with_retry(&host, port, max_connect).await?;
        let refs = self
            .resolve_with_retry(&session, port, modules, max_resolve)
            .await?;

        Ok((
            Connection {
                session,
                host,
                port,
            },
            refs,
        ))
    }

    /// Connect, retrying only timeouts on a fixed short interval.
    async fn connect_with_retry(
        &self,
        host: &str,
        port: u16,
        max_attempts: u32,
    ) -> Result<Arc<dyn RemoteSession>, RpcError> {
        let wait = Duration::from_millis(self.config.connect_retry_ms);
        let mut attempt = 1;
        loop {
            match self.runtime.connect(host, port).await {
                Ok(session) => return Ok(session),
                Err(ConnectError::Timeout) => {
                    if attempt >= max_attempts {
                        return Err(RpcError::ConnectFailed {
                            port,
                            reason: format!("connection timed out after {attempt} attempts"),
                        });
                    }
                    debug!(host, port, attempt, "connect timed out, trying again");
                    attempt += 1;
                    tokio::time::sleep(wait).await;
                }
                Err(ConnectError::Io { errno, message }) => {
                    let reason = match errno {
                        Some(code) => format!("I/O error({code}): {message}"),
                        None => format!("I/O error: {message}"),
                    };
                    return Err(RpcError::ConnectFailed { port, reason });
                }
                Err(ConnectError::Eof) => return Err(RpcError::UnexpectedEof { port }),
            }
        }
    }

    /// Resolve the whole batch, backing off on the sticky schedule while
    /// any name is still missing. Partial success within a batch is not
    /// preserved; every attempt re-resolves all names.
    async fn resolve_with_retry(
        &self,
        session: &Arc<dyn RemoteSession>,
        port: u16,
        modules: &[&str],
        max_attempts: u32,
    ) -> Result<Vec<ModuleRef>, RpcError> {
        let mut attempt: u32 = 0;
        loop {
            let mut missing = Vec::new();
            for name in modules {
                match session.resolve_module(name).await {
                    Ok(()) => {}
                    Err(ResolveError::UnknownModule(_)) => missing.push((*name).to_string()),
                    Err(ResolveError::Transport(message)) => {
                        return Err(RpcError::ConnectFailed {
                            port,
                            reason: format!("session broke while resolving '{name}': {message}"),
                        });
                    }
                }
            }

            if missing.is_empty() {
                return Ok(modules
                    .iter()
                    .map(|name| ModuleRef {
                        name: (*name).to_string(),
                        session: Arc::downgrade(session),
                    })
                    .collect());
            }

            attempt += 1;
            if attempt >= max_attempts {
                return Err(RpcError::ModuleNotFound { modules: missing });
            }

            let delay = self.resolve_schedule.delay_for((attempt - 1) as usize);
            debug!(
                port,
                missing = ?missing,
                delay_secs = delay.as_secs(),
                "modules not resolvable yet, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
