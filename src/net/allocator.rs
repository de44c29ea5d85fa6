//! OS port allocation.
//!
//! # Responsibilities
//! - Ask the OS for a free ephemeral port
//! - Validate that a caller-supplied port is currently bindable
//!
//! # Design Decisions
//! - The probe socket is closed before returning, so the returned port is
//!   a hint, not a reservation: the listener bind that follows can still
//!   lose the port to another process. The lifecycle manager's retry
//!   loop owns that race.
//! - An explicit port gets no retry here; the failure carries the OS
//!   error text and the attempted port for the caller to act on.

use tokio::net::TcpListener;

use crate::error::RpcError;

/// Obtains or validates TCP ports for listener startup.
pub struct PortAllocator;

impl PortAllocator {
    /// Return a bindable port on `host`.
    ///
    /// With `requested` unset (or 0) the OS picks an ephemeral free port,
    /// read back from the probe socket. With an explicit port the probe
    /// binds directly; failure is [`RpcError::PortUnavailable`].
    pub async fn allocate(host: &str, requested: Option<u16>) -> Result<u16, RpcError> {
        let want = requested.unwrap_or(0);

        let probe = TcpListener::bind((host, want))
            .await
            .map_err(|e| RpcError::PortUnavailable {
                port: want,
                reason: e.to_string(),
            })?;

        let port = probe
            .local_addr()
            .map_err(|e| RpcError::PortUnavailable {
                port: want,
                reason: e.to_string(),
            })?
            .port();

        tracing::trace!(host, port, "port probe succeeded");
        drop(probe);

        Ok(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ephemeral_allocation_returns_a_real_port() {
        let port = PortAllocator::allocate("127.0.0.1", None).await.unwrap();
        assert_ne!(port, 0);
    }

    #[tokio::test]
    async fn explicit_port_round_trips() {
        // Grab a free port, release it, then ask for it explicitly.
        let port = PortAllocator::allocate("127.0.0.1", None).await.unwrap();
        let validated = PortAllocator::allocate("127.0.0.1", Some(port))
            .await
            .unwrap();
        assert_eq!(validated, port);
    }

    #[tokio::test]
    async fn held_port_reports_unavailable() {
        let held = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = held.local_addr().unwrap().port();

        match PortAllocator::allocate("127.0.0.1", Some(port)).await {
            Err(RpcError::PortUnavailable { port: p, reason }) => {
                assert_eq!(p, port);
                assert!(!reason.is_empty());
            }
            other => panic!("expected PortUnavailable, got {:?}", other),
        }
    }
}
