//! Structured logging initialization.
//!
//! # Responsibilities
//! - Install the tracing subscriber for hosts that want this crate to
//!   own logging setup
//! - Honor the quiet and logfile options from the server configuration
//!
//! # Design Decisions
//! - quiet caps the level at warn rather than silencing entirely, so
//!   lifecycle failures still reach the operator
//! - RUST_LOG wins over the configured level when set
//! - Safe to call more than once; later installs are no-ops

use std::fs::File;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::BridgeConfig;

/// Initialize the tracing subscriber from configuration.
pub fn init(config: &BridgeConfig) -> io::Result<()> {
    let level = if config.server.quiet {
        "warn"
    } else {
        config.observability.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portbridge={level}")));

    match &config.server.logfile {
        Some(path) => {
            let file = File::create(path)?;
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init();
        }
    }

    Ok(())
}
