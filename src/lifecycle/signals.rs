//! OS signal handling.
//!
//! # Responsibilities
//! - Register the Ctrl-C handler (async-safe, via Tokio)
//! - Translate the interrupt into the local-interrupt stop contributor
//!
//! # Design Decisions
//! - An operator interrupt is equivalent to a peer-requested stop: both
//!   feed the same aggregate and trigger the same teardown
//! - Handler registration failure is logged, never fatal; the peer quit
//!   path and the worker fault path still work without it

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::stop::{StopSignal, StopSource};

/// Spawn a task that raises the local-interrupt contributor on Ctrl-C.
pub fn spawn_interrupt_watcher(stop: Arc<StopSignal>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, requesting shutdown");
                stop.raise(StopSource::LocalInterrupt);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install interrupt handler");
            }
        }
    })
}
