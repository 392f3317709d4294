//! Worker collaborator subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator → Worker::start() (non-blocking, after the probe window)
//! Worker      → FaultHandle::raise() on unrecoverable internal failure
//! Coordinator → Worker::stop() during teardown, then polls is_stopped()
//! ```
//!
//! # Design Decisions
//! - The worker is opaque: this crate coordinates its lifecycle and
//!   observes its fault flag, nothing else
//! - Graceful stop is optional; workers without one inherit a no-op and
//!   acknowledge immediately, which is not an error
//! - Fault reporting goes through an injected handle into the shared stop
//!   aggregate, not through ambient global state

pub mod command;

use std::sync::Arc;

use thiserror::Error;

use crate::lifecycle::stop::{StopSignal, StopSource};

pub use command::CommandWorker;

/// Errors starting a worker collaborator.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to spawn worker process: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Handle a worker uses to report an unrecoverable internal failure.
///
/// Raising is idempotent; the coordinator observes it as one of the stop
/// disjuncts.
#[derive(Debug, Clone)]
pub struct FaultHandle {
    stop: Arc<StopSignal>,
}

impl FaultHandle {
    pub fn new(stop: Arc<StopSignal>) -> Self {
        Self { stop }
    }

    /// Report a fatal worker failure.
    pub fn raise(&self) {
        if self.stop.raise(StopSource::WorkerFault) {
            tracing::error!("Worker reported an unrecoverable failure");
        }
    }

    /// Whether a fault has been reported.
    pub fn is_raised(&self) -> bool {
        self.stop.is_source_raised(StopSource::WorkerFault)
    }
}

/// The lifecycle contract every worker collaborator exposes.
pub trait Worker: Send {
    /// Begin background processing. Must not block.
    fn start(&mut self) -> Result<(), WorkerError>;

    /// Request graceful termination. Best-effort; the default is a no-op
    /// for workers that have nothing to wind down.
    fn stop(&mut self) {}

    /// Whether the worker has finished winding down after `stop`.
    fn is_stopped(&self) -> bool {
        true
    }
}

/// Worker used when no capture process is configured. Keeps the daemon
/// useful as a pure signaling bridge.
#[derive(Debug, Default)]
pub struct NullWorker;

impl Worker for NullWorker {
    fn start(&mut self) -> Result<(), WorkerError> {
        tracing::warn!("No worker command configured, running as signaling bridge only");
        Ok(())
    }
}
