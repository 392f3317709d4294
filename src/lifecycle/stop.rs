//! Shared stop signal.
//!
//! # Responsibilities
//! - Aggregate the three independent stop sources into one flag
//! - Guarantee monotonicity: once raised, never cleared
//! - Record which sources fired, for shutdown-cause logging
//!
//! # Design Decisions
//! - One atomic per source; a read is the OR of all three
//! - Writes are idempotent, so no lock is needed; pollers tolerate
//!   staleness up to their own polling interval
//! - Handed to components as an explicit `Arc`, never ambient state

use std::sync::atomic::{AtomicBool, Ordering};

/// One of the independent sources that can request shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSource {
    /// The peer sent the quit command over UDP.
    PeerRequest,
    /// The operator interrupted the process (Ctrl-C).
    LocalInterrupt,
    /// The worker collaborator reported an unrecoverable failure.
    WorkerFault,
}

impl std::fmt::Display for StopSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopSource::PeerRequest => write!(f, "peer request"),
            StopSource::LocalInterrupt => write!(f, "local interrupt"),
            StopSource::WorkerFault => write!(f, "worker fault"),
        }
    }
}

/// Monotonic, multiply-set stop flag shared by every component.
///
/// Each source owns its own contributor bit. The aggregate is never reset
/// during the process lifetime.
/// Relaxed ordering is sufficient: contributors are independent monotonic
/// booleans and readers only need eventual visibility within one poll.
#[derive(Debug, Default)]
pub struct StopSignal {
    peer_request: AtomicBool,
    local_interrupt: AtomicBool,
    worker_fault: AtomicBool,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise one contributor. Returns `true` only on the first raise of
    /// that contributor; duplicate raises are no-ops.
    pub fn raise(&self, source: StopSource) -> bool {
        !self.contributor(source).swap(true, Ordering::Relaxed)
    }

    /// Whether any contributor has been raised.
    pub fn is_raised(&self) -> bool {
        self.peer_request.load(Ordering::Relaxed)
            || self.local_interrupt.load(Ordering::Relaxed)
            || self.worker_fault.load(Ordering::Relaxed)
    }

    /// Whether a specific contributor has been raised.
    pub fn is_source_raised(&self, source: StopSource) -> bool {
        self.contributor(source).load(Ordering::Relaxed)
    }

    /// The contributors raised so far, in a fixed order.
    pub fn causes(&self) -> Vec<StopSource> {
        [
            StopSource::PeerRequest,
            StopSource::LocalInterrupt,
            StopSource::WorkerFault,
        ]
        .into_iter()
        .filter(|source| self.is_source_raised(*source))
        .collect()
    }

    fn contributor(&self, source: StopSource) -> &AtomicBool {
        match source {
            StopSource::PeerRequest => &self.peer_request,
            StopSource::LocalInterrupt => &self.local_interrupt,
            StopSource::WorkerFault => &self.worker_fault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_lowered() {
        let stop = StopSignal::new();
        assert!(!stop.is_raised());
        assert!(stop.causes().is_empty());
    }

    #[test]
    fn any_source_raises_the_aggregate() {
        for source in [
            StopSource::PeerRequest,
            StopSource::LocalInterrupt,
            StopSource::WorkerFault,
        ] {
            let stop = StopSignal::new();
            assert!(stop.raise(source));
            assert!(stop.is_raised());
            assert_eq!(stop.causes(), vec![source]);
        }
    }

    #[test]
    fn duplicate_raise_is_idempotent() {
        let stop = StopSignal::new();
        assert!(stop.raise(StopSource::PeerRequest));
        assert!(!stop.raise(StopSource::PeerRequest));
        assert!(stop.is_raised());
        assert_eq!(stop.causes(), vec![StopSource::PeerRequest]);
    }

    #[test]
    fn sources_accumulate_and_never_clear() {
        let stop = StopSignal::new();
        stop.raise(StopSource::WorkerFault);
        stop.raise(StopSource::LocalInterrupt);
        assert_eq!(
            stop.causes(),
            vec![StopSource::LocalInterrupt, StopSource::WorkerFault]
        );
    }
}
