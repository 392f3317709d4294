//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (coordinator.rs):
//!     Probe peer (bounded window) → Bind quit listener → Start worker
//!
//! Runtime:
//!     stop.rs aggregates three contributors:
//!         quit listener  → peer request
//!         signals.rs     → local interrupt (Ctrl-C)
//!         worker         → fault handle
//!     coordinator.rs polls the aggregate at a fixed interval
//!
//! Shutdown (coordinator.rs):
//!     First disjunct → stop worker → bounded grace wait → exit
//! ```
//!
//! # Design Decisions
//! - The stop aggregate is monotonic; nothing ever lowers it
//! - Teardown is guarded by a one-shot latch, never re-entrant
//! - Forced abandonment after the grace period is an anomaly and logged
//!   as one, not a normal shutdown path

pub mod coordinator;
pub mod signals;
pub mod stop;

pub use coordinator::{Coordinator, LinkState, StartupError};
pub use stop::{StopSignal, StopSource};
