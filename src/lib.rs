//! poselink — UDP lifecycle bridge for a pose-capture worker.
//!
//! Coordinates the lifecycle of a local sensor-processing worker with a
//! remote game-engine peer over best-effort UDP: no shared memory, no
//! supervision tree, and tolerance for total loss of any control datagram.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                  POSELINK                    │
//!                 │                                              │
//!   "__ping__"    │  ┌─────────┐      ┌──────────────────────┐  │
//!   ◀─────────────┼──│   net   │      │      lifecycle       │  │
//!   (warm-up)     │  │ prober  │◀─────│     coordinator      │  │
//!                 │  └─────────┘      │                      │  │
//!   "__QUIT__"    │  ┌─────────┐      │  Starting → Probing  │  │
//!   ─────────────▶┼─▶│   net   │─────▶│  → Running           │  │
//!   (peer stop)   │  │listener │ stop │  → ShuttingDown      │  │
//!                 │  └─────────┘ sig  │  → Stopped           │  │
//!                 │  ┌─────────┐      └──────────┬───────────┘  │
//!   Ctrl-C ──────▶┼─▶│ signals │─────▶ stop sig  │ start/stop   │
//!                 │  └─────────┘                 ▼              │
//!                 │                   ┌──────────────────────┐  │
//!                 │                   │        worker        │  │
//!                 │                   │  (capture process)   │──┼──▶ fault
//!                 │                   └──────────────────────┘  │    flag
//!                 └──────────────────────────────────────────────┘
//! ```
//!
//! Three independently scheduled loops: the coordinator polls the stop
//! disjuncts, the quit listener blocks on bounded-timeout receive, and the
//! worker runs opaquely in the background. Only the monotonic stop signal
//! crosses component boundaries.

// Core subsystems
pub mod config;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod worker;

pub use config::LinkConfig;
pub use lifecycle::{Coordinator, LinkState, StartupError, StopSignal, StopSource};
pub use worker::Worker;
