//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     prober.rs → fixed "__ping__" datagrams → peer (no reply expected)
//!
//! Runtime:
//!     peer → "__QUIT__" datagram → listener.rs → stop signal raised
//! ```
//!
//! # Design Decisions
//! - Both directions are best-effort UDP; total loss of any single
//!   datagram is tolerated by design
//! - One socket per component, never shared: the prober's is ephemeral,
//!   the listener's lives for the listener's lifetime
//! - Unrecognized traffic is ignored, not an error

pub mod listener;
pub mod prober;
