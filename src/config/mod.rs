//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LinkConfig (validated, immutable)
//!     → shared by value with each component
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the daemon restarts to pick up changes
//! - All fields have defaults so the daemon runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::LinkConfig;
pub use schema::ListenerConfig;
pub use schema::PeerConfig;
pub use schema::ShutdownConfig;
pub use schema::WorkerConfig;
