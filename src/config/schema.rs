//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the link
//! daemon. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the lifecycle bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LinkConfig {
    /// Peer (game-engine client) address and probe timing.
    pub peer: PeerConfig,

    /// Quit-listener configuration (bind address, receive timeout).
    pub listener: ListenerConfig,

    /// Shutdown coordinator timing.
    pub shutdown: ShutdownConfig,

    /// Worker collaborator settings.
    pub worker: WorkerConfig,
}

/// Peer address and readiness-probe timing.
///
/// The probe is fire-and-forget: no acknowledgment exists, so the window
/// is purely wall-clock bounded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Peer UDP address probed at startup (e.g., "127.0.0.1:52733").
    pub address: String,

    /// Total wall-clock window spent probing before the worker starts.
    pub probe_window_ms: u64,

    /// Spacing between consecutive probe datagrams.
    pub probe_interval_ms: u64,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:52733".to_string(),
            probe_window_ms: 5_000,
            probe_interval_ms: 300,
        }
    }
}

/// Quit-listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Local UDP address the quit listener binds (e.g., "127.0.0.1:54321").
    pub bind_address: String,

    /// Receive timeout. Bounds how long the loop blocks before re-checking
    /// the stop signal, so it also bounds listener exit latency.
    pub recv_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:54321".to_string(),
            recv_timeout_ms: 1_000,
        }
    }
}

/// Shutdown coordinator timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Interval at which the coordinator polls the stop disjuncts.
    pub poll_interval_ms: u64,

    /// Bounded wait for the listener and worker to observe the stop
    /// signal and exit on their own before they are abandoned.
    pub grace_period_ms: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            grace_period_ms: 500,
        }
    }
}

/// Worker collaborator settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WorkerConfig {
    /// Command line (argv) of the external capture process. When absent
    /// the daemon runs with a no-op worker.
    pub command: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_protocol() {
        let config = LinkConfig::default();
        assert_eq!(config.peer.address, "127.0.0.1:52733");
        assert_eq!(config.listener.bind_address, "127.0.0.1:54321");
        assert_eq!(config.peer.probe_interval_ms, 300);
        assert_eq!(config.shutdown.grace_period_ms, 500);
        assert!(config.worker.command.is_none());
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let config: LinkConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:6000"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:6000");
        assert_eq!(config.listener.recv_timeout_ms, 1_000);
        assert_eq!(config.peer.probe_window_ms, 5_000);
    }
}
