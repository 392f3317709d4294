//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse and do not collide
//! - Validate value ranges (intervals > 0, probe interval fits the window)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LinkConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::LinkConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "peer.address").
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &LinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let peer_addr = check_addr(&config.peer.address, "peer.address", &mut errors);
    let bind_addr = check_addr(&config.listener.bind_address, "listener.bind_address", &mut errors);

    if let (Some(peer), Some(bind)) = (peer_addr, bind_addr) {
        if peer == bind {
            errors.push(ValidationError {
                field: "listener.bind_address".to_string(),
                message: "listener address must differ from peer address".to_string(),
            });
        }
    }

    check_nonzero(config.peer.probe_window_ms, "peer.probe_window_ms", &mut errors);
    check_nonzero(config.peer.probe_interval_ms, "peer.probe_interval_ms", &mut errors);
    check_nonzero(config.listener.recv_timeout_ms, "listener.recv_timeout_ms", &mut errors);
    check_nonzero(config.shutdown.poll_interval_ms, "shutdown.poll_interval_ms", &mut errors);
    check_nonzero(config.shutdown.grace_period_ms, "shutdown.grace_period_ms", &mut errors);

    if config.peer.probe_interval_ms > config.peer.probe_window_ms {
        errors.push(ValidationError {
            field: "peer.probe_interval_ms".to_string(),
            message: "probe interval exceeds the probe window".to_string(),
        });
    }

    if let Some(command) = &config.worker.command {
        if command.is_empty() {
            errors.push(ValidationError {
                field: "worker.command".to_string(),
                message: "worker command must not be empty when present".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(value: &str, field: &str, errors: &mut Vec<ValidationError>) -> Option<SocketAddr> {
    match value.parse::<SocketAddr>() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError {
                field: field.to_string(),
                message: format!("not a valid socket address: {value:?}"),
            });
            None
        }
    }
}

fn check_nonzero(value: u64, field: &str, errors: &mut Vec<ValidationError>) {
    if value == 0 {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&LinkConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = LinkConfig::default();
        config.peer.address = "not-an-address".to_string();
        config.shutdown.poll_interval_ms = 0;
        config.worker.command = Some(vec![]);

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"peer.address"));
        assert!(fields.contains(&"shutdown.poll_interval_ms"));
        assert!(fields.contains(&"worker.command"));
    }

    #[test]
    fn rejects_listener_colliding_with_peer() {
        let mut config = LinkConfig::default();
        config.listener.bind_address = config.peer.address.clone();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.bind_address");
    }

    #[test]
    fn rejects_interval_longer_than_window() {
        let mut config = LinkConfig::default();
        config.peer.probe_window_ms = 100;
        config.peer.probe_interval_ms = 300;
        assert!(validate_config(&config).is_err());
    }
}
