//! UDP quit listener.
//!
//! # Responsibilities
//! - Bind the termination-signal receive socket (bind failure is fatal)
//! - Block on receive with a bounded timeout so the loop can re-check the
//!   stop signal even when no datagrams arrive
//! - Recognize the quit literal and raise the peer-request contributor
//!
//! # Design Decisions
//! - Malformed or unrecognized datagrams are ignored, never an error
//! - The socket has exactly one owner and is released on every exit path
//! - Exit latency is bounded by one receive timeout once the stop signal
//!   is raised, whichever side raised it

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::config::ListenerConfig;
use crate::lifecycle::stop::{StopSignal, StopSource};

/// Exact, case-sensitive command the peer sends to request shutdown.
/// Compared after trimming surrounding whitespace.
pub const QUIT_COMMAND: &str = "__QUIT__";

/// Receive buffer size. Control datagrams are tiny; anything longer than
/// this is already unrecognizable.
const RECV_BUFFER_LEN: usize = 1024;

/// Error type for quit-listener startup.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind the receive address (e.g., port already in use).
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// Listener for the peer's termination command.
///
/// Owns its receive socket exclusively; the socket lives from `bind` until
/// `run` returns.
#[derive(Debug)]
pub struct QuitListener {
    socket: UdpSocket,
    recv_timeout: Duration,
}

impl QuitListener {
    /// Bind the configured receive address.
    ///
    /// A bind failure aborts startup: without this socket the peer has no
    /// way to stop us, so running on would strand the process.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let socket = UdpSocket::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = socket.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(address = %local_addr, "Quit listener bound");

        Ok(Self {
            socket,
            recv_timeout: Duration::from_millis(config.recv_timeout_ms),
        })
    }

    /// The local address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    /// Receive until the quit command arrives or the stop signal is raised
    /// elsewhere. Consumes the listener; the socket is dropped on return.
    pub async fn run(self, stop: Arc<StopSignal>) {
        let mut buf = [0u8; RECV_BUFFER_LEN];

        loop {
            match timeout(self.recv_timeout, self.socket.recv_from(&mut buf)).await {
                Ok(Ok((len, from))) => {
                    if self.is_quit_command(&buf[..len], from) {
                        if stop.raise(StopSource::PeerRequest) {
                            tracing::info!(from = %from, "Received quit command from peer");
                        }
                        break;
                    }
                }
                Ok(Err(e)) => {
                    // Transient receive faults (e.g., ICMP-induced) are not
                    // a reason to stop listening.
                    tracing::warn!(error = %e, "Receive error on quit listener, continuing");
                }
                Err(_elapsed) => {
                    if stop.is_raised() {
                        tracing::debug!("Stop signal observed, quit listener exiting");
                        break;
                    }
                }
            }
        }
    }

    fn is_quit_command(&self, payload: &[u8], from: SocketAddr) -> bool {
        match std::str::from_utf8(payload) {
            Ok(text) if text.trim() == QUIT_COMMAND => true,
            Ok(text) => {
                tracing::debug!(from = %from, payload = %text.trim(), "Ignoring unrecognized datagram");
                false
            }
            Err(_) => {
                tracing::debug!(from = %from, len = payload.len(), "Ignoring non-UTF-8 datagram");
                false
            }
        }
    }
}
