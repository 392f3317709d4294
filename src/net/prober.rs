//! Readiness probe.
//!
//! # Responsibilities
//! - Fire unacknowledged warm-up datagrams at the peer for a bounded window
//! - Swallow every socket error: with no acknowledgment, success is
//!   unobservable and a failed send is indistinguishable from a lost packet
//!
//! # Design Decisions
//! - Purely time-bounded, never condition-bounded; the function cannot
//!   shorten on "success" because there is none to observe
//! - No retries-until-ack: total loss of every probe is tolerated
//! - Ephemeral socket, created and dropped within one probe cycle

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::{sleep, Instant};

/// Fixed payload recognized by the peer as a warm-up ping.
pub const PROBE_PAYLOAD: &[u8] = b"__ping__";

/// Probe `peer` with warm-up pings until `window` elapses, then return.
///
/// Never fails and never hangs: every error is logged and treated as
/// "send did not land". Returns within `window` plus one probe interval.
pub async fn probe(peer: SocketAddr, window: Duration, interval: Duration) {
    tracing::info!(peer = %peer, window = ?window, "Waiting for peer to warm up");

    let socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => socket,
        Err(e) => {
            // No socket means no probes, but the warm-up gate still holds.
            tracing::warn!(error = %e, "Probe socket unavailable, waiting out the window");
            sleep(window).await;
            return;
        }
    };

    let deadline = Instant::now() + window;
    let mut sent = 0u32;
    while Instant::now() < deadline {
        match socket.send_to(PROBE_PAYLOAD, peer).await {
            Ok(_) => sent += 1,
            Err(e) => {
                tracing::debug!(peer = %peer, error = %e, "Probe send failed, continuing");
            }
        }
        sleep(interval).await;
    }

    tracing::info!(peer = %peer, probes_sent = sent, "Probe window elapsed");
}
