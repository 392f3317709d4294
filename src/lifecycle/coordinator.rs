//! Shutdown coordination state machine.
//!
//! # Responsibilities
//! - Drive the lifecycle: Starting → Probing → Running → ShuttingDown → Stopped
//! - Gate the worker behind the probe window (the peer warm-up)
//! - Poll the stop disjuncts and run the teardown sequence exactly once
//!
//! # Design Decisions
//! - Cancellation is cooperative and polling-based; the only preemption is
//!   each loop's own bounded timeout
//! - Startup is fail-fast: a listener bind or worker spawn failure aborts
//!   before entering the running state
//! - Teardown shares one grace deadline between the worker acknowledgment
//!   wait and the listener join, so shutdown latency stays bounded by one
//!   polling interval plus the grace period

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, timeout, Instant};

use crate::config::LinkConfig;
use crate::lifecycle::signals;
use crate::lifecycle::stop::{StopSignal, StopSource};
use crate::net::listener::{ListenerError, QuitListener};
use crate::net::prober;
use crate::worker::{FaultHandle, Worker, WorkerError};

/// Lifecycle states of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Process start, nothing running yet.
    Starting,
    /// Warming up the peer with readiness probes.
    Probing,
    /// Listener and worker running, polling the stop disjuncts.
    Running,
    /// A stop disjunct fired; teardown in progress.
    ShuttingDown,
    /// Terminal. Process exit follows.
    Stopped,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LinkState::Starting => "starting",
            LinkState::Probing => "probing",
            LinkState::Running => "running",
            LinkState::ShuttingDown => "shutting-down",
            LinkState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Error type for startup failures. Anything here aborts before RUNNING.
#[derive(Debug)]
pub enum StartupError {
    /// The configured peer address does not parse.
    PeerAddress(std::net::AddrParseError),
    /// The quit listener could not bind its receive socket.
    Listener(ListenerError),
    /// The worker collaborator failed to start.
    Worker(WorkerError),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::PeerAddress(e) => write!(f, "Invalid peer address: {}", e),
            StartupError::Listener(e) => write!(f, "Quit listener failed: {}", e),
            StartupError::Worker(e) => write!(f, "Worker failed to start: {}", e),
        }
    }
}

impl std::error::Error for StartupError {}

/// Coordinates startup and shutdown of the listener and the worker.
pub struct Coordinator {
    config: LinkConfig,
    stop: Arc<StopSignal>,
    state: LinkState,
    /// One-shot latch: the teardown sequence must never run twice.
    teardown_done: AtomicBool,
}

impl Coordinator {
    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            stop: Arc::new(StopSignal::new()),
            state: LinkState::Starting,
            teardown_done: AtomicBool::new(false),
        }
    }

    /// The shared stop aggregate, for wiring into collaborators.
    pub fn stop_signal(&self) -> Arc<StopSignal> {
        self.stop.clone()
    }

    /// Handle the worker uses to report a fatal internal failure.
    pub fn fault_handle(&self) -> FaultHandle {
        FaultHandle::new(self.stop.clone())
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Run the full lifecycle to completion.
    ///
    /// Returns the stop sources that triggered shutdown, or the startup
    /// failure that aborted before the running state was reached.
    pub async fn run(mut self, mut worker: Box<dyn Worker>) -> Result<Vec<StopSource>, StartupError> {
        let peer: SocketAddr = self
            .config
            .peer
            .address
            .parse()
            .map_err(StartupError::PeerAddress)?;

        // Installed before probing so an early Ctrl-C still produces a
        // normal shutdown instead of killing the process mid-probe.
        let interrupt_task = signals::spawn_interrupt_watcher(self.stop.clone());

        let result = self.drive(peer, worker.as_mut()).await;
        interrupt_task.abort();

        result.map(|()| self.stop.causes())
    }

    async fn drive(&mut self, peer: SocketAddr, worker: &mut dyn Worker) -> Result<(), StartupError> {
        self.transition(LinkState::Probing);
        prober::probe(
            peer,
            Duration::from_millis(self.config.peer.probe_window_ms),
            Duration::from_millis(self.config.peer.probe_interval_ms),
        )
        .await;

        // Bind before the worker starts: if the peer cannot reach us to
        // say quit, the worker must never come up at all.
        let listener = QuitListener::bind(&self.config.listener)
            .await
            .map_err(StartupError::Listener)?;

        worker.start().map_err(StartupError::Worker)?;

        let listener_task = tokio::spawn(listener.run(self.stop.clone()));

        self.transition(LinkState::Running);
        self.poll_until_stop().await;

        self.transition(LinkState::ShuttingDown);
        self.teardown(worker, listener_task).await;

        self.transition(LinkState::Stopped);
        Ok(())
    }

    /// Poll the stop disjuncts at the configured interval.
    ///
    /// Every disjunct (peer request, local interrupt, worker fault) feeds
    /// the shared aggregate, so one read covers all three.
    async fn poll_until_stop(&self) {
        let mut ticker = interval(Duration::from_millis(self.config.shutdown.poll_interval_ms));
        loop {
            ticker.tick().await;
            if self.stop.is_raised() {
                break;
            }
        }
    }

    /// The teardown sequence. Runs at most once per process.
    async fn teardown(&self, worker: &mut dyn Worker, listener_task: JoinHandle<()>) {
        if self.teardown_done.swap(true, Ordering::Relaxed) {
            return;
        }

        let causes: Vec<String> = self.stop.causes().iter().map(|c| c.to_string()).collect();
        tracing::info!(causes = ?causes, "Stop requested, cleaning up");

        worker.stop();

        let poll = Duration::from_millis(self.config.shutdown.poll_interval_ms);
        let deadline = Instant::now() + Duration::from_millis(self.config.shutdown.grace_period_ms);

        while !worker.is_stopped() && Instant::now() < deadline {
            sleep(poll).await;
        }
        if !worker.is_stopped() {
            tracing::warn!("Worker did not acknowledge stop within the grace period");
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        let mut listener_task = listener_task;
        match timeout(remaining, &mut listener_task).await {
            Ok(_) => tracing::debug!("Quit listener exited cleanly"),
            Err(_) => {
                // Last resort; the listener should exit on its own within
                // one receive timeout of the stop signal being raised.
                tracing::warn!("Quit listener unresponsive after the grace period, abandoning");
                listener_task.abort();
            }
        }
    }

    fn transition(&mut self, next: LinkState) {
        tracing::info!(from = %self.state, to = %next, "State transition");
        self.state = next;
    }
}
