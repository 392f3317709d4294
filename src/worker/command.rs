//! External capture process supervision.
//!
//! # Responsibilities
//! - Spawn the configured capture command when the coordinator says go
//! - Watch the child from a background task; an exit nobody asked for
//!   raises the worker-fault contributor
//! - Kill the child on `stop` and report acknowledgment via `is_stopped`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::oneshot;

use crate::worker::{FaultHandle, Worker, WorkerError};

/// Worker that runs the capture pipeline as an external child process.
pub struct CommandWorker {
    argv: Vec<String>,
    fault: FaultHandle,
    stop_tx: Option<oneshot::Sender<()>>,
    stopping: Arc<AtomicBool>,
    exited: Arc<AtomicBool>,
}

impl CommandWorker {
    /// Invariant upheld by config validation: `argv` is non-empty.
    pub fn new(argv: Vec<String>, fault: FaultHandle) -> Self {
        Self {
            argv,
            fault,
            stop_tx: None,
            stopping: Arc::new(AtomicBool::new(false)),
            exited: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Worker for CommandWorker {
    fn start(&mut self) -> Result<(), WorkerError> {
        let mut child = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .kill_on_drop(true)
            .spawn()?;

        tracing::info!(
            command = %self.argv.join(" "),
            pid = child.id(),
            "Worker process spawned"
        );

        let (stop_tx, mut stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let fault = self.fault.clone();
        let stopping = self.stopping.clone();
        let exited = self.exited.clone();

        tokio::spawn(async move {
            let self_exit = tokio::select! {
                status = child.wait() => Some(status),
                _ = &mut stop_rx => None,
            };
            match self_exit {
                Some(status) if stopping.load(Ordering::Relaxed) => {
                    tracing::info!(status = ?status.ok(), "Worker process stopped");
                }
                Some(status) => {
                    tracing::error!(status = ?status.ok(), "Worker process exited on its own");
                    fault.raise();
                }
                None => {
                    if let Err(e) = child.start_kill() {
                        tracing::warn!(error = %e, "Failed to kill worker process");
                    }
                    let status = child.wait().await;
                    tracing::info!(status = ?status.ok(), "Worker process stopped");
                }
            }
            exited.store(true, Ordering::Relaxed);
        });

        Ok(())
    }

    fn stop(&mut self) {
        self.stopping.store(true, Ordering::Relaxed);
        if let Some(tx) = self.stop_tx.take() {
            // The supervisor task may already be gone if the child exited.
            let _ = tx.send(());
        }
    }

    fn is_stopped(&self) -> bool {
        // Before start() there is nothing to wind down.
        let never_started = self.stop_tx.is_none() && !self.stopping.load(Ordering::Relaxed);
        self.exited.load(Ordering::Relaxed) || never_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::lifecycle::stop::StopSignal;

    fn fault_handle() -> (FaultHandle, Arc<StopSignal>) {
        let stop = Arc::new(StopSignal::new());
        (FaultHandle::new(stop.clone()), stop)
    }

    async fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
        let started = std::time::Instant::now();
        while started.elapsed() < deadline {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn unexpected_exit_raises_fault() {
        let (fault, _stop) = fault_handle();
        let mut worker = CommandWorker::new(vec!["true".to_string()], fault.clone());
        worker.start().unwrap();

        assert!(
            wait_until(Duration::from_secs(2), || fault.is_raised()).await,
            "self-exiting worker did not raise fault"
        );
    }

    #[tokio::test]
    async fn stop_kills_child_and_acknowledges() {
        let (fault, _stop) = fault_handle();
        let mut worker =
            CommandWorker::new(vec!["sleep".to_string(), "30".to_string()], fault.clone());
        worker.start().unwrap();

        worker.stop();
        assert!(
            wait_until(Duration::from_secs(2), || worker.is_stopped()).await,
            "stopped worker never acknowledged"
        );
        assert!(!fault.is_raised());
    }

    #[tokio::test]
    async fn missing_binary_fails_start() {
        let (fault, _stop) = fault_handle();
        let mut worker = CommandWorker::new(
            vec!["poselink-test-no-such-binary".to_string()],
            fault.clone(),
        );
        assert!(matches!(worker.start(), Err(WorkerError::Spawn(_))));
    }
}
