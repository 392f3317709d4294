//! End-to-end shutdown scenarios for the lifecycle bridge.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::{sleep, timeout};

use poselink::config::LinkConfig;
use poselink::lifecycle::{Coordinator, StartupError, StopSource};
use poselink::worker::{Worker, WorkerError};

/// Worker double that records lifecycle calls.
struct TestWorker {
    started: Arc<AtomicU32>,
    stopped: Arc<AtomicU32>,
}

impl TestWorker {
    fn new() -> (Self, Arc<AtomicU32>, Arc<AtomicU32>) {
        let started = Arc::new(AtomicU32::new(0));
        let stopped = Arc::new(AtomicU32::new(0));
        (
            Self {
                started: started.clone(),
                stopped: stopped.clone(),
            },
            started,
            stopped,
        )
    }
}

impl Worker for TestWorker {
    fn start(&mut self) -> Result<(), WorkerError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Shortened timings so scenarios finish in well under a second.
/// Each test uses a unique listener port to allow parallel runs.
fn test_config(listener_port: u16) -> LinkConfig {
    let mut config = LinkConfig::default();
    config.peer.address = format!("127.0.0.1:{}", listener_port + 1);
    config.peer.probe_window_ms = 100;
    config.peer.probe_interval_ms = 30;
    config.listener.bind_address = format!("127.0.0.1:{}", listener_port);
    config.listener.recv_timeout_ms = 100;
    config.shutdown.poll_interval_ms = 20;
    config.shutdown.grace_period_ms = 300;
    config
}

/// Send `payload` to `addr` every 50 ms until `until` resolves, then
/// return its output. Repetition stands in for delivery guarantees the
/// protocol deliberately lacks.
async fn send_until_done<T>(
    addr: String,
    payload: &'static [u8],
    until: impl std::future::Future<Output = T>,
) -> T {
    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    tokio::pin!(until);
    loop {
        tokio::select! {
            out = &mut until => return out,
            _ = sleep(Duration::from_millis(50)) => {
                let _ = sender.send_to(payload, &addr).await;
            }
        }
    }
}

#[tokio::test]
async fn quit_datagram_drives_full_shutdown() {
    let config = test_config(28411);
    let addr = config.listener.bind_address.clone();
    let (worker, started, stopped) = TestWorker::new();

    let coordinator = Coordinator::new(config);
    let run = tokio::spawn(coordinator.run(Box::new(worker)));

    let result = timeout(
        Duration::from_secs(3),
        send_until_done(addr, b"__QUIT__", run),
    )
    .await
    .expect("run did not finish")
    .unwrap();

    let causes = result.unwrap();
    assert!(causes.contains(&StopSource::PeerRequest));
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(stopped.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn worker_fault_alone_drives_shutdown() {
    let config = test_config(28421);
    let (worker, _started, stopped) = TestWorker::new();

    let coordinator = Coordinator::new(config);
    let fault = coordinator.fault_handle();

    let run = tokio::spawn(coordinator.run(Box::new(worker)));
    tokio::spawn(async move {
        // Past the probe window, so the fault hits the running state.
        sleep(Duration::from_millis(250)).await;
        fault.raise();
    });

    let causes = timeout(Duration::from_secs(3), run)
        .await
        .expect("run did not finish")
        .unwrap()
        .unwrap();

    assert!(causes.contains(&StopSource::WorkerFault));
    assert_eq!(stopped.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn simultaneous_triggers_tear_down_exactly_once() {
    let config = test_config(28431);
    let addr = config.listener.bind_address.clone();
    let (worker, _started, stopped) = TestWorker::new();

    let coordinator = Coordinator::new(config);
    let fault = coordinator.fault_handle();

    let run = tokio::spawn(coordinator.run(Box::new(worker)));
    tokio::spawn(async move {
        sleep(Duration::from_millis(250)).await;
        fault.raise();
    });

    let result = timeout(
        Duration::from_secs(3),
        send_until_done(addr, b"__QUIT__", run),
    )
    .await
    .expect("run did not finish")
    .unwrap();

    assert!(result.is_ok());
    assert_eq!(
        stopped.load(Ordering::SeqCst),
        1,
        "teardown must run exactly once under concurrent triggers"
    );
}

#[tokio::test]
async fn bind_conflict_aborts_startup_without_worker() {
    let config = test_config(28441);

    // Occupy the listener port before the bridge gets there.
    let _squatter = UdpSocket::bind(config.listener.bind_address.clone())
        .await
        .unwrap();

    let (worker, started, stopped) = TestWorker::new();
    let coordinator = Coordinator::new(config);

    let err = timeout(Duration::from_secs(3), coordinator.run(Box::new(worker)))
        .await
        .expect("run did not finish")
        .unwrap_err();

    assert!(matches!(err, StartupError::Listener(_)));
    assert_eq!(started.load(Ordering::SeqCst), 0, "worker must never start");
    assert_eq!(stopped.load(Ordering::SeqCst), 0);
}
