use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poselink::config::loader::load_config;
use poselink::config::LinkConfig;
use poselink::lifecycle::Coordinator;
use poselink::worker::{CommandWorker, NullWorker, Worker};

/// UDP lifecycle bridge between a pose-capture worker and a game-engine peer.
#[derive(Parser)]
#[command(name = "poselink", version)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Configuration could not be loaded or failed validation.
const EXIT_CONFIG_FAILURE: u8 = 1;
/// Startup failed before the running state (e.g., quit-listener bind).
const EXIT_STARTUP_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poselink=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("poselink v0.1.0 starting");

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load configuration");
                return ExitCode::from(EXIT_CONFIG_FAILURE);
            }
        },
        None => LinkConfig::default(),
    };

    tracing::info!(
        peer = %config.peer.address,
        listener = %config.listener.bind_address,
        probe_window_ms = config.peer.probe_window_ms,
        "Configuration loaded"
    );

    let coordinator = Coordinator::new(config.clone());
    let worker: Box<dyn Worker> = match &config.worker.command {
        Some(argv) => Box::new(CommandWorker::new(argv.clone(), coordinator.fault_handle())),
        None => Box::new(NullWorker),
    };

    match coordinator.run(worker).await {
        Ok(causes) => {
            let causes: Vec<String> = causes.iter().map(|c| c.to_string()).collect();
            tracing::info!(causes = ?causes, "Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            ExitCode::from(EXIT_STARTUP_FAILURE)
        }
    }
}
