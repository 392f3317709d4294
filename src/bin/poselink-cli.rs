use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::UdpSocket;

use poselink::net::listener::QUIT_COMMAND;
use poselink::net::prober::PROBE_PAYLOAD;

#[derive(Parser)]
#[command(name = "poselink-cli")]
#[command(about = "Control CLI for the poselink lifecycle bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a running bridge to shut down
    Quit {
        /// Quit-listener address of the bridge
        #[arg(short, long, default_value = "127.0.0.1:54321")]
        addr: SocketAddr,
    },
    /// Send warm-up pings the way the bridge probes its peer
    Ping {
        /// Address to ping
        #[arg(short, long, default_value = "127.0.0.1:52733")]
        addr: SocketAddr,
        /// Number of datagrams to send
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let socket = UdpSocket::bind("0.0.0.0:0").await?;

    match cli.command {
        Commands::Quit { addr } => {
            socket.send_to(QUIT_COMMAND.as_bytes(), addr).await?;
            println!("Sent {QUIT_COMMAND} to {addr}");
        }
        Commands::Ping { addr, count } => {
            for _ in 0..count {
                socket.send_to(PROBE_PAYLOAD, addr).await?;
            }
            println!("Sent {count} ping(s) to {addr}");
        }
    }

    Ok(())
}
