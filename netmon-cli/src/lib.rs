use clap::{ArgAction, Parser, Subcommand};
use log::debug;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use netmon::{NetworkMonitor, NetworkType};

#[derive(Parser, Debug)]
#[command(name = "netmon")]
#[command(about = "Reports what kind of network this machine is on")]
#[command(disable_version_flag = true)]
#[command(version)]
struct Args {
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current network type and exit
    Status {
        /// How long to wait for the first classification, in milliseconds
        #[arg(long, default_value_t = 1000)]
        wait_ms: u64,
    },
    /// Print every network type change until interrupted
    Watch,
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.version {
        println!("netmon {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let monitor = netmon::shared()
        .ok_or_else(|| anyhow::anyhow!("failed to start the network monitor"))?;

    match args.command.unwrap_or(Command::Status { wait_ms: 1000 }) {
        Command::Status { wait_ms } => {
            let current = runtime.block_on(settle(monitor, Duration::from_millis(wait_ms)));
            print_status(current);
        }
        Command::Watch => runtime.block_on(watch(monitor))?,
    }
    Ok(())
}

/// Waits until the monitor has left `Unknown` or `wait` has passed.
async fn settle(monitor: &NetworkMonitor, wait: Duration) -> NetworkType {
    let mut changes = monitor.subscribe();
    let current = monitor.network_type().await;
    if current != NetworkType::Unknown {
        return current;
    }

    debug!("No classification yet, waiting up to {wait:?}");
    match tokio::time::timeout(wait, changes.recv()).await {
        Ok(Ok(change)) => change.current,
        _ => monitor.network_type().await,
    }
}

fn print_status(current: NetworkType) {
    let availability = if current.is_available() {
        "available"
    } else {
        "unavailable"
    };
    println!("{current} ({availability})");
}

async fn watch(monitor: &NetworkMonitor) -> anyhow::Result<()> {
    let mut changes = monitor.subscribe();
    println!("{}", monitor.network_type().await);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, stopping watch");
                return Ok(());
            }
            change = changes.recv() => match change {
                Ok(change) => println!("{change}"),
                Err(RecvError::Lagged(missed)) => {
                    eprintln!("missed {missed} changes");
                    println!("{}", monitor.network_type().await);
                }
                Err(RecvError::Closed) => anyhow::bail!("network monitor stopped"),
            },
        }
    }
}
