/// Print the network type and every change until interrupted.
#[tokio::main]
async fn main() -> netmon::Result<()> {
    let monitor = netmon::NetworkMonitor::system()?;

    println!("Current: {}", monitor.network_type().await);

    monitor
        .monitor_changes(|change| println!("Changed: {change}"))
        .await
}
