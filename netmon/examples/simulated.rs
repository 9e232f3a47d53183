use netmon::{InterfaceKind, NetworkMonitor, PathSnapshot, RadioAccessIdentifier, radio_access};
use std::sync::{Arc, Mutex};

/// Feed a scripted commute through a monitor and print what it reports.
fn main() -> netmon::Result<()> {
    let radio = Arc::new(Mutex::new(None::<RadioAccessIdentifier>));
    let provider = {
        let radio = radio.clone();
        move || radio.lock().ok().and_then(|id| id.clone())
    };

    let monitor = NetworkMonitor::new(provider)?;
    let mut changes = monitor.subscribe();

    let set_radio = |id: &str| {
        if let Ok(mut current) = radio.lock() {
            *current = Some(RadioAccessIdentifier::from(id));
        }
    };

    monitor.path_changed(PathSnapshot::reachable(InterfaceKind::Wifi))?;
    monitor.path_changed(PathSnapshot::unreachable(InterfaceKind::Wifi))?;
    set_radio(radio_access::LTE);
    monitor.path_changed(PathSnapshot::reachable(InterfaceKind::Cellular))?;
    set_radio(radio_access::WCDMA);
    monitor.radio_technology_changed()?;
    monitor.path_changed(PathSnapshot::reachable(InterfaceKind::WiredEthernet))?;

    println!("Final: {}", monitor.current_network_type());
    while let Ok(change) = changes.try_recv() {
        println!("  {change}");
    }
    Ok(())
}
