//! The process-wide monitor.
//!
//! [`NetworkMonitor`] instances can be created and passed around freely; this
//! module adds one lazily started instance backed by the platform observers
//! for applications that just want to ask "what network am I on".

use log::error;
use std::sync::OnceLock;

use crate::api::models::NetworkType;
use crate::api::network_monitor::NetworkMonitor;

/// `None` when the monitor could not be started.
static SHARED: OnceLock<Option<NetworkMonitor>> = OnceLock::new();

/// Returns the process-wide monitor, starting it on first use.
///
/// Returns `None` only if its threads could not be spawned.
pub fn shared() -> Option<&'static NetworkMonitor> {
    SHARED
        .get_or_init(|| match NetworkMonitor::system() {
            Ok(monitor) => Some(monitor),
            Err(e) => {
                error!("Failed to start the network monitor: {e}");
                None
            }
        })
        .as_ref()
}

/// Starts the process-wide monitor now instead of on first query.
///
/// Call this early during startup to shorten the window in which queries
/// report [`NetworkType::Unknown`]. Calling it again has no effect.
pub fn setup() {
    let _ = shared();
}

/// Returns the current classification from the process-wide monitor.
pub fn current_network_type() -> NetworkType {
    shared()
        .map(NetworkMonitor::current_network_type)
        .unwrap_or(NetworkType::Unknown)
}

/// Returns `true` unless the process-wide monitor reports `Offline`.
pub fn is_available() -> bool {
    current_network_type().is_available()
}
