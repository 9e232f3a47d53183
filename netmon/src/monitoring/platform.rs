//! Wiring of the Linux observers.
//!
//! Runs the NetworkManager path observer and the ModemManager radio observer
//! on a dedicated thread with its own single-threaded runtime, so the
//! monitor works the same whether or not the application uses an executor.

use log::{debug, warn};
use std::thread;
use zbus::Connection;

use crate::Result;
use crate::api::models::MonitorError;
use crate::api::network_monitor::EventSink;
use crate::monitoring::observer::{PathObserver, RadioObserver};
use crate::monitoring::path::NetworkManagerPathObserver;
use crate::monitoring::radio::{CachedRadioAccess, ModemManagerRadioObserver};

const OBSERVER_THREAD_NAME: &str = "netmon-observers";

/// Starts the platform observers feeding `sink`.
///
/// Radio updates are written to `radio`, which should be the provider the
/// monitor behind `sink` was created with. Failures after the thread has
/// started (no system bus, no NetworkManager) are logged and leave the
/// classification at its fallback. A missing modem is not a failure: the
/// radio observer waits for one to appear.
pub(crate) fn spawn_platform_observers(sink: EventSink, radio: CachedRadioAccess) -> Result<()> {
    thread::Builder::new()
        .name(OBSERVER_THREAD_NAME.to_string())
        .spawn(move || run_platform_observers(sink, radio))
        .map_err(MonitorError::Spawn)?;
    Ok(())
}

fn run_platform_observers(sink: EventSink, radio: CachedRadioAccess) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            warn!("Failed to start observer runtime, network type stays unknown: {e}");
            return;
        }
    };

    runtime.block_on(async move {
        let conn = match Connection::system().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("System D-Bus unavailable, network type stays unknown: {e}");
                return;
            }
        };
        debug!("Connected to system D-Bus, starting observers");

        let path = NetworkManagerPathObserver::new(conn.clone());
        let modem = ModemManagerRadioObserver::new(conn).with_cache(radio);

        let (path_result, radio_result) = tokio::join!(path.run(sink.clone()), modem.run(sink));

        if let Err(e) = path_result {
            warn!("Path observer stopped: {e}");
        }
        if let Err(e) = radio_result {
            warn!("Radio observer stopped: {e}");
        }
    });
}
