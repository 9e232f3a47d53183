//! Network path observation through NetworkManager.
//!
//! Watches NetworkManager's global `State` and `PrimaryConnectionType`
//! properties and turns every change of either into a [`PathSnapshot`].
//! Duplicate snapshots are fine: the monitor suppresses notifications when
//! the classification does not change.

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use log::{debug, warn};
use std::pin::Pin;
use zbus::Connection;

use crate::Result;
use crate::api::models::{MonitorError, PathSnapshot};
use crate::api::network_monitor::EventSink;
use crate::dbus::NMProxy;
use crate::monitoring::observer::PathObserver;
use crate::try_log;
use crate::types::connection_type_registry::interface_kind_for;
use crate::types::constants::nm_state;

/// Builds a snapshot from NetworkManager's state and primary connection type.
///
/// The path counts as reachable once NetworkManager reports at least
/// site-wide connectivity (a default route exists).
pub(crate) fn snapshot_from_nm(state: u32, primary_connection_type: &str) -> PathSnapshot {
    PathSnapshot::new(
        state >= nm_state::CONNECTED_SITE,
        interface_kind_for(primary_connection_type),
    )
}

/// Reads the current path from NetworkManager.
///
/// Returns `None` if either property cannot be read; the next property
/// change will try again.
async fn current_path(nm: &NMProxy<'_>) -> Option<PathSnapshot> {
    let state = try_log!(nm.state().await, "Failed to read NetworkManager state");
    let kind = try_log!(
        nm.primary_connection_type().await,
        "Failed to read primary connection type"
    );

    debug!("NetworkManager state {state}, primary connection type '{kind}'");

    Some(snapshot_from_nm(state, &kind))
}

/// [`PathObserver`] backed by NetworkManager on the system bus.
#[derive(Debug, Clone)]
pub struct NetworkManagerPathObserver {
    conn: Connection,
}

impl NetworkManagerPathObserver {
    /// Creates an observer on an existing D-Bus connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl PathObserver for NetworkManagerPathObserver {
    /// Emits the current path, then one snapshot per property change.
    ///
    /// Runs until the signal streams end or the monitor stops accepting
    /// events.
    async fn run(self, sink: EventSink) -> Result<()> {
        let nm = NMProxy::new(&self.conn).await?;

        // Subscribe before the first read so no change slips in between.
        let mut streams: Vec<Pin<Box<dyn Stream<Item = ()> + Send>>> = Vec::new();
        streams.push(Box::pin(nm.receive_state_changed().await.map(|_| ())));
        streams.push(Box::pin(
            nm.receive_primary_connection_type_changed()
                .await
                .map(|_| ()),
        ));
        debug!("Subscribed to NetworkManager path properties");

        if let Some(snapshot) = current_path(&nm).await {
            sink.path_changed(snapshot)?;
        }

        let mut merged = futures::stream::select_all(streams);

        while merged.next().await.is_some() {
            debug!("NetworkManager path property changed");
            if let Some(snapshot) = current_path(&nm).await {
                sink.path_changed(snapshot)?;
            }
        }

        warn!("NetworkManager property stream ended unexpectedly");
        Err(MonitorError::StreamEnded("NetworkManager path properties".into()))
    }
}
