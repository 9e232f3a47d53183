use futures::channel::oneshot;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;

use crate::Result;
use crate::api::models::{
    MonitorError, MonitorOptions, NetworkType, NetworkTypeChange, PathSnapshot,
};
use crate::core::worker::{self, Command};
use crate::monitoring::observer::RadioAccessProvider;
use crate::monitoring::platform::spawn_platform_observers;
use crate::monitoring::radio::CachedRadioAccess;

/// Reports what kind of network the device is on and when that changes.
///
/// A `NetworkMonitor` owns a dedicated thread that holds the current
/// [`NetworkType`]. Raw observers push events into it through an
/// [`EventSink`]; every event re-runs classification, and a change
/// notification is broadcast only when the classification actually changes.
///
/// # Creating an Instance
///
/// ```
/// use netmon::{InterfaceKind, NetworkMonitor, NetworkType, NoRadio, PathSnapshot};
///
/// # fn example() -> netmon::Result<()> {
/// let monitor = NetworkMonitor::new(NoRadio)?;
/// assert_eq!(monitor.current_network_type(), NetworkType::Unknown);
///
/// monitor.path_changed(PathSnapshot::reachable(InterfaceKind::Wifi))?;
/// assert_eq!(monitor.current_network_type(), NetworkType::Wifi);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
///
/// Most applications use the process-wide instance through
/// [`setup`](crate::setup) and [`current_network_type`](crate::current_network_type)
/// instead of constructing one.
///
/// # Thread Safety
///
/// `NetworkMonitor` is `Clone`, `Send` and `Sync`. All clones share the same
/// state. Queries may be made from any thread, including async executor
/// threads; they wait only for the events already queued ahead of them.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    sink: EventSink,
    events: broadcast::Sender<NetworkTypeChange>,
}

impl NetworkMonitor {
    /// Starts a monitor with default options.
    ///
    /// `radio` is consulted whenever the active path is cellular.
    pub fn new<R>(radio: R) -> Result<Self>
    where
        R: RadioAccessProvider,
    {
        Self::with_options(radio, MonitorOptions::default())
    }

    /// Starts a monitor with custom options.
    pub fn with_options<R>(radio: R, options: MonitorOptions) -> Result<Self>
    where
        R: RadioAccessProvider,
    {
        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let commands = worker::spawn(&options.thread_name, Arc::new(radio), events.clone())?;

        Ok(Self {
            inner: Arc::new(Inner {
                sink: EventSink { commands },
                events,
            }),
        })
    }

    /// Starts a monitor fed by NetworkManager and ModemManager.
    ///
    /// The observers connect to the system D-Bus in the background. Until
    /// NetworkManager has reported the first path, queries return
    /// [`NetworkType::Unknown`]; without a modem, cellular paths are
    /// reported as [`NetworkType::Cellular`].
    pub fn system() -> Result<Self> {
        let radio = CachedRadioAccess::default();
        let monitor = Self::new(radio.clone())?;
        spawn_platform_observers(monitor.sink(), radio)?;
        Ok(monitor)
    }

    /// Returns a handle observers use to feed events into this monitor.
    pub fn sink(&self) -> EventSink {
        self.inner.sink.clone()
    }

    /// Queues a path-changed event.
    pub fn path_changed(&self, snapshot: PathSnapshot) -> Result<()> {
        self.inner.sink.path_changed(snapshot)
    }

    /// Queues a radio-technology-changed event.
    pub fn radio_technology_changed(&self) -> Result<()> {
        self.inner.sink.radio_technology_changed()
    }

    /// Returns the current classification.
    ///
    /// Blocks until the monitor thread has processed every event queued
    /// before this call. Returns [`NetworkType::Unknown`] before the first
    /// path event, which is expected during startup and not an error.
    pub fn current_network_type(&self) -> NetworkType {
        match self.submit_query() {
            Some(reply) => futures::executor::block_on(Self::await_reply(reply)),
            None => NetworkType::Unknown,
        }
    }

    /// Async form of [`current_network_type`](Self::current_network_type).
    pub async fn network_type(&self) -> NetworkType {
        match self.submit_query() {
            Some(reply) => Self::await_reply(reply).await,
            None => NetworkType::Unknown,
        }
    }

    /// Returns `true` unless the current classification is `Offline`.
    pub fn is_available(&self) -> bool {
        self.current_network_type().is_available()
    }

    /// Subscribes to change notifications.
    ///
    /// Each receiver sees every transition that happens after it subscribed.
    /// A receiver that falls more than the configured capacity behind gets
    /// [`RecvError::Lagged`] and resumes from the oldest retained change.
    pub fn subscribe(&self) -> broadcast::Receiver<NetworkTypeChange> {
        self.inner.events.subscribe()
    }

    /// Number of live change subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.events.receiver_count()
    }

    /// Invokes `callback` for every change notification.
    ///
    /// Runs until the monitor shuts down. Run it in a background task.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(monitor: netmon::NetworkMonitor) -> netmon::Result<()> {
    /// monitor.monitor_changes(|change| {
    ///     println!("network changed: {change}");
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn monitor_changes<F>(&self, callback: F) -> Result<()>
    where
        F: Fn(NetworkTypeChange),
    {
        let mut changes = self.subscribe();
        debug!("Subscribed to network type changes");

        loop {
            match changes.recv().await {
                Ok(change) => callback(change),
                Err(RecvError::Lagged(missed)) => {
                    warn!("Change subscriber lagged, skipped {missed} notifications");
                }
                Err(RecvError::Closed) => {
                    warn!("Network type change stream closed");
                    return Err(MonitorError::StreamEnded("network type changes".into()));
                }
            }
        }
    }

    fn submit_query(&self) -> Option<oneshot::Receiver<NetworkType>> {
        let (tx, rx) = oneshot::channel();
        match self.inner.sink.send(Command::Query(tx)) {
            Ok(()) => Some(rx),
            Err(e) => {
                warn!("Cannot query network type: {e}");
                None
            }
        }
    }

    async fn await_reply(reply: oneshot::Receiver<NetworkType>) -> NetworkType {
        reply.await.unwrap_or_else(|_| {
            warn!("Network monitor dropped a query, reporting unknown");
            NetworkType::Unknown
        })
    }
}

/// Producer handle for feeding raw events into a [`NetworkMonitor`].
///
/// Cheap to clone; sending never blocks. Events are processed in the order
/// they are sent across all clones.
#[derive(Debug, Clone)]
pub struct EventSink {
    commands: mpsc::UnboundedSender<Command>,
}

impl EventSink {
    /// Reports a new network path.
    pub fn path_changed(&self, snapshot: PathSnapshot) -> Result<()> {
        self.send(Command::PathChanged(snapshot))
    }

    /// Reports that the radio access technology may have changed.
    pub fn radio_technology_changed(&self) -> Result<()> {
        self.send(Command::RadioChanged)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| MonitorError::Closed)
    }
}
