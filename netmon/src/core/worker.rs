//! The monitor's serialized execution context.
//!
//! One dedicated thread owns [`MonitorState`] and drains a command queue.
//! Path events, radio events and queries all travel through that queue, so
//! they are handled strictly in arrival order and the state is never touched
//! from anywhere else. Change notifications are handed to a broadcast
//! channel and delivered to subscribers off this thread.

use futures::channel::oneshot;
use log::{debug, info, trace};
use std::sync::Arc;
use std::thread;
use tokio::sync::{broadcast, mpsc};

use crate::Result;
use crate::api::models::{MonitorError, NetworkType, NetworkTypeChange, PathSnapshot};
use crate::core::classifier::classify_snapshot;
use crate::core::radio::resolve;
use crate::monitoring::observer::RadioAccessProvider;

/// Work submitted to the monitor thread.
#[derive(Debug)]
pub(crate) enum Command {
    /// A new path snapshot from the network-interface observer.
    PathChanged(PathSnapshot),
    /// The radio access technology may have changed.
    RadioChanged,
    /// Read the current classification.
    Query(oneshot::Sender<NetworkType>),
}

/// Whether a path has been seen yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// No path event processed; the classification is `Unknown`.
    Uninitialized,
    /// At least one path event processed; holds the latest snapshot.
    Tracking(PathSnapshot),
}

/// The monitor's only mutable state.
#[derive(Debug)]
pub(crate) struct MonitorState {
    current: NetworkType,
    phase: Phase,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            current: NetworkType::Unknown,
            phase: Phase::Uninitialized,
        }
    }
}

impl MonitorState {
    pub(crate) fn current(&self) -> NetworkType {
        self.current
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// Stores `snapshot` as the latest path.
    pub(crate) fn record_path(&mut self, snapshot: PathSnapshot) {
        self.phase = Phase::Tracking(snapshot);
    }

    /// The latest path, if one has been recorded.
    pub(crate) fn last_path(&self) -> Option<PathSnapshot> {
        match self.phase {
            Phase::Uninitialized => None,
            Phase::Tracking(snapshot) => Some(snapshot),
        }
    }

    /// Writes a new classification.
    ///
    /// Returns the transition when the value actually changed, `None` when
    /// it is the same as before.
    pub(crate) fn apply(&mut self, next: NetworkType) -> Option<NetworkTypeChange> {
        if next == self.current {
            return None;
        }
        let previous = std::mem::replace(&mut self.current, next);
        Some(NetworkTypeChange {
            previous,
            current: next,
        })
    }
}

/// Owns the state; runs on the monitor thread only.
pub(crate) struct Worker {
    state: MonitorState,
    radio: Arc<dyn RadioAccessProvider>,
    events: broadcast::Sender<NetworkTypeChange>,
}

impl Worker {
    pub(crate) fn new(
        radio: Arc<dyn RadioAccessProvider>,
        events: broadcast::Sender<NetworkTypeChange>,
    ) -> Self {
        Self {
            state: MonitorState::default(),
            radio,
            events,
        }
    }

    /// Processes one command.
    pub(crate) fn handle(&mut self, command: Command) {
        match command {
            Command::PathChanged(snapshot) => self.on_path_changed(snapshot),
            Command::RadioChanged => self.on_radio_technology_changed(),
            Command::Query(reply) => {
                // The caller may have given up waiting.
                let _ = reply.send(self.state.current());
            }
        }
    }

    fn on_path_changed(&mut self, snapshot: PathSnapshot) {
        debug!("Path changed: {snapshot}");
        self.state.record_path(snapshot);
        self.reclassify(snapshot);
    }

    fn on_radio_technology_changed(&mut self) {
        let Some(snapshot) = self.state.last_path() else {
            debug!("Radio technology changed before any path was seen, ignoring");
            return;
        };
        debug!("Radio technology changed, reclassifying {snapshot}");
        self.reclassify(snapshot);
    }

    fn reclassify(&mut self, snapshot: PathSnapshot) {
        let radio = &self.radio;
        let next = classify_snapshot(&snapshot, || {
            let identifier = radio.current_radio_access();
            trace!("Current radio access technology: {identifier:?}");
            resolve(identifier.as_ref())
        });
        debug!("Classified {snapshot} as {next}");

        if let Some(change) = self.state.apply(next) {
            info!("Network type changed: {change}");
            if self.events.send(change).is_err() {
                trace!("No subscribers for network type change");
            }
        }
    }

    /// Drains the queue until every sender is gone.
    fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.blocking_recv() {
            self.handle(command);
        }
        debug!("Network monitor command queue closed, stopping");
    }
}

/// Starts the monitor thread and returns the queue feeding it.
pub(crate) fn spawn(
    thread_name: &str,
    radio: Arc<dyn RadioAccessProvider>,
    events: broadcast::Sender<NetworkTypeChange>,
) -> Result<mpsc::UnboundedSender<Command>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = Worker::new(radio, events);

    thread::Builder::new()
        .name(thread_name.to_string())
        .spawn(move || worker.run(rx))
        .map_err(MonitorError::Spawn)?;

    debug!("Started network monitor thread '{thread_name}'");
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{InterfaceKind, RadioAccessIdentifier};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRadio(Mutex<Option<RadioAccessIdentifier>>);

    impl FakeRadio {
        fn set(&self, id: Option<&str>) {
            *self.0.lock().expect("radio lock") = id.map(RadioAccessIdentifier::from);
        }
    }

    impl RadioAccessProvider for FakeRadio {
        fn current_radio_access(&self) -> Option<RadioAccessIdentifier> {
            self.0.lock().expect("radio lock").clone()
        }
    }

    fn worker() -> (
        Worker,
        Arc<FakeRadio>,
        broadcast::Receiver<NetworkTypeChange>,
    ) {
        let radio = Arc::new(FakeRadio::default());
        let (tx, rx) = broadcast::channel(16);
        (Worker::new(radio.clone(), tx), radio, rx)
    }

    fn drain(rx: &mut broadcast::Receiver<NetworkTypeChange>) -> Vec<NetworkTypeChange> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn state_starts_uninitialized_and_unknown() {
        let state = MonitorState::default();
        assert_eq!(state.current(), NetworkType::Unknown);
        assert_eq!(state.phase(), Phase::Uninitialized);
        assert_eq!(state.last_path(), None);
    }

    #[test]
    fn apply_reports_only_real_changes() {
        let mut state = MonitorState::default();
        assert_eq!(
            state.apply(NetworkType::Wifi),
            Some(NetworkTypeChange {
                previous: NetworkType::Unknown,
                current: NetworkType::Wifi,
            })
        );
        assert_eq!(state.apply(NetworkType::Wifi), None);
        assert_eq!(state.current(), NetworkType::Wifi);
    }

    #[test]
    fn first_path_moves_to_tracking() {
        let (mut worker, _radio, _rx) = worker();
        let snap = PathSnapshot::reachable(InterfaceKind::Loopback);
        worker.handle(Command::PathChanged(snap));
        assert_eq!(worker.state.phase(), Phase::Tracking(snap));
        assert_eq!(worker.state.current(), NetworkType::Loopback);
    }

    #[test]
    fn radio_change_before_any_path_is_ignored() {
        let (mut worker, radio, mut rx) = worker();
        radio.set(Some("LTE"));
        worker.handle(Command::RadioChanged);
        assert_eq!(worker.state.current(), NetworkType::Unknown);
        assert_eq!(worker.state.phase(), Phase::Uninitialized);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn radio_is_queried_fresh_on_each_classification() {
        let (mut worker, radio, mut rx) = worker();
        radio.set(Some("Edge"));
        worker.handle(Command::PathChanged(PathSnapshot::reachable(
            InterfaceKind::Cellular,
        )));
        radio.set(Some("WCDMA"));
        worker.handle(Command::RadioChanged);
        radio.set(None);
        worker.handle(Command::RadioChanged);

        let changes: Vec<_> = drain(&mut rx).into_iter().map(|c| c.current).collect();
        assert_eq!(
            changes,
            vec![
                NetworkType::Cellular2G,
                NetworkType::Cellular3G,
                NetworkType::Cellular
            ]
        );
    }

    #[test]
    fn notifications_match_adjacent_differences() {
        let (mut worker, radio, mut rx) = worker();
        radio.set(Some("LTE"));
        let events = [
            PathSnapshot::reachable(InterfaceKind::Wifi),
            PathSnapshot::reachable(InterfaceKind::Wifi),
            PathSnapshot::unreachable(InterfaceKind::Wifi),
            PathSnapshot::unreachable(InterfaceKind::Cellular),
            PathSnapshot::reachable(InterfaceKind::Cellular),
            PathSnapshot::reachable(InterfaceKind::Cellular),
            PathSnapshot::reachable(InterfaceKind::Other),
        ];

        for snap in events {
            worker.handle(Command::PathChanged(snap));
        }

        let changes = drain(&mut rx);
        assert_eq!(
            changes,
            vec![
                NetworkTypeChange {
                    previous: NetworkType::Unknown,
                    current: NetworkType::Wifi
                },
                NetworkTypeChange {
                    previous: NetworkType::Wifi,
                    current: NetworkType::Offline
                },
                NetworkTypeChange {
                    previous: NetworkType::Offline,
                    current: NetworkType::Cellular4G
                },
                NetworkTypeChange {
                    previous: NetworkType::Cellular4G,
                    current: NetworkType::Unknown
                },
            ]
        );
    }

    #[test]
    fn query_replies_with_current_value() {
        let (mut worker, _radio, _rx) = worker();
        worker.handle(Command::PathChanged(PathSnapshot::reachable(
            InterfaceKind::WiredEthernet,
        )));
        let (tx, mut rx) = oneshot::channel();
        worker.handle(Command::Query(tx));
        assert_eq!(rx.try_recv(), Ok(Some(NetworkType::WiredEthernet)));
    }

    #[test]
    fn query_with_dropped_caller_is_harmless() {
        let (mut worker, _radio, _rx) = worker();
        let (tx, rx) = oneshot::channel();
        drop(rx);
        worker.handle(Command::Query(tx));
        assert_eq!(worker.state.current(), NetworkType::Unknown);
    }
}
