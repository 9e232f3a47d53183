//! Cellular radio observation through ModemManager.
//!
//! Follows the `AccessTechnologies` property of one modem ModemManager
//! exports. Each change is cached in a [`CachedRadioAccess`] before the
//! monitor is told to reclassify, so the monitor reads the new value without
//! touching D-Bus from its own thread.
//!
//! Modems come and go (USB sticks, ModemManager restarts). The observer
//! listens for `InterfacesAdded`/`InterfacesRemoved` and for the service
//! changing owner, and re-attaches whenever the set of modems changes.
//! Only one modem is followed at a time: the current one is kept while it
//! exists, otherwise the one with the lowest object path is picked.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use zbus::Connection;
use zbus::fdo::ObjectManagerProxy;
use zbus::proxy::{PropertyChanged, PropertyStream};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{MonitorError, RadioAccessIdentifier};
use crate::api::network_monitor::EventSink;
use crate::dbus::MMModemProxy;
use crate::monitoring::observer::{RadioAccessProvider, RadioObserver};
use crate::types::access_technology::AccessTechnologies;
use crate::types::constants::modem_manager;

/// Last access technology bitmask reported by the modem.
///
/// Clones share the same value. Reads are a single atomic load.
#[derive(Debug, Clone, Default)]
pub struct CachedRadioAccess {
    bits: Arc<AtomicU32>,
}

impl CachedRadioAccess {
    /// Replaces the cached bitmask.
    pub fn store(&self, technologies: AccessTechnologies) {
        self.bits.store(technologies.bits(), Ordering::Release);
    }

    /// Returns the cached bitmask.
    pub fn technologies(&self) -> AccessTechnologies {
        AccessTechnologies::from_bits_truncate(self.bits.load(Ordering::Acquire))
    }
}

impl RadioAccessProvider for CachedRadioAccess {
    fn current_radio_access(&self) -> Option<RadioAccessIdentifier> {
        self.technologies().identifier()
    }
}

/// What the observer has to do after the set of modems changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ModemSwitch {
    Keep,
    Attach(String),
    Detach,
}

/// Tracks the modems ModemManager exports and which one is followed.
#[derive(Debug, Default)]
pub(crate) struct ModemTracker {
    modems: BTreeSet<String>,
    active: Option<String>,
}

impl ModemTracker {
    /// Replaces the known modems, e.g. after a rescan.
    pub(crate) fn replace_all<I>(&mut self, modems: I) -> ModemSwitch
    where
        I: IntoIterator<Item = String>,
    {
        self.modems = modems.into_iter().collect();
        self.reselect()
    }

    pub(crate) fn added(&mut self, path: &str) -> ModemSwitch {
        self.modems.insert(path.to_owned());
        self.reselect()
    }

    pub(crate) fn removed(&mut self, path: &str) -> ModemSwitch {
        self.modems.remove(path);
        self.reselect()
    }

    /// ModemManager changed owner. Its objects are new even where paths
    /// repeat, so the followed modem is always re-attached.
    pub(crate) fn restarted<I>(&mut self, modems: I) -> ModemSwitch
    where
        I: IntoIterator<Item = String>,
    {
        let previous = self.active.take();
        match self.replace_all(modems) {
            ModemSwitch::Keep if previous.is_some() => ModemSwitch::Detach,
            switch => switch,
        }
    }

    /// The followed modem stopped reporting changes.
    pub(crate) fn lost(&mut self) -> ModemSwitch {
        if let Some(active) = &self.active {
            self.modems.remove(active);
        }
        self.reselect()
    }

    pub(crate) fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    fn reselect(&mut self) -> ModemSwitch {
        if let Some(active) = &self.active
            && self.modems.contains(active)
        {
            return ModemSwitch::Keep;
        }

        let next = self.modems.iter().next().cloned();
        if next == self.active {
            return ModemSwitch::Keep;
        }
        self.active = next.clone();
        match next {
            Some(path) => ModemSwitch::Attach(path),
            None => ModemSwitch::Detach,
        }
    }
}

/// Returns `true` if an exported object carries the modem interface.
fn exports_modem<'a>(mut interfaces: impl Iterator<Item = &'a str>) -> bool {
    interfaces.any(|name| name == modem_manager::MODEM_INTERFACE)
}

/// Lists the modems ModemManager currently exports.
///
/// An unreachable ModemManager counts as no modems; it announces them with
/// `InterfacesAdded` once it starts.
async fn list_modems(manager: &ObjectManagerProxy<'_>) -> Vec<String> {
    match manager.get_managed_objects().await {
        Ok(objects) => objects
            .into_iter()
            .filter(|(_, interfaces)| exports_modem(interfaces.keys().map(|name| name.as_str())))
            .map(|(path, _): (OwnedObjectPath, _)| path.as_str().to_owned())
            .collect(),
        Err(e) => {
            debug!("ModemManager not available: {e}");
            Vec::new()
        }
    }
}

/// Waits for the next change of the followed modem, or forever when no
/// modem is followed.
async fn next_change(
    changes: &mut Option<PropertyStream<'static, u32>>,
) -> Option<PropertyChanged<'static, u32>> {
    match changes {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// [`RadioObserver`] backed by ModemManager on the system bus.
#[derive(Debug, Clone)]
pub struct ModemManagerRadioObserver {
    conn: Connection,
    cache: CachedRadioAccess,
}

impl ModemManagerRadioObserver {
    /// Creates an observer on an existing D-Bus connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            cache: CachedRadioAccess::default(),
        }
    }

    /// Uses `cache` instead of a fresh one, so a provider handed to the
    /// monitor before the bus was reachable sees this observer's updates.
    pub fn with_cache(mut self, cache: CachedRadioAccess) -> Self {
        self.cache = cache;
        self
    }

    fn update(&self, bits: u32, sink: &EventSink) -> Result<()> {
        let technologies = AccessTechnologies::from_bits_truncate(bits);
        debug!(
            "Modem access technologies {bits:#x} ({:?})",
            technologies.identifier()
        );
        self.cache.store(technologies);
        sink.radio_technology_changed()
    }

    /// Applies `switch` and returns the change stream to follow next.
    async fn switch(
        &self,
        switch: ModemSwitch,
        changes: Option<PropertyStream<'static, u32>>,
        sink: &EventSink,
    ) -> Result<Option<PropertyStream<'static, u32>>> {
        match switch {
            ModemSwitch::Keep => Ok(changes),
            ModemSwitch::Detach => {
                debug!("No modem present, radio generation unavailable");
                self.update(0, sink)?;
                Ok(None)
            }
            ModemSwitch::Attach(path) => self.attach(path, sink).await,
        }
    }

    async fn attach(
        &self,
        path: String,
        sink: &EventSink,
    ) -> Result<Option<PropertyStream<'static, u32>>> {
        let modem = match MMModemProxy::builder(&self.conn).path(path.clone()) {
            Ok(builder) => builder.build().await,
            Err(e) => Err(e),
        };
        let modem = match modem {
            Ok(modem) => modem,
            Err(e) => {
                warn!("Failed to attach to modem {path}: {e}");
                self.update(0, sink)?;
                return Ok(None);
            }
        };

        // Subscribe before the first read so no change slips in between.
        let changes = modem.receive_access_technologies_changed().await;
        debug!("Subscribed to access technology changes on modem: {path}");

        if let (Ok(model), Ok(state)) = (modem.model().await, modem.state().await) {
            debug!("Observing modem '{model}' in state {state}");
        }
        let bits = match modem.access_technologies().await {
            Ok(bits) => bits,
            Err(e) => {
                warn!("Failed to read modem access technologies: {e}");
                0
            }
        };
        self.update(bits, sink)?;
        Ok(Some(changes))
    }
}

#[async_trait]
impl RadioObserver for ModemManagerRadioObserver {
    /// Follows modem access technology until the monitor goes away or
    /// ModemManager's signal streams end.
    async fn run(self, sink: EventSink) -> Result<()> {
        let manager = ObjectManagerProxy::builder(&self.conn)
            .destination(modem_manager::SERVICE)?
            .path(modem_manager::PATH)?
            .build()
            .await?;

        let mut added = manager.receive_interfaces_added().await?;
        let mut removed = manager.receive_interfaces_removed().await?;
        let mut owner = manager.inner().receive_owner_changed().await?;
        debug!("Subscribed to ModemManager object signals");

        let mut tracker = ModemTracker::default();
        let first = tracker.replace_all(list_modems(&manager).await);
        let mut changes = self.switch(first, None, &sink).await?;

        loop {
            let switch = tokio::select! {
                signal = added.next() => {
                    let Some(signal) = signal else { break };
                    match signal.args() {
                        Ok(args) if exports_modem(
                            args.interfaces_and_properties().keys().map(|name| name.as_str()),
                        ) => {
                            debug!("Modem added: {}", args.object_path());
                            tracker.added(args.object_path().as_str())
                        }
                        Ok(_) => ModemSwitch::Keep,
                        Err(e) => {
                            warn!("Failed to parse InterfacesAdded: {e}");
                            ModemSwitch::Keep
                        }
                    }
                }
                signal = removed.next() => {
                    let Some(signal) = signal else { break };
                    match signal.args() {
                        Ok(args) if exports_modem(args.interfaces().iter().map(|name| name.as_str())) => {
                            debug!("Modem removed: {}", args.object_path());
                            tracker.removed(args.object_path().as_str())
                        }
                        Ok(_) => ModemSwitch::Keep,
                        Err(e) => {
                            warn!("Failed to parse InterfacesRemoved: {e}");
                            ModemSwitch::Keep
                        }
                    }
                }
                new_owner = owner.next() => {
                    let Some(new_owner) = new_owner else { break };
                    match new_owner {
                        Some(name) => {
                            debug!("ModemManager now owned by {name}, rescanning modems");
                            tracker.restarted(list_modems(&manager).await)
                        }
                        None => {
                            debug!("ModemManager left the bus");
                            tracker.restarted(Vec::new())
                        }
                    }
                }
                change = next_change(&mut changes) => match change {
                    Some(change) => {
                        match change.get().await {
                            Ok(bits) => self.update(bits, &sink)?,
                            Err(e) => warn!("Failed to read access technology change: {e}"),
                        }
                        ModemSwitch::Keep
                    }
                    None => {
                        warn!(
                            "Access technology stream ended for modem {}",
                            tracker.active().unwrap_or("?")
                        );
                        tracker.lost()
                    }
                },
            };

            changes = self.switch(switch, changes.take(), &sink).await?;
        }

        // ModemManager is unreachable for good; forget the technology.
        self.cache.store(AccessTechnologies::empty());
        sink.radio_technology_changed()?;

        warn!("ModemManager signal stream ended unexpectedly");
        Err(MonitorError::StreamEnded("ModemManager objects".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEM_0: &str = "/org/freedesktop/ModemManager1/Modem/0";
    const MODEM_1: &str = "/org/freedesktop/ModemManager1/Modem/1";

    #[test]
    fn empty_cache_reports_no_radio() {
        let cache = CachedRadioAccess::default();
        assert_eq!(cache.current_radio_access(), None);
    }

    #[test]
    fn clones_share_updates() {
        let cache = CachedRadioAccess::default();
        let provider = cache.clone();
        cache.store(AccessTechnologies::LTE);
        assert_eq!(
            provider.current_radio_access(),
            Some(RadioAccessIdentifier::from("LTE"))
        );

        cache.store(AccessTechnologies::UMTS | AccessTechnologies::HSDPA);
        assert_eq!(
            provider.current_radio_access(),
            Some(RadioAccessIdentifier::from("HSDPA"))
        );
    }

    #[test]
    fn technologies_roundtrip_through_cache() {
        let cache = CachedRadioAccess::default();
        cache.store(AccessTechnologies::EDGE | AccessTechnologies::GSM);
        assert_eq!(
            cache.technologies(),
            AccessTechnologies::EDGE | AccessTechnologies::GSM
        );
    }

    #[test]
    fn modem_interface_is_recognized() {
        assert!(exports_modem(
            ["org.freedesktop.ModemManager1.Modem.Simple", modem_manager::MODEM_INTERFACE]
                .into_iter()
        ));
        assert!(!exports_modem(
            ["org.freedesktop.ModemManager1.Sim"].into_iter()
        ));
        assert!(!exports_modem(std::iter::empty()));
    }

    #[test]
    fn no_modem_at_start_then_hotplug_attaches() {
        let mut tracker = ModemTracker::default();
        assert_eq!(tracker.replace_all(Vec::new()), ModemSwitch::Keep);
        assert_eq!(tracker.active(), None);

        assert_eq!(
            tracker.added(MODEM_0),
            ModemSwitch::Attach(MODEM_0.to_owned())
        );
        assert_eq!(tracker.active(), Some(MODEM_0));
    }

    #[test]
    fn followed_modem_is_kept_while_present() {
        let mut tracker = ModemTracker::default();
        tracker.replace_all([MODEM_1.to_owned()]);

        // A lower path showing up does not steal the active modem.
        assert_eq!(tracker.added(MODEM_0), ModemSwitch::Keep);
        assert_eq!(tracker.active(), Some(MODEM_1));
        assert_eq!(tracker.removed(MODEM_0), ModemSwitch::Keep);
    }

    #[test]
    fn removal_falls_over_to_remaining_modem() {
        let mut tracker = ModemTracker::default();
        assert_eq!(
            tracker.replace_all([MODEM_1.to_owned(), MODEM_0.to_owned()]),
            ModemSwitch::Attach(MODEM_0.to_owned())
        );

        assert_eq!(
            tracker.removed(MODEM_0),
            ModemSwitch::Attach(MODEM_1.to_owned())
        );
        assert_eq!(tracker.removed(MODEM_1), ModemSwitch::Detach);
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn ended_stream_detaches_then_reattaches() {
        let mut tracker = ModemTracker::default();
        tracker.replace_all([MODEM_0.to_owned()]);

        assert_eq!(tracker.lost(), ModemSwitch::Detach);
        assert_eq!(
            tracker.added(MODEM_0),
            ModemSwitch::Attach(MODEM_0.to_owned())
        );
    }

    #[test]
    fn service_restart_rescans_onto_new_modem() {
        let mut tracker = ModemTracker::default();
        tracker.replace_all([MODEM_0.to_owned()]);

        // ModemManager leaves the bus, then comes back with a renumbered modem.
        assert_eq!(tracker.restarted(Vec::new()), ModemSwitch::Detach);
        assert_eq!(
            tracker.restarted([MODEM_1.to_owned()]),
            ModemSwitch::Attach(MODEM_1.to_owned())
        );
    }

    #[test]
    fn service_restart_reattaches_same_path() {
        let mut tracker = ModemTracker::default();
        tracker.replace_all([MODEM_0.to_owned()]);

        assert_eq!(
            tracker.restarted([MODEM_0.to_owned()]),
            ModemSwitch::Attach(MODEM_0.to_owned())
        );
        assert_eq!(tracker.active(), Some(MODEM_0));
    }

    #[test]
    fn restart_without_modems_is_quiet_when_idle() {
        let mut tracker = ModemTracker::default();
        assert_eq!(tracker.restarted(Vec::new()), ModemSwitch::Keep);
    }

    #[test]
    fn rescan_with_same_modem_keeps_it() {
        let mut tracker = ModemTracker::default();
        tracker.replace_all([MODEM_0.to_owned()]);
        assert_eq!(
            tracker.replace_all([MODEM_0.to_owned(), MODEM_1.to_owned()]),
            ModemSwitch::Keep
        );
        assert_eq!(tracker.active(), Some(MODEM_0));
    }
}
