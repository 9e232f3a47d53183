use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::types::constants::defaults;

/// The kind of network the device is currently on.
///
/// This is the single externally visible classification result. `Unknown`
/// is a legitimate steady state (for example before the first path event
/// arrives, or when the active interface cannot be categorized), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkType {
    /// No classification is available yet, or the interface is unrecognized.
    #[default]
    Unknown,
    /// The active path is not usable.
    Offline,
    /// Wi-Fi.
    Wifi,
    /// Loopback only.
    Loopback,
    /// Wired Ethernet.
    WiredEthernet,
    /// Cellular whose radio generation could not be determined.
    Cellular,
    /// 2G cellular (GPRS, EDGE, CDMA 1x).
    Cellular2G,
    /// 3G cellular (WCDMA, HSPA, EV-DO, eHRPD).
    Cellular3G,
    /// 4G cellular (LTE).
    Cellular4G,
    /// 5G cellular (NR).
    Cellular5G,
}

impl NetworkType {
    /// Returns `true` for the generic cellular value and every generation.
    pub fn is_cellular(self) -> bool {
        matches!(
            self,
            Self::Cellular
                | Self::Cellular2G
                | Self::Cellular3G
                | Self::Cellular4G
                | Self::Cellular5G
        )
    }

    /// Returns `true` unless the path is known to be offline.
    ///
    /// `Unknown` counts as available: it means "not classified", not "down".
    pub fn is_available(self) -> bool {
        self != Self::Offline
    }
}

impl Display for NetworkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Offline => write!(f, "offline"),
            Self::Wifi => write!(f, "wifi"),
            Self::Loopback => write!(f, "loopback"),
            Self::WiredEthernet => write!(f, "wiredEthernet"),
            Self::Cellular => write!(f, "cellular"),
            Self::Cellular2G => write!(f, "cellular2G"),
            Self::Cellular3G => write!(f, "cellular3G"),
            Self::Cellular4G => write!(f, "cellular4G"),
            Self::Cellular5G => write!(f, "cellular5G"),
        }
    }
}

/// Category of the network interface carrying the active path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceKind {
    /// Wi-Fi.
    Wifi,
    /// Cellular data (mobile broadband).
    Cellular,
    /// Wired Ethernet.
    WiredEthernet,
    /// Loopback.
    Loopback,
    /// Anything else (tunnels, bridges, Bluetooth, or no interface at all).
    Other,
}

impl Display for InterfaceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wifi => write!(f, "Wi-Fi"),
            Self::Cellular => write!(f, "Cellular"),
            Self::WiredEthernet => write!(f, "Ethernet"),
            Self::Loopback => write!(f, "Loopback"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// One path-changed event from the raw network-interface observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSnapshot {
    /// Whether the OS reports the path as usable.
    pub reachable: bool,
    /// Interface kind carrying the path.
    pub interface: InterfaceKind,
}

impl PathSnapshot {
    /// Creates a snapshot.
    pub fn new(reachable: bool, interface: InterfaceKind) -> Self {
        Self {
            reachable,
            interface,
        }
    }

    /// A reachable path over `interface`.
    pub fn reachable(interface: InterfaceKind) -> Self {
        Self::new(true, interface)
    }

    /// An unusable path over `interface`.
    pub fn unreachable(interface: InterfaceKind) -> Self {
        Self::new(false, interface)
    }
}

impl Display for PathSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.reachable {
            "reachable"
        } else {
            "unreachable"
        };
        write!(f, "{} ({verdict})", self.interface)
    }
}

/// Opaque identifier of the cellular radio access technology in use.
///
/// Well-known values live in [`crate::radio_access`]. Anything else is
/// still accepted; the resolver decides how to bucket it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadioAccessIdentifier(String);

impl RadioAccessIdentifier {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as reported.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RadioAccessIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RadioAccessIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for RadioAccessIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification payload fired once per actual classification change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTypeChange {
    /// Value before the change.
    pub previous: NetworkType,
    /// Value after the change.
    pub current: NetworkType,
}

impl Display for NetworkTypeChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.previous, self.current)
    }
}

/// Options for constructing a [`NetworkMonitor`](crate::NetworkMonitor).
///
/// None of these affect classification; they size the plumbing around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOptions {
    /// Change notifications buffered per subscriber before it starts lagging.
    pub event_capacity: usize,
    /// Name given to the thread that owns the monitor state.
    pub thread_name: String,
}

impl Default for MonitorOptions {
    /// Returns the default monitor options.
    ///
    /// Defaults:
    /// - `event_capacity`: 64
    /// - `thread_name`: `"netmon-monitor"`
    fn default() -> Self {
        Self {
            event_capacity: defaults::EVENT_CAPACITY,
            thread_name: defaults::THREAD_NAME.to_string(),
        }
    }
}

impl MonitorOptions {
    /// Sets the per-subscriber notification buffer. Clamped to at least 1.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Sets the monitor thread's name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Errors from the monitor's infrastructure.
///
/// Classification itself never fails; these only describe why an observer
/// or the monitor thread could not run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MonitorError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A standard D-Bus interface call failed.
    #[error("D-Bus interface error: {0}")]
    DbusFdo(#[from] zbus::fdo::Error),

    /// The monitor thread could not be started.
    #[error("failed to spawn monitor thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The monitor thread is gone and no longer accepts events.
    #[error("network monitor is no longer running")]
    Closed,

    /// An observer's signal stream ended.
    #[error("observer stream ended: {0}")]
    StreamEnded(String),
}
