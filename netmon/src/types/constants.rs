//! Constants for NetworkManager and ModemManager D-Bus values.
//!
//! These constants correspond to the numeric codes and strings used by the
//! D-Bus APIs the platform observers read, plus the monitor's own defaults.

/// NetworkManager global state constants (`NMState`).
#[allow(dead_code)]
pub mod nm_state {
    pub const UNKNOWN: u32 = 0;
    pub const ASLEEP: u32 = 10;
    pub const DISCONNECTED: u32 = 20;
    pub const DISCONNECTING: u32 = 30;
    pub const CONNECTING: u32 = 40;
    pub const CONNECTED_LOCAL: u32 = 50;
    pub const CONNECTED_SITE: u32 = 60;
    pub const CONNECTED_GLOBAL: u32 = 70;
}

/// NetworkManager connection type strings as reported by `PrimaryConnectionType`.
pub mod connection_type {
    pub const WIRELESS: &str = "802-11-wireless";
    pub const ETHERNET: &str = "802-3-ethernet";
    pub const GSM: &str = "gsm";
    pub const CDMA: &str = "cdma";
    pub const LOOPBACK: &str = "loopback";
}

/// ModemManager D-Bus locations.
pub mod modem_manager {
    pub const SERVICE: &str = "org.freedesktop.ModemManager1";
    pub const PATH: &str = "/org/freedesktop/ModemManager1";
    pub const MODEM_INTERFACE: &str = "org.freedesktop.ModemManager1.Modem";
}

/// Well-known radio access technology identifiers.
///
/// The resolver also accepts each of these with the `CTRadioAccessTechnology`
/// prefix some platforms report.
pub mod radio_access {
    pub const PLATFORM_PREFIX: &str = "CTRadioAccessTechnology";

    pub const GPRS: &str = "GPRS";
    pub const EDGE: &str = "Edge";
    pub const CDMA_1X: &str = "CDMA1x";
    pub const WCDMA: &str = "WCDMA";
    pub const HSDPA: &str = "HSDPA";
    pub const HSUPA: &str = "HSUPA";
    pub const CDMA_EVDO_REV0: &str = "CDMAEVDORev0";
    pub const CDMA_EVDO_REVA: &str = "CDMAEVDORevA";
    pub const CDMA_EVDO_REVB: &str = "CDMAEVDORevB";
    pub const EHRPD: &str = "eHRPD";
    pub const LTE: &str = "LTE";
    pub const NR_NSA: &str = "NRNSA";
    pub const NR: &str = "NR";
}

/// Monitor defaults.
pub mod defaults {
    /// Number of change notifications buffered per subscriber before it lags.
    pub const EVENT_CAPACITY: usize = 64;

    /// Name of the thread that owns the monitor state.
    pub const THREAD_NAME: &str = "netmon-monitor";
}
