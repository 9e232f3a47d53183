//! Connection type registry.
//!
//! Maps the connection type strings NetworkManager reports for the primary
//! connection onto the interface kinds the classifier understands. Types the
//! registry does not know are treated as [`InterfaceKind::Other`].

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::api::models::InterfaceKind;
use crate::types::constants::connection_type;

/// Registry entry for one NetworkManager connection type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConnectionTypeInfo {
    pub(crate) connection_type: &'static str,
    pub(crate) interface: InterfaceKind,
}

const ENTRIES: &[ConnectionTypeInfo] = &[
    ConnectionTypeInfo {
        connection_type: connection_type::WIRELESS,
        interface: InterfaceKind::Wifi,
    },
    ConnectionTypeInfo {
        connection_type: connection_type::ETHERNET,
        interface: InterfaceKind::WiredEthernet,
    },
    ConnectionTypeInfo {
        connection_type: connection_type::GSM,
        interface: InterfaceKind::Cellular,
    },
    ConnectionTypeInfo {
        connection_type: connection_type::CDMA,
        interface: InterfaceKind::Cellular,
    },
    ConnectionTypeInfo {
        connection_type: connection_type::LOOPBACK,
        interface: InterfaceKind::Loopback,
    },
    ConnectionTypeInfo {
        connection_type: "bluetooth",
        interface: InterfaceKind::Other,
    },
    ConnectionTypeInfo {
        connection_type: "vpn",
        interface: InterfaceKind::Other,
    },
    ConnectionTypeInfo {
        connection_type: "wireguard",
        interface: InterfaceKind::Other,
    },
    ConnectionTypeInfo {
        connection_type: "bridge",
        interface: InterfaceKind::Other,
    },
    ConnectionTypeInfo {
        connection_type: "bond",
        interface: InterfaceKind::Other,
    },
    ConnectionTypeInfo {
        connection_type: "vlan",
        interface: InterfaceKind::Other,
    },
    ConnectionTypeInfo {
        connection_type: "tun",
        interface: InterfaceKind::Other,
    },
];

/// Populated once at first access and immutable thereafter.
static CONNECTION_TYPE_REGISTRY: OnceLock<HashMap<&'static str, ConnectionTypeInfo>> =
    OnceLock::new();

fn registry() -> &'static HashMap<&'static str, ConnectionTypeInfo> {
    CONNECTION_TYPE_REGISTRY.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|info| (info.connection_type, *info))
            .collect()
    })
}

/// Looks up registry information by NetworkManager connection type.
pub(crate) fn get_connection_type_info(kind: &str) -> Option<&'static ConnectionTypeInfo> {
    registry().get(kind)
}

/// Returns the interface kind for a NetworkManager connection type.
///
/// An empty string (no primary connection) and unknown types map to `Other`.
pub(crate) fn interface_kind_for(kind: &str) -> InterfaceKind {
    get_connection_type_info(kind)
        .map(|info| info.interface)
        .unwrap_or(InterfaceKind::Other)
}
