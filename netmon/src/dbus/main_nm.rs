//! Main NetworkManager proxy.

use zbus::proxy;

/// Proxy for the main NetworkManager interface.
///
/// Only the properties describing the primary connection are needed here.
/// Each property has a `receive_*_changed()` stream fed by NetworkManager's
/// `PropertiesChanged` signal.
#[proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
pub trait NM {
    /// Overall networking state (`NMState`, 70 = connected globally).
    #[zbus(property)]
    fn state(&self) -> zbus::Result<u32>;

    /// Connection type of the primary connection (e.g. `802-11-wireless`),
    /// empty when there is none.
    #[zbus(property)]
    fn primary_connection_type(&self) -> zbus::Result<String>;
}
