//! ModemManager modem proxy.

use zbus::{Result, proxy};

/// Proxy for a ModemManager modem object.
///
/// ```ignore
/// let mut stream = modem.receive_access_technologies_changed().await;
/// while let Some(change) = stream.next().await {
///     println!("Access technologies: {:#x}", change.get().await?);
/// }
/// ```
#[proxy(
    interface = "org.freedesktop.ModemManager1.Modem",
    default_service = "org.freedesktop.ModemManager1"
)]
pub trait MMModem {
    /// Bitmask of the access technologies currently in use
    /// (`MMModemAccessTechnology`).
    #[zbus(property)]
    fn access_technologies(&self) -> Result<u32>;

    /// Modem state (`MMModemState`, 11 = connected).
    #[zbus(property)]
    fn state(&self) -> Result<i32>;

    /// Modem model name.
    #[zbus(property)]
    fn model(&self) -> Result<String>;
}
