//! D-Bus proxy interfaces for NetworkManager and ModemManager.
//!
//! This module contains low-level D-Bus proxy definitions for the services
//! the platform observers read over the system bus.

mod main_nm;
mod modem;

pub(crate) use main_nm::NMProxy;
pub(crate) use modem::MMModemProxy;
