//! Type definitions and constants.
//!
//! This module contains D-Bus constants and lookup tables for the values
//! NetworkManager and ModemManager report.

pub(crate) mod access_technology;
pub(crate) mod connection_type_registry;
pub(crate) mod constants;
