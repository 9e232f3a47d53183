//! Raw connectivity observers.
//!
//! This module defines the traits the monitor consumes events through and
//! the NetworkManager / ModemManager implementations of them.

pub(crate) mod observer;
pub(crate) mod path;
pub(crate) mod platform;
pub(crate) mod radio;
