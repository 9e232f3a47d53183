//! Public API module.
//!
//! This module contains the high-level user-facing API for the `netmon` crate.

pub mod models;
pub mod network_monitor;
pub mod shared;
