//! A Rust library that reports what kind of network a device is on.
//!
//! This crate reduces low-level connectivity signals into one
//! [`NetworkType`] and tells interested parties when it changes:
//!
//! - Offline, Wi-Fi, wired Ethernet, loopback
//! - Cellular, bucketed by radio generation (2G/3G/4G/5G)
//! - A synchronous, thread-safe query for the current value
//! - A change notification fired once per actual transition
//!
//! # Example
//!
//! ```no_run
//! // Start the process-wide monitor as early as possible.
//! netmon::setup();
//!
//! // Later, from any thread:
//! if netmon::is_available() {
//!     println!("on {}", netmon::current_network_type());
//! }
//! ```
//!
//! # Custom Observers
//!
//! The process-wide monitor reads NetworkManager and ModemManager over the
//! system D-Bus. A [`NetworkMonitor`] can also be fed by anything else
//! through an [`EventSink`]:
//!
//! ```
//! use netmon::{InterfaceKind, NetworkMonitor, NetworkType, PathSnapshot, RadioAccessIdentifier};
//!
//! # fn example() -> netmon::Result<()> {
//! let monitor = NetworkMonitor::new(|| Some(RadioAccessIdentifier::from("LTE")))?;
//! let mut changes = monitor.subscribe();
//!
//! monitor.path_changed(PathSnapshot::reachable(InterfaceKind::Cellular))?;
//! assert_eq!(monitor.current_network_type(), NetworkType::Cellular4G);
//! assert_eq!(changes.try_recv().unwrap().current, NetworkType::Cellular4G);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Error Handling
//!
//! Classification never fails. Missing radio information, unrecognized
//! interfaces and early queries degrade to [`NetworkType::Unknown`] or
//! [`NetworkType::Cellular`]. Only the infrastructure (D-Bus, threads)
//! returns [`MonitorError`].
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, install any logger implementation in the application.

// Internal implementation modules
mod core;
mod dbus;
mod monitoring;
mod types;
mod util;

// Public API modules
pub mod api;

// Re-exported public API
pub use api::models::{
    InterfaceKind, MonitorError, MonitorOptions, NetworkType, NetworkTypeChange, PathSnapshot,
    RadioAccessIdentifier,
};
pub use api::network_monitor::{EventSink, NetworkMonitor};
pub use api::shared::{current_network_type, is_available, setup, shared};
pub use monitoring::observer::{NoRadio, PathObserver, RadioAccessProvider, RadioObserver};
pub use monitoring::path::NetworkManagerPathObserver;
pub use monitoring::radio::{CachedRadioAccess, ModemManagerRadioObserver};
pub use types::access_technology::AccessTechnologies;
pub use types::constants::radio_access;

/// A specialized `Result` type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
