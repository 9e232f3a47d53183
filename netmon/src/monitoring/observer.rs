//! Seams for the raw connectivity observers.
//!
//! The monitor never talks to the OS directly. Path events come from a
//! [`PathObserver`], radio events from a [`RadioObserver`], and the current
//! radio access technology is read on demand through a
//! [`RadioAccessProvider`].

use async_trait::async_trait;

use crate::Result;
use crate::api::models::RadioAccessIdentifier;
use crate::api::network_monitor::EventSink;

/// Answers "which radio access technology is the data subscription using".
///
/// Called on the monitor thread while classifying a cellular path, so
/// implementations must answer from memory and never block on I/O.
pub trait RadioAccessProvider: Send + Sync + 'static {
    /// The current identifier, or `None` when there is no active cellular
    /// data service or the platform cannot report one.
    fn current_radio_access(&self) -> Option<RadioAccessIdentifier>;
}

impl<F> RadioAccessProvider for F
where
    F: Fn() -> Option<RadioAccessIdentifier> + Send + Sync + 'static,
{
    fn current_radio_access(&self) -> Option<RadioAccessIdentifier> {
        self()
    }
}

/// A provider for devices without a cellular radio.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRadio;

impl RadioAccessProvider for NoRadio {
    fn current_radio_access(&self) -> Option<RadioAccessIdentifier> {
        None
    }
}

/// Source of path-changed events.
#[async_trait]
pub trait PathObserver: Send + Sized {
    /// Feeds path snapshots into `sink` until the source ends or the
    /// monitor goes away.
    async fn run(self, sink: EventSink) -> Result<()>;
}

/// Source of radio-technology-changed events.
#[async_trait]
pub trait RadioObserver: Send + Sized {
    /// Signals `sink` whenever the radio access technology may have changed.
    async fn run(self, sink: EventSink) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_providers() {
        let provider = || Some(RadioAccessIdentifier::from("LTE"));
        assert_eq!(
            provider.current_radio_access(),
            Some(RadioAccessIdentifier::from("LTE"))
        );
    }

    #[test]
    fn no_radio_reports_nothing() {
        assert_eq!(NoRadio.current_radio_access(), None);
    }
}
