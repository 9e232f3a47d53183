//! Path classification.
//!
//! Reduces a reachability verdict and an interface kind to one
//! [`NetworkType`]. Reachability is checked before the interface, so an
//! unusable Wi-Fi path is `Offline`, never `Wifi`.

use crate::api::models::{InterfaceKind, NetworkType, PathSnapshot};

/// Classifies a path.
///
/// `cellular` is only invoked when the interface is cellular and the path is
/// reachable, so callers may hand in a resolver that queries the radio.
pub(crate) fn classify<F>(reachable: bool, interface: InterfaceKind, cellular: F) -> NetworkType
where
    F: FnOnce() -> NetworkType,
{
    if !reachable {
        return NetworkType::Offline;
    }

    match interface {
        InterfaceKind::Other => NetworkType::Unknown,
        InterfaceKind::Wifi => NetworkType::Wifi,
        InterfaceKind::Loopback => NetworkType::Loopback,
        InterfaceKind::WiredEthernet => NetworkType::WiredEthernet,
        InterfaceKind::Cellular => cellular(),
    }
}

/// Classifies a stored snapshot.
pub(crate) fn classify_snapshot<F>(snapshot: &PathSnapshot, cellular: F) -> NetworkType
where
    F: FnOnce() -> NetworkType,
{
    classify(snapshot.reachable, snapshot.interface, cellular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const ALL_KINDS: [InterfaceKind; 5] = [
        InterfaceKind::Wifi,
        InterfaceKind::Cellular,
        InterfaceKind::WiredEthernet,
        InterfaceKind::Loopback,
        InterfaceKind::Other,
    ];

    #[test]
    fn unreachable_is_offline_for_every_kind() {
        for kind in ALL_KINDS {
            assert_eq!(
                classify(false, kind, || NetworkType::Cellular4G),
                NetworkType::Offline,
                "{kind}"
            );
        }
    }

    #[test]
    fn reachable_kinds() {
        let resolver = || NetworkType::Cellular3G;
        assert_eq!(classify(true, InterfaceKind::Wifi, resolver), NetworkType::Wifi);
        assert_eq!(
            classify(true, InterfaceKind::WiredEthernet, resolver),
            NetworkType::WiredEthernet
        );
        assert_eq!(
            classify(true, InterfaceKind::Loopback, resolver),
            NetworkType::Loopback
        );
        assert_eq!(
            classify(true, InterfaceKind::Other, resolver),
            NetworkType::Unknown
        );
        assert_eq!(
            classify(true, InterfaceKind::Cellular, resolver),
            NetworkType::Cellular3G
        );
    }

    #[test]
    fn resolver_only_runs_for_reachable_cellular() {
        let calls = Cell::new(0);
        let resolver = || {
            calls.set(calls.get() + 1);
            NetworkType::Cellular4G
        };

        for kind in ALL_KINDS {
            classify(false, kind, resolver);
        }
        for kind in ALL_KINDS.into_iter().filter(|k| *k != InterfaceKind::Cellular) {
            classify(true, kind, resolver);
        }
        assert_eq!(calls.get(), 0);

        classify(true, InterfaceKind::Cellular, resolver);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn classification_is_deterministic() {
        for reachable in [true, false] {
            for kind in ALL_KINDS {
                let first = classify(reachable, kind, || NetworkType::Cellular2G);
                let second = classify(reachable, kind, || NetworkType::Cellular2G);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn snapshot_helper_matches_fields() {
        let snap = PathSnapshot::reachable(InterfaceKind::Cellular);
        assert_eq!(
            classify_snapshot(&snap, || NetworkType::Cellular),
            NetworkType::Cellular
        );
    }
}
