//! Radio access technology to cellular generation.
//!
//! Buckets the identifier reported by the cellular subsystem into one of the
//! cellular [`NetworkType`] values. Resolution is a fixed table lookup and
//! never fails: a missing identifier yields [`NetworkType::Cellular`], and an
//! unrecognized one yields [`NetworkType::Cellular4G`].

use log::debug;

use crate::api::models::{NetworkType, RadioAccessIdentifier};
use crate::types::constants::radio_access;

const GENERATION_2G: &[&str] = &[radio_access::GPRS, radio_access::EDGE, radio_access::CDMA_1X];

const GENERATION_3G: &[&str] = &[
    radio_access::WCDMA,
    radio_access::HSDPA,
    radio_access::HSUPA,
    radio_access::CDMA_EVDO_REV0,
    radio_access::CDMA_EVDO_REVA,
    radio_access::CDMA_EVDO_REVB,
    radio_access::EHRPD,
];

const GENERATION_4G: &[&str] = &[radio_access::LTE];

/// Resolves a radio access identifier to a cellular generation.
///
/// NR identifiers are not matched explicitly and land on the `Cellular4G`
/// fallback together with every other unrecognized identifier.
pub(crate) fn resolve(identifier: Option<&RadioAccessIdentifier>) -> NetworkType {
    let Some(identifier) = identifier else {
        return NetworkType::Cellular;
    };

    let name = identifier
        .as_str()
        .strip_prefix(radio_access::PLATFORM_PREFIX)
        .unwrap_or(identifier.as_str());

    if GENERATION_2G.contains(&name) {
        NetworkType::Cellular2G
    } else if GENERATION_3G.contains(&name) {
        NetworkType::Cellular3G
    } else if GENERATION_4G.contains(&name) {
        NetworkType::Cellular4G
    } else {
        debug!("Unrecognized radio access technology {identifier}, assuming 4G");
        NetworkType::Cellular4G
    }
}
