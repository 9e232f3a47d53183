//! ModemManager access technology bitmask.

use bitflags::bitflags;

use crate::api::models::RadioAccessIdentifier;
use crate::types::constants::radio_access;

bitflags! {
    /// Access technologies a modem reports as in use (`MMModemAccessTechnology`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessTechnologies: u32 {
        const POTS = 1 << 0;
        const GSM = 1 << 1;
        const GSM_COMPACT = 1 << 2;
        const GPRS = 1 << 3;
        const EDGE = 1 << 4;
        const UMTS = 1 << 5;
        const HSDPA = 1 << 6;
        const HSUPA = 1 << 7;
        const HSPA = 1 << 8;
        const HSPA_PLUS = 1 << 9;
        const ONE_X_RTT = 1 << 10;
        const EVDO0 = 1 << 11;
        const EVDOA = 1 << 12;
        const EVDOB = 1 << 13;
        const LTE = 1 << 14;
        const NR5G = 1 << 15;
        const LTE_CAT_M = 1 << 16;
        const LTE_NB_IOT = 1 << 17;
    }
}

impl AccessTechnologies {
    /// Translates the most advanced technology in use into a radio access
    /// identifier.
    ///
    /// HSPA and HSPA+ have no identifier of their own and are reported as
    /// HSDPA; the LTE machine-type variants are reported as LTE. Returns
    /// `None` when no data-capable technology is set.
    pub fn identifier(self) -> Option<RadioAccessIdentifier> {
        let name = if self.contains(Self::NR5G) {
            radio_access::NR
        } else if self.intersects(Self::LTE | Self::LTE_CAT_M | Self::LTE_NB_IOT) {
            radio_access::LTE
        } else if self.contains(Self::EVDOB) {
            radio_access::CDMA_EVDO_REVB
        } else if self.contains(Self::EVDOA) {
            radio_access::CDMA_EVDO_REVA
        } else if self.contains(Self::EVDO0) {
            radio_access::CDMA_EVDO_REV0
        } else if self.intersects(Self::HSPA_PLUS | Self::HSPA | Self::HSDPA) {
            radio_access::HSDPA
        } else if self.contains(Self::HSUPA) {
            radio_access::HSUPA
        } else if self.contains(Self::UMTS) {
            radio_access::WCDMA
        } else if self.contains(Self::ONE_X_RTT) {
            radio_access::CDMA_1X
        } else if self.contains(Self::EDGE) {
            radio_access::EDGE
        } else if self.intersects(Self::GPRS | Self::GSM | Self::GSM_COMPACT) {
            radio_access::GPRS
        } else {
            return None;
        };
        Some(RadioAccessIdentifier::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(bits: AccessTechnologies) -> Option<String> {
        bits.identifier().map(|id| id.as_str().to_owned())
    }

    #[test]
    fn unknown_and_voice_only_have_no_identifier() {
        assert_eq!(id(AccessTechnologies::empty()), None);
        assert_eq!(id(AccessTechnologies::POTS), None);
    }

    #[test]
    fn single_technologies() {
        assert_eq!(id(AccessTechnologies::GPRS).as_deref(), Some("GPRS"));
        assert_eq!(id(AccessTechnologies::EDGE).as_deref(), Some("Edge"));
        assert_eq!(id(AccessTechnologies::UMTS).as_deref(), Some("WCDMA"));
        assert_eq!(id(AccessTechnologies::HSPA_PLUS).as_deref(), Some("HSDPA"));
        assert_eq!(id(AccessTechnologies::EVDOA).as_deref(), Some("CDMAEVDORevA"));
        assert_eq!(id(AccessTechnologies::LTE).as_deref(), Some("LTE"));
        assert_eq!(id(AccessTechnologies::LTE_NB_IOT).as_deref(), Some("LTE"));
        assert_eq!(id(AccessTechnologies::NR5G).as_deref(), Some("NR"));
    }

    #[test]
    fn most_advanced_technology_wins() {
        let nsa = AccessTechnologies::LTE | AccessTechnologies::NR5G;
        assert_eq!(id(nsa).as_deref(), Some("NR"));

        let umts = AccessTechnologies::UMTS | AccessTechnologies::HSDPA | AccessTechnologies::HSUPA;
        assert_eq!(id(umts).as_deref(), Some("HSDPA"));

        let gsm = AccessTechnologies::GSM | AccessTechnologies::EDGE;
        assert_eq!(id(gsm).as_deref(), Some("Edge"));
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let bits = AccessTechnologies::from_bits_truncate(0xFFFF_0000 & !0x0003_0000);
        assert_eq!(bits, AccessTechnologies::empty());
    }
}
