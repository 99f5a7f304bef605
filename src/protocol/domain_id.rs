// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP domain identifiers.
//!
//! A domain id names a ledger inside the protocol and is unrelated to the
//! EVM chain id. The burn call carries the destination's domain id, and
//! every message header carries both ends.
//!
//! Reference: <https://developers.circle.com/stablecoins/supported-domains>

use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain id of a ledger reachable through the v1 `TokenMessenger`.
///
/// Testnets share the domain id of their mainnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
#[non_exhaustive]
pub enum DomainId {
    Ethereum = 0,
    Avalanche = 1,
    Optimism = 2,
    Arbitrum = 3,
    Noble = 4,
    Solana = 5,
    Base = 6,
    Polygon = 7,
    Sui = 8,
    Aptos = 9,
    Unichain = 10,
}

impl DomainId {
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Ethereum),
            1 => Some(Self::Avalanche),
            2 => Some(Self::Optimism),
            3 => Some(Self::Arbitrum),
            4 => Some(Self::Noble),
            5 => Some(Self::Solana),
            6 => Some(Self::Base),
            7 => Some(Self::Polygon),
            8 => Some(Self::Sui),
            9 => Some(Self::Aptos),
            10 => Some(Self::Unichain),
            _ => None,
        }
    }

    /// Whether the domain is an EVM ledger, i.e. recipients are 20-byte addresses.
    #[inline]
    pub const fn is_evm(self) -> bool {
        !matches!(self, Self::Noble | Self::Solana | Self::Sui | Self::Aptos)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Avalanche => "Avalanche",
            Self::Optimism => "Optimism",
            Self::Arbitrum => "Arbitrum",
            Self::Noble => "Noble",
            Self::Solana => "Solana",
            Self::Base => "Base",
            Self::Polygon => "Polygon",
            Self::Sui => "Sui",
            Self::Aptos => "Aptos",
            Self::Unichain => "Unichain",
        }
    }
}

impl From<DomainId> for u32 {
    #[inline]
    fn from(domain: DomainId) -> Self {
        domain.as_u32()
    }
}

impl TryFrom<u32> for DomainId {
    type Error = InvalidDomainId;

    #[inline]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(InvalidDomainId(value))
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}

/// A numeric domain id that no known ledger uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid CCTP domain ID: {0}")]
pub struct InvalidDomainId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DomainId::Ethereum, 0)]
    #[case(DomainId::Avalanche, 1)]
    #[case(DomainId::Optimism, 2)]
    #[case(DomainId::Arbitrum, 3)]
    #[case(DomainId::Base, 6)]
    #[case(DomainId::Polygon, 7)]
    #[case(DomainId::Unichain, 10)]
    fn test_domain_values_round_trip(#[case] domain: DomainId, #[case] value: u32) {
        assert_eq!(domain.as_u32(), value);
        assert_eq!(DomainId::try_from(value).unwrap(), domain);
    }

    #[test]
    fn test_unknown_domain() {
        assert_eq!(DomainId::try_from(11).unwrap_err(), InvalidDomainId(11));
        assert_eq!(DomainId::from_u32(u32::MAX), None);
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&DomainId::Base).unwrap(), "6");
        let parsed: DomainId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, DomainId::Polygon);
        assert!(serde_json::from_str::<DomainId>("1653861089").is_err());
    }

    #[test]
    fn test_display_and_evm() {
        assert_eq!(DomainId::Base.to_string(), "Base (6)");
        assert!(DomainId::Polygon.is_evm());
        assert!(!DomainId::Solana.is_evm());
    }
}
