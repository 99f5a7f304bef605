// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Static per-chain descriptors and the registry that serves them.

use std::collections::HashMap;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash};
use bon::Builder;

use super::addresses::*;
use crate::error::{CctpError, Result};
use crate::protocol::DomainId;

/// Everything the orchestrator needs to know about one ledger.
///
/// Contract addresses are optional because a profile may only ever serve one
/// side of a transfer: the USDC and `TokenMessenger` addresses matter on the
/// source, the `MessageTransmitter` on the destination.
///
/// # Example
///
/// ```rust
/// use cctp_orchestrator::{ChainProfile, DomainId};
/// use alloy_chains::NamedChain;
/// use alloy_primitives::address;
///
/// let profile = ChainProfile::builder()
///     .chain(NamedChain::Base)
///     .domain_id(DomainId::Base)
///     .rpc_url("https://mainnet.base.org")
///     .explorer_url("https://basescan.org")
///     .usdc(address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"))
///     .build();
///
/// assert_eq!(profile.chain_id(), 8453);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ChainProfile {
    pub chain: NamedChain,
    pub domain_id: DomainId,
    #[builder(into)]
    pub rpc_url: String,
    #[builder(into)]
    pub explorer_url: String,
    pub usdc: Option<Address>,
    pub token_messenger: Option<Address>,
    pub message_transmitter: Option<Address>,
}

impl ChainProfile {
    /// EVM chain id.
    pub fn chain_id(&self) -> u64 {
        self.chain.into()
    }

    /// Link to a transaction on the chain's block explorer.
    pub fn explorer_tx_url(&self, tx_hash: TxHash) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url.trim_end_matches('/'))
    }

    pub fn require_usdc(&self) -> Result<Address> {
        self.usdc.ok_or_else(|| self.missing("USDC"))
    }

    pub fn require_token_messenger(&self) -> Result<Address> {
        self.token_messenger
            .ok_or_else(|| self.missing("TokenMessenger"))
    }

    pub fn require_message_transmitter(&self) -> Result<Address> {
        self.message_transmitter
            .ok_or_else(|| self.missing("MessageTransmitter"))
    }

    fn missing(&self, contract: &str) -> CctpError {
        CctpError::InvalidConfig(format!(
            "no {contract} address configured for {}",
            self.chain
        ))
    }
}

/// Read-only table of [`ChainProfile`]s, shared by every run.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    profiles: HashMap<NamedChain, ChainProfile>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profiles for every chain with a published CCTP v1 deployment,
    /// pointed at public RPC endpoints.
    pub fn builtin() -> Self {
        use NamedChain::*;

        #[rustfmt::skip]
        let table = [
            (Mainnet, DomainId::Ethereum, "https://ethereum-rpc.publicnode.com", "https://etherscan.io",
                ETHEREUM_USDC, ETHEREUM_TOKEN_MESSENGER, ETHEREUM_MESSAGE_TRANSMITTER),
            (Arbitrum, DomainId::Arbitrum, "https://arb1.arbitrum.io/rpc", "https://arbiscan.io",
                ARBITRUM_USDC, ARBITRUM_TOKEN_MESSENGER, ARBITRUM_MESSAGE_TRANSMITTER),
            (Avalanche, DomainId::Avalanche, "https://api.avax.network/ext/bc/C/rpc", "https://snowtrace.io",
                AVALANCHE_USDC, AVALANCHE_TOKEN_MESSENGER, AVALANCHE_MESSAGE_TRANSMITTER),
            (Base, DomainId::Base, "https://mainnet.base.org", "https://basescan.org",
                BASE_USDC, BASE_TOKEN_MESSENGER, BASE_MESSAGE_TRANSMITTER),
            (Optimism, DomainId::Optimism, "https://mainnet.optimism.io", "https://optimistic.etherscan.io",
                OPTIMISM_USDC, OPTIMISM_TOKEN_MESSENGER, OPTIMISM_MESSAGE_TRANSMITTER),
            (Polygon, DomainId::Polygon, "https://polygon-rpc.com", "https://polygonscan.com",
                POLYGON_USDC, POLYGON_TOKEN_MESSENGER, POLYGON_MESSAGE_TRANSMITTER),
            (Sepolia, DomainId::Ethereum, "https://ethereum-sepolia-rpc.publicnode.com", "https://sepolia.etherscan.io",
                ETHEREUM_SEPOLIA_USDC, TESTNET_TOKEN_MESSENGER, TESTNET_MESSAGE_TRANSMITTER),
            (ArbitrumSepolia, DomainId::Arbitrum, "https://sepolia-rollup.arbitrum.io/rpc", "https://sepolia.arbiscan.io",
                ARBITRUM_SEPOLIA_USDC, TESTNET_TOKEN_MESSENGER, ARBITRUM_SEPOLIA_MESSAGE_TRANSMITTER),
            (BaseSepolia, DomainId::Base, "https://sepolia.base.org", "https://sepolia.basescan.org",
                BASE_SEPOLIA_USDC, TESTNET_TOKEN_MESSENGER, TESTNET_MESSAGE_TRANSMITTER),
        ];

        table.into_iter().fold(
            Self::new(),
            |registry, (chain, domain_id, rpc_url, explorer_url, usdc, messenger, transmitter)| {
                registry.with_profile(
                    ChainProfile::builder()
                        .chain(chain)
                        .domain_id(domain_id)
                        .rpc_url(rpc_url)
                        .explorer_url(explorer_url)
                        .usdc(usdc)
                        .token_messenger(messenger)
                        .message_transmitter(transmitter)
                        .build(),
                )
            },
        )
    }

    /// Adds or replaces the profile for `profile.chain`.
    pub fn with_profile(mut self, profile: ChainProfile) -> Self {
        self.profiles.insert(profile.chain, profile);
        self
    }

    /// Points an existing profile at a different RPC endpoint.
    pub fn with_rpc_url(mut self, chain: NamedChain, rpc_url: impl Into<String>) -> Result<Self> {
        let profile = self
            .profiles
            .get_mut(&chain)
            .ok_or(CctpError::UnsupportedChain { chain })?;
        profile.rpc_url = rpc_url.into();
        Ok(self)
    }

    pub fn get(&self, chain: NamedChain) -> Result<&ChainProfile> {
        self.profiles
            .get(&chain)
            .ok_or(CctpError::UnsupportedChain { chain })
    }

    pub fn by_chain_id(&self, chain_id: u64) -> Option<&ChainProfile> {
        self.profiles
            .values()
            .find(|profile| profile.chain_id() == chain_id)
    }

    pub fn chains(&self) -> impl Iterator<Item = NamedChain> + '_ {
        self.profiles.keys().copied()
    }
}
