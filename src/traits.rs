// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Capability traits consumed by the transfer orchestrator.
//!
//! The orchestrator never talks to a node, a wallet or the attestation API
//! directly. Everything goes through these traits so that production code
//! plugs in [`crate::providers`] and tests plug in [`crate::testing`] fakes,
//! including adversarial ones (reverts, rate limits, wallets that refuse to
//! switch networks).
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use cctp_orchestrator::{Clock, Result};
//! use std::time::{Duration, Instant};
//!
//! struct InstantClock;
//!
//! #[async_trait::async_trait]
//! impl Clock for InstantClock {
//!     async fn sleep(&self, _duration: Duration) {}
//!
//!     fn now(&self) -> Instant {
//!         Instant::now()
//!     }
//! }
//! ```

use alloy_primitives::{Address, Bytes, Log, TxHash, B256, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::chain::ChainProfile;
use crate::error::Result;
use crate::protocol::AttestationRecord;

/// Outcome of a mined transaction, reduced to what the orchestrator inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub tx_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub logs: Vec<Log>,
}

/// Fee inputs for an EIP-1559 transaction, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParameters {
    pub base_fee_per_gas: u128,
}

/// Signing wallet plus RPC access for whichever chain is currently active.
///
/// Implementations hold the keys. Every method acts on the active chain,
/// which changes only through [`switch_chain`](Self::switch_chain).
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Reverted approvals, burns and mints
/// - Receipts that stay pending past a deadline
/// - Wallets that do not know the destination network
/// - Wallets that silently stay on the wrong network
#[async_trait]
pub trait BlockchainProvider: Send + Sync {
    /// Address transactions are signed and sent from.
    async fn account(&self) -> Result<Address>;

    /// ERC20 balance of `owner` for `token`.
    async fn get_balance(&self, token: Address, owner: Address) -> Result<U256>;

    /// ERC20 allowance granted by `owner` to `spender` for `token`.
    async fn get_allowance(&self, token: Address, owner: Address, spender: Address)
        -> Result<U256>;

    /// Gas the node expects `tx` to consume, without any margin.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64>;

    async fn get_fee_parameters(&self) -> Result<FeeParameters>;

    /// Signs and broadcasts `tx`, returning its hash as soon as the node accepts it.
    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash>;

    /// Returns `None` while the transaction is not yet mined.
    async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionOutcome>>;

    /// Chain id of the network the wallet is connected to.
    async fn get_active_chain(&self) -> Result<u64>;

    /// Asks the wallet to switch networks.
    ///
    /// # Errors
    ///
    /// Returns [`CctpError::UnrecognizedChain`](crate::CctpError::UnrecognizedChain)
    /// when the wallet has no configuration for `chain_id`; callers may then
    /// [`add_chain`](Self::add_chain) and retry.
    async fn switch_chain(&self, chain_id: u64) -> Result<()>;

    /// Registers a network with the wallet.
    async fn add_chain(&self, profile: &ChainProfile) -> Result<()>;
}

/// Trait for attestation retrieval from Circle's Iris API.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Rate limiting (429 responses)
/// - Not-yet-indexed messages (404 responses)
/// - State transitions (Pending → PendingConfirmations → Complete)
/// - Failed attestations and completes without a signature
#[async_trait]
pub trait AttestationProvider: Send + Sync {
    /// Fetches attestation status and signature for a message hash.
    async fn get_attestation(&self, message_hash: B256) -> Result<AttestationRecord>;

    /// Public keys of the active attesters, as SEC1-encoded secp256k1 points.
    ///
    /// Used only for optional signature checks; providers that cannot
    /// serve them return an empty list.
    async fn get_public_keys(&self) -> Result<Vec<Bytes>> {
        Ok(Vec::new())
    }
}

/// Trait for time-based operations.
///
/// Every wait in the orchestrator goes through this trait, so tests can run
/// the full 22-minute attestation budget instantly.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> Instant;
}
