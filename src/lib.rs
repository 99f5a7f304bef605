// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # cctp-orchestrator
//!
//! Moves USDC between EVM chains with Circle's Cross-Chain Transfer Protocol
//! (CCTP v1), driving the whole lifecycle of one transfer:
//!
//! 1. **Approve** the source `TokenMessenger` to spend the amount
//! 2. **Burn** with `depositForBurn` and extract the `MessageSent` message
//! 3. **Attest** by polling Circle's attestation service for the signature
//! 4. **Mint** with `receiveMessage` on the destination chain
//!
//! The orchestrator is generic over a [`BlockchainProvider`] (the signing
//! wallet and its active chain), an [`AttestationProvider`] and a [`Clock`].
//! Production implementations live in [`providers`]; deterministic fakes for
//! tests live in [`testing`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use alloy_chains::NamedChain;
//! use alloy_network::EthereumWallet;
//! use cctp_orchestrator::providers::{AlloyBlockchainProvider, IrisAttestationProvider, TokioClock};
//! use cctp_orchestrator::{
//!     cancellation, ChainRegistry, OrchestratorConfig, TransferOrchestrator, TransferRequest,
//! };
//!
//! # async fn example(wallet: EthereumWallet) -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(ChainRegistry::builtin());
//! let provider = AlloyBlockchainProvider::new(wallet, registry.get(NamedChain::Arbitrum)?)?
//!     .with_chain(registry.get(NamedChain::Base)?)?;
//!
//! let orchestrator = TransferOrchestrator::builder()
//!     .provider(provider)
//!     .attestor(IrisAttestationProvider::production()?)
//!     .clock(TokioClock)
//!     .registry(registry)
//!     .config(OrchestratorConfig::from_env()?)
//!     .build();
//!
//! let request = TransferRequest::from_human_amount(
//!     NamedChain::Arbitrum,
//!     NamedChain::Base,
//!     "25.5",
//!     6,
//!     "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d",
//! )?;
//!
//! let (_cancel_handle, cancel) = cancellation();
//! match orchestrator.start(request, cancel).await {
//!     Ok(state) => println!("minted: {:?}", state.mint_tx_hash()),
//!     Err(failure) if failure.state.can_resume() => {
//!         // The burn is on chain; retry attestation and mint later.
//!         let (_handle, cancel) = cancellation();
//!         orchestrator.resume(*failure.state, cancel).await?;
//!     }
//!     Err(failure) => return Err(failure.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`TransferOrchestrator`], [`TransferRequest`], [`TransferState`] - running transfers
//! - [`TransferEvent`] - step and log events for a presentation layer
//! - [`OrchestratorConfig`] and [`PollingConfig`] - tunables, loadable from `CCTP_*` variables
//! - [`ChainProfile`] and [`ChainRegistry`] - per-chain contract addresses and endpoints
//! - [`CctpError`] and [`Result`] - error types for error handling
//! - [`amount`] - decimal to base-unit conversion
//! - [`protocol`] - domain ids, message codec and attestation payloads

pub mod amount;
mod bridge;
pub mod chain;
pub mod contracts;
mod error;
pub mod gas;
pub mod protocol;
pub mod providers;
pub mod testing;
mod traits;

pub use bridge::{
    cancellation, supported_chains, AllowanceProgress, AttemptCounters, CancelHandle,
    CancelSignal, FailureReason, GasConfig, LogEntry, LogLevel, OrchestratorConfig,
    PollingConfig, Step, StepStatus, TransferEvent, TransferFailure, TransferOrchestrator,
    TransferPhase, TransferRequest, TransferState,
};
pub use chain::{ChainProfile, ChainRegistry};
pub use error::{CctpError, Result};
pub use protocol::{AttestationRecord, AttestationStatus, DomainId};
pub use traits::{AttestationProvider, BlockchainProvider, Clock, FeeParameters, TransactionOutcome};

// Public module for advanced users who need custom instrumentation
pub mod spans;
