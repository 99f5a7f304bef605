// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the transfer orchestrator.

use alloy_chains::NamedChain;
use alloy_primitives::{TxHash, B256, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CctpError {
    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Invalid recipient {input:?}: {reason}")]
    InvalidRecipient { input: String, reason: String },

    #[error("Invalid transfer request: {0}")]
    InvalidRequest(String),

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("Allowance mismatch after approval: required {required}, actual {actual}")]
    AllowanceMismatch { required: U256, actual: U256 },

    #[error("No MessageSent event found in {logs_scanned} logs of transaction {tx_hash}")]
    MessageNotFound { tx_hash: TxHash, logs_scanned: usize },

    #[error("Attestation for {message_hash} reported complete without a signature")]
    MalformedAttestation { message_hash: B256 },

    #[error("Attestation failed: {reason}")]
    AttestationFailed { reason: String },

    #[error("Timed out waiting for attestation of {message_hash} after {attempts} attempts")]
    AttestationTimeout { message_hash: B256, attempts: u32 },

    #[error("Chain switch failed: expected chain id {expected}, active chain id {actual}")]
    ChainSwitchFailed { expected: u64, actual: u64 },

    #[error("Chain id {chain_id} is not known to the wallet")]
    UnrecognizedChain { chain_id: u64 },

    #[error("Chain not supported: {chain}")]
    UnsupportedChain { chain: NamedChain },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: TxHash },

    #[error("Timed out waiting for receipt of transaction {tx_hash}")]
    ReceiptTimeout { tx_hash: TxHash },

    #[error("Timed out during {operation}")]
    Timeout { operation: &'static str },

    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("A transfer for this request is already in progress")]
    TransferInProgress,

    #[error("Transfer cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    #[error("Attestation not found (will retry)")]
    AttestationNotFound,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Contract call failed: {0}")]
    ContractCall(#[from] alloy_contract::Error),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),
}

impl CctpError {
    /// Whether the error comes from the transport layer and may succeed on retry.
    ///
    /// Only the attestation poller retries on these; every phase that submits
    /// transactions treats them as fatal.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Provider(_)
                | Self::Rpc(_)
                | Self::RateLimitExceeded { .. }
                | Self::AttestationNotFound
                | Self::Json(_)
                | Self::Timeout { .. }
        )
    }

    /// Short, stable name of the variant, used for span error attributes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "InvalidAmount",
            Self::InvalidRecipient { .. } => "InvalidRecipient",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::AllowanceMismatch { .. } => "AllowanceMismatch",
            Self::MessageNotFound { .. } => "MessageNotFound",
            Self::MalformedAttestation { .. } => "MalformedAttestation",
            Self::AttestationFailed { .. } => "AttestationFailed",
            Self::AttestationTimeout { .. } => "AttestationTimeout",
            Self::ChainSwitchFailed { .. } => "ChainSwitchFailed",
            Self::UnrecognizedChain { .. } => "UnrecognizedChain",
            Self::UnsupportedChain { .. } => "UnsupportedChain",
            Self::TransactionReverted { .. } => "TransactionReverted",
            Self::ReceiptTimeout { .. } => "ReceiptTimeout",
            Self::Timeout { .. } => "Timeout",
            Self::InvalidTransition { .. } => "InvalidTransition",
            Self::TransferInProgress => "TransferInProgress",
            Self::Cancelled => "Cancelled",
            Self::Network(_) => "Network",
            Self::Provider(_) => "Provider",
            Self::RateLimitExceeded { .. } => "RateLimitExceeded",
            Self::AttestationNotFound => "AttestationNotFound",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::Rpc(_) => "Rpc",
            Self::ContractCall(_) => "ContractCall",
            Self::Abi(_) => "Abi",
            Self::Json(_) => "Json",
            Self::Hex(_) => "Hex",
        }
    }
}

pub type Result<T> = std::result::Result<T, CctpError>;
