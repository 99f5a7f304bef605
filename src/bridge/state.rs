// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer requests and the per-run state machine.

use std::fmt;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};

use super::events::Step;
use crate::amount::to_base_units;
use crate::error::{CctpError, Result};
use crate::protocol::parse_recipient;

/// A validated request to move `amount` base units of USDC from
/// `source_chain` to `recipient` on `destination_chain`.
///
/// Two requests with the same fields are the same transfer; the orchestrator
/// refuses to run a request that is already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferRequest {
    source_chain: NamedChain,
    destination_chain: NamedChain,
    amount: U256,
    recipient: Address,
}

impl TransferRequest {
    /// # Errors
    ///
    /// - [`CctpError::InvalidRequest`] when source and destination are the same chain
    /// - [`CctpError::InvalidAmount`] when `amount` is zero
    /// - [`CctpError::InvalidRecipient`] when `recipient` is not a 20-byte hex address
    pub fn new(
        source_chain: NamedChain,
        destination_chain: NamedChain,
        amount: U256,
        recipient: &str,
    ) -> Result<Self> {
        if source_chain == destination_chain {
            return Err(CctpError::InvalidRequest(format!(
                "source and destination are both {source_chain}"
            )));
        }
        if amount.is_zero() {
            return Err(CctpError::InvalidAmount {
                input: amount.to_string(),
                reason: "amount must be greater than zero".to_string(),
            });
        }
        let recipient = parse_recipient(recipient)?;

        Ok(Self {
            source_chain,
            destination_chain,
            amount,
            recipient,
        })
    }

    /// Like [`new`](Self::new), taking a decimal amount such as `"12.5"`.
    pub fn from_human_amount(
        source_chain: NamedChain,
        destination_chain: NamedChain,
        amount: &str,
        decimals: u8,
        recipient: &str,
    ) -> Result<Self> {
        let amount = to_base_units(amount, decimals)?;
        Self::new(source_chain, destination_chain, amount, recipient)
    }

    pub fn source_chain(&self) -> NamedChain {
        self.source_chain
    }

    pub fn destination_chain(&self) -> NamedChain {
        self.destination_chain
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Cancelled,
    Error { kind: &'static str, message: String },
}

impl From<&CctpError> for FailureReason {
    fn from(error: &CctpError) -> Self {
        match error {
            CctpError::Cancelled => Self::Cancelled,
            other => Self::Error {
                kind: other.kind(),
                message: other.to_string(),
            },
        }
    }
}

/// Phase of a transfer run. Phases only move forward; `Complete` and
/// `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransferPhase {
    #[default]
    Idle,
    Approving,
    Burning,
    Attesting,
    Minting,
    Complete,
    Failed {
        step: Step,
        reason: FailureReason,
    },
}

impl TransferPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Approving => "approving",
            Self::Burning => "burning",
            Self::Attesting => "attesting",
            Self::Minting => "minting",
            Self::Complete => "complete",
            Self::Failed { .. } => "failed",
        }
    }

    pub(crate) fn entering(step: Step) -> Self {
        match step {
            Step::Approve => Self::Approving,
            Step::Burn => Self::Burning,
            Step::Attest => Self::Attesting,
            Step::Mint => Self::Minting,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Approving => 1,
            Self::Burning => 2,
            Self::Attesting => 3,
            Self::Minting => 4,
            Self::Complete => 5,
            Self::Failed { .. } => 6,
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed {
                step,
                reason: FailureReason::Cancelled,
            } => write!(f, "failed at {step} (cancelled)"),
            Self::Failed {
                step,
                reason: FailureReason::Error { message, .. },
            } => write!(f, "failed at {step}: {message}"),
            other => f.write_str(other.name()),
        }
    }
}

/// How many transactions or polls each phase issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttemptCounters {
    pub approve: u32,
    pub burn: u32,
    pub attest: u32,
    pub mint: u32,
}

/// Everything a run has learned so far.
///
/// Identifiers are recorded once, at the moment they become known, and are
/// never overwritten. A failed state keeps every identifier recorded before
/// the failure, so a caller can see exactly what happened on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferState {
    request: TransferRequest,
    phase: TransferPhase,
    allowance_reset_tx_hash: Option<TxHash>,
    approval_tx_hash: Option<TxHash>,
    burn_tx_hash: Option<TxHash>,
    message: Option<Bytes>,
    message_hash: Option<B256>,
    attestation: Option<Bytes>,
    mint_tx_hash: Option<TxHash>,
    attempts: AttemptCounters,
}

impl TransferState {
    pub fn new(request: TransferRequest) -> Self {
        Self {
            request,
            phase: TransferPhase::Idle,
            allowance_reset_tx_hash: None,
            approval_tx_hash: None,
            burn_tx_hash: None,
            message: None,
            message_hash: None,
            attestation: None,
            mint_tx_hash: None,
            attempts: AttemptCounters::default(),
        }
    }

    /// A fresh `Idle` state carrying the on-chain record of a previous run,
    /// ready to pick up from attestation.
    ///
    /// # Errors
    ///
    /// [`CctpError::InvalidRequest`] unless the previous run recorded its burn
    /// transaction and message, and never submitted a mint.
    pub fn resumed_from(previous: &TransferState) -> Result<Self> {
        if !previous.can_resume() {
            return Err(CctpError::InvalidRequest(format!(
                "transfer in phase {} cannot be resumed from attestation",
                previous.phase.name()
            )));
        }

        let mut state = Self::new(previous.request.clone());
        state.allowance_reset_tx_hash = previous.allowance_reset_tx_hash;
        state.approval_tx_hash = previous.approval_tx_hash;
        state.burn_tx_hash = previous.burn_tx_hash;
        state.message = previous.message.clone();
        state.message_hash = previous.message_hash;
        state.attempts.approve = previous.attempts.approve;
        state.attempts.burn = previous.attempts.burn;
        Ok(state)
    }

    /// Whether the burn is on chain and the mint has not been attempted.
    pub fn can_resume(&self) -> bool {
        self.burn_tx_hash.is_some()
            && self.message.is_some()
            && self.message_hash.is_some()
            && self.mint_tx_hash.is_none()
            && self.phase != TransferPhase::Complete
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn phase(&self) -> &TransferPhase {
        &self.phase
    }

    pub fn allowance_reset_tx_hash(&self) -> Option<TxHash> {
        self.allowance_reset_tx_hash
    }

    pub fn approval_tx_hash(&self) -> Option<TxHash> {
        self.approval_tx_hash
    }

    pub fn burn_tx_hash(&self) -> Option<TxHash> {
        self.burn_tx_hash
    }

    pub fn message(&self) -> Option<&Bytes> {
        self.message.as_ref()
    }

    pub fn message_hash(&self) -> Option<B256> {
        self.message_hash
    }

    pub fn attestation(&self) -> Option<&Bytes> {
        self.attestation.as_ref()
    }

    pub fn mint_tx_hash(&self) -> Option<TxHash> {
        self.mint_tx_hash
    }

    pub fn attempts(&self) -> AttemptCounters {
        self.attempts
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// [`CctpError::InvalidTransition`] when the current phase is terminal or
    /// `next` is not strictly later than it.
    pub(crate) fn transition(&mut self, next: TransferPhase) -> Result<()> {
        if self.phase.is_terminal() || next.rank() <= self.phase.rank() {
            return Err(CctpError::InvalidTransition {
                from: self.phase.name(),
                to: next.name(),
            });
        }
        self.phase = next;
        Ok(())
    }

    pub(crate) fn fail(&mut self, step: Step, error: &CctpError) -> Result<()> {
        self.transition(TransferPhase::Failed {
            step,
            reason: FailureReason::from(error),
        })
    }

    pub(crate) fn record_allowance_reset(&mut self, tx_hash: TxHash) {
        self.allowance_reset_tx_hash.get_or_insert(tx_hash);
    }

    pub(crate) fn record_approval(&mut self, tx_hash: TxHash) {
        self.approval_tx_hash.get_or_insert(tx_hash);
    }

    pub(crate) fn record_burn(&mut self, tx_hash: TxHash) {
        self.burn_tx_hash.get_or_insert(tx_hash);
    }

    pub(crate) fn record_message(&mut self, message: Bytes, message_hash: B256) {
        if self.message.is_none() {
            self.message = Some(message);
            self.message_hash = Some(message_hash);
        }
    }

    pub(crate) fn record_attestation(&mut self, attestation: Bytes) {
        self.attestation.get_or_insert(attestation);
    }

    pub(crate) fn record_mint(&mut self, tx_hash: TxHash) {
        self.mint_tx_hash.get_or_insert(tx_hash);
    }

    pub(crate) fn attempts_mut(&mut self) -> &mut AttemptCounters {
        &mut self.attempts
    }
}
