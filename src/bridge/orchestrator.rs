// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! The approve → burn → attest → mint state machine.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, TxHash, B256};
use bon::Builder;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn, Instrument};

use super::allowance::{AllowanceManager, AllowanceProgress};
use super::attestation::AttestationPoller;
use super::cancel::CancelSignal;
use super::config::OrchestratorConfig;
use super::events::{EventSink, Step, StepStatus, TransferEvent};
use super::receipt::{confirm, ReceiptPolicy};
use super::state::{TransferPhase, TransferRequest, TransferState};
use crate::amount::to_human;
use crate::chain::{ChainProfile, ChainRegistry};
use crate::contracts::erc20::credited_amount;
use crate::contracts::message_transmitter::receive_message_transaction;
use crate::contracts::token_messenger::deposit_for_burn_transaction;
use crate::error::{CctpError, Result};
use crate::gas::{price_transaction, with_timeout};
use crate::protocol::{attester_address, extract_message, recover_attesters, DecodedMessage};
use crate::spans;
use crate::traits::{AttestationProvider, BlockchainProvider, Clock, TransactionOutcome};

/// A run that did not reach `Complete`.
///
/// Once a step has started, `state` is the terminal `Failed` state with every
/// identifier recorded before the failure. When [`TransferState::can_resume`]
/// holds, pass it to [`TransferOrchestrator::resume`] to retry from attestation.
///
/// Pre-flight rejections (an unsupported chain, a duplicate in-flight request,
/// a state that cannot be resumed) happen before any step and touch nothing
/// on chain. Their `state` is returned unchanged, usually `Idle`, and
/// [`step`](Self::step) is `None`.
#[derive(Debug, thiserror::Error)]
#[error("transfer failed: {error}")]
pub struct TransferFailure {
    pub state: Box<TransferState>,
    #[source]
    pub error: CctpError,
}

impl TransferFailure {
    fn new(state: TransferState, error: CctpError) -> Self {
        Self {
            state: Box::new(state),
            error,
        }
    }

    /// Step the run failed in, if it got past `Idle`.
    pub fn step(&self) -> Option<Step> {
        match self.state.phase() {
            TransferPhase::Failed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Drives USDC transfers between chains with Circle's CCTP v1.
///
/// The orchestrator owns no keys and opens no sockets itself: the wallet,
/// attestation service and clock are injected. One orchestrator can run
/// many transfers concurrently, but refuses a second run of a request that
/// is still in flight.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use alloy_chains::NamedChain;
/// use alloy_primitives::U256;
/// use cctp_orchestrator::providers::{AlloyBlockchainProvider, IrisAttestationProvider, TokioClock};
/// use cctp_orchestrator::{cancellation, ChainRegistry, TransferOrchestrator, TransferRequest};
///
/// # async fn example(provider: AlloyBlockchainProvider) -> Result<(), Box<dyn std::error::Error>> {
/// let orchestrator = TransferOrchestrator::builder()
///     .provider(provider)
///     .attestor(IrisAttestationProvider::production()?)
///     .clock(TokioClock)
///     .registry(Arc::new(ChainRegistry::builtin()))
///     .build();
///
/// let request = TransferRequest::new(
///     NamedChain::Mainnet,
///     NamedChain::Base,
///     U256::from(10_000_000u64),
///     "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d",
/// )?;
///
/// let (_handle, cancel) = cancellation();
/// let state = orchestrator.start(request, cancel).await?;
/// println!("minted in {:?}", state.mint_tx_hash());
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct TransferOrchestrator<P, A, C> {
    provider: P,
    attestor: A,
    clock: C,
    registry: Arc<ChainRegistry>,
    #[builder(default)]
    config: OrchestratorConfig,
    events: Option<UnboundedSender<TransferEvent>>,
    #[builder(skip)]
    in_flight: Arc<Mutex<HashSet<TransferRequest>>>,
}

impl<P, A, C> TransferOrchestrator<P, A, C>
where
    P: BlockchainProvider,
    A: AttestationProvider,
    C: Clock,
{
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn attestor(&self) -> &A {
        &self.attestor
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Whether a run for `request` is currently executing.
    pub fn is_in_flight(&self, request: &TransferRequest) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(request)
    }

    /// Runs a transfer from `Idle` to `Complete`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferFailure`] carrying the state reached. Requests
    /// rejected before the first step keep an `Idle` state: a request that is
    /// already running fails with [`CctpError::TransferInProgress`], and one
    /// naming a chain missing from the registry with
    /// [`CctpError::UnsupportedChain`].
    pub async fn start(
        &self,
        request: TransferRequest,
        cancel: CancelSignal,
    ) -> std::result::Result<TransferState, TransferFailure> {
        self.execute(TransferState::new(request), false, cancel).await
    }

    /// Continues a failed run from attestation, reusing its recorded burn.
    ///
    /// Use after an attestation timeout or a cancellation that happened after
    /// the burn was mined. Nothing is approved or burned again.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferFailure`] wrapping `previous` with
    /// [`CctpError::InvalidRequest`] when it holds no burn record or already
    /// submitted a mint; otherwise as for [`start`](Self::start).
    pub async fn resume(
        &self,
        previous: TransferState,
        cancel: CancelSignal,
    ) -> std::result::Result<TransferState, TransferFailure> {
        match TransferState::resumed_from(&previous) {
            Ok(state) => self.execute(state, true, cancel).await,
            Err(e) => Err(TransferFailure::new(previous, e)),
        }
    }

    async fn execute(
        &self,
        state: TransferState,
        resume: bool,
        cancel: CancelSignal,
    ) -> std::result::Result<TransferState, TransferFailure> {
        let request = state.request().clone();
        let _guard = match InFlightGuard::acquire(&self.in_flight, &request) {
            Ok(guard) => guard,
            Err(e) => {
                warn!(
                    source_chain = %request.source_chain(),
                    destination_chain = %request.destination_chain(),
                    event = "duplicate_transfer_rejected"
                );
                return Err(TransferFailure::new(state, e));
            }
        };

        let span = spans::transfer(
            &request.source_chain(),
            &request.destination_chain(),
            &request.amount(),
            &request.recipient(),
        );

        async move {
            let mut run = match Run::new(self, state, cancel) {
                Ok(run) => run,
                Err((state, e)) => {
                    spans::record_error(&e);
                    return Err(TransferFailure::new(state, e));
                }
            };
            run.drive(resume).await
        }
        .instrument(span)
        .await
    }
}

/// Removes its request from the in-flight set when dropped.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<TransferRequest>>>,
    request: TransferRequest,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<TransferRequest>>>, request: &TransferRequest) -> Result<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.clone());
        if !inserted {
            return Err(CctpError::TransferInProgress);
        }
        Ok(Self {
            set: Arc::clone(set),
            request: request.clone(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.request);
    }
}

/// One execution of a transfer.
struct Run<'a, P, A, C> {
    orchestrator: &'a TransferOrchestrator<P, A, C>,
    state: TransferState,
    cancel: CancelSignal,
    events: EventSink,
    source: &'a ChainProfile,
    destination: &'a ChainProfile,
    account: Option<Address>,
}

impl<'a, P, A, C> Run<'a, P, A, C>
where
    P: BlockchainProvider,
    A: AttestationProvider,
    C: Clock,
{
    fn new(
        orchestrator: &'a TransferOrchestrator<P, A, C>,
        state: TransferState,
        cancel: CancelSignal,
    ) -> std::result::Result<Self, (TransferState, CctpError)> {
        let registry = &orchestrator.registry;
        let request = state.request();
        let profiles = registry
            .get(request.source_chain())
            .and_then(|source| Ok((source, registry.get(request.destination_chain())?)));
        let (source, destination) = match profiles {
            Ok(profiles) => profiles,
            Err(e) => return Err((state, e)),
        };

        Ok(Self {
            orchestrator,
            state,
            cancel,
            events: EventSink::new(orchestrator.events.clone()),
            source,
            destination,
            account: None,
        })
    }

    async fn drive(&mut self, resume: bool) -> std::result::Result<TransferState, TransferFailure> {
        info!(
            resume,
            source_domain = self.source.domain_id.as_u32(),
            destination_domain = self.destination.domain_id.as_u32(),
            event = "transfer_started"
        );
        self.events.info(format!(
            "{} {} USDC from {} to {}",
            if resume { "Resuming transfer of" } else { "Transferring" },
            self.human_amount(),
            self.source.chain,
            self.destination.chain
        ));

        match self.steps(resume).await {
            Ok(()) => {
                self.state
                    .transition(TransferPhase::Complete)
                    .map_err(|e| TransferFailure::new(self.state.clone(), e))?;
                info!(
                    burn_tx_hash = ?self.state.burn_tx_hash(),
                    mint_tx_hash = ?self.state.mint_tx_hash(),
                    event = "transfer_completed"
                );
                self.events.info("Transfer complete");
                Ok(self.state.clone())
            }
            Err((step, e)) => Err(self.fail(step, e)),
        }
    }

    async fn steps(&mut self, resume: bool) -> std::result::Result<(), (Step, CctpError)> {
        if !resume {
            self.approve().await.map_err(|e| (Step::Approve, e))?;
            self.burn().await.map_err(|e| (Step::Burn, e))?;
        }
        self.attest().await.map_err(|e| (Step::Attest, e))?;
        self.mint().await.map_err(|e| (Step::Mint, e))?;
        Ok(())
    }

    fn fail(&mut self, step: Step, error: CctpError) -> TransferFailure {
        spans::record_error(&error);
        if matches!(error, CctpError::Cancelled) {
            info!(step = %step, event = "transfer_cancelled");
            self.events.warn(format!("Transfer cancelled during {step}"));
        } else {
            error!(step = %step, error = %error, event = "transfer_failed");
            self.events.error(format!("{step} failed: {error}"));
        }
        self.events
            .step(step, StepStatus::Failed(error.to_string()));

        if let Err(e) = self.state.fail(step, &error) {
            warn!(error = %e, event = "failure_transition_rejected");
        }
        TransferFailure::new(self.state.clone(), error)
    }

    fn enter(&mut self, step: Step) -> Result<()> {
        self.state.transition(TransferPhase::entering(step))?;
        self.events.step(step, StepStatus::Started);
        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CctpError::Cancelled);
        }
        Ok(())
    }

    async fn approve(&mut self) -> Result<()> {
        self.enter(Step::Approve)?;
        self.check_cancelled()?;

        let source = self.source;
        self.ensure_active_chain(source).await?;
        let owner = self.account().await?;
        let usdc = source.require_usdc()?;
        let messenger = source.require_token_messenger()?;
        let amount = self.state.request().amount();

        let orchestrator = self.orchestrator;
        let config = &orchestrator.config;
        let manager = AllowanceManager::new(
            &orchestrator.provider,
            &orchestrator.clock,
            self.receipt_policy(),
            config.gas.approval_buffer_percent,
            config.gas.priority_fee_wei,
        );
        let mut progress = AllowanceProgress::default();
        let result = manager
            .ensure(usdc, owner, messenger, amount, &mut progress)
            .instrument(spans::approve(&usdc, &messenger, &amount))
            .await;

        if let Some(tx_hash) = progress.reset_tx_hash {
            self.state.record_allowance_reset(tx_hash);
        }
        if let Some(tx_hash) = progress.approval_tx_hash {
            self.state.record_approval(tx_hash);
        }
        self.state.attempts_mut().approve += progress.submissions;
        result?;

        let detail = match progress.approval_tx_hash {
            Some(tx_hash) => format!(
                "Approved {} USDC: {}",
                self.human_amount(),
                source.explorer_tx_url(tx_hash)
            ),
            None => format!("Allowance already covers {} USDC", self.human_amount()),
        };
        self.events.step(Step::Approve, StepStatus::Complete(detail));
        Ok(())
    }

    async fn burn(&mut self) -> Result<()> {
        self.enter(Step::Burn)?;
        self.check_cancelled()?;

        let source = self.source;
        let destination = self.destination;
        let owner = self.account().await?;
        let usdc = source.require_usdc()?;
        let messenger = source.require_token_messenger()?;
        let amount = self.state.request().amount();
        let recipient = self.state.request().recipient();
        let orchestrator = self.orchestrator;
        let config = &orchestrator.config;
        let provider = &orchestrator.provider;

        let span = spans::burn(&owner, destination.domain_id.as_u32(), &usdc, &amount);
        async {
            let balance = with_timeout(
                "get_balance",
                config.rpc_timeout,
                provider.get_balance(usdc, owner),
            )
            .await?;
            if balance < amount {
                warn!(
                    required = %amount,
                    available = %balance,
                    event = "insufficient_balance"
                );
                let decimals = config.asset_decimals;
                let shortfall = amount - balance;
                self.events.warn(format!(
                    "Balance {} USDC is {} USDC short of {} USDC",
                    to_human(balance, decimals).unwrap_or_else(|_| balance.to_string()),
                    to_human(shortfall, decimals).unwrap_or_else(|_| shortfall.to_string()),
                    self.human_amount()
                ));
                return Err(CctpError::InsufficientBalance {
                    required: amount,
                    available: balance,
                });
            }

            let tx = deposit_for_burn_transaction(
                messenger,
                owner,
                amount,
                destination.domain_id,
                recipient.into_word(),
                usdc,
            );
            let tx = price_transaction(
                provider,
                tx,
                config.gas.burn_buffer_percent,
                config.gas.priority_fee_wei,
                config.rpc_timeout,
            )
            .await?;

            self.check_cancelled()?;
            let tx_hash = self.submit(tx).await?;
            self.state.record_burn(tx_hash);
            self.state.attempts_mut().burn += 1;
            tracing::Span::current().record("tx_hash", tracing::field::display(tx_hash));
            info!(tx_hash = %tx_hash, event = "burn_transaction_submitted");
            self.events.step(
                Step::Burn,
                StepStatus::Progress(format!("Burn submitted: {}", source.explorer_tx_url(tx_hash))),
            );

            let outcome = self.confirm(tx_hash).await?;
            let extracted = extract_message(tx_hash, &outcome.logs)?;
            self.state
                .record_message(extracted.message.clone(), extracted.message_hash);
            self.inspect_burn_message(&extracted.message);

            self.events.step(
                Step::Burn,
                StepStatus::Complete(format!(
                    "Burned {} USDC: {}",
                    self.human_amount(),
                    source.explorer_tx_url(tx_hash)
                )),
            );
            self.check_cancelled()
        }
        .instrument(span)
        .await
    }

    async fn attest(&mut self) -> Result<()> {
        self.enter(Step::Attest)?;
        let message_hash = self.state.message_hash().ok_or_else(|| {
            CctpError::InvalidRequest("no burn message recorded for attestation".to_string())
        })?;
        self.events.info(format!(
            "Waiting for attestation of message {message_hash}"
        ));

        let orchestrator = self.orchestrator;
        let poller = AttestationPoller::new(
            &orchestrator.attestor,
            &orchestrator.clock,
            orchestrator.config.polling,
            &self.cancel,
            &self.events,
        );
        let mut attempts = 0;
        let result = poller.poll(message_hash, &mut attempts).await;
        self.state.attempts_mut().attest = attempts;
        let signature = result?;

        if orchestrator.config.verify_attestation_signatures {
            self.verify_attesters(message_hash, &signature).await;
        }

        self.state.record_attestation(signature);
        self.events.step(
            Step::Attest,
            StepStatus::Complete(format!("Attestation received after {attempts} polls")),
        );
        Ok(())
    }

    async fn mint(&mut self) -> Result<()> {
        self.enter(Step::Mint)?;
        self.check_cancelled()?;

        let destination = self.destination;
        let (Some(message), Some(message_hash), Some(attestation)) = (
            self.state.message().cloned(),
            self.state.message_hash(),
            self.state.attestation().cloned(),
        ) else {
            return Err(CctpError::InvalidRequest(
                "mint requires a message and attestation".to_string(),
            ));
        };

        self.ensure_active_chain(destination).await?;
        let owner = self.account().await?;
        let transmitter = destination.require_message_transmitter()?;
        let orchestrator = self.orchestrator;
        let config = &orchestrator.config;

        let span = spans::mint(&message_hash, &destination.chain, attestation.len());
        async {
            let tx = receive_message_transaction(transmitter, owner, message, attestation);
            let tx = price_transaction(
                &orchestrator.provider,
                tx,
                config.gas.mint_buffer_percent,
                config.gas.priority_fee_wei,
                config.rpc_timeout,
            )
            .await?;

            self.check_cancelled()?;
            let tx_hash = self.submit(tx).await?;
            self.state.record_mint(tx_hash);
            self.state.attempts_mut().mint += 1;
            tracing::Span::current().record("tx_hash", tracing::field::display(tx_hash));
            info!(tx_hash = %tx_hash, event = "mint_transaction_submitted");
            self.events.step(
                Step::Mint,
                StepStatus::Progress(format!(
                    "Mint submitted: {}",
                    destination.explorer_tx_url(tx_hash)
                )),
            );

            let outcome = self.confirm(tx_hash).await?;
            self.corroborate_mint(&outcome);

            self.events.step(
                Step::Mint,
                StepStatus::Complete(format!(
                    "Minted {} USDC on {}: {}",
                    self.human_amount(),
                    destination.chain,
                    destination.explorer_tx_url(tx_hash)
                )),
            );
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Switches the wallet to `profile`'s chain, registering it first if
    /// the wallet does not know it.
    async fn ensure_active_chain(&self, profile: &ChainProfile) -> Result<()> {
        let provider = &self.orchestrator.provider;
        let rpc_timeout = self.orchestrator.config.rpc_timeout;
        let expected = profile.chain_id();

        async {
            let active = with_timeout("get_active_chain", rpc_timeout, provider.get_active_chain())
                .await?;
            if active == expected {
                return Ok(());
            }

            info!(from_chain_id = active, to_chain_id = expected, event = "chain_switch_started");
            self.events
                .info(format!("Switching wallet to {}", profile.chain));

            match provider.switch_chain(expected).await {
                Ok(()) => {}
                Err(CctpError::UnrecognizedChain { chain_id }) => {
                    info!(chain_id, event = "chain_not_in_wallet");
                    self.events
                        .info(format!("Adding {} to wallet", profile.chain));
                    provider.add_chain(profile).await?;
                    provider.switch_chain(expected).await?;
                }
                Err(e) => return Err(e),
            }

            let actual = with_timeout("get_active_chain", rpc_timeout, provider.get_active_chain())
                .await?;
            if actual != expected {
                error!(expected, actual, event = "chain_switch_failed");
                return Err(CctpError::ChainSwitchFailed { expected, actual });
            }

            info!(chain_id = actual, event = "chain_switch_completed");
            Ok(())
        }
        .instrument(spans::switch_chain(&profile.chain, expected))
        .await
    }

    async fn account(&mut self) -> Result<Address> {
        if let Some(account) = self.account {
            return Ok(account);
        }
        let account = with_timeout(
            "account",
            self.orchestrator.config.rpc_timeout,
            self.orchestrator.provider.account(),
        )
        .await?;
        self.account = Some(account);
        Ok(account)
    }

    /// Hands `tx` to the wallet. Not bounded by `rpc_timeout`: the wallet may
    /// broadcast before it answers, and dropping the call would lose the hash.
    async fn submit(&self, tx: alloy_rpc_types::TransactionRequest) -> Result<TxHash> {
        self.orchestrator.provider.submit_transaction(tx).await
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<TransactionOutcome> {
        confirm(
            &self.orchestrator.provider,
            &self.orchestrator.clock,
            tx_hash,
            self.receipt_policy(),
        )
        .await
    }

    fn receipt_policy(&self) -> ReceiptPolicy {
        let config = &self.orchestrator.config;
        ReceiptPolicy {
            poll_interval: config.receipt_poll_interval,
            timeout: config.receipt_timeout,
            rpc_timeout: config.rpc_timeout,
        }
    }

    fn inspect_burn_message(&self, message: &Bytes) {
        let Some(decoded) = DecodedMessage::decode(message) else {
            warn!(
                message_length_bytes = message.len(),
                event = "burn_message_undecodable"
            );
            return;
        };

        let request = self.state.request();
        if decoded.header.destination_domain != self.destination.domain_id {
            warn!(
                expected = self.destination.domain_id.as_u32(),
                actual = decoded.header.destination_domain.as_u32(),
                event = "burn_message_destination_mismatch"
            );
            self.events.warn(format!(
                "Burn message targets {} but {} was requested",
                decoded.header.destination_domain, self.destination.domain_id
            ));
        }
        if decoded.body.amount != request.amount()
            || decoded.body.mint_recipient != request.recipient()
        {
            warn!(
                amount = %decoded.body.amount,
                mint_recipient = %decoded.body.mint_recipient,
                event = "burn_message_body_mismatch"
            );
            self.events
                .warn("Burn message amount or recipient differs from the request");
        }
        info!(
            nonce = decoded.header.nonce,
            source_domain = decoded.header.source_domain.as_u32(),
            event = "burn_message_decoded"
        );
    }

    fn corroborate_mint(&self, outcome: &TransactionOutcome) {
        let Some(usdc) = self.destination.usdc else {
            return;
        };
        let request = self.state.request();
        match credited_amount(&outcome.logs, usdc, request.recipient()) {
            Some(credited) if credited == request.amount() => {
                info!(credited = %credited, event = "mint_amount_confirmed");
            }
            Some(credited) => {
                warn!(
                    expected = %request.amount(),
                    credited = %credited,
                    event = "mint_amount_mismatch"
                );
                self.events.warn(format!(
                    "Mint credited {credited} base units, expected {}",
                    request.amount()
                ));
            }
            None => {
                warn!(event = "mint_transfer_event_missing");
                self.events
                    .warn("No USDC Transfer to the recipient found in the mint receipt");
            }
        }
    }

    /// Compares attesters recovered from `signature` with the published
    /// attester keys. Only reports; never fails the run.
    async fn verify_attesters(&self, message_hash: B256, signature: &Bytes) {
        let keys = match self.orchestrator.attestor.get_public_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, event = "attester_keys_unavailable");
                self.events
                    .warn(format!("Could not fetch attester keys: {e}"));
                return;
            }
        };
        let known: HashSet<Address> = keys
            .iter()
            .filter_map(|key| attester_address(key).ok())
            .collect();

        match recover_attesters(message_hash, signature) {
            Ok(recovered) => {
                let unknown: Vec<Address> = recovered
                    .iter()
                    .copied()
                    .filter(|address| !known.contains(address))
                    .collect();
                if unknown.is_empty() {
                    info!(signers = recovered.len(), event = "attestation_signers_verified");
                } else {
                    warn!(unknown = ?unknown, event = "attestation_signer_unknown");
                    self.events.warn(format!(
                        "Attestation signed by {} unrecognised attester(s)",
                        unknown.len()
                    ));
                }
            }
            Err(e) => {
                warn!(error = %e, event = "attestation_signature_unrecoverable");
                self.events
                    .warn(format!("Could not recover attestation signers: {e}"));
            }
        }
    }

    fn human_amount(&self) -> String {
        let amount = self.state.request().amount();
        to_human(amount, self.orchestrator.config.asset_decimals)
            .unwrap_or_else(|_| amount.to_string())
    }
}

/// Chains a request may name, for presentation layers building a picker.
pub fn supported_chains(registry: &ChainRegistry) -> Vec<NamedChain> {
    let mut chains: Vec<NamedChain> = registry.chains().collect();
    chains.sort_by_key(|chain| u64::from(*chain));
    chains
}
