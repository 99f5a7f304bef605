// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test utilities and fake implementations of the orchestrator's traits.
//!
//! [`FakeBlockchainProvider`] simulates just enough of a wallet and the CCTP
//! contracts to run a transfer end to end: approvals update allowances,
//! `depositForBurn` debits the balance and emits a real `MessageSent` log,
//! and `receiveMessage` credits the recipient. Adversarial behavior
//! (reverts, slow receipts, wallets that refuse to switch networks,
//! rate-limited attestation APIs) is switched on per test.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use alloy_primitives::{address, keccak256, Address, Bytes, Log, TxHash, B256, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use crate::bridge::CancelHandle;
use crate::chain::{ChainProfile, ChainRegistry};
use crate::contracts::erc20::{transfer_log, Erc20};
use crate::contracts::message_transmitter::MessageTransmitter;
use crate::contracts::token_messenger::TokenMessenger;
use crate::protocol::{
    message_sent_log, AttestationRecord, AttestationStatus, BurnMessage, DecodedMessage, DomainId,
    MessageHeader,
};
use crate::traits::{
    AttestationProvider, BlockchainProvider, Clock, FeeParameters, TransactionOutcome,
};
use crate::{CctpError, Result};

/// Default signing account of [`FakeBlockchainProvider`].
pub const FAKE_ACCOUNT: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

// ============================================================================
// Fake Blockchain Provider
// ============================================================================

/// A transaction accepted by [`FakeBlockchainProvider`].
#[derive(Debug, Clone)]
pub struct SubmittedTransaction {
    pub chain_id: u64,
    pub tx_hash: TxHash,
    pub request: TransactionRequest,
}

impl SubmittedTransaction {
    pub fn input(&self) -> &[u8] {
        self.request
            .input
            .input()
            .map(|bytes| bytes.as_ref())
            .unwrap_or_default()
    }

    pub fn selector(&self) -> Option<[u8; 4]> {
        self.input().get(..4).and_then(|s| s.try_into().ok())
    }

    /// Decodes the calldata as `C`, if the selector matches.
    pub fn decode<C: SolCall>(&self) -> Option<C> {
        if self.selector() != Some(C::SELECTOR) {
            return None;
        }
        C::abi_decode(self.input()).ok()
    }
}

#[derive(Debug)]
struct ChainSim {
    account: Address,
    active_chain: u64,
    unknown_chains: HashSet<u64>,
    added_chains: Vec<u64>,
    switch_requests: Vec<u64>,
    ignore_switches: bool,
    domains: HashMap<u64, DomainId>,
    transmitters: HashMap<u64, Address>,
    usdc: HashMap<u64, Address>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    gas_estimate: u64,
    gas_estimate_error: Option<String>,
    fee_parameters: FeeParameters,
    submitted: Vec<SubmittedTransaction>,
    receipts: HashMap<TxHash, TransactionOutcome>,
    pending_polls: HashMap<TxHash, usize>,
    pending_receipt_polls: usize,
    receipt_failures: usize,
    reverted_selectors: HashSet<[u8; 4]>,
    ignore_approvals: bool,
    omit_message_sent: bool,
    next_nonce: u64,
    used_nonces: HashSet<(DomainId, u64)>,
    cancel_after: Option<(usize, CancelHandle)>,
    submission_delay: Duration,
    block_number: u64,
}

impl ChainSim {
    fn new(registry: &ChainRegistry) -> Self {
        let mut sim = Self {
            account: FAKE_ACCOUNT,
            active_chain: 1,
            unknown_chains: HashSet::new(),
            added_chains: Vec::new(),
            switch_requests: Vec::new(),
            ignore_switches: false,
            domains: HashMap::new(),
            transmitters: HashMap::new(),
            usdc: HashMap::new(),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            gas_estimate: 100_000,
            gas_estimate_error: None,
            fee_parameters: FeeParameters {
                base_fee_per_gas: 1_000_000_000,
            },
            submitted: Vec::new(),
            receipts: HashMap::new(),
            pending_polls: HashMap::new(),
            pending_receipt_polls: 0,
            receipt_failures: 0,
            reverted_selectors: HashSet::new(),
            ignore_approvals: false,
            omit_message_sent: false,
            next_nonce: 1,
            used_nonces: HashSet::new(),
            cancel_after: None,
            submission_delay: Duration::ZERO,
            block_number: 1_000,
        };
        sim.load_registry(registry);
        sim
    }

    fn load_registry(&mut self, registry: &ChainRegistry) {
        for chain in registry.chains() {
            let Ok(profile) = registry.get(chain) else {
                continue;
            };
            self.load_profile(profile);
        }
    }

    fn load_profile(&mut self, profile: &ChainProfile) {
        let chain_id = profile.chain_id();
        self.domains.insert(chain_id, profile.domain_id);
        if let Some(transmitter) = profile.message_transmitter {
            self.transmitters.insert(chain_id, transmitter);
        }
        if let Some(usdc) = profile.usdc {
            self.usdc.insert(chain_id, usdc);
        }
    }

    fn execute(&mut self, from: Address, to: Address, input: &[u8]) -> (bool, Vec<Log>) {
        let Some(selector) = input.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok()) else {
            return (true, Vec::new());
        };
        if self.reverted_selectors.contains(&selector) {
            return (false, Vec::new());
        }

        if selector == Erc20::approveCall::SELECTOR {
            self.approve(from, to, input)
        } else if selector == TokenMessenger::depositForBurnCall::SELECTOR {
            self.deposit_for_burn(from, to, input)
        } else if selector == MessageTransmitter::receiveMessageCall::SELECTOR {
            self.receive_message(input)
        } else {
            (true, Vec::new())
        }
    }

    fn approve(&mut self, owner: Address, token: Address, input: &[u8]) -> (bool, Vec<Log>) {
        let Ok(call) = Erc20::approveCall::abi_decode(input) else {
            return (false, Vec::new());
        };
        if !self.ignore_approvals {
            self.allowances
                .insert((token, owner, call.spender), call.amount);
        }
        (true, Vec::new())
    }

    fn deposit_for_burn(
        &mut self,
        owner: Address,
        messenger: Address,
        input: &[u8],
    ) -> (bool, Vec<Log>) {
        let Ok(call) = TokenMessenger::depositForBurnCall::abi_decode(input) else {
            return (false, Vec::new());
        };
        let Some(destination_domain) = DomainId::from_u32(call.destinationDomain) else {
            return (false, Vec::new());
        };

        let token = call.burnToken;
        let allowance_key = (token, owner, messenger);
        let allowance = self.allowances.get(&allowance_key).copied().unwrap_or_default();
        let balance = self.balances.get(&(token, owner)).copied().unwrap_or_default();
        if allowance < call.amount || balance < call.amount {
            return (false, Vec::new());
        }
        self.allowances.insert(allowance_key, allowance - call.amount);
        self.balances.insert((token, owner), balance - call.amount);

        let nonce = self.next_nonce;
        self.next_nonce += 1;
        let message = DecodedMessage {
            header: MessageHeader {
                version: 0,
                source_domain: self
                    .domains
                    .get(&self.active_chain)
                    .copied()
                    .unwrap_or(DomainId::Ethereum),
                destination_domain,
                nonce,
                sender: messenger.into_word(),
                recipient: messenger.into_word(),
                destination_caller: B256::ZERO,
            },
            body: BurnMessage {
                version: 0,
                burn_token: token,
                mint_recipient: Address::from_word(call.mintRecipient),
                amount: call.amount,
                message_sender: owner,
            },
        };

        let mut logs = vec![transfer_log(token, owner, Address::ZERO, call.amount)];
        if !self.omit_message_sent {
            let emitter = self
                .transmitters
                .get(&self.active_chain)
                .copied()
                .unwrap_or(messenger);
            logs.push(message_sent_log(emitter, message.encode()));
        }
        (true, logs)
    }

    fn receive_message(&mut self, input: &[u8]) -> (bool, Vec<Log>) {
        let Ok(call) = MessageTransmitter::receiveMessageCall::abi_decode(input) else {
            return (false, Vec::new());
        };
        let Some(message) = DecodedMessage::decode(&call.message) else {
            return (false, Vec::new());
        };
        let local_domain = self.domains.get(&self.active_chain).copied();
        if local_domain != Some(message.header.destination_domain) || call.attestation.is_empty() {
            return (false, Vec::new());
        }
        if !self
            .used_nonces
            .insert((message.header.source_domain, message.header.nonce))
        {
            return (false, Vec::new());
        }

        let mut logs = Vec::new();
        if let Some(usdc) = self.usdc.get(&self.active_chain).copied() {
            let recipient = message.body.mint_recipient;
            let balance = self.balances.entry((usdc, recipient)).or_default();
            *balance = balance.saturating_add(message.body.amount);
            logs.push(transfer_log(usdc, Address::ZERO, recipient, message.body.amount));
        }
        (true, logs)
    }
}

/// A fake wallet and chain that executes the CCTP calls it is sent.
///
/// Starts on Ethereum mainnet (chain id 1), knows every chain in
/// [`ChainRegistry::builtin`], and mines every transaction immediately.
#[derive(Clone, Debug)]
pub struct FakeBlockchainProvider {
    sim: Arc<Mutex<ChainSim>>,
}

impl Default for FakeBlockchainProvider {
    fn default() -> Self {
        Self {
            sim: Arc::new(Mutex::new(ChainSim::new(&ChainRegistry::builtin()))),
        }
    }
}

impl FakeBlockchainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learns domains, transmitters and USDC addresses from `registry`.
    pub fn use_registry(&self, registry: &ChainRegistry) {
        self.sim.lock().unwrap().load_registry(registry);
    }

    pub fn account_address(&self) -> Address {
        self.sim.lock().unwrap().account
    }

    pub fn set_active_chain(&self, chain_id: u64) {
        self.sim.lock().unwrap().active_chain = chain_id;
    }

    pub fn active_chain(&self) -> u64 {
        self.sim.lock().unwrap().active_chain
    }

    /// Makes the wallet answer `UnrecognizedChain` for `chain_id` until it is added.
    pub fn forget_chain(&self, chain_id: u64) {
        self.sim.lock().unwrap().unknown_chains.insert(chain_id);
    }

    /// Makes switch requests succeed without changing the active chain.
    pub fn ignore_switch_requests(&self) {
        self.sim.lock().unwrap().ignore_switches = true;
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        self.sim.lock().unwrap().switch_requests.clone()
    }

    pub fn added_chains(&self) -> Vec<u64> {
        self.sim.lock().unwrap().added_chains.clone()
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.sim
            .lock()
            .unwrap()
            .balances
            .insert((token, owner), amount);
    }

    pub fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.sim
            .lock()
            .unwrap()
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.sim
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn allowance_of(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.sim
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_gas_estimate(&self, gas: u64) {
        self.sim.lock().unwrap().gas_estimate = gas;
    }

    /// Makes every gas estimate fail with a [`CctpError::Provider`].
    pub fn fail_gas_estimation(&self, message: &str) {
        self.sim.lock().unwrap().gas_estimate_error = Some(message.to_string());
    }

    pub fn set_fee_parameters(&self, fees: FeeParameters) {
        self.sim.lock().unwrap().fee_parameters = fees;
    }

    /// Number of `None` answers each new transaction's receipt gives before it is mined.
    pub fn set_pending_receipt_polls(&self, polls: usize) {
        self.sim.lock().unwrap().pending_receipt_polls = polls;
    }

    /// Makes the next `count` receipt polls fail with a transient error.
    pub fn fail_receipt_polls(&self, count: usize) {
        self.sim.lock().unwrap().receipt_failures = count;
    }

    /// Makes every transaction calling `selector` revert.
    pub fn revert_selector(&self, selector: [u8; 4]) {
        self.sim.lock().unwrap().reverted_selectors.insert(selector);
    }

    /// Mines approvals without changing the allowance.
    pub fn ignore_approvals(&self) {
        self.sim.lock().unwrap().ignore_approvals = true;
    }

    /// Mines burns without emitting a `MessageSent` log.
    pub fn omit_message_sent_event(&self) {
        self.sim.lock().unwrap().omit_message_sent = true;
    }

    /// Makes every submission broadcast at once but return its hash only
    /// after `delay` of tokio time, like a wallet waiting on a signing prompt.
    pub fn set_submission_delay(&self, delay: Duration) {
        self.sim.lock().unwrap().submission_delay = delay;
    }

    /// Fires `handle` right after the `count`-th transaction is submitted.
    pub fn cancel_after_submissions(&self, count: usize, handle: CancelHandle) {
        self.sim.lock().unwrap().cancel_after = Some((count, handle));
    }

    /// Executes and records `tx`, returning its hash and the configured delay.
    fn broadcast(&self, tx: TransactionRequest) -> (TxHash, Duration) {
        let mut sim = self.sim.lock().unwrap();
        let index = sim.submitted.len() as u64;
        let tx_hash = keccak256(index.to_be_bytes());

        let from = tx.from.unwrap_or(sim.account);
        let to = tx
            .to
            .and_then(|kind| kind.to().copied())
            .unwrap_or_default();
        let input = tx.input.input().cloned().unwrap_or_default();
        let (success, logs) = sim.execute(from, to, &input);

        sim.block_number += 1;
        let outcome = TransactionOutcome {
            tx_hash,
            success,
            block_number: Some(sim.block_number),
            gas_used: sim.gas_estimate,
            logs,
        };
        let pending = sim.pending_receipt_polls;
        sim.receipts.insert(tx_hash, outcome);
        sim.pending_polls.insert(tx_hash, pending);

        let chain_id = sim.active_chain;
        sim.submitted.push(SubmittedTransaction {
            chain_id,
            tx_hash,
            request: tx,
        });

        let submitted = sim.submitted.len();
        if let Some((count, handle)) = &sim.cancel_after {
            if *count == submitted {
                handle.cancel();
            }
        }

        (tx_hash, sim.submission_delay)
    }

    pub fn submitted_transactions(&self) -> Vec<SubmittedTransaction> {
        self.sim.lock().unwrap().submitted.clone()
    }

    /// Decoded calls of type `C`, in submission order.
    pub fn submitted_calls<C: SolCall>(&self) -> Vec<C> {
        self.sim
            .lock()
            .unwrap()
            .submitted
            .iter()
            .filter_map(SubmittedTransaction::decode::<C>)
            .collect()
    }
}

#[async_trait]
impl BlockchainProvider for FakeBlockchainProvider {
    async fn account(&self) -> Result<Address> {
        Ok(self.account_address())
    }

    async fn get_balance(&self, token: Address, owner: Address) -> Result<U256> {
        Ok(self.balance_of(token, owner))
    }

    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        Ok(self.allowance_of(token, owner, spender))
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> Result<u64> {
        let sim = self.sim.lock().unwrap();
        match &sim.gas_estimate_error {
            Some(message) => Err(CctpError::Provider(message.clone())),
            None => Ok(sim.gas_estimate),
        }
    }

    async fn get_fee_parameters(&self) -> Result<FeeParameters> {
        Ok(self.sim.lock().unwrap().fee_parameters)
    }

    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let (tx_hash, delay) = self.broadcast(tx);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(tx_hash)
    }

    async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionOutcome>> {
        let mut sim = self.sim.lock().unwrap();
        if sim.receipt_failures > 0 {
            sim.receipt_failures -= 1;
            return Err(CctpError::Provider("connection reset by peer".to_string()));
        }

        if let Some(remaining) = sim.pending_polls.get_mut(&tx_hash) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None);
            }
        }
        Ok(sim.receipts.get(&tx_hash).cloned())
    }

    async fn get_active_chain(&self) -> Result<u64> {
        Ok(self.active_chain())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let mut sim = self.sim.lock().unwrap();
        sim.switch_requests.push(chain_id);
        if sim.unknown_chains.contains(&chain_id) {
            return Err(CctpError::UnrecognizedChain { chain_id });
        }
        if !sim.ignore_switches {
            sim.active_chain = chain_id;
        }
        Ok(())
    }

    async fn add_chain(&self, profile: &ChainProfile) -> Result<()> {
        let mut sim = self.sim.lock().unwrap();
        let chain_id = profile.chain_id();
        sim.unknown_chains.remove(&chain_id);
        sim.added_chains.push(chain_id);
        sim.load_profile(profile);
        Ok(())
    }
}

// ============================================================================
// Fake Attestation Provider
// ============================================================================

type SignFn = Arc<dyn Fn(B256) -> Bytes + Send + Sync>;

/// One scripted answer of [`FakeAttestationProvider`].
#[derive(Debug, Clone)]
pub enum FakeAttestationResponse {
    Record(AttestationRecord),
    /// Complete, signed by the provider's signer over the requested hash.
    CompleteSigned,
    RateLimited { retry_after_seconds: u64 },
    NotFound,
    Unavailable,
}

impl FakeAttestationResponse {
    pub fn pending() -> Self {
        Self::Record(AttestationRecord::pending())
    }

    pub fn pending_confirmations() -> Self {
        Self::Record(AttestationRecord::with_status(
            AttestationStatus::PendingConfirmations,
        ))
    }

    pub fn complete(signature: impl Into<Bytes>) -> Self {
        Self::Record(AttestationRecord::complete(signature))
    }

    pub fn complete_without_signature() -> Self {
        Self::Record(AttestationRecord::with_status(AttestationStatus::Complete))
    }

    pub fn failed() -> Self {
        Self::Record(AttestationRecord::with_status(AttestationStatus::Failed))
    }
}

/// A fake attestation API that replays scripted responses.
///
/// Each message hash has its own sequence; hashes without one use the
/// default sequence. Once a sequence is exhausted its last response repeats.
#[derive(Clone, Default)]
pub struct FakeAttestationProvider {
    sequences: Arc<Mutex<HashMap<B256, Vec<FakeAttestationResponse>>>>,
    default_sequence: Arc<Mutex<Vec<FakeAttestationResponse>>>,
    calls: Arc<Mutex<HashMap<B256, usize>>>,
    public_keys: Arc<Mutex<Vec<Bytes>>>,
    signer: Arc<Mutex<Option<SignFn>>>,
}

impl std::fmt::Debug for FakeAttestationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeAttestationProvider")
            .field("total_calls", &self.total_calls())
            .finish_non_exhaustive()
    }
}

impl FakeAttestationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response_sequence(&self, message_hash: B256, responses: Vec<FakeAttestationResponse>) {
        self.sequences
            .lock()
            .unwrap()
            .insert(message_hash, responses);
    }

    /// Responses for hashes without their own sequence.
    pub fn set_default_sequence(&self, responses: Vec<FakeAttestationResponse>) {
        *self.default_sequence.lock().unwrap() = responses;
    }

    pub fn set_public_keys(&self, keys: Vec<Bytes>) {
        *self.public_keys.lock().unwrap() = keys;
    }

    /// Signs hashes answered with [`FakeAttestationResponse::CompleteSigned`].
    pub fn set_signer(&self, sign: impl Fn(B256) -> Bytes + Send + Sync + 'static) {
        *self.signer.lock().unwrap() = Some(Arc::new(sign));
    }

    pub fn get_call_count(&self, message_hash: B256) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&message_hash)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl AttestationProvider for FakeAttestationProvider {
    async fn get_attestation(&self, message_hash: B256) -> Result<AttestationRecord> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(message_hash).or_insert(0);
            *count += 1;
            *count - 1
        };

        let response = {
            let sequences = self.sequences.lock().unwrap();
            let default_sequence = self.default_sequence.lock().unwrap();
            let sequence = sequences.get(&message_hash).unwrap_or(&*default_sequence);
            sequence.get(index).or(sequence.last()).cloned()
        };

        match response {
            None | Some(FakeAttestationResponse::NotFound) => Err(CctpError::AttestationNotFound),
            Some(FakeAttestationResponse::Record(record)) => Ok(record),
            Some(FakeAttestationResponse::CompleteSigned) => {
                let signer = self.signer.lock().unwrap().clone();
                match signer {
                    Some(sign) => Ok(AttestationRecord::complete(sign(message_hash))),
                    None => Ok(AttestationRecord::with_status(AttestationStatus::Complete)),
                }
            }
            Some(FakeAttestationResponse::RateLimited {
                retry_after_seconds,
            }) => Err(CctpError::RateLimitExceeded {
                retry_after_seconds,
            }),
            Some(FakeAttestationResponse::Unavailable) => Err(CctpError::Provider(
                "attestation service unavailable".to_string(),
            )),
        }
    }

    async fn get_public_keys(&self) -> Result<Vec<Bytes>> {
        Ok(self.public_keys.lock().unwrap().clone())
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A clock whose sleeps return immediately and advance virtual time.
///
/// Each sleep yields to the executor once, so concurrent runs interleave the
/// way they would on a real clock.
#[derive(Clone, Debug)]
pub struct FakeClock {
    start: Instant,
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        let start = Instant::now();
        Self {
            start,
            current_time: Arc::new(Mutex::new(start)),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Virtual time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        *self.current_time.lock().unwrap() - self.start
    }

    pub fn sleep_calls(&self) -> Vec<Duration> {
        self.sleep_log.lock().unwrap().clone()
    }

    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }

    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
        YieldOnce::default().await;
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}

#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
