// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end transfer runs against the fake wallet, attestation API and clock.

use std::sync::Arc;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::{address, keccak256, Address, Bytes, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use cctp_orchestrator::chain::addresses::{
    BASE_USDC, ETHEREUM_TOKEN_MESSENGER, ETHEREUM_USDC,
};
use cctp_orchestrator::contracts::erc20::Erc20;
use cctp_orchestrator::contracts::message_transmitter::MessageTransmitter;
use cctp_orchestrator::contracts::token_messenger::TokenMessenger;
use cctp_orchestrator::testing::{
    FakeAttestationProvider, FakeAttestationResponse, FakeBlockchainProvider, FakeClock,
    FAKE_ACCOUNT,
};
use cctp_orchestrator::{
    cancellation, CancelSignal, CctpError, ChainRegistry, FailureReason, LogLevel,
    OrchestratorConfig, PollingConfig, Step, StepStatus, TransferEvent, TransferOrchestrator,
    TransferPhase, TransferRequest,
};
use rstest::rstest;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing_subscriber::EnvFilter;

const RECIPIENT: Address = address!("742d35cc6634c0532925a3b844bc9e7595f8fa0d");
const TEN_USDC: u64 = 10_000_000;

type FakeOrchestrator =
    TransferOrchestrator<FakeBlockchainProvider, FakeAttestationProvider, FakeClock>;

struct Harness {
    orchestrator: FakeOrchestrator,
    provider: FakeBlockchainProvider,
    attestor: FakeAttestationProvider,
    clock: FakeClock,
    events: UnboundedReceiver<TransferEvent>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    fn with_config(config: OrchestratorConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let provider = FakeBlockchainProvider::new();
        let attestor = FakeAttestationProvider::new();
        let clock = FakeClock::new();
        let (tx, events) = unbounded_channel();

        provider.set_balance(ETHEREUM_USDC, FAKE_ACCOUNT, U256::from(TEN_USDC));
        attestor.set_default_sequence(vec![FakeAttestationResponse::complete(vec![0x11; 65])]);

        let orchestrator = TransferOrchestrator::builder()
            .provider(provider.clone())
            .attestor(attestor.clone())
            .clock(clock.clone())
            .registry(Arc::new(ChainRegistry::builtin()))
            .config(config)
            .events(tx)
            .build();

        Self {
            orchestrator,
            provider,
            attestor,
            clock,
            events,
        }
    }

    fn drain_events(&mut self) -> Vec<TransferEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    fn warnings(&mut self) -> Vec<String> {
        self.drain_events()
            .iter()
            .filter_map(TransferEvent::as_log)
            .filter(|entry| entry.level == LogLevel::Warning)
            .map(|entry| entry.message.clone())
            .collect()
    }
}

fn request() -> TransferRequest {
    TransferRequest::new(
        NamedChain::Mainnet,
        NamedChain::Base,
        U256::from(TEN_USDC),
        "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d",
    )
    .unwrap()
}

fn no_cancel() -> CancelSignal {
    CancelSignal::never()
}

#[tokio::test]
async fn test_transfer_completes_end_to_end() {
    let harness = Harness::new();

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert_eq!(*state.phase(), TransferPhase::Complete);
    assert!(state.allowance_reset_tx_hash().is_none());
    assert!(state.approval_tx_hash().is_some());
    assert!(state.burn_tx_hash().is_some());
    assert!(state.mint_tx_hash().is_some());
    assert_eq!(
        state.message_hash(),
        state.message().map(|message| keccak256(message))
    );
    assert_eq!(state.attestation().map(|attestation| attestation.len()), Some(65));

    let attempts = state.attempts();
    assert_eq!(
        (attempts.approve, attempts.burn, attempts.attest, attempts.mint),
        (1, 1, 1, 1)
    );

    assert_eq!(
        harness.provider.balance_of(ETHEREUM_USDC, FAKE_ACCOUNT),
        U256::ZERO
    );
    assert_eq!(
        harness.provider.balance_of(BASE_USDC, RECIPIENT),
        U256::from(TEN_USDC)
    );
    assert_eq!(harness.provider.active_chain(), 8453);
    assert_eq!(harness.provider.switch_requests(), vec![8453]);

    let chains: Vec<u64> = harness
        .provider
        .submitted_transactions()
        .iter()
        .map(|tx| tx.chain_id)
        .collect();
    assert_eq!(chains, vec![1, 1, 8453]);

    // Grace period only: the first poll already returned the signature.
    assert_eq!(harness.clock.elapsed(), Duration::from_secs(15));
}

#[tokio::test]
async fn test_events_follow_step_order() {
    let mut harness = Harness::new();

    harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    let events = harness.drain_events();
    let milestones: Vec<(Step, &'static str)> = events
        .iter()
        .filter_map(TransferEvent::as_step)
        .filter_map(|(step, status)| match status {
            StepStatus::Started => Some((step, "started")),
            StepStatus::Complete(_) => Some((step, "complete")),
            _ => None,
        })
        .collect();

    assert_eq!(
        milestones,
        vec![
            (Step::Approve, "started"),
            (Step::Approve, "complete"),
            (Step::Burn, "started"),
            (Step::Burn, "complete"),
            (Step::Attest, "started"),
            (Step::Attest, "complete"),
            (Step::Mint, "started"),
            (Step::Mint, "complete"),
        ]
    );

    let levels: Vec<LogLevel> = events
        .iter()
        .filter_map(TransferEvent::as_log)
        .map(|entry| entry.level)
        .collect();
    assert!(!levels.is_empty());
    assert!(levels.iter().all(|level| *level == LogLevel::Info));
}

#[tokio::test]
async fn test_gas_is_buffered_per_step() {
    let harness = Harness::new();
    harness.provider.set_gas_estimate(100_000);

    harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    let gas: Vec<Option<u64>> = harness
        .provider
        .submitted_transactions()
        .iter()
        .map(|tx| tx.request.gas)
        .collect();
    assert_eq!(gas, vec![Some(120_000), Some(130_000), Some(130_000)]);
}

#[tokio::test]
async fn test_attestation_completes_after_pending_confirmations() {
    let harness = Harness::new();
    let mut sequence = vec![FakeAttestationResponse::pending_confirmations(); 4];
    sequence.push(FakeAttestationResponse::complete(vec![0x22; 65]));
    harness.attestor.set_default_sequence(sequence);

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert_eq!(state.attempts().attest, 5);
    assert_eq!(harness.attestor.total_calls(), 5);
    assert_eq!(
        harness.clock.elapsed(),
        Duration::from_secs(15 + 4 * 45)
    );
}

#[tokio::test]
async fn test_attestation_timeout_then_resume() {
    let config = OrchestratorConfig::builder()
        .polling(PollingConfig::default().with_max_attempts(5))
        .build();
    let harness = Harness::with_config(config);
    harness
        .attestor
        .set_default_sequence(vec![FakeAttestationResponse::pending()]);

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        CctpError::AttestationTimeout { attempts: 5, .. }
    ));
    assert_eq!(failure.step(), Some(Step::Attest));
    assert_eq!(harness.attestor.total_calls(), 5);
    assert!(failure.state.burn_tx_hash().is_some());
    assert!(failure.state.mint_tx_hash().is_none());
    assert!(failure.state.can_resume());
    assert_eq!(harness.provider.submitted_transactions().len(), 2);

    harness
        .attestor
        .set_default_sequence(vec![FakeAttestationResponse::complete(vec![0x33; 65])]);
    let burn_tx_hash = failure.state.burn_tx_hash();

    let state = harness
        .orchestrator
        .resume(*failure.state, no_cancel())
        .await
        .unwrap();

    assert_eq!(*state.phase(), TransferPhase::Complete);
    assert_eq!(state.burn_tx_hash(), burn_tx_hash);
    assert_eq!(state.attempts().burn, 1);
    assert_eq!(harness.provider.submitted_transactions().len(), 3);
    assert_eq!(
        harness.provider.submitted_calls::<TokenMessenger::depositForBurnCall>().len(),
        1
    );
    assert_eq!(
        harness.provider.balance_of(BASE_USDC, RECIPIENT),
        U256::from(TEN_USDC)
    );
}

#[tokio::test]
async fn test_resume_rejects_state_without_burn() {
    let harness = Harness::new();
    harness.provider.set_balance(ETHEREUM_USDC, FAKE_ACCOUNT, U256::ZERO);

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();
    assert!(!failure.state.can_resume());

    let rejected = harness
        .orchestrator
        .resume(*failure.state, no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(rejected.error, CctpError::InvalidRequest(_)));
    assert_eq!(rejected.step(), Some(Step::Burn));
}

#[tokio::test]
async fn test_cancel_after_burn_submission_keeps_burn_record() {
    let harness = Harness::new();
    let (handle, cancel) = cancellation();
    // Submission 1 is the approval, submission 2 the burn.
    harness.provider.cancel_after_submissions(2, handle);

    let failure = harness
        .orchestrator
        .start(request(), cancel)
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CctpError::Cancelled));
    assert_eq!(
        *failure.state.phase(),
        TransferPhase::Failed {
            step: Step::Burn,
            reason: FailureReason::Cancelled,
        }
    );
    assert!(failure.state.burn_tx_hash().is_some());
    assert!(failure.state.message().is_some());
    assert!(failure.state.can_resume());
    assert_eq!(harness.attestor.total_calls(), 0);
}

#[tokio::test]
async fn test_cancel_before_start_submits_nothing() {
    let harness = Harness::new();
    let (handle, cancel) = cancellation();
    handle.cancel();

    let failure = harness
        .orchestrator
        .start(request(), cancel)
        .await
        .unwrap_err();

    assert_eq!(failure.step(), Some(Step::Approve));
    assert!(matches!(failure.error, CctpError::Cancelled));
    assert!(harness.provider.submitted_transactions().is_empty());
}

#[tokio::test]
async fn test_duplicate_start_is_rejected_while_in_flight() {
    let harness = Harness::new();
    let orchestrator = &harness.orchestrator;

    let (first, second) = tokio::join!(
        orchestrator.start(request(), no_cancel()),
        orchestrator.start(request(), no_cancel()),
    );

    let state = first.unwrap();
    assert_eq!(*state.phase(), TransferPhase::Complete);

    let rejected = second.unwrap_err();
    assert!(matches!(rejected.error, CctpError::TransferInProgress));
    assert_eq!(*rejected.state.phase(), TransferPhase::Idle);
    assert_eq!(rejected.step(), None);

    assert!(!orchestrator.is_in_flight(&request()));
    assert_eq!(
        harness.provider.submitted_calls::<TokenMessenger::depositForBurnCall>().len(),
        1
    );
}

#[tokio::test]
async fn test_sequential_runs_of_same_request_are_allowed() {
    let harness = Harness::new();
    harness
        .provider
        .set_balance(ETHEREUM_USDC, FAKE_ACCOUNT, U256::from(2 * TEN_USDC));

    harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();
    let second = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert_eq!(*second.phase(), TransferPhase::Complete);
    assert_eq!(
        harness.provider.balance_of(BASE_USDC, RECIPIENT),
        U256::from(2 * TEN_USDC)
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_wallet_submission_keeps_burn_record() {
    let harness = Harness::new();
    // Each transaction is broadcast immediately but its hash arrives after
    // the 30s rpc timeout.
    harness.provider.set_submission_delay(Duration::from_secs(40));

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert_eq!(*state.phase(), TransferPhase::Complete);
    let submitted = harness.provider.submitted_transactions();
    assert_eq!(submitted.len(), 3);
    assert_eq!(state.approval_tx_hash(), Some(submitted[0].tx_hash));
    assert_eq!(state.burn_tx_hash(), Some(submitted[1].tx_hash));
    assert_eq!(state.mint_tx_hash(), Some(submitted[2].tx_hash));
    assert_eq!(
        harness.provider.balance_of(BASE_USDC, RECIPIENT),
        U256::from(TEN_USDC)
    );
}

#[tokio::test(start_paused = true)]
async fn test_slow_burn_submission_then_cancel_is_resumable() {
    let harness = Harness::new();
    let (handle, cancel) = cancellation();
    harness.provider.set_submission_delay(Duration::from_secs(40));
    harness.provider.cancel_after_submissions(2, handle);

    let failure = harness
        .orchestrator
        .start(request(), cancel)
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CctpError::Cancelled));
    assert_eq!(failure.step(), Some(Step::Burn));
    assert_eq!(
        failure.state.burn_tx_hash(),
        Some(harness.provider.submitted_transactions()[1].tx_hash)
    );
    assert!(failure.state.can_resume());
}

#[tokio::test]
async fn test_insufficient_balance_fails_before_burn() {
    let mut harness = Harness::new();
    harness
        .provider
        .set_balance(ETHEREUM_USDC, FAKE_ACCOUNT, U256::from(1_000_000u64));

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();

    assert_eq!(failure.step(), Some(Step::Burn));
    match failure.error {
        CctpError::InsufficientBalance {
            required,
            available,
        } => {
            assert_eq!(required, U256::from(TEN_USDC));
            assert_eq!(available, U256::from(1_000_000u64));
        }
        other => panic!("expected InsufficientBalance, got {other:?}"),
    }
    assert!(failure.state.approval_tx_hash().is_some());
    assert!(failure.state.burn_tx_hash().is_none());
    assert!(harness
        .warnings()
        .iter()
        .any(|message| message.contains("USDC short of")));
}

#[tokio::test]
async fn test_missing_message_sent_event() {
    let harness = Harness::new();
    harness.provider.omit_message_sent_event();

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CctpError::MessageNotFound { .. }));
    assert_eq!(failure.step(), Some(Step::Burn));
    assert!(failure.state.burn_tx_hash().is_some());
    assert!(failure.state.message().is_none());
    assert!(!failure.state.can_resume());
}

#[rstest]
#[case::approve(Erc20::approveCall::SELECTOR, Step::Approve)]
#[case::burn(TokenMessenger::depositForBurnCall::SELECTOR, Step::Burn)]
#[case::mint(MessageTransmitter::receiveMessageCall::SELECTOR, Step::Mint)]
#[tokio::test]
async fn test_reverted_transaction_fails_its_step(
    #[case] selector: [u8; 4],
    #[case] expected_step: Step,
) {
    let harness = Harness::new();
    harness.provider.revert_selector(selector);

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        CctpError::TransactionReverted { .. }
    ));
    assert_eq!(failure.step(), Some(expected_step));
    match &*failure.state.phase() {
        TransferPhase::Failed {
            reason: FailureReason::Error { kind, .. },
            ..
        } => assert_eq!(*kind, "TransactionReverted"),
        other => panic!("unexpected phase {other:?}"),
    }
}

#[tokio::test]
async fn test_attestation_failure_skips_mint() {
    let harness = Harness::new();
    harness
        .attestor
        .set_default_sequence(vec![FakeAttestationResponse::failed()]);

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(failure.error, CctpError::AttestationFailed { .. }));
    assert_eq!(failure.step(), Some(Step::Attest));
    assert!(harness
        .provider
        .submitted_calls::<MessageTransmitter::receiveMessageCall>()
        .is_empty());
}

#[tokio::test]
async fn test_wallet_ignoring_switch_fails_mint() {
    let harness = Harness::new();
    harness.provider.ignore_switch_requests();

    let failure = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        CctpError::ChainSwitchFailed {
            expected: 8453,
            actual: 1
        }
    ));
    assert_eq!(failure.step(), Some(Step::Mint));
    assert!(failure.state.attestation().is_some());
    assert!(failure.state.mint_tx_hash().is_none());
}

#[tokio::test]
async fn test_unknown_destination_chain_is_added_to_wallet() {
    let harness = Harness::new();
    harness.provider.forget_chain(8453);

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert_eq!(*state.phase(), TransferPhase::Complete);
    assert_eq!(harness.provider.added_chains(), vec![8453]);
    assert_eq!(harness.provider.switch_requests(), vec![8453, 8453]);
}

#[tokio::test]
async fn test_wallet_switches_to_source_chain_first() {
    let harness = Harness::new();
    harness.provider.set_active_chain(42161);

    harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    let submitted = harness.provider.submitted_transactions();
    assert_eq!(submitted[0].chain_id, 1);
    assert_eq!(harness.provider.switch_requests(), vec![1, 8453]);
}

#[tokio::test]
async fn test_stale_allowance_is_reset_before_approval() {
    let harness = Harness::new();
    harness.provider.set_allowance(
        ETHEREUM_USDC,
        FAKE_ACCOUNT,
        ETHEREUM_TOKEN_MESSENGER,
        U256::from(5u64),
    );

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert!(state.allowance_reset_tx_hash().is_some());
    assert!(state.approval_tx_hash().is_some());
    assert_eq!(state.attempts().approve, 2);

    let approvals: Vec<U256> = harness
        .provider
        .submitted_calls::<Erc20::approveCall>()
        .into_iter()
        .map(|call| call.amount)
        .collect();
    assert_eq!(approvals, vec![U256::ZERO, U256::from(TEN_USDC)]);
}

#[tokio::test]
async fn test_exact_allowance_skips_approval() {
    let mut harness = Harness::new();
    harness.provider.set_allowance(
        ETHEREUM_USDC,
        FAKE_ACCOUNT,
        ETHEREUM_TOKEN_MESSENGER,
        U256::from(TEN_USDC),
    );

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert!(state.approval_tx_hash().is_none());
    assert_eq!(state.attempts().approve, 0);
    assert!(harness
        .provider
        .submitted_calls::<Erc20::approveCall>()
        .is_empty());

    let approve_detail = harness
        .drain_events()
        .iter()
        .filter_map(TransferEvent::as_step)
        .find_map(|(step, status)| match (step, status) {
            (Step::Approve, StepStatus::Complete(detail)) => Some(detail.clone()),
            _ => None,
        })
        .unwrap();
    assert!(approve_detail.starts_with("Allowance already covers"));
}

#[tokio::test]
async fn test_unsupported_chain_fails_before_any_step() {
    let harness = Harness::new();
    let request = TransferRequest::new(
        NamedChain::Mainnet,
        NamedChain::Linea,
        U256::from(TEN_USDC),
        "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d",
    )
    .unwrap();

    let failure = harness
        .orchestrator
        .start(request, no_cancel())
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        CctpError::UnsupportedChain {
            chain: NamedChain::Linea
        }
    ));
    assert_eq!(failure.step(), None);
    assert_eq!(*failure.state.phase(), TransferPhase::Idle);
    assert!(!failure.state.phase().is_terminal());
    assert!(harness.provider.switch_requests().is_empty());
    assert!(harness.provider.submitted_transactions().is_empty());
}

#[tokio::test]
async fn test_unrecognised_attester_is_reported() {
    let config = OrchestratorConfig::builder()
        .verify_attestation_signatures(true)
        .build();
    let mut harness = Harness::with_config(config);

    let signer = PrivateKeySigner::random();
    harness.attestor.set_signer(move |hash| {
        let signature = signer.sign_hash_sync(&hash).unwrap();
        Bytes::from(signature.as_bytes().to_vec())
    });
    harness
        .attestor
        .set_public_keys(vec![Bytes::from(vec![0x07; 64])]);
    harness
        .attestor
        .set_default_sequence(vec![FakeAttestationResponse::CompleteSigned]);

    let state = harness
        .orchestrator
        .start(request(), no_cancel())
        .await
        .unwrap();

    assert_eq!(*state.phase(), TransferPhase::Complete);
    let warnings = harness.warnings();
    assert!(
        warnings
            .iter()
            .any(|message| message.contains("unrecognised attester")),
        "warnings: {warnings:?}"
    );
}

#[tokio::test]
async fn test_human_amount_request_transfers_base_units() {
    let harness = Harness::new();
    let request = TransferRequest::from_human_amount(
        NamedChain::Mainnet,
        NamedChain::Base,
        "2.5",
        6,
        "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d",
    )
    .unwrap();

    harness
        .orchestrator
        .start(request, no_cancel())
        .await
        .unwrap();

    let burns = harness
        .provider
        .submitted_calls::<TokenMessenger::depositForBurnCall>();
    assert_eq!(burns[0].amount, U256::from(2_500_000u64));
    assert_eq!(burns[0].destinationDomain, 6);
    assert_eq!(burns[0].mintRecipient, RECIPIENT.into_word());
    assert_eq!(
        harness.provider.balance_of(ETHEREUM_USDC, FAKE_ACCOUNT),
        U256::from(TEN_USDC - 2_500_000)
    );
}
