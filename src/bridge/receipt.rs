// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Waiting for submitted transactions to be mined.

use std::time::Duration;

use alloy_primitives::TxHash;
use tracing::{debug, info, warn, Instrument};

use crate::error::{CctpError, Result};
use crate::gas::with_timeout;
use crate::spans;
use crate::traits::{BlockchainProvider, Clock, TransactionOutcome};

/// Receipt polling schedule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReceiptPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub rpc_timeout: Duration,
}

/// Polls for the receipt of `tx_hash` until it is mined.
///
/// Transient node errors are logged and retried until the deadline. This wait
/// does not observe cancellation: once a transaction is broadcast its outcome
/// must be known before the run may stop.
///
/// # Errors
///
/// - [`CctpError::ReceiptTimeout`] when the deadline passes
/// - [`CctpError::TransactionReverted`] when the transaction was mined but failed
pub(crate) async fn confirm<P, C>(
    provider: &P,
    clock: &C,
    tx_hash: TxHash,
    policy: ReceiptPolicy,
) -> Result<TransactionOutcome>
where
    P: BlockchainProvider + ?Sized,
    C: Clock + ?Sized,
{
    let outcome = wait_for_receipt(provider, clock, tx_hash, policy)
        .instrument(spans::wait_for_receipt(tx_hash, policy.timeout.as_secs()))
        .await?;

    if !outcome.success {
        warn!(
            tx_hash = %tx_hash,
            block_number = ?outcome.block_number,
            event = "transaction_reverted"
        );
        return Err(CctpError::TransactionReverted { tx_hash });
    }

    info!(
        tx_hash = %tx_hash,
        block_number = ?outcome.block_number,
        gas_used = outcome.gas_used,
        event = "transaction_confirmed"
    );
    Ok(outcome)
}

async fn wait_for_receipt<P, C>(
    provider: &P,
    clock: &C,
    tx_hash: TxHash,
    policy: ReceiptPolicy,
) -> Result<TransactionOutcome>
where
    P: BlockchainProvider + ?Sized,
    C: Clock + ?Sized,
{
    let deadline = clock.now() + policy.timeout;
    let mut polls = 0u32;

    loop {
        polls += 1;
        match with_timeout("get_receipt", policy.rpc_timeout, provider.get_receipt(tx_hash)).await {
            Ok(Some(outcome)) => return Ok(outcome),
            Ok(None) => debug!(tx_hash = %tx_hash, polls, event = "receipt_pending"),
            Err(e) if e.is_transient() => {
                warn!(tx_hash = %tx_hash, polls, error = %e, event = "receipt_poll_failed")
            }
            Err(e) => return Err(e),
        }

        if clock.now() >= deadline {
            warn!(tx_hash = %tx_hash, polls, event = "receipt_timeout");
            return Err(CctpError::ReceiptTimeout { tx_hash });
        }
        clock.sleep(policy.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBlockchainProvider, FakeClock};
    use alloy_primitives::{address, U256};
    use alloy_sol_types::SolCall;

    fn policy() -> ReceiptPolicy {
        ReceiptPolicy {
            poll_interval: Duration::from_secs(3),
            timeout: Duration::from_secs(30),
            rpc_timeout: Duration::from_secs(5),
        }
    }

    async fn submit_approval(provider: &FakeBlockchainProvider) -> TxHash {
        let tx = crate::contracts::erc20::approve_transaction(
            address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
            provider.account_address(),
            address!("1682ae6375c4e4a97e4b583bc394c861a46d8962"),
            U256::from(1u64),
        );
        provider.submit_transaction(tx).await.unwrap()
    }

    #[tokio::test]
    async fn test_confirm_polls_until_mined() {
        let provider = FakeBlockchainProvider::new();
        provider.set_pending_receipt_polls(3);
        let clock = FakeClock::new();
        let tx_hash = submit_approval(&provider).await;

        let outcome = confirm(&provider, &clock, tx_hash, policy()).await.unwrap();

        assert!(outcome.success);
        assert_eq!(clock.sleep_calls(), vec![Duration::from_secs(3); 3]);
    }

    #[tokio::test]
    async fn test_confirm_retries_transient_errors() {
        let provider = FakeBlockchainProvider::new();
        provider.fail_receipt_polls(2);
        let clock = FakeClock::new();
        let tx_hash = submit_approval(&provider).await;

        confirm(&provider, &clock, tx_hash, policy()).await.unwrap();

        assert_eq!(clock.sleep_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_confirm_times_out() {
        let provider = FakeBlockchainProvider::new();
        provider.set_pending_receipt_polls(usize::MAX);
        let clock = FakeClock::new();
        let tx_hash = submit_approval(&provider).await;

        let err = confirm(&provider, &clock, tx_hash, policy()).await.unwrap_err();

        assert!(matches!(err, CctpError::ReceiptTimeout { tx_hash: h } if h == tx_hash));
        assert_eq!(clock.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_confirm_reports_revert() {
        let provider = FakeBlockchainProvider::new();
        provider.revert_selector(crate::contracts::erc20::Erc20::approveCall::SELECTOR);
        let clock = FakeClock::new();
        let tx_hash = submit_approval(&provider).await;

        let err = confirm(&provider, &clock, tx_hash, policy()).await.unwrap_err();

        assert!(matches!(err, CctpError::TransactionReverted { .. }));
    }
}
