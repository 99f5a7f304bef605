// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Brings the token messenger's allowance to the transfer amount.
//!
//! Tokens that follow the USDT-style approve rule refuse to move an allowance
//! from one non-zero value to another. The manager therefore resets a stale
//! non-zero allowance to zero and waits for that reset to be mined before it
//! approves the requested amount, then reads the allowance back.

use alloy_primitives::{Address, TxHash, U256};
use tracing::{debug, info, warn};

use super::receipt::{confirm, ReceiptPolicy};
use crate::contracts::erc20::approve_transaction;
use crate::error::{CctpError, Result};
use crate::gas::{price_transaction, with_timeout};
use crate::traits::{BlockchainProvider, Clock};

/// Transactions the manager sent, recorded as soon as each is broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowanceProgress {
    pub reset_tx_hash: Option<TxHash>,
    pub approval_tx_hash: Option<TxHash>,
    pub submissions: u32,
}

pub(crate) struct AllowanceManager<'a, P: ?Sized, C: ?Sized> {
    provider: &'a P,
    clock: &'a C,
    receipts: ReceiptPolicy,
    buffer_percent: u64,
    priority_fee: u128,
}

impl<'a, P, C> AllowanceManager<'a, P, C>
where
    P: BlockchainProvider + ?Sized,
    C: Clock + ?Sized,
{
    pub(crate) fn new(
        provider: &'a P,
        clock: &'a C,
        receipts: ReceiptPolicy,
        buffer_percent: u64,
        priority_fee: u128,
    ) -> Self {
        Self {
            provider,
            clock,
            receipts,
            buffer_percent,
            priority_fee,
        }
    }

    /// Ensures `owner` has approved exactly `required` of `token` to `spender`.
    ///
    /// Does nothing when the allowance already equals `required`. Hashes are
    /// written into `progress` as each transaction is broadcast, so the
    /// caller keeps them even when a later step fails.
    ///
    /// # Errors
    ///
    /// Propagates submission, receipt and revert errors, and returns
    /// [`CctpError::AllowanceMismatch`] when the allowance read after
    /// approval is still below `required`.
    pub(crate) async fn ensure(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        required: U256,
        progress: &mut AllowanceProgress,
    ) -> Result<U256> {
        let current = self.read(token, owner, spender).await?;
        debug!(
            current = %current,
            required = %required,
            event = "allowance_checked"
        );

        if current == required {
            info!(allowance = %current, event = "allowance_already_set");
            return Ok(current);
        }

        if !current.is_zero() {
            info!(current = %current, event = "allowance_reset_started");
            let tx_hash = self.approve(token, owner, spender, U256::ZERO, progress).await?;
            progress.reset_tx_hash = Some(tx_hash);
            self.wait(tx_hash).await?;
        }

        let tx_hash = self.approve(token, owner, spender, required, progress).await?;
        progress.approval_tx_hash = Some(tx_hash);
        self.wait(tx_hash).await?;

        let actual = self.read(token, owner, spender).await?;
        if actual < required {
            warn!(
                required = %required,
                actual = %actual,
                event = "allowance_mismatch"
            );
            return Err(CctpError::AllowanceMismatch { required, actual });
        }

        info!(allowance = %actual, event = "allowance_set");
        Ok(actual)
    }

    async fn read(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        with_timeout(
            "get_allowance",
            self.receipts.rpc_timeout,
            self.provider.get_allowance(token, owner, spender),
        )
        .await
    }

    async fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
        progress: &mut AllowanceProgress,
    ) -> Result<TxHash> {
        let tx = price_transaction(
            self.provider,
            approve_transaction(token, owner, spender, amount),
            self.buffer_percent,
            self.priority_fee,
            self.receipts.rpc_timeout,
        )
        .await?;

        // Unbounded: a timed-out call may already have been broadcast.
        let tx_hash = self.provider.submit_transaction(tx).await?;
        progress.submissions += 1;

        info!(tx_hash = %tx_hash, amount = %amount, event = "approval_submitted");
        Ok(tx_hash)
    }

    async fn wait(&self, tx_hash: TxHash) -> Result<()> {
        confirm(self.provider, self.clock, tx_hash, self.receipts)
            .await
            .map(|_| ())
    }
}
