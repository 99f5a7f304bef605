// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Gas limit and EIP-1559 fee helpers.
//!
//! Every transaction the orchestrator sends is priced the same way: the
//! node's gas estimate plus a percentage margin, and a max fee of twice the
//! current base fee plus a fixed priority fee.

use alloy_network::TransactionBuilder;
use alloy_rpc_types::TransactionRequest;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::error::{CctpError, Result};
use crate::traits::BlockchainProvider;

/// Default priority fee (2.5 gwei).
pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 2_500_000_000;

/// Largest gas margin a configuration may ask for (10x the estimate).
pub const MAX_GAS_BUFFER_PERCENT: u64 = 1_000;

/// Adds `buffer_percent` to a gas estimate: `estimate * (100 + buffer) / 100`.
///
/// Computed in `u128` and clamped to `u64::MAX`, so the limit is never
/// below the estimate.
pub fn apply_gas_buffer(estimate: u64, buffer_percent: u64) -> u64 {
    let scaled = u128::from(estimate) * (100 + u128::from(buffer_percent)) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Max fee per gas: `2 * base_fee + priority_fee`.
pub fn max_fee_per_gas(base_fee: u128, priority_fee: u128) -> u128 {
    base_fee.saturating_mul(2).saturating_add(priority_fee)
}

/// Runs `future`, failing with [`CctpError::Timeout`] once `limit` elapses.
pub(crate) async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| CctpError::Timeout { operation })?
}

/// Fills gas limit and EIP-1559 fees on `tx` from the active chain.
///
/// # Errors
///
/// Propagates estimation failures. A failing estimate usually means the
/// call would revert, so nothing is submitted.
pub async fn price_transaction<P: BlockchainProvider + ?Sized>(
    provider: &P,
    tx: TransactionRequest,
    buffer_percent: u64,
    priority_fee: u128,
    rpc_timeout: Duration,
) -> Result<TransactionRequest> {
    let estimate = with_timeout("estimate_gas", rpc_timeout, provider.estimate_gas(&tx)).await?;
    let fees = with_timeout(
        "get_fee_parameters",
        rpc_timeout,
        provider.get_fee_parameters(),
    )
    .await?;

    let gas_limit = apply_gas_buffer(estimate, buffer_percent);
    let max_fee = max_fee_per_gas(fees.base_fee_per_gas, priority_fee);

    debug!(
        gas_estimate = estimate,
        gas_limit = gas_limit,
        buffer_percent = buffer_percent,
        base_fee_per_gas = fees.base_fee_per_gas,
        max_fee_per_gas = max_fee,
        max_priority_fee_per_gas = priority_fee,
        event = "transaction_priced"
    );

    Ok(tx
        .with_gas_limit(gas_limit)
        .with_max_fee_per_gas(max_fee)
        .with_max_priority_fee_per_gas(priority_fee))
}
