// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! OpenTelemetry span helpers for transfer operations
//!
//! Static span names and structured attributes, kept apart from the
//! orchestration logic. The orchestrator opens one span per run and one per
//! phase; errors are recorded on the innermost span with
//! [`record_error`].
//!
//! # Example
//!
//! ```rust,no_run
//! use cctp_orchestrator::spans;
//! use alloy_primitives::B256;
//!
//! let span = spans::attest(&B256::ZERO, 30, 45);
//! let _guard = span.enter();
//! // Custom attestation logic here
//! ```

use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash, B256, U256};
use tracing::Span;
use url::Url;

use crate::error::CctpError;

/// Root span of one orchestrator run.
///
/// Parent: caller's span
/// Children: one span per phase
#[inline]
pub fn transfer(
    source_chain: &NamedChain,
    destination_chain: &NamedChain,
    amount: &U256,
    recipient: &Address,
) -> Span {
    tracing::info_span!(
        "cctp_orchestrator.transfer",
        source_chain = %source_chain,
        destination_chain = %destination_chain,
        amount = %amount,
        recipient = %recipient,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for the allowance check and approval transactions.
#[inline]
pub fn approve(token: &Address, spender: &Address, amount: &U256) -> Span {
    tracing::info_span!(
        "cctp_orchestrator.approve",
        token = %token,
        spender = %spender,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for the `depositForBurn` submission and message extraction.
#[inline]
pub fn burn(
    from_address: &Address,
    destination_domain: u32,
    token_address: &Address,
    amount: &U256,
) -> Span {
    tracing::info_span!(
        "cctp_orchestrator.burn",
        from_address = %from_address,
        destination_domain = destination_domain,
        token_address = %token_address,
        amount = %amount,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for the attestation polling loop.
///
/// Children: cctp_orchestrator.attestation_attempt (one per poll)
#[inline]
pub fn attest(message_hash: &B256, max_attempts: u32, poll_interval_secs: u64) -> Span {
    tracing::info_span!(
        "cctp_orchestrator.attest",
        message_hash = %message_hash,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for a single attestation poll.
#[inline]
pub fn attestation_attempt(attempt: u32, max_attempts: u32) -> Span {
    tracing::debug_span!(
        "cctp_orchestrator.attestation_attempt",
        attempt = attempt,
        max_attempts = max_attempts,
    )
}

/// Span for the `receiveMessage` submission on the destination chain.
#[inline]
pub fn mint(message_hash: &B256, destination_chain: &NamedChain, attestation_length: usize) -> Span {
    tracing::info_span!(
        "cctp_orchestrator.mint",
        message_hash = %message_hash,
        destination_chain = %destination_chain,
        attestation_length_bytes = attestation_length,
        tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for switching the wallet's active network.
#[inline]
pub fn switch_chain(chain: &NamedChain, chain_id: u64) -> Span {
    tracing::debug_span!(
        "cctp_orchestrator.switch_chain",
        chain = %chain,
        chain_id = chain_id,
    )
}

/// Span for polling a receipt until it is mined or the deadline passes.
#[inline]
pub fn wait_for_receipt(tx_hash: TxHash, timeout_secs: u64) -> Span {
    tracing::debug_span!(
        "cctp_orchestrator.wait_for_receipt",
        tx_hash = %tx_hash,
        timeout_secs = timeout_secs,
    )
}

/// Span for an HTTP request to the attestation API.
#[inline]
pub fn http_request(method: &str, url: &Url) -> Span {
    tracing::trace_span!(
        "cctp_orchestrator.http_request",
        http.method = method,
        http.url = %url,
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions: `error.type` carries the
/// variant name and `error.message` the rendered error.
pub fn record_error(error: &CctpError) {
    let current_span = Span::current();
    current_span.record("error.type", error.kind());
    current_span.record("error.message", error.to_string());
    current_span.record("otel.status_code", "ERROR");
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use cctp_orchestrator::spans;
///
/// let span = tracing::info_span!("cctp_orchestrator.operation");
/// let _guard = span.enter();
///
/// spans::record_error_with_context(
///     "TransactionReverted",
///     "burn transaction reverted",
///     Some("funds were not burned; safe to retry"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
