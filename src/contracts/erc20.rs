// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC20 bindings for balance, allowance and approval calls.
//!
//! Reads go through the `#[sol(rpc)]` instance on a live provider. Writes
//! are returned as unsigned [`TransactionRequest`]s so that signing stays
//! inside the [`BlockchainProvider`](crate::BlockchainProvider).

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Log, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::debug;

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Erc20 {
        event Transfer(address indexed from, address indexed to, uint256 value);

        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
);

/// Builds an `approve(spender, amount)` transaction from `owner` to `token`.
pub fn approve_transaction(
    token: Address,
    owner: Address,
    spender: Address,
    amount: U256,
) -> TransactionRequest {
    debug!(
        token = %token,
        owner = %owner,
        spender = %spender,
        amount = %amount,
        event = "approve_transaction_created"
    );

    let call = Erc20::approveCall { spender, amount };
    TransactionRequest::default()
        .with_from(owner)
        .with_to(token)
        .with_input(call.abi_encode())
}

/// Sums the `Transfer` events emitted by `token` that credit `recipient`.
///
/// Returns `None` when no such event is present.
pub fn credited_amount(logs: &[Log], token: Address, recipient: Address) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address == token)
        .filter_map(|log| Erc20::Transfer::decode_log_data(&log.data).ok())
        .filter(|transfer| transfer.to == recipient)
        .map(|transfer| transfer.value)
        .reduce(|total, value| total.saturating_add(value))
}

/// Builds the `Transfer` log an ERC20 emits, for fakes and tests.
pub fn transfer_log(token: Address, from: Address, to: Address, value: U256) -> Log {
    let event = Erc20::Transfer { from, to, value };
    Log {
        address: token,
        data: event.encode_log_data(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Bytes};

    const USDC: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");
    const OWNER: Address = address!("742d35cc6634c0532925a3b844bc9e7595f8fa0d");
    const MESSENGER: Address = address!("1682ae6375c4e4a97e4b583bc394c861a46d8962");

    #[test]
    fn test_approve_transaction_encodes_call() {
        let tx = approve_transaction(USDC, OWNER, MESSENGER, U256::from(1_000_000u64));

        assert_eq!(tx.from, Some(OWNER));
        assert_eq!(tx.to, Some(USDC.into()));

        let input = tx.input.input().cloned().unwrap_or_default();
        let decoded = Erc20::approveCall::abi_decode(&input).unwrap();
        assert_eq!(decoded.spender, MESSENGER);
        assert_eq!(decoded.amount, U256::from(1_000_000u64));
    }

    #[test]
    fn test_credited_amount_filters_token_and_recipient() {
        let logs = vec![
            transfer_log(USDC, Address::ZERO, OWNER, U256::from(600u64)),
            transfer_log(USDC, Address::ZERO, OWNER, U256::from(400u64)),
            transfer_log(USDC, Address::ZERO, MESSENGER, U256::from(5u64)),
            transfer_log(MESSENGER, Address::ZERO, OWNER, U256::from(7u64)),
            Log::new_unchecked(USDC, vec![], Bytes::new()),
        ];

        assert_eq!(
            credited_amount(&logs, USDC, OWNER),
            Some(U256::from(1_000u64))
        );
        assert_eq!(credited_amount(&logs[3..], USDC, OWNER), None);
    }
}
