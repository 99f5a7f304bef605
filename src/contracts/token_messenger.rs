// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! TokenMessenger bindings
//!
//! The v1 `TokenMessenger` burns USDC on the source chain and emits the
//! cross-chain message through its local `MessageTransmitter`.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::info;

use crate::protocol::DomainId;

sol!(
    #[allow(missing_docs)]
    contract TokenMessenger {
        function depositForBurn(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken
        ) external returns (uint64 nonce);
    }
);

/// Builds a `depositForBurn` transaction from `owner` to `token_messenger`.
pub fn deposit_for_burn_transaction(
    token_messenger: Address,
    owner: Address,
    amount: U256,
    destination_domain: DomainId,
    mint_recipient: B256,
    burn_token: Address,
) -> TransactionRequest {
    info!(
        from_address = %owner,
        mint_recipient = %mint_recipient,
        destination_domain = destination_domain.as_u32(),
        token_address = %burn_token,
        amount = %amount,
        contract_address = %token_messenger,
        event = "deposit_for_burn_transaction_created"
    );

    let call = TokenMessenger::depositForBurnCall {
        amount,
        destinationDomain: destination_domain.as_u32(),
        mintRecipient: mint_recipient,
        burnToken: burn_token,
    };

    TransactionRequest::default()
        .with_from(owner)
        .with_to(token_messenger)
        .with_input(call.abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_recipient;
    use alloy_primitives::{address, hex};

    #[test]
    fn test_deposit_for_burn_calldata() {
        let recipient = encode_recipient("0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d").unwrap();
        let tx = deposit_for_burn_transaction(
            address!("1682ae6375c4e4a97e4b583bc394c861a46d8962"),
            address!("742d35cc6634c0532925a3b844bc9e7595f8fa0d"),
            U256::from(1_000_000u64),
            DomainId::Polygon,
            recipient,
            address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
        );

        let input = tx.input.input().cloned().unwrap_or_default();
        assert_eq!(&input[..4], TokenMessenger::depositForBurnCall::SELECTOR.as_slice());

        let decoded = TokenMessenger::depositForBurnCall::abi_decode(&input).unwrap();
        assert_eq!(decoded.amount, U256::from(1_000_000u64));
        assert_eq!(decoded.destinationDomain, 7);
        assert_eq!(decoded.mintRecipient, recipient);

        insta::assert_snapshot!(hex::encode_prefixed(&input[..4]), @"0x6fd3504e");
    }
}
