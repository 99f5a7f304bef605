// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! MessageTransmitter bindings
//!
//! On the destination chain `receiveMessage` verifies the attestation and
//! hands the burn message to the local `TokenMessenger`, which mints.

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::info;

sol!(
    #[allow(missing_docs)]
    contract MessageTransmitter {
        function receiveMessage(bytes message, bytes attestation) external returns (bool success);
    }
);

/// Builds a `receiveMessage(message, attestation)` transaction.
pub fn receive_message_transaction(
    message_transmitter: Address,
    from: Address,
    message: Bytes,
    attestation: Bytes,
) -> TransactionRequest {
    info!(
        from_address = %from,
        contract_address = %message_transmitter,
        message_length_bytes = message.len(),
        attestation_length_bytes = attestation.len(),
        event = "receive_message_transaction_created"
    );

    let call = MessageTransmitter::receiveMessageCall {
        message,
        attestation,
    };

    TransactionRequest::default()
        .with_from(from)
        .with_to(message_transmitter)
        .with_input(call.abi_encode())
}
