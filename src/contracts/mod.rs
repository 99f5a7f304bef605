// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP v1 and ERC20 contract bindings
//!
//! Each module declares the minimal ABI the orchestrator calls and exposes
//! helpers that turn a call into an unsigned [`TransactionRequest`](alloy_rpc_types::TransactionRequest).

pub mod erc20;
pub mod message_transmitter;
pub mod token_messenger;
