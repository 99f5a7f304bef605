// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Published CCTP v1 and USDC contract addresses.
//!
//! Reference: <https://developers.circle.com/stablecoins/evm-smart-contracts>
//! and <https://developers.circle.com/stablecoins/usdc-on-main-networks>.

use alloy_primitives::{address, Address};

// USDC

pub const ETHEREUM_USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const ARBITRUM_USDC: Address = address!("af88d065e77c8cc2239327c5edb3a432268e5831");
pub const AVALANCHE_USDC: Address = address!("b97ef9ef8734c71904d8002f8b6bc66dd9c48a6e");
pub const BASE_USDC: Address = address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913");
pub const OPTIMISM_USDC: Address = address!("0b2c639c533813f4aa9d7837caf62653d097ff85");
pub const POLYGON_USDC: Address = address!("3c499c542cef5e3811e1192ce70d8cc03d5c3359");
pub const ETHEREUM_SEPOLIA_USDC: Address = address!("1c7d4b196cb0c7b01d743fbc6116a902379c7238");
pub const ARBITRUM_SEPOLIA_USDC: Address = address!("75faf114eafb1bdbe2f0316df893fd58ce46aa4d");
pub const BASE_SEPOLIA_USDC: Address = address!("036cbd53842c5426634e7929541ec2318f3dcf7e");

// TokenMessenger

pub const ETHEREUM_TOKEN_MESSENGER: Address = address!("bd3fa81b58ba92a82136038b25adec7066af3155");
pub const ARBITRUM_TOKEN_MESSENGER: Address = address!("19330d10d9cc8751218eaf51e8885d058642e08a");
pub const AVALANCHE_TOKEN_MESSENGER: Address =
    address!("6b25532e1060ce10cc3b0a99e5683b91bfde6982");
pub const BASE_TOKEN_MESSENGER: Address = address!("1682ae6375c4e4a97e4b583bc394c861a46d8962");
pub const OPTIMISM_TOKEN_MESSENGER: Address = address!("2b4069517957735be00cee0fadae88a26365528f");
pub const POLYGON_TOKEN_MESSENGER: Address = address!("9daf8c91aefae50b9c0e69629d3f6ca40ca3b3fe");
/// Shared by Sepolia, Arbitrum Sepolia and Base Sepolia.
pub const TESTNET_TOKEN_MESSENGER: Address = address!("9f3b8679c73c2fef8b59b4f3444d4e156fb70aa5");

// MessageTransmitter

pub const ETHEREUM_MESSAGE_TRANSMITTER: Address =
    address!("0a992d191deec32afe36203ad87d7d289a738f81");
pub const ARBITRUM_MESSAGE_TRANSMITTER: Address =
    address!("c30362313fbba5cf9163f0bb16a0e01f01a896ca");
pub const AVALANCHE_MESSAGE_TRANSMITTER: Address =
    address!("8186359af5f57fbb40c6b14a588d2a59c0c29880");
pub const BASE_MESSAGE_TRANSMITTER: Address =
    address!("ad09780d193884d503182ad4588450c416d6f9d4");
pub const OPTIMISM_MESSAGE_TRANSMITTER: Address =
    address!("4d41f22c5a0e5c74090899e5a8fb597a8842b3e8");
pub const POLYGON_MESSAGE_TRANSMITTER: Address =
    address!("f3be9355363857f3e001be68856a2f96b4c39ba9");
/// Shared by Sepolia and Base Sepolia.
pub const TESTNET_MESSAGE_TRANSMITTER: Address =
    address!("7865fafc2db2093669d92c0f33aeef291086befd");
pub const ARBITRUM_SEPOLIA_MESSAGE_TRANSMITTER: Address =
    address!("acf1ceef35caac005e15888ddb8a3515c41b4872");

/// Circle Iris API environment URLs
///
/// See <https://developers.circle.com/stablecoins/cctp-apis>
pub const IRIS_API: &str = "https://iris-api.circle.com";
pub const IRIS_API_SANDBOX: &str = "https://iris-api-sandbox.circle.com";
