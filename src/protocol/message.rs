// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP v1 message codec.
//!
//! A burn emits `MessageSent(bytes message)` from the source
//! `MessageTransmitter`. The attestor indexes that message by its keccak256
//! hash, and the destination `MessageTransmitter` consumes the raw bytes
//! together with the attestation.
//!
//! # Format
//!
//! Header (116 bytes):
//! - version: uint32
//! - sourceDomain: uint32
//! - destinationDomain: uint32
//! - nonce: uint64
//! - sender: bytes32
//! - recipient: bytes32
//! - destinationCaller: bytes32
//!
//! Burn body (132 bytes):
//! - version: uint32
//! - burnToken: bytes32
//! - mintRecipient: bytes32
//! - amount: uint256
//! - messageSender: bytes32
//!
//! Reference: <https://developers.circle.com/stablecoins/message-format>

use alloy_primitives::{hex, keccak256, Address, Bytes, Log, TxHash, B256, U256};
use alloy_sol_types::{sol, SolEvent};
use tracing::{debug, error, info};

use super::DomainId;
use crate::error::{CctpError, Result};

sol! {
    /// Emitted by the source `MessageTransmitter` for every outbound message.
    event MessageSent(bytes message);
}

/// Topic 0 of the `MessageSent(bytes)` event.
pub const MESSAGE_SENT_TOPIC: B256 = MessageSent::SIGNATURE_HASH;

/// Parses a hex address, with or without a `0x` prefix, into 20 bytes.
///
/// # Errors
///
/// Returns [`CctpError::InvalidRecipient`] unless the input is exactly 40
/// hexadecimal characters once the prefix is stripped.
pub fn parse_recipient(input: &str) -> Result<Address> {
    let invalid = |reason: String| CctpError::InvalidRecipient {
        input: input.to_string(),
        reason,
    };

    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if digits.len() != 40 {
        return Err(invalid(format!(
            "expected 40 hex characters, got {}",
            digits.len()
        )));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hexadecimal characters".to_string()));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes).map_err(|e| invalid(e.to_string()))?;
    Ok(Address::from(bytes))
}

/// Encodes a recipient address into the 32-byte `mintRecipient` field.
///
/// The address is right-aligned; the top 12 bytes are zero.
pub fn encode_recipient(input: &str) -> Result<B256> {
    parse_recipient(input).map(|address| address.into_word())
}

/// The protocol message emitted by a burn, and the hash the attestor keys it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub message: Bytes,
    pub message_hash: B256,
}

/// Finds the `MessageSent` entry among a burn transaction's logs and decodes it.
///
/// # Errors
///
/// Returns [`CctpError::MessageNotFound`] when no log carries the
/// `MessageSent` topic, and [`CctpError::Abi`] when the payload is not a
/// single ABI-encoded `bytes` value.
pub fn extract_message(tx_hash: TxHash, logs: &[Log]) -> Result<ExtractedMessage> {
    let mut matching = logs
        .iter()
        .filter(|log| log.topics().first() == Some(&MESSAGE_SENT_TOPIC));

    let Some(log) = matching.next() else {
        error!(
            tx_hash = %tx_hash,
            available_logs = logs.len(),
            event = "message_sent_event_not_found"
        );
        return Err(CctpError::MessageNotFound {
            tx_hash,
            logs_scanned: logs.len(),
        });
    };

    let extra = matching.count();
    if extra > 0 {
        debug!(
            tx_hash = %tx_hash,
            ignored_events = extra,
            event = "multiple_message_sent_events"
        );
    }

    let (message,) = MessageSent::abi_decode_data(&log.data.data)?;
    let message_hash = keccak256(&message);

    info!(
        tx_hash = %tx_hash,
        message_hash = %message_hash,
        message_length_bytes = message.len(),
        event = "message_sent_event_extracted"
    );

    Ok(ExtractedMessage {
        message,
        message_hash,
    })
}

/// Builds the `MessageSent` log a `MessageTransmitter` would emit for `message`.
pub fn message_sent_log(emitter: Address, message: Bytes) -> Log {
    let event = MessageSent { message };
    Log::new_unchecked(emitter, vec![MESSAGE_SENT_TOPIC], event.encode_data().into())
}

/// Header of a v1 CCTP message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: u32,
    pub source_domain: DomainId,
    pub destination_domain: DomainId,
    pub nonce: u64,
    pub sender: B256,
    pub recipient: B256,
    pub destination_caller: B256,
}

impl MessageHeader {
    pub const SIZE: usize = 116;

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&self.source_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.destination_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes.extend_from_slice(self.sender.as_slice());
        bytes.extend_from_slice(self.recipient.as_slice());
        bytes.extend_from_slice(self.destination_caller.as_slice());
        bytes
    }

    /// Returns `None` when the input is shorter than a header or names an unknown domain.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        Some(Self {
            version: read_u32(bytes, 0)?,
            source_domain: DomainId::from_u32(read_u32(bytes, 4)?)?,
            destination_domain: DomainId::from_u32(read_u32(bytes, 8)?)?,
            nonce: u64::from_be_bytes(bytes[12..20].try_into().ok()?),
            sender: B256::from_slice(&bytes[20..52]),
            recipient: B256::from_slice(&bytes[52..84]),
            destination_caller: B256::from_slice(&bytes[84..116]),
        })
    }
}

/// Body of a v1 burn message, following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnMessage {
    pub version: u32,
    pub burn_token: Address,
    pub mint_recipient: Address,
    pub amount: U256,
    pub message_sender: Address,
}

impl BurnMessage {
    pub const SIZE: usize = 132;

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(self.burn_token.into_word().as_slice());
        bytes.extend_from_slice(self.mint_recipient.into_word().as_slice());
        bytes.extend_from_slice(&self.amount.to_be_bytes::<32>());
        bytes.extend_from_slice(self.message_sender.into_word().as_slice());
        bytes
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        Some(Self {
            version: read_u32(bytes, 0)?,
            burn_token: Address::from_word(B256::from_slice(&bytes[4..36])),
            mint_recipient: Address::from_word(B256::from_slice(&bytes[36..68])),
            amount: U256::from_be_slice(&bytes[68..100]),
            message_sender: Address::from_word(B256::from_slice(&bytes[100..132])),
        })
    }
}

/// A full burn message: header followed by the burn body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMessage {
    pub header: MessageHeader,
    pub body: BurnMessage,
}

impl DecodedMessage {
    pub fn encode(&self) -> Bytes {
        let mut bytes = self.header.encode();
        bytes.extend_from_slice(&self.body.encode());
        Bytes::from(bytes)
    }

    pub fn decode(message: &[u8]) -> Option<Self> {
        let header = MessageHeader::decode(message)?;
        let body = BurnMessage::decode(&message[MessageHeader::SIZE..])?;
        Some(Self { header, body })
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|slice| slice.try_into().ok())
        .map(u32::from_be_bytes)
}
