// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Protocol-level types: domain ids, the v1 message codec and attestation payloads.

mod attestation;
mod domain_id;
mod message;

pub use attestation::{
    attester_address, recover_attesters, AttestationRecord, AttestationStatus,
    PublicKeysResponse, SIGNATURE_LENGTH,
};
pub use domain_id::{DomainId, InvalidDomainId};
pub use message::{
    encode_recipient, extract_message, message_sent_log, parse_recipient, BurnMessage,
    DecodedMessage, ExtractedMessage, MessageHeader, MessageSent, MESSAGE_SENT_TOPIC,
};
