// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Attestation API payloads and attester signature helpers.

use alloy_primitives::{hex::FromHex, Address, Bytes, Signature, B256};
use serde::{Deserialize, Deserializer};

use crate::error::{CctpError, Result};

/// Length of one ECDSA attester signature inside an attestation.
pub const SIGNATURE_LENGTH: usize = 65;

/// Certification status of a burned message as reported by the attestor.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttestationStatus {
    Complete,
    Pending,
    PendingConfirmations,
    Failed,
    /// Any status string this crate does not recognise.
    #[serde(other)]
    Unknown,
}

/// One poll result from the attestor.
///
/// `signature` is the concatenated attester signatures and is only present
/// once the status is [`AttestationStatus::Complete`].
///
/// **API Quirk**: Circle's Iris API sometimes returns the string `"PENDING"`
/// in the attestation field instead of `null`; that is read as `None`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AttestationRecord {
    pub status: AttestationStatus,
    #[serde(
        default,
        rename = "attestation",
        deserialize_with = "deserialize_optional_bytes_or_pending"
    )]
    pub signature: Option<Bytes>,
}

impl AttestationRecord {
    pub fn pending() -> Self {
        Self {
            status: AttestationStatus::Pending,
            signature: None,
        }
    }

    pub fn complete(signature: impl Into<Bytes>) -> Self {
        Self {
            status: AttestationStatus::Complete,
            signature: Some(signature.into()),
        }
    }

    pub fn with_status(status: AttestationStatus) -> Self {
        Self {
            status,
            signature: None,
        }
    }
}

/// Body of `GET /v1/publicKeys`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeysResponse {
    pub public_keys: Vec<Bytes>,
}

fn deserialize_optional_bytes_or_pending<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Bytes>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;

    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("pending") => Ok(None),
        Some(s) => Bytes::from_hex(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Derives the signing address of an attester from its secp256k1 public key.
///
/// Accepts the 65-byte uncompressed SEC1 form (`0x04` prefix) or the raw
/// 64-byte coordinates.
pub fn attester_address(public_key: &[u8]) -> Result<Address> {
    let coordinates = match public_key {
        [0x04, rest @ ..] if rest.len() == 64 => rest,
        raw if raw.len() == 64 => raw,
        other => {
            return Err(CctpError::InvalidConfig(format!(
                "attester public key must be 64 or 65 bytes, got {}",
                other.len()
            )))
        }
    };
    Ok(Address::from_raw_public_key(coordinates))
}

/// Recovers the address behind every signature in an attestation.
///
/// Attesters sign the message hash directly, with no personal-message prefix.
pub fn recover_attesters(message_hash: B256, attestation: &[u8]) -> Result<Vec<Address>> {
    if attestation.is_empty() || attestation.len() % SIGNATURE_LENGTH != 0 {
        return Err(CctpError::MalformedAttestation { message_hash });
    }

    attestation
        .chunks_exact(SIGNATURE_LENGTH)
        .map(|chunk| {
            Signature::from_raw(chunk)
                .and_then(|signature| signature.recover_address_from_prehash(&message_hash))
                .map_err(|_| CctpError::MalformedAttestation { message_hash })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    #[test]
    fn test_deserialize_complete_record() {
        let json = r#"{"status":"complete","attestation":"0x1234abcd"}"#;
        let record: AttestationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.status, AttestationStatus::Complete);
        assert_eq!(
            record.signature.unwrap().to_vec(),
            vec![0x12, 0x34, 0xab, 0xcd]
        );
    }

    #[test]
    fn test_deserialize_pending_placeholders() {
        for json in [
            r#"{"status":"pending","attestation":"PENDING"}"#,
            r#"{"status":"pending","attestation":null}"#,
            r#"{"status":"pending","attestation":""}"#,
            r#"{"status":"pending"}"#,
        ] {
            let record: AttestationRecord = serde_json::from_str(json).unwrap();
            assert_eq!(record, AttestationRecord::pending(), "{json}");
        }
    }

    #[test]
    fn test_deserialize_unknown_status() {
        let json = r#"{"status":"queued_for_review"}"#;
        let record: AttestationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttestationStatus::Unknown);
    }

    #[test]
    fn test_deserialize_pending_confirmations() {
        let json = r#"{"status":"pending_confirmations","attestation":null}"#;
        let record: AttestationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttestationStatus::PendingConfirmations);
    }

    #[test]
    fn test_invalid_hex_fails() {
        let json = r#"{"status":"complete","attestation":"not_valid_hex"}"#;
        assert!(serde_json::from_str::<AttestationRecord>(json).is_err());
    }

    #[test]
    fn test_public_keys_response() {
        let json = r#"{"publicKeys":["0x04aa","0x04bb"]}"#;
        let response: PublicKeysResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.public_keys.len(), 2);
    }

    #[test]
    fn test_attester_address_from_generator_point() {
        // Public key of the secret key `1`.
        let public_key = hex!(
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
            "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        let expected = address!("7e5f4552091a69125d5dfcb7b8c2659029395bdf");

        assert_eq!(attester_address(&public_key).unwrap(), expected);
        assert_eq!(attester_address(&public_key[1..]).unwrap(), expected);
        assert!(attester_address(&public_key[..33]).is_err());
    }

    #[test]
    fn test_recover_rejects_truncated_attestation() {
        let err = recover_attesters(B256::ZERO, &[0u8; 64]).unwrap_err();
        assert!(matches!(err, CctpError::MalformedAttestation { .. }));
    }
}
