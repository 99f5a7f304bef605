// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Circle Iris API attestation provider implementation.

use std::time::Duration;

use alloy_primitives::{hex, Bytes, B256};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, trace, Instrument};
use url::Url;

use crate::chain::addresses::{IRIS_API, IRIS_API_SANDBOX};
use crate::error::{CctpError, Result};
use crate::protocol::{AttestationRecord, PublicKeysResponse};
use crate::spans;
use crate::traits::AttestationProvider;

/// Retry-After used when a 429 response does not carry one.
const DEFAULT_RETRY_AFTER_SECS: u64 = 15;

/// Per-request timeout for the Iris HTTP client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attestation provider backed by Circle's Iris REST API.
///
/// - `GET /v1/attestations/{messageHash}`: status and signature of a message
/// - `GET /v1/publicKeys`: attester public keys
///
/// 404 and 429 responses are mapped to the retryable
/// [`CctpError::AttestationNotFound`] and [`CctpError::RateLimitExceeded`].
///
/// # Examples
///
/// ```rust,no_run
/// use cctp_orchestrator::providers::IrisAttestationProvider;
/// use cctp_orchestrator::AttestationProvider;
/// use alloy_primitives::B256;
///
/// # async fn example() -> Result<(), cctp_orchestrator::CctpError> {
/// let provider = IrisAttestationProvider::production()?;
/// let record = provider.get_attestation(B256::ZERO).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IrisAttestationProvider {
    base_url: Url,
    client: Client,
}

impl IrisAttestationProvider {
    /// # Errors
    ///
    /// Returns [`CctpError::InvalidConfig`] if `base_url` is not a valid URL or
    /// the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CctpError::InvalidConfig(format!("invalid Iris URL {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CctpError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    pub fn production() -> Result<Self> {
        Self::new(IRIS_API)
    }

    pub fn sandbox() -> Result<Self> {
        Self::new(IRIS_API_SANDBOX)
    }

    pub fn attestation_url(&self, message_hash: B256) -> Result<Url> {
        self.join(&format!(
            "v1/attestations/{}",
            hex::encode_prefixed(message_hash)
        ))
    }

    pub fn public_keys_url(&self) -> Result<Url> {
        self.join("v1/publicKeys")
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CctpError::InvalidConfig(format!("invalid Iris path {path}: {e}")))
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        let span = spans::http_request("GET", &url);
        self.send(url).instrument(span).await
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response> {
        trace!(url = %url, event = "iris_request_sent");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        trace!(status_code = status.as_u16(), event = "iris_response_received");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            debug!(retry_after_seconds = retry_after, event = "iris_rate_limited");
            return Err(CctpError::RateLimitExceeded {
                retry_after_seconds: retry_after,
            });
        }

        if status == StatusCode::NOT_FOUND {
            debug!(event = "iris_attestation_not_found");
            return Err(CctpError::AttestationNotFound);
        }

        Ok(response.error_for_status()?)
    }
}

#[async_trait]
impl AttestationProvider for IrisAttestationProvider {
    #[instrument(skip(self), fields(message_hash = %message_hash))]
    async fn get_attestation(&self, message_hash: B256) -> Result<AttestationRecord> {
        let url = self.attestation_url(message_hash)?;
        let body = self.get(url).await?.text().await?;
        let record: AttestationRecord = serde_json::from_str(&body)?;

        debug!(status = ?record.status, event = "attestation_response_parsed");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn get_public_keys(&self) -> Result<Vec<Bytes>> {
        let url = self.public_keys_url()?;
        let body = self.get(url).await?.text().await?;
        let response: PublicKeysResponse = serde_json::from_str(&body)?;

        debug!(
            key_count = response.public_keys.len(),
            event = "attester_public_keys_fetched"
        );
        Ok(response.public_keys)
    }
}
