// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Attestation polling with a bounded attempt budget.

use std::time::Duration;

use alloy_primitives::{Bytes, B256};
use tracing::{debug, error, info, warn, Instrument};

use super::cancel::CancelSignal;
use super::config::PollingConfig;
use super::events::{EventSink, Step, StepStatus};
use crate::error::{CctpError, Result};
use crate::protocol::AttestationStatus;
use crate::spans;
use crate::traits::{AttestationProvider, Clock};

pub(crate) struct AttestationPoller<'a, A: ?Sized, C: ?Sized> {
    attestor: &'a A,
    clock: &'a C,
    config: PollingConfig,
    cancel: &'a CancelSignal,
    events: &'a EventSink,
}

impl<'a, A, C> AttestationPoller<'a, A, C>
where
    A: AttestationProvider + ?Sized,
    C: Clock + ?Sized,
{
    pub(crate) fn new(
        attestor: &'a A,
        clock: &'a C,
        config: PollingConfig,
        cancel: &'a CancelSignal,
        events: &'a EventSink,
    ) -> Self {
        Self {
            attestor,
            clock,
            config,
            cancel,
            events,
        }
    }

    /// Waits the grace period, then polls until the attestation is complete.
    ///
    /// Pending statuses and transport errors consume one attempt and wait one
    /// poll interval. Rate-limit responses back off for at least
    /// `rate_limit_backoff_secs` without consuming an attempt, but no more
    /// than `max_attempts` of them are tolerated. No sleep follows the final
    /// attempt. `attempts` is updated as polling proceeds.
    ///
    /// # Errors
    ///
    /// - [`CctpError::AttestationFailed`] when the service reports failure
    /// - [`CctpError::MalformedAttestation`] for a complete status without a signature
    /// - [`CctpError::AttestationTimeout`] once the attempt budget is spent
    /// - [`CctpError::Cancelled`] when cancelled before or between polls
    pub(crate) async fn poll(&self, message_hash: B256, attempts: &mut u32) -> Result<Bytes> {
        let span = spans::attest(
            &message_hash,
            self.config.max_attempts,
            self.config.poll_interval_secs,
        );
        self.poll_inner(message_hash, attempts).instrument(span).await
    }

    async fn poll_inner(&self, message_hash: B256, attempts: &mut u32) -> Result<Bytes> {
        let max_attempts = self.config.max_attempts;
        let mut rate_limited = 0u32;

        info!(
            message_hash = %message_hash,
            initial_delay_secs = self.config.initial_delay_secs,
            event = "attestation_grace_period"
        );
        self.sleep(self.config.initial_delay()).await?;

        while *attempts < max_attempts {
            if self.cancel.is_cancelled() {
                return Err(CctpError::Cancelled);
            }

            let attempt = *attempts + 1;
            let response = self
                .attestor
                .get_attestation(message_hash)
                .instrument(spans::attestation_attempt(attempt, max_attempts))
                .await;

            let delay = match response {
                Ok(record) => {
                    *attempts = attempt;
                    match record.status {
                        AttestationStatus::Complete => {
                            return match record.signature.filter(|sig| !sig.is_empty()) {
                                Some(signature) => {
                                    info!(
                                        message_hash = %message_hash,
                                        attempt,
                                        signature_length_bytes = signature.len(),
                                        event = "attestation_complete"
                                    );
                                    Ok(signature)
                                }
                                None => {
                                    error!(
                                        message_hash = %message_hash,
                                        attempt,
                                        event = "attestation_complete_without_signature"
                                    );
                                    Err(CctpError::MalformedAttestation { message_hash })
                                }
                            };
                        }
                        AttestationStatus::Failed => {
                            error!(
                                message_hash = %message_hash,
                                attempt,
                                event = "attestation_failed"
                            );
                            return Err(CctpError::AttestationFailed {
                                reason: format!("attestation service reported failure for {message_hash}"),
                            });
                        }
                        status => {
                            debug!(
                                message_hash = %message_hash,
                                attempt,
                                max_attempts,
                                status = ?status,
                                event = "attestation_pending"
                            );
                            self.events.step(
                                Step::Attest,
                                StepStatus::Progress(format!(
                                    "attempt {attempt}/{max_attempts}: {status:?}"
                                )),
                            );
                            self.config.poll_interval()
                        }
                    }
                }
                Err(CctpError::RateLimitExceeded {
                    retry_after_seconds,
                }) if rate_limited < max_attempts => {
                    rate_limited += 1;
                    let backoff = self
                        .config
                        .rate_limit_backoff()
                        .max(Duration::from_secs(retry_after_seconds));
                    warn!(
                        message_hash = %message_hash,
                        backoff_secs = backoff.as_secs(),
                        rate_limited,
                        event = "attestation_rate_limited"
                    );
                    self.events
                        .warn(format!("attestation API rate limited, backing off {}s", backoff.as_secs()));
                    self.sleep(backoff).await?;
                    continue;
                }
                Err(e) if e.is_transient() => {
                    *attempts = attempt;
                    warn!(
                        message_hash = %message_hash,
                        attempt,
                        max_attempts,
                        error = %e,
                        event = "attestation_poll_failed"
                    );
                    self.events
                        .warn(format!("attestation poll {attempt}/{max_attempts} failed: {e}"));
                    self.config.poll_interval()
                }
                Err(e) => return Err(e),
            };

            if *attempts < max_attempts {
                self.sleep(delay).await?;
            }
        }

        error!(
            message_hash = %message_hash,
            attempts = *attempts,
            event = "attestation_timeout"
        );
        Err(CctpError::AttestationTimeout {
            message_hash,
            attempts: *attempts,
        })
    }

    async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!(event = "attestation_polling_cancelled");
                Err(CctpError::Cancelled)
            }
            _ = self.clock.sleep(duration) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::cancel::cancellation;
    use crate::testing::{FakeAttestationProvider, FakeAttestationResponse, FakeClock};

    const HASH: B256 = B256::repeat_byte(0xab);

    fn config() -> PollingConfig {
        PollingConfig::default()
            .with_max_attempts(5)
            .with_poll_interval_secs(45)
            .with_initial_delay_secs(15)
    }

    async fn poll(
        attestor: &FakeAttestationProvider,
        clock: &FakeClock,
        cancel: &CancelSignal,
        config: PollingConfig,
    ) -> (Result<Bytes>, u32) {
        let events = EventSink::default();
        let poller = AttestationPoller::new(attestor, clock, config, cancel, &events);
        let mut attempts = 0;
        let result = poller.poll(HASH, &mut attempts).await;
        (result, attempts)
    }

    #[tokio::test]
    async fn test_pending_confirmations_then_complete() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(
            HASH,
            vec![
                FakeAttestationResponse::pending_confirmations(),
                FakeAttestationResponse::pending_confirmations(),
                FakeAttestationResponse::pending_confirmations(),
                FakeAttestationResponse::pending_confirmations(),
                FakeAttestationResponse::complete(vec![0x11; 65]),
            ],
        );
        let clock = FakeClock::new();

        let (result, attempts) = poll(&attestor, &clock, &CancelSignal::never(), config()).await;

        assert_eq!(result.unwrap().len(), 65);
        assert_eq!(attempts, 5);
        assert_eq!(attestor.get_call_count(HASH), 5);
        assert_eq!(clock.elapsed(), Duration::from_secs(15 + 4 * 45));
    }

    #[tokio::test]
    async fn test_always_pending_times_out_after_budget() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(HASH, vec![FakeAttestationResponse::pending()]);
        let clock = FakeClock::new();

        let (result, attempts) = poll(&attestor, &clock, &CancelSignal::never(), config()).await;

        assert!(matches!(
            result.unwrap_err(),
            CctpError::AttestationTimeout { attempts: 5, .. }
        ));
        assert_eq!(attempts, 5);
        assert_eq!(attestor.get_call_count(HASH), 5);
        assert_eq!(clock.elapsed(), Duration::from_secs(15 + 4 * 45));
    }

    #[tokio::test]
    async fn test_failed_status_stops_immediately() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(
            HASH,
            vec![
                FakeAttestationResponse::pending(),
                FakeAttestationResponse::failed(),
            ],
        );
        let clock = FakeClock::new();

        let (result, attempts) = poll(&attestor, &clock, &CancelSignal::never(), config()).await;

        assert!(matches!(result.unwrap_err(), CctpError::AttestationFailed { .. }));
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn test_complete_without_signature_is_malformed() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(HASH, vec![FakeAttestationResponse::complete_without_signature()]);
        let clock = FakeClock::new();

        let (result, _) = poll(&attestor, &clock, &CancelSignal::never(), config()).await;

        assert!(matches!(
            result.unwrap_err(),
            CctpError::MalformedAttestation { message_hash } if message_hash == HASH
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_backs_off_without_consuming_attempt() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(
            HASH,
            vec![
                FakeAttestationResponse::RateLimited {
                    retry_after_seconds: 0,
                },
                FakeAttestationResponse::pending(),
                FakeAttestationResponse::complete(vec![0x22; 65]),
            ],
        );
        let clock = FakeClock::new();
        let config = config().with_rate_limit_backoff_secs(60);

        let (result, attempts) = poll(&attestor, &clock, &CancelSignal::never(), config).await;

        result.unwrap();
        assert_eq!(attempts, 2);
        assert_eq!(attestor.get_call_count(HASH), 3);
        assert_eq!(
            clock.sleep_calls(),
            vec![
                Duration::from_secs(15),
                Duration::from_secs(60),
                Duration::from_secs(45)
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_errors_consume_attempts() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(
            HASH,
            vec![
                FakeAttestationResponse::NotFound,
                FakeAttestationResponse::Unavailable,
                FakeAttestationResponse::complete(vec![0x33; 65]),
            ],
        );
        let clock = FakeClock::new();

        let (result, attempts) = poll(&attestor, &clock, &CancelSignal::never(), config()).await;

        result.unwrap();
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_polling() {
        let attestor = FakeAttestationProvider::new();
        attestor.add_response_sequence(HASH, vec![FakeAttestationResponse::pending()]);
        let clock = FakeClock::new();
        let (handle, signal) = cancellation();
        handle.cancel();

        let (result, attempts) = poll(&attestor, &clock, &signal, config()).await;

        assert!(matches!(result.unwrap_err(), CctpError::Cancelled));
        assert_eq!(attempts, 0);
        assert_eq!(attestor.get_call_count(HASH), 0);
    }
}
