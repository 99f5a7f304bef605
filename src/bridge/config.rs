// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tunables for a transfer run: attestation polling, gas margins and
//! receipt deadlines.
//!
//! Every value has a default matching Circle's published v1 timings.
//! [`OrchestratorConfig::from_env`] overrides them from `CCTP_*` variables,
//! reading a `.env` file first when one is present.

use std::time::Duration;

use bon::Builder;

use crate::amount::USDC_DECIMALS;
use crate::error::{CctpError, Result};
use crate::gas::{DEFAULT_PRIORITY_FEE_WEI, MAX_GAS_BUFFER_PERCENT};

/// Configuration for attestation polling behavior.
///
/// # Examples
///
/// ```rust
/// use cctp_orchestrator::PollingConfig;
///
/// // 30 attempts, 45 second intervals, 15 second grace period
/// let config = PollingConfig::default();
///
/// let config = PollingConfig::default()
///     .with_max_attempts(20)
///     .with_poll_interval_secs(30);
/// assert_eq!(config.total_timeout_secs(), 15 + 19 * 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Maximum number of status polls that may consume an attempt.
    pub max_attempts: u32,
    /// Seconds to wait between polls.
    pub poll_interval_secs: u64,
    /// Seconds to wait after the burn before the first poll.
    pub initial_delay_secs: u64,
    /// Minimum seconds to back off after a rate-limit response.
    pub rate_limit_backoff_secs: u64,
}

impl Default for PollingConfig {
    /// - `max_attempts`: 30
    /// - `poll_interval_secs`: 45
    /// - `initial_delay_secs`: 15
    /// - `rate_limit_backoff_secs`: 15
    ///
    /// About 22.5 minutes of polling, enough for the 13-19 minutes a
    /// standard v1 attestation takes.
    fn default() -> Self {
        Self {
            max_attempts: 30,
            poll_interval_secs: 45,
            initial_delay_secs: 15,
            rate_limit_backoff_secs: 15,
        }
    }
}

impl PollingConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    pub fn with_initial_delay_secs(mut self, secs: u64) -> Self {
        self.initial_delay_secs = secs;
        self
    }

    pub fn with_rate_limit_backoff_secs(mut self, secs: u64) -> Self {
        self.rate_limit_backoff_secs = secs;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }

    /// Upper bound on time spent polling, ignoring rate-limit backoff.
    ///
    /// No sleep follows the last attempt, so this is
    /// `initial_delay_secs + (max_attempts - 1) * poll_interval_secs`,
    /// saturating at `u64::MAX`.
    pub fn total_timeout_secs(&self) -> u64 {
        let waits = u64::from(self.max_attempts.saturating_sub(1));
        self.initial_delay_secs
            .saturating_add(waits.saturating_mul(self.poll_interval_secs))
    }
}

/// Gas limit margins and priority fee for the three kinds of transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasConfig {
    pub approval_buffer_percent: u64,
    pub burn_buffer_percent: u64,
    pub mint_buffer_percent: u64,
    pub priority_fee_wei: u128,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            approval_buffer_percent: 20,
            burn_buffer_percent: 30,
            mint_buffer_percent: 30,
            priority_fee_wei: DEFAULT_PRIORITY_FEE_WEI,
        }
    }
}

/// Full configuration of a [`TransferOrchestrator`](crate::TransferOrchestrator).
///
/// # Example
///
/// ```rust
/// use cctp_orchestrator::{OrchestratorConfig, PollingConfig};
/// use std::time::Duration;
///
/// let config = OrchestratorConfig::builder()
///     .polling(PollingConfig::default().with_poll_interval_secs(30))
///     .receipt_timeout(Duration::from_secs(600))
///     .build();
///
/// assert_eq!(config.polling.poll_interval_secs, 30);
/// assert_eq!(config.gas.burn_buffer_percent, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct OrchestratorConfig {
    #[builder(default)]
    pub polling: PollingConfig,
    #[builder(default)]
    pub gas: GasConfig,
    /// Interval between receipt polls.
    #[builder(default = Duration::from_secs(3))]
    pub receipt_poll_interval: Duration,
    /// How long to wait for a submitted transaction to be mined.
    #[builder(default = Duration::from_secs(300))]
    pub receipt_timeout: Duration,
    /// Deadline for a single node call.
    #[builder(default = Duration::from_secs(30))]
    pub rpc_timeout: Duration,
    /// Decimals of the bridged asset, used in human-readable messages.
    #[builder(default = USDC_DECIMALS)]
    pub asset_decimals: u8,
    /// Recover attester addresses from the attestation and compare them
    /// with the published public keys. Mismatches are reported, never fatal.
    #[builder(default)]
    pub verify_attestation_signatures: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl OrchestratorConfig {
    /// Loads the configuration from `CCTP_*` environment variables,
    /// falling back to defaults for unset ones.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `CCTP_MAX_ATTEMPTS` | `polling.max_attempts` |
    /// | `CCTP_POLL_INTERVAL_SECS` | `polling.poll_interval_secs` |
    /// | `CCTP_INITIAL_DELAY_SECS` | `polling.initial_delay_secs` |
    /// | `CCTP_RATE_LIMIT_BACKOFF_SECS` | `polling.rate_limit_backoff_secs` |
    /// | `CCTP_APPROVAL_GAS_BUFFER_PERCENT` | `gas.approval_buffer_percent` |
    /// | `CCTP_BURN_GAS_BUFFER_PERCENT` | `gas.burn_buffer_percent` |
    /// | `CCTP_MINT_GAS_BUFFER_PERCENT` | `gas.mint_buffer_percent` |
    /// | `CCTP_PRIORITY_FEE_WEI` | `gas.priority_fee_wei` |
    /// | `CCTP_RECEIPT_POLL_INTERVAL_SECS` | `receipt_poll_interval` |
    /// | `CCTP_RECEIPT_TIMEOUT_SECS` | `receipt_timeout` |
    /// | `CCTP_RPC_TIMEOUT_SECS` | `rpc_timeout` |
    /// | `CCTP_VERIFY_ATTESTATION_SIGNATURES` | `verify_attestation_signatures` |
    ///
    /// # Errors
    ///
    /// [`CctpError::InvalidConfig`] when a variable does not parse or the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let polling = PollingConfig {
            max_attempts: parse_var(&lookup, "CCTP_MAX_ATTEMPTS", defaults.polling.max_attempts)?,
            poll_interval_secs: parse_var(
                &lookup,
                "CCTP_POLL_INTERVAL_SECS",
                defaults.polling.poll_interval_secs,
            )?,
            initial_delay_secs: parse_var(
                &lookup,
                "CCTP_INITIAL_DELAY_SECS",
                defaults.polling.initial_delay_secs,
            )?,
            rate_limit_backoff_secs: parse_var(
                &lookup,
                "CCTP_RATE_LIMIT_BACKOFF_SECS",
                defaults.polling.rate_limit_backoff_secs,
            )?,
        };
        let gas = GasConfig {
            approval_buffer_percent: parse_var(
                &lookup,
                "CCTP_APPROVAL_GAS_BUFFER_PERCENT",
                defaults.gas.approval_buffer_percent,
            )?,
            burn_buffer_percent: parse_var(
                &lookup,
                "CCTP_BURN_GAS_BUFFER_PERCENT",
                defaults.gas.burn_buffer_percent,
            )?,
            mint_buffer_percent: parse_var(
                &lookup,
                "CCTP_MINT_GAS_BUFFER_PERCENT",
                defaults.gas.mint_buffer_percent,
            )?,
            priority_fee_wei: parse_var(
                &lookup,
                "CCTP_PRIORITY_FEE_WEI",
                defaults.gas.priority_fee_wei,
            )?,
        };

        let config = Self {
            polling,
            gas,
            receipt_poll_interval: Duration::from_secs(parse_var(
                &lookup,
                "CCTP_RECEIPT_POLL_INTERVAL_SECS",
                defaults.receipt_poll_interval.as_secs(),
            )?),
            receipt_timeout: Duration::from_secs(parse_var(
                &lookup,
                "CCTP_RECEIPT_TIMEOUT_SECS",
                defaults.receipt_timeout.as_secs(),
            )?),
            rpc_timeout: Duration::from_secs(parse_var(
                &lookup,
                "CCTP_RPC_TIMEOUT_SECS",
                defaults.rpc_timeout.as_secs(),
            )?),
            asset_decimals: defaults.asset_decimals,
            verify_attestation_signatures: parse_var(
                &lookup,
                "CCTP_VERIFY_ATTESTATION_SIGNATURES",
                defaults.verify_attestation_signatures,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`CctpError::InvalidConfig`] when `max_attempts` is zero, a deadline is
    /// zero, or a gas margin exceeds [`MAX_GAS_BUFFER_PERCENT`].
    pub fn validate(&self) -> Result<()> {
        if self.polling.max_attempts == 0 {
            return Err(CctpError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.receipt_timeout.is_zero() || self.rpc_timeout.is_zero() {
            return Err(CctpError::InvalidConfig(
                "receipt and rpc timeouts must be non-zero".to_string(),
            ));
        }
        let buffers = [
            ("approval", self.gas.approval_buffer_percent),
            ("burn", self.gas.burn_buffer_percent),
            ("mint", self.gas.mint_buffer_percent),
        ];
        for (kind, percent) in buffers {
            if percent > MAX_GAS_BUFFER_PERCENT {
                return Err(CctpError::InvalidConfig(format!(
                    "{kind} gas buffer {percent}% exceeds {MAX_GAS_BUFFER_PERCENT}%"
                )));
            }
        }
        Ok(())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CctpError::InvalidConfig(format!("{key}={raw:?}: {e}"))),
    }
}
