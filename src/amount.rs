// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion between human-readable decimal amounts and token base units.
//!
//! USDC uses 6 decimals on every EVM chain CCTP supports, so `"1.5"` is
//! `1_500_000` base units. Parsing truncates toward zero: digits past the
//! token's precision are dropped rather than rounded.
//!
//! # Example
//!
//! ```rust
//! use cctp_orchestrator::amount::{to_base_units, to_human, USDC_DECIMALS};
//! use alloy_primitives::U256;
//!
//! let base = to_base_units("12.3456789", USDC_DECIMALS).unwrap();
//! assert_eq!(base, U256::from(12_345_678u64));
//! assert_eq!(to_human(base, USDC_DECIMALS).unwrap(), "12.345678");
//! ```

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

use crate::error::{CctpError, Result};

/// Decimals of the USDC token.
pub const USDC_DECIMALS: u8 = 6;

/// Parses a decimal string into base units, truncating extra fractional digits.
///
/// # Errors
///
/// Returns [`CctpError::InvalidAmount`] when the input is not a plain
/// non-negative decimal number, or when it truncates to zero.
pub fn to_base_units(human: &str, decimals: u8) -> Result<U256> {
    let invalid = |reason: &str| CctpError::InvalidAmount {
        input: human.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = human.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("not a number"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("not a finite decimal number"));
    }

    let fraction = &fraction[..fraction.len().min(decimals as usize)];
    let normalized = match (whole.is_empty(), fraction.is_empty()) {
        (true, _) => format!("0.{fraction}"),
        (false, true) => whole.to_string(),
        (false, false) => format!("{whole}.{fraction}"),
    };

    let value = parse_units(&normalized, decimals)
        .map_err(|e| invalid(&e.to_string()))?
        .get_absolute();

    if value.is_zero() {
        return Err(invalid("amount must be greater than zero"));
    }

    Ok(value)
}

/// Formats base units as a decimal string without trailing zeros.
pub fn to_human(base_units: U256, decimals: u8) -> Result<String> {
    let formatted =
        format_units(base_units, decimals).map_err(|e| CctpError::InvalidAmount {
            input: base_units.to_string(),
            reason: e.to_string(),
        })?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }

    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}
