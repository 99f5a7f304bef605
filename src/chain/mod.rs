// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain profiles and published contract addresses.

pub mod addresses;
mod profile;

pub use profile::{ChainProfile, ChainRegistry};
