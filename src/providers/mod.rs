// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Production implementations of the orchestrator's capability traits.
//!
//! These talk to real networks, Circle's Iris API and the tokio clock.
//! Tests use the fakes in [`crate::testing`] instead.

mod alloy;
mod iris;
mod tokio_clock;

pub use self::alloy::AlloyBlockchainProvider;
pub use self::iris::IrisAttestationProvider;
pub use self::tokio_clock::TokioClock;
