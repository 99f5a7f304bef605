// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transfer orchestration
//!
//! This module drives a USDC transfer through approve, burn, attest and mint,
//! emitting [`TransferEvent`]s along the way and returning the final
//! [`TransferState`].

mod allowance;
mod attestation;
mod cancel;
mod config;
mod events;
mod orchestrator;
mod receipt;
mod state;

pub use allowance::AllowanceProgress;
pub use cancel::{cancellation, CancelHandle, CancelSignal};
pub use config::{GasConfig, OrchestratorConfig, PollingConfig};
pub use events::{LogEntry, LogLevel, Step, StepStatus, TransferEvent};
pub use orchestrator::{supported_chains, TransferFailure, TransferOrchestrator};
pub use state::{AttemptCounters, FailureReason, TransferPhase, TransferRequest, TransferState};
