// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Observable events emitted by a transfer run for a presentation layer.
//!
//! Events are pushed over an unbounded `tokio::sync::mpsc` channel. A run
//! never blocks on, or fails because of, a slow or dropped receiver.

use std::fmt;
use std::time::SystemTime;

use tokio::sync::mpsc::UnboundedSender;

/// One of the four phases of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Approve,
    Burn,
    Attest,
    Mint,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Burn => "burn",
            Self::Attest => "attest",
            Self::Mint => "mint",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Started,
    Progress(String),
    Complete(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    Step { step: Step, status: StepStatus },
    Log(LogEntry),
}

impl TransferEvent {
    pub fn as_step(&self) -> Option<(Step, &StepStatus)> {
        match self {
            Self::Step { step, status } => Some((*step, status)),
            Self::Log(_) => None,
        }
    }

    pub fn as_log(&self) -> Option<&LogEntry> {
        match self {
            Self::Log(entry) => Some(entry),
            Self::Step { .. } => None,
        }
    }
}

/// Sending half used inside a run. A missing or closed receiver is ignored.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    tx: Option<UnboundedSender<TransferEvent>>,
}

impl EventSink {
    pub(crate) fn new(tx: Option<UnboundedSender<TransferEvent>>) -> Self {
        Self { tx }
    }

    pub(crate) fn step(&self, step: Step, status: StepStatus) {
        self.send(TransferEvent::Step { step, status });
    }

    pub(crate) fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message.into());
    }

    pub(crate) fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message.into());
    }

    pub(crate) fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message.into());
    }

    fn log(&self, level: LogLevel, message: String) {
        self.send(TransferEvent::Log(LogEntry {
            level,
            message,
            timestamp: SystemTime::now(),
        }));
    }

    fn send(&self, event: TransferEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_sink_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(Some(tx));

        sink.step(Step::Burn, StepStatus::Started);
        sink.warn("no Transfer event in mint receipt");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.as_step(), Some((Step::Burn, &StepStatus::Started)));

        let second = rx.try_recv().unwrap();
        let entry = second.as_log().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "no Transfer event in mint receipt");
    }

    #[test]
    fn test_sink_without_receiver_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        EventSink::new(Some(tx)).error("dropped");
        EventSink::default().info("nobody listening");
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::Attest.to_string(), "attest");
    }
}
