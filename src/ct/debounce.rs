// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Failure log debouncing
//!
//! One process-wide streak flag: the first failure after a success (or after
//! start-up) is logged, repeated failures are not, and any success ends the
//! streak silently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::interceptor::CtLogger;
use super::outcome::VerificationOutcome;

/// Category tag used for verification failure log lines
pub const NETWORK_LOG_CATEGORY: &str = "network";

/// Destination for debounced log lines
pub trait LogSink: Send + Sync {
    /// Record a message under a category tag; must not block
    fn log(&self, category: &str, message: &str);
}

/// Writes log lines through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, category: &str, message: &str) {
        tracing::warn!(category, "{}", message);
    }
}

/// Debounces verification failures into one log line per failure streak
pub struct FailureLogDebouncer {
    previous_failure: AtomicBool,
    sink: Arc<dyn LogSink>,
}

impl FailureLogDebouncer {
    /// Create a debouncer writing to `sink`
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            previous_failure: AtomicBool::new(false),
            sink,
        }
    }

    /// Feed one outcome; returns true if a log line was emitted
    pub fn record(&self, host: &str, outcome: &VerificationOutcome) -> bool {
        if outcome.is_failure() {
            // swap makes "first failure" a single winner under concurrency
            if self.previous_failure.swap(true, Ordering::AcqRel) {
                return false;
            }
            self.sink
                .log(NETWORK_LOG_CATEGORY, &format!("{} -> {}", host, outcome));
            true
        } else {
            if self.previous_failure.swap(false, Ordering::AcqRel) {
                tracing::debug!(host, "CT verification recovered");
            }
            false
        }
    }

    /// Whether the last outcome was part of a failure streak
    pub fn is_failing(&self) -> bool {
        self.previous_failure.load(Ordering::Acquire)
    }
}

impl Default for FailureLogDebouncer {
    fn default() -> Self {
        Self::new(Arc::new(TracingLogSink))
    }
}

impl CtLogger for FailureLogDebouncer {
    fn log(&self, host: &str, outcome: &VerificationOutcome) {
        self.record(host, outcome);
    }
}
