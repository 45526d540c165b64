// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Certificate Transparency interceptor and its lifecycle manager

mod config;
mod debounce;
mod interceptor;
mod manager;
mod outcome;
mod verifier;

pub use config::CtConfig;
pub use debounce::{FailureLogDebouncer, LogSink, TracingLogSink, NETWORK_LOG_CATEGORY};
pub use interceptor::{CtInterceptor, CtLogger};
pub use manager::{InterceptorManager, ReconcileAction, VerifierFactory};
pub use outcome::{FailureReason, SuccessReason, VerificationOutcome};
pub use verifier::{CertificateVerifier, SctPresenceVerifier, DEFAULT_MIN_SCTS};
