// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # ctswitch - Runtime-toggleable Certificate Transparency
//!
//! Attaches a Certificate Transparency (CT) verification interceptor to an
//! HTTP client's network interceptor chain while a live preference is on,
//! and detaches it again when the preference goes off.
//!
//! ## Features
//!
//! - Idempotent attach/detach driven by a polled preference
//! - One lazily built interceptor per manager, removed by identity
//! - Failure log debouncing: one line per failure streak
//! - Host include/exclude policy, enforce or report-only mode
//! - Pluggable verifier behind a trait
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ctswitch::{
//!     CertificateVerifier, HttpClient, InterceptorManager, JsonFilePreferences,
//!     SctPresenceVerifier,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let prefs = Arc::new(JsonFilePreferences::new("prefs.json"));
//!     let manager = Arc::new(InterceptorManager::new(prefs, || {
//!         Ok(Arc::new(SctPresenceVerifier::default()) as Arc<dyn CertificateVerifier>)
//!     }));
//!
//!     let mut builder = HttpClient::builder().custom_config(manager);
//!     let client = builder.build()?;
//!     let response = client.get("https://example.com").await?;
//!     println!("{}", response.status);
//!
//!     Ok(())
//! }
//! ```

pub mod ct;
pub mod error;
pub mod http;
pub mod network;
pub mod preferences;

// Re-exports for convenience

// CT
pub use ct::{
    CertificateVerifier, CtConfig, CtInterceptor, CtLogger, FailureLogDebouncer, FailureReason,
    InterceptorManager, LogSink, ReconcileAction, SctPresenceVerifier, SuccessReason,
    TracingLogSink, VerificationOutcome,
};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{HttpBuilderConfig, HttpClient, HttpClientBuilder, HttpClientConfig, Request, Response};

// Network
pub use network::{InterceptAction, InterceptorChain, RequestInterceptor, RequestLogger};

// Preferences
pub use preferences::{JsonFilePreferences, PreferenceSource, StaticPreference, DEFAULT_PREFS_FILE};

/// ctswitch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
