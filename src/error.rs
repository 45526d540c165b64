// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for ctswitch
//!
//! Verification failures are not errors of the manager itself; they only
//! surface here when an interceptor is configured to enforce them.

use thiserror::Error;

/// Result type alias for ctswitch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ctswitch
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Request aborted by an interceptor
    #[error("Request to {url} aborted: {reason}")]
    Aborted { url: String, reason: String },

    /// Certificate Transparency verification rejected the connection
    #[error("Certificate Transparency failure for {host}: {reason}")]
    CertificateTransparency { host: String, reason: String },

    /// Verifier could not be constructed
    #[error("Verifier error: {0}")]
    Verifier(String),

    /// Preference could not be read
    #[error("Preference error: {0}")]
    Preference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response body was not valid UTF-8
    #[error("Invalid UTF-8 body: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create a CT verification error
    pub fn certificate_transparency(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::CertificateTransparency {
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// Create an aborted-request error
    pub fn aborted(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Aborted {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a verifier construction error
    pub fn verifier<S: Into<String>>(msg: S) -> Self {
        Error::Verifier(msg.into())
    }

    /// Create a preference error
    pub fn preference<S: Into<String>>(msg: S) -> Self {
        Error::Preference(msg.into())
    }

    /// Check if this is a CT rejection
    pub fn is_certificate_transparency(&self) -> bool {
        matches!(self, Error::CertificateTransparency { .. })
    }

    /// Check if this is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Preference(_) | Error::Io(_) => true,
            _ => false,
        }
    }

    /// Get the host if available
    pub fn host(&self) -> Option<&str> {
        match self {
            Error::CertificateTransparency { host, .. } => Some(host),
            _ => None,
        }
    }
}

/// Helper trait for classifying errors from lower layers
pub trait ErrorContext<T> {
    /// Reclassify the error as a preference read failure
    fn preference_context(self, source: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn preference_context(self, source: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Preference(format!("{}: {}", source, err))
        })
    }
}
