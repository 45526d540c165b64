// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Verification outcomes reported per request

use std::fmt;

/// Result of Certificate Transparency verification for one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The connection is acceptable
    Success(SuccessReason),
    /// The connection failed verification
    Failure(FailureReason),
}

/// Why a connection passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessReason {
    /// Enough SCTs were found for the leaf certificate
    Trusted { sct_count: usize },
    /// Plain-text connection, nothing to verify
    InsecureConnection,
    /// Host is outside the configured host policy
    DisabledForHost,
}

/// Why a connection failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// TLS connection without a peer certificate
    NoCertificates,
    /// Leaf certificate carries no SCTs
    NoScts,
    /// Fewer SCTs than the policy requires
    TooFewScts { found: usize, required: usize },
    /// Leaf certificate could not be decoded
    UnparseableCertificate(String),
    /// Verifier-specific failure
    Other(String),
}

impl VerificationOutcome {
    /// Shorthand for a failure outcome
    pub fn failure(reason: FailureReason) -> Self {
        VerificationOutcome::Failure(reason)
    }

    /// Check if this is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, VerificationOutcome::Failure(_))
    }

    /// Check if this is a success
    pub fn is_success(&self) -> bool {
        !self.is_failure()
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationOutcome::Success(reason) => write!(f, "Success: {}", reason),
            VerificationOutcome::Failure(reason) => write!(f, "Failure: {}", reason),
        }
    }
}

impl fmt::Display for SuccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessReason::Trusted { sct_count } => write!(f, "trusted with {} SCTs", sct_count),
            SuccessReason::InsecureConnection => write!(f, "insecure connection"),
            SuccessReason::DisabledForHost => write!(f, "disabled for host"),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoCertificates => write!(f, "no certificates"),
            FailureReason::NoScts => write!(f, "no SCTs present"),
            FailureReason::TooFewScts { found, required } => {
                write!(f, "too few SCTs ({} of {} required)", found, required)
            }
            FailureReason::UnparseableCertificate(e) => {
                write!(f, "unparseable certificate: {}", e)
            }
            FailureReason::Other(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let outcome = VerificationOutcome::failure(FailureReason::TooFewScts {
            found: 1,
            required: 2,
        });
        assert!(outcome.is_failure());
        assert_eq!(outcome.to_string(), "Failure: too few SCTs (1 of 2 required)");

        let outcome = VerificationOutcome::Success(SuccessReason::DisabledForHost);
        assert!(outcome.is_success());
        assert_eq!(outcome.to_string(), "Success: disabled for host");
    }
}
