// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Certificate verifiers
//!
//! The interceptor treats verification as a black box behind
//! [`CertificateVerifier`]. [`SctPresenceVerifier`] only counts embedded
//! SCTs; it does not check their signatures against any log.

use x509_parser::prelude::*;

use super::outcome::{FailureReason, SuccessReason, VerificationOutcome};
use crate::error::{Error, Result};

/// Verifies the leaf certificate presented by a host
pub trait CertificateVerifier: Send + Sync {
    /// Verify a DER-encoded leaf certificate for `host`
    fn verify(&self, host: &str, peer_certificate: &[u8]) -> VerificationOutcome;
}

impl<F> CertificateVerifier for F
where
    F: Fn(&str, &[u8]) -> VerificationOutcome + Send + Sync,
{
    fn verify(&self, host: &str, peer_certificate: &[u8]) -> VerificationOutcome {
        self(host, peer_certificate)
    }
}

/// Default number of embedded SCTs required
pub const DEFAULT_MIN_SCTS: usize = 2;

/// Requires a minimum number of SCTs embedded in the leaf certificate
#[derive(Debug, Clone)]
pub struct SctPresenceVerifier {
    min_scts: usize,
}

impl SctPresenceVerifier {
    /// Create a verifier requiring `min_scts` embedded SCTs
    pub fn new(min_scts: usize) -> Result<Self> {
        if min_scts == 0 {
            return Err(Error::verifier("min_scts must be at least 1"));
        }
        Ok(Self { min_scts })
    }

    /// Required SCT count
    pub fn min_scts(&self) -> usize {
        self.min_scts
    }
}

impl Default for SctPresenceVerifier {
    fn default() -> Self {
        Self {
            min_scts: DEFAULT_MIN_SCTS,
        }
    }
}

impl CertificateVerifier for SctPresenceVerifier {
    fn verify(&self, host: &str, peer_certificate: &[u8]) -> VerificationOutcome {
        let cert = match X509Certificate::from_der(peer_certificate) {
            Ok((_, cert)) => cert,
            Err(e) => {
                tracing::debug!(host, error = %e, "Failed to parse peer certificate");
                return VerificationOutcome::failure(FailureReason::UnparseableCertificate(
                    e.to_string(),
                ));
            }
        };

        let found: usize = cert
            .extensions()
            .iter()
            .map(|ext| match ext.parsed_extension() {
                ParsedExtension::SCT(scts) => scts.len(),
                _ => 0,
            })
            .sum();

        match found {
            0 => VerificationOutcome::failure(FailureReason::NoScts),
            n if n < self.min_scts => VerificationOutcome::failure(FailureReason::TooFewScts {
                found: n,
                required: self.min_scts,
            }),
            n => VerificationOutcome::Success(SuccessReason::Trusted { sct_count: n }),
        }
    }
}
