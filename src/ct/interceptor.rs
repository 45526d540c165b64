// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Certificate Transparency network interceptor

use std::sync::Arc;

use async_trait::async_trait;

use super::config::CtConfig;
use super::outcome::{FailureReason, SuccessReason, VerificationOutcome};
use super::verifier::CertificateVerifier;
use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::network::RequestInterceptor;

/// Receives every verification outcome the interceptor produces
pub trait CtLogger: Send + Sync {
    /// Called once per verified response
    fn log(&self, host: &str, outcome: &VerificationOutcome);
}

/// Verifies the peer certificate of each response and reports the outcome
pub struct CtInterceptor {
    verifier: Arc<dyn CertificateVerifier>,
    config: CtConfig,
    logger: Arc<dyn CtLogger>,
}

impl CtInterceptor {
    /// Create an interceptor, rejecting an invalid host policy
    pub fn new(
        verifier: Arc<dyn CertificateVerifier>,
        config: CtConfig,
        logger: Arc<dyn CtLogger>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            verifier,
            config,
            logger,
        })
    }

    /// Interceptor configuration
    pub fn config(&self) -> &CtConfig {
        &self.config
    }

    /// Decide the outcome for one response
    ///
    /// Host and scheme come from the final URL, the one whose connection
    /// presented `peer_certificate`, not from the URL first requested.
    pub fn evaluate(&self, response: &Response) -> VerificationOutcome {
        let host = response.host().unwrap_or_default();

        if !self.config.covers(host) {
            return VerificationOutcome::Success(SuccessReason::DisabledForHost);
        }

        match (&response.peer_certificate, response.is_https()) {
            (Some(der), _) => self.verifier.verify(host, der),
            (None, true) => VerificationOutcome::failure(FailureReason::NoCertificates),
            (None, false) => VerificationOutcome::Success(SuccessReason::InsecureConnection),
        }
    }
}

#[async_trait]
impl RequestInterceptor for CtInterceptor {
    async fn after_response(&self, _request: &Request, response: &mut Response) -> Result<()> {
        let host = response.host().unwrap_or_default();
        let outcome = self.evaluate(response);

        tracing::trace!(host, outcome = %outcome, "CT verification");
        self.logger.log(host, &outcome);

        match outcome {
            VerificationOutcome::Failure(reason) if self.config.fail_on_error => {
                Err(Error::certificate_transparency(host, reason.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "certificate-transparency"
    }
}
