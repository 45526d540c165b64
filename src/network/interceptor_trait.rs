// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request/Response interceptor trait
//!
//! Network interceptors see every request before it is sent and every
//! response (including its TLS peer certificate) after it arrives.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::http::{Request, Response};

/// Request interceptor trait
///
/// # Example
///
/// ```rust,no_run
/// use ctswitch::network::{RequestInterceptor, InterceptAction};
/// use ctswitch::http::Request;
/// use async_trait::async_trait;
///
/// struct AuthInjector {
///     token: String,
/// }
///
/// #[async_trait]
/// impl RequestInterceptor for AuthInjector {
///     async fn before_request(&self, req: &mut Request) -> InterceptAction {
///         req.headers.insert(
///             "authorization",
///             format!("Bearer {}", self.token).parse().unwrap(),
///         );
///         InterceptAction::Continue
///     }
/// }
/// ```
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Called before a request is sent
    ///
    /// Can modify the request or abort it entirely.
    async fn before_request(&self, _request: &mut Request) -> InterceptAction {
        InterceptAction::Continue
    }

    /// Called after a response is received
    ///
    /// Returning an error fails the request.
    async fn after_response(&self, _request: &Request, _response: &mut Response) -> Result<()> {
        Ok(())
    }

    /// Called when the request fails in transport
    async fn on_error(&self, _request: &Request, _error: &Error) {}

    /// Filter - return true if this interceptor should handle the request
    fn should_intercept(&self, _request: &Request) -> bool {
        true
    }

    /// Priority - higher priority interceptors run first
    fn priority(&self) -> i32 {
        0
    }

    /// Short name used in logs
    fn name(&self) -> &str {
        "interceptor"
    }
}

/// Action to take after interception
#[derive(Debug, Clone)]
pub enum InterceptAction {
    /// Continue with the (possibly modified) request
    Continue,
    /// Abort the request with an error
    Abort(String),
    /// Return a mock response instead of making the actual request
    MockResponse(Response),
    /// Pause the request before continuing (for rate limiting)
    Delay(std::time::Duration),
}

/// Request logger interceptor
#[derive(Debug, Default)]
pub struct RequestLogger {
    /// Log response bodies
    pub log_responses: bool,
    /// Filter by URL pattern
    pub url_filter: Option<String>,
}

#[async_trait]
impl RequestInterceptor for RequestLogger {
    fn should_intercept(&self, request: &Request) -> bool {
        if let Some(ref filter) = self.url_filter {
            request.url.as_str().contains(filter)
        } else {
            true
        }
    }

    async fn before_request(&self, request: &mut Request) -> InterceptAction {
        tracing::info!(
            method = %request.method,
            url = %request.url,
            "Request"
        );
        InterceptAction::Continue
    }

    async fn after_response(&self, request: &Request, response: &mut Response) -> Result<()> {
        tracing::info!(
            url = %request.url,
            status = %response.status,
            time_ms = response.response_time_ms,
            tls = response.peer_certificate.is_some(),
            "Response"
        );

        if self.log_responses {
            tracing::debug!(body = %response.text_lossy(), "Response body");
        }

        Ok(())
    }

    async fn on_error(&self, request: &Request, error: &Error) {
        tracing::warn!(url = %request.url, error = %error, "Request failed");
    }

    fn priority(&self) -> i32 {
        -100 // Low priority - run logging last
    }

    fn name(&self) -> &str {
        "request-logger"
    }
}
