// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::tls::TlsInfo;
use reqwest::Client;

use super::builder::HttpClientBuilder;
use super::request::Request;
use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::network::{InterceptAction, InterceptorChain};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("accept", HeaderValue::from_static("*/*"));

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            default_headers,
            proxy: None,
        }
    }
}

/// HTTP client that runs every request through its network interceptor chain
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    interceptors: Arc<InterceptorChain>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration and no interceptors
    pub fn new() -> Result<Self> {
        HttpClientBuilder::new().build()
    }

    /// Start building a client
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    pub(crate) fn from_parts(config: HttpClientConfig, interceptors: InterceptorChain) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .default_headers(config.default_headers.clone())
            .tls_info(true);

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            interceptors: Arc::new(interceptors),
        })
    }

    /// Execute a GET request
    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.execute(Request::get(url)?).await
    }

    /// Execute a request through the interceptor chain
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        match self.interceptors.process_request(&mut request).await {
            InterceptAction::Continue | InterceptAction::Delay(_) => {}
            InterceptAction::Abort(reason) => {
                tracing::debug!(url = %request.url, reason = %reason, "Request aborted by interceptor");
                return Err(Error::aborted(request.url.as_str(), reason));
            }
            InterceptAction::MockResponse(response) => return Ok(response),
        }

        let mut response = match self.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.interceptors.notify_error(&request, &e).await;
                return Err(e);
            }
        };

        self.interceptors
            .process_response(&request, &mut response)
            .await?;

        Ok(response)
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let response_time = start.elapsed().as_millis() as u64;

        let peer_certificate = response
            .extensions()
            .get::<TlsInfo>()
            .and_then(|info| info.peer_certificate())
            .map(Bytes::copy_from_slice);
        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();

        let body = response.bytes().await?;

        let mut response = Response::new(status, headers, body, final_url, response_time);
        response.peer_certificate = peer_certificate;
        Ok(response)
    }

    /// Execute multiple requests concurrently
    ///
    /// Results come back in request order; one failure does not cancel the rest.
    pub async fn execute_all(&self, requests: Vec<Request>) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests.into_iter().map(|r| self.execute(r)).collect();
        futures::future::join_all(futures).await
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Network interceptors this client was built with
    pub fn network_interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }
}
