// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Reusable client builder and configuration passes
//!
//! A builder keeps its interceptor chain between builds, so configuration
//! passes can add an interceptor on one build and take it out on the next.

use std::sync::Arc;

use super::client::{HttpClient, HttpClientConfig};
use crate::error::Result;
use crate::network::{InterceptorChain, RequestInterceptor, SharedInterceptor};

/// A configuration pass run against the builder on every `build()`
pub trait HttpBuilderConfig: Send + Sync {
    /// Adjust the builder before a client is produced
    fn perform_custom_config(&self, builder: &mut HttpClientBuilder) -> Result<()>;
}

/// Builder for [`HttpClient`]
#[derive(Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    network_interceptors: InterceptorChain,
    custom_configs: Vec<Arc<dyn HttpBuilderConfig>>,
}

impl HttpClientBuilder {
    /// Create a builder with default client configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the client configuration
    pub fn config(mut self, config: HttpClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a configuration pass; passes run in registration order
    pub fn custom_config(mut self, pass: Arc<dyn HttpBuilderConfig>) -> Self {
        self.custom_configs.push(pass);
        self
    }

    /// Add a network interceptor
    pub fn add_network_interceptor<I: RequestInterceptor + 'static>(
        &mut self,
        interceptor: I,
    ) -> SharedInterceptor {
        self.network_interceptors.add(interceptor)
    }

    /// Network interceptor chain
    pub fn network_interceptors(&self) -> &InterceptorChain {
        &self.network_interceptors
    }

    /// Mutable network interceptor chain
    pub fn network_interceptors_mut(&mut self) -> &mut InterceptorChain {
        &mut self.network_interceptors
    }

    /// Run every configuration pass, then build a client from the result
    ///
    /// The builder can be built again; passes see the chain as the
    /// previous build left it.
    pub fn build(&mut self) -> Result<HttpClient> {
        let passes = self.custom_configs.clone();
        for pass in &passes {
            pass.perform_custom_config(self)?;
        }

        tracing::debug!(
            interceptors = self.network_interceptors.len(),
            passes = passes.len(),
            "Building HTTP client"
        );

        HttpClient::from_parts(self.config.clone(), self.network_interceptors.clone())
    }
}
