// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! A thin reqwest wrapper whose requests pass through a network interceptor
//! chain, built by a reusable builder that runs configuration passes.

mod builder;
mod client;
mod request;
mod response;

pub use builder::{HttpBuilderConfig, HttpClientBuilder};
pub use client::{HttpClient, HttpClientConfig};
pub use request::Request;
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("ctswitch/", env!("CARGO_PKG_VERSION"));
