// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network interception
//!
//! Interceptor trait and the ordered chain an HTTP client runs requests through.

mod chain;
mod interceptor_trait;

pub use chain::{same_interceptor, InterceptorChain, SharedInterceptor};
pub use interceptor_trait::{InterceptAction, RequestInterceptor, RequestLogger};
