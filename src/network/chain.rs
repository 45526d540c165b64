// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor chain with identity-based membership

use std::sync::Arc;

use super::interceptor_trait::{InterceptAction, RequestInterceptor};
use crate::error::{Error, Result};
use crate::http::{Request, Response};

/// Shared handle to an interceptor
pub type SharedInterceptor = Arc<dyn RequestInterceptor>;

/// Returns true if both handles point at the same interceptor object.
///
/// Compares data pointers only, so two value-equal interceptors are never
/// considered the same.
pub fn same_interceptor(a: &SharedInterceptor, b: &SharedInterceptor) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Interceptor chain - ordered list of network interceptors
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<SharedInterceptor>,
}

impl std::fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.interceptors.iter().map(|i| i.name()))
            .finish()
    }
}

impl InterceptorChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Add an interceptor by priority
    ///
    /// Lands before the first entry with a lower priority, after every entry
    /// with an equal or higher one. Existing entries never move.
    pub fn add<I: RequestInterceptor + 'static>(&mut self, interceptor: I) -> SharedInterceptor {
        let shared: SharedInterceptor = Arc::new(interceptor);
        let priority = shared.priority();
        let index = self
            .interceptors
            .iter()
            .position(|i| i.priority() < priority)
            .unwrap_or(self.interceptors.len());
        self.interceptors.insert(index, shared.clone());
        shared
    }

    /// Append an already shared interceptor at the end of the chain
    pub fn add_shared(&mut self, interceptor: SharedInterceptor) {
        self.interceptors.push(interceptor);
    }

    /// Remove every entry matching the predicate, returning how many were removed
    pub fn remove_all<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&SharedInterceptor) -> bool,
    {
        let before = self.interceptors.len();
        self.interceptors.retain(|i| !predicate(i));
        before - self.interceptors.len()
    }

    /// Remove every entry that is the same object as `target`
    pub fn remove_same(&mut self, target: &SharedInterceptor) -> usize {
        self.remove_all(|i| same_interceptor(i, target))
    }

    /// Check whether `target` itself is in the chain
    pub fn contains_same(&self, target: &SharedInterceptor) -> bool {
        self.count_same(target) > 0
    }

    /// Count entries that are the same object as `target`
    pub fn count_same(&self, target: &SharedInterceptor) -> usize {
        self.interceptors
            .iter()
            .filter(|i| same_interceptor(i, target))
            .count()
    }

    /// Number of interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Iterate interceptors in execution order
    pub fn iter(&self) -> impl Iterator<Item = &SharedInterceptor> {
        self.interceptors.iter()
    }

    /// Process request through all interceptors
    ///
    /// `Delay` actions are served here; only `Continue`, `Abort` and
    /// `MockResponse` reach the caller.
    pub async fn process_request(&self, request: &mut Request) -> InterceptAction {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }

            match interceptor.before_request(request).await {
                InterceptAction::Continue => continue,
                InterceptAction::Delay(duration) => {
                    tracing::debug!(
                        interceptor = interceptor.name(),
                        delay_ms = duration.as_millis() as u64,
                        "Delaying request"
                    );
                    tokio::time::sleep(duration).await;
                }
                action => return action,
            }
        }
        InterceptAction::Continue
    }

    /// Process response through all interceptors
    pub async fn process_response(&self, request: &Request, response: &mut Response) -> Result<()> {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }
            interceptor.after_response(request, response).await?;
        }
        Ok(())
    }

    /// Notify interceptors of an error
    pub async fn notify_error(&self, request: &Request, error: &Error) {
        for interceptor in &self.interceptors {
            if interceptor.should_intercept(request) {
                interceptor.on_error(request, error).await;
            }
        }
    }
}
