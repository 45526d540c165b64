// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CT interceptor configuration

use crate::error::{Error, Result};

/// Configuration for the Certificate Transparency interceptor
#[derive(Debug, Clone)]
pub struct CtConfig {
    /// Hosts to verify (empty = all)
    pub include_hosts: Vec<String>,
    /// Hosts never verified; wins over `include_hosts`
    pub exclude_hosts: Vec<String>,
    /// Reject the request when verification fails
    ///
    /// The check runs once the response is in, so a rejected request has
    /// already been sent and its response body read. This keeps the result
    /// away from the caller; it does not stop data leaving the process.
    pub fail_on_error: bool,
}

impl Default for CtConfig {
    fn default() -> Self {
        Self {
            include_hosts: Vec::new(),
            exclude_hosts: Vec::new(),
            fail_on_error: true,
        }
    }
}

impl CtConfig {
    /// Create a new CT config
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify this host pattern (`example.com` or `*.example.com`)
    pub fn include_host(mut self, pattern: impl Into<String>) -> Self {
        self.include_hosts.push(pattern.into());
        self
    }

    /// Skip this host pattern
    pub fn exclude_host(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_hosts.push(pattern.into());
        self
    }

    /// Reject requests that fail verification, or only report them
    ///
    /// Rejection happens after the exchange completed, see the field docs.
    pub fn fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }

    /// Only report failures, never block traffic
    pub fn report_only() -> Self {
        Self {
            fail_on_error: false,
            ..Default::default()
        }
    }

    /// Check every host pattern
    pub fn validate(&self) -> Result<()> {
        for pattern in self.include_hosts.iter().chain(self.exclude_hosts.iter()) {
            validate_pattern(pattern)?;
        }
        Ok(())
    }

    /// Whether `host` falls under this host policy
    pub fn covers(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        if self.exclude_hosts.iter().any(|p| host_matches(p, &host)) {
            return false;
        }

        self.include_hosts.is_empty() || self.include_hosts.iter().any(|p| host_matches(p, &host))
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    let name = pattern.strip_prefix("*.").unwrap_or(pattern);

    if name.is_empty() {
        return Err(Error::config(format!("Empty host pattern '{}'", pattern)));
    }
    if name.contains('*') {
        return Err(Error::config(format!(
            "Wildcard only allowed as leading '*.' in '{}'",
            pattern
        )));
    }
    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return Err(Error::config(format!("Malformed host pattern '{}'", pattern)));
    }
    Ok(())
}

/// `*.example.com` matches any subdomain depth but not `example.com` itself
fn host_matches(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    match pattern.strip_prefix("*.") {
        Some(domain) => host
            .strip_suffix(domain)
            .map(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
            .unwrap_or(false),
        None => host == pattern,
    }
}
