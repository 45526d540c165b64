// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use crate::error::Result;

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
    /// Final URL (after redirects)
    pub url: Url,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// DER-encoded leaf certificate presented by the server, if TLS was used
    pub peer_certificate: Option<Bytes>,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        url: Url,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            response_time_ms,
            peer_certificate: None,
        }
    }

    /// Attach the server's leaf certificate
    pub fn with_peer_certificate(mut self, der: impl Into<Bytes>) -> Self {
        self.peer_certificate = Some(der.into());
        self
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get body as text
    pub fn text(&self) -> Result<String> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Host of the final URL, the one that served this response
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Whether the final connection used TLS
    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status() {
        let resp = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::new(),
            Url::parse("https://example.com").unwrap(),
            100,
        );
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);
        assert!(resp.peer_certificate.is_none());
    }

    #[test]
    fn test_response_text_and_certificate() {
        let resp = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from("Hello, World!"),
            Url::parse("https://example.com").unwrap(),
            100,
        )
        .with_peer_certificate(vec![0x30, 0x82]);
        assert_eq!(resp.text().unwrap(), "Hello, World!");
        assert_eq!(resp.peer_certificate.as_deref(), Some(&[0x30, 0x82][..]));
    }

    #[test]
    fn test_response_final_url() {
        let resp = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::new(),
            Url::parse("http://cdn.example.org/a").unwrap(),
            5,
        );
        assert_eq!(resp.host(), Some("cdn.example.org"));
        assert!(!resp.is_https());
    }

    #[test]
    fn test_response_invalid_utf8() {
        let resp = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(&[0xff, 0xfe]),
            Url::parse("https://example.com").unwrap(),
            1,
        );
        assert!(matches!(resp.text(), Err(crate::Error::Utf8(_))));
        assert_eq!(resp.text_lossy(), "\u{fffd}\u{fffd}");
    }
}
