//! Transport layer for the JSend client
//!
//! The parser consumes a transport only through [`RawResponse`]: HTTP status,
//! headers, and a body that is read exactly once. Anything that can produce
//! that tuple can stand in for the network, which is how the tests drive the
//! full pipeline without sockets.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use crate::error::TransportError;

pub mod http;

// Re-export transport implementations
pub use http::HttpTransport;

/// An outgoing request, as seen (and mutated) by `on_sending` interceptors.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    /// Headers applied on top of the transport's own defaults.
    pub headers: HashMap<String, String>,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl TransportRequest {
    /// Build a request for `url`, validating it up front.
    pub fn new(method: Method, url: &str) -> Result<Self, TransportError> {
        let url = Url::parse(url)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {}", url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidEndpoint(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        Ok(Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        })
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A received response before parsing: status, headers, and the unread body.
///
/// `on_received` interceptors may rewrite any of the fields in place to
/// normalize a misbehaving endpoint before the parser runs.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    /// `None` when the transport delivered no body at all.
    pub body: Option<Bytes>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HashMap<String, String>, body: Option<Bytes>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A bodyless response with the given status and no headers.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, HashMap::new(), None)
    }

    /// Replace the body with new bytes.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|b| !b.is_empty())
    }
}

/// Transport statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct TransportStatistics {
    /// Number of requests dispatched
    pub requests_sent: u64,
    /// Number of responses received
    pub responses_received: u64,
    /// Number of errors encountered
    pub errors: u64,
    /// Last error message
    pub last_error: Option<String>,
}

/// Transport trait defining the interface the client façade dispatches through
///
/// Implementations own connection handling entirely; the client only sees
/// the request/response value types above. Dispatch takes `&self` so one
/// transport instance can serve concurrent in-flight requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the raw response.
    ///
    /// Non-2xx statuses are not errors here: JSend carries its fail and
    /// error shapes on top of 4xx/5xx responses, and classifying them is
    /// the parser's job.
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, TransportError>;

    /// Get transport statistics
    fn statistics(&self) -> TransportStatistics {
        TransportStatistics::default()
    }
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_validation() {
        let request = TransportRequest::new(Method::GET, "http://localhost:8080/orders").unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:8080/orders");
        assert!(request.headers.is_empty());

        assert!(TransportRequest::new(Method::GET, "not a url").is_err());
        assert!(TransportRequest::new(Method::GET, "ftp://example.com").is_err());
    }

    #[test]
    fn test_request_builders() {
        let request = TransportRequest::new(Method::POST, "https://api.example.com/orders")
            .unwrap()
            .with_header("x-request-id", "abc123")
            .with_body(serde_json::json!({"sku": "W-1"}));

        assert_eq!(request.headers.get("x-request-id").unwrap(), "abc123");
        assert!(request.body.is_some());
    }

    #[test]
    fn test_raw_response_body_presence() {
        let mut response = RawResponse::empty(StatusCode::OK);
        assert!(!response.has_body());

        response.set_body("{}");
        assert!(response.has_body());

        response.set_body("");
        assert!(!response.has_body());
    }
}
