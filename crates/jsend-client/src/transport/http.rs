//! HTTP transport implementation backed by reqwest

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::transport::{RawResponse, Transport, TransportRequest, TransportStatistics};

/// HTTP transport for the JSend client
///
/// One instance owns one connection pool and can serve any number of
/// concurrent requests. Redirects, TLS and connection reuse are reqwest's
/// business; this type only translates between the client's value types and
/// the wire.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client
    client: Client,
    /// Statistics
    stats: Arc<parking_lot::Mutex<TransportStatistics>>,
}

impl HttpTransport {
    /// Create an HTTP transport with default timeouts and user agent.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("jsend-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Create an HTTP transport around a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            stats: Arc::new(parking_lot::Mutex::new(TransportStatistics::default())),
        }
    }

    /// Update statistics
    fn update_stats<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut TransportStatistics),
    {
        let mut stats = self.stats.lock();
        update_fn(&mut stats);
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        self.update_stats(|stats| stats.requests_sent += 1);
        debug!(method = %request.method, url = %request.url, "dispatching request");

        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            self.update_stats(|stats| {
                stats.errors += 1;
                stats.last_error = Some(e.to_string());
            });
            warn!(error = %e, "request dispatch failed");
            TransportError::Connection(e)
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Reading the body consumes the response; the parser gets bytes.
        let bytes = response.bytes().await.map_err(|e| {
            self.update_stats(|stats| {
                stats.errors += 1;
                stats.last_error = Some(e.to_string());
            });
            TransportError::Connection(e)
        })?;
        let body = if bytes.is_empty() { None } else { Some(bytes) };

        self.update_stats(|stats| stats.responses_received += 1);
        debug!(status = %status, has_body = body.is_some(), "response received");

        Ok(RawResponse::new(status, headers, body))
    }

    fn statistics(&self) -> TransportStatistics {
        self.stats.lock().clone()
    }
}
