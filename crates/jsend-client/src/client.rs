//! Main JSend client implementation

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{JsendClientError, JsendClientResult};
use crate::interceptor::{Interceptor, InterceptorStack};
use crate::parser::{ParseMode, ParserKind};
use crate::response::JsendResponse;
use crate::transport::{BoxedTransport, HttpTransport, RawResponse, TransportRequest};

/// Main JSend client
///
/// Thin orchestration around the parser: build the request, run the
/// `on_sending` hooks, dispatch, run `on_received`, parse, run `on_parsed`.
/// When any of those stages fails, every interceptor's `on_exception` runs
/// and the error still reaches the caller; nothing is ever swallowed.
///
/// One client serves concurrent requests; all per-request state lives on the
/// stack of each `send` call.
pub struct JsendClient {
    /// Transport layer
    transport: BoxedTransport,
    /// Configuration
    config: ClientConfig,
    /// Ordered interception hooks
    interceptors: InterceptorStack,
    /// Parser selected from the configured parse mode
    parser: ParserKind,
}

impl JsendClient {
    /// Create a new client with the given transport and configuration.
    pub fn new(transport: BoxedTransport, config: ClientConfig) -> Self {
        let parser = ParserKind::from(config.parse_mode);
        Self {
            transport,
            config,
            interceptors: InterceptorStack::new(),
            parser,
        }
    }

    /// Start building a client.
    pub fn builder() -> JsendClientBuilder {
        JsendClientBuilder::new()
    }

    /// Send a request and parse the response into a typed JSend result.
    pub async fn send<T>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> JsendClientResult<JsendResponse<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let outcome = self.send_inner(method, url, body).await;
        if let Err(error) = &outcome {
            warn!(error = %error, "request failed");
            self.interceptors.notify_exception(error).await;
        }
        outcome
    }

    async fn send_inner<T>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> JsendClientResult<JsendResponse<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let mut request = TransportRequest::new(method, url)?;
        for (name, value) in &self.config.headers {
            request
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        request.body = body;

        self.interceptors.notify_sending(&mut request).await;

        let mut raw = self.dispatch_with_retry(&request).await?;
        self.interceptors.notify_received(&mut raw).await;

        let parsed = self.parser.parse::<T>(raw).await?;
        debug!(
            status = %parsed.status(),
            http_status = %parsed.http_status(),
            "response parsed"
        );
        self.interceptors.notify_parsed(&parsed).await;

        Ok(parsed)
    }

    /// Dispatch with the configured timeout, retrying transient transport
    /// failures. Parse never happens here, so parse errors never re-dispatch.
    async fn dispatch_with_retry(
        &self,
        request: &TransportRequest,
    ) -> JsendClientResult<RawResponse> {
        let mut last_error = None;

        for attempt in 0..self.config.retry.max_attempts {
            if attempt > 0 {
                let delay = self.config.retry.delay_for_attempt(attempt);
                debug!(
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
            }

            let error = match timeout(
                self.config.timeouts.request,
                self.transport.dispatch(request.clone()),
            )
            .await
            {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) => JsendClientError::from(e),
                Err(_) => JsendClientError::Timeout,
            };

            warn!(attempt = attempt, error = %error, "request dispatch failed");

            if !error.is_retryable() || !self.config.retry.should_retry(attempt + 1) {
                return Err(error);
            }
            last_error = Some(error);
        }

        Err(last_error
            .unwrap_or_else(|| JsendClientError::config("retry budget allows no attempts")))
    }

    /// GET a resource.
    pub async fn get<T>(&self, url: &str) -> JsendClientResult<JsendResponse<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.send(Method::GET, url, None).await
    }

    /// POST a JSON body.
    pub async fn post<T, B>(&self, url: &str, body: &B) -> JsendClientResult<JsendResponse<T>>
    where
        T: DeserializeOwned + Send + Sync,
        B: Serialize,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// PUT a JSON body.
    pub async fn put<T, B>(&self, url: &str, body: &B) -> JsendClientResult<JsendResponse<T>>
    where
        T: DeserializeOwned + Send + Sync,
        B: Serialize,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, url, Some(body)).await
    }

    /// DELETE a resource.
    pub async fn delete<T>(&self, url: &str) -> JsendClientResult<JsendResponse<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.send(Method::DELETE, url, None).await
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get transport statistics
    pub fn transport_stats(&self) -> crate::transport::TransportStatistics {
        self.transport.statistics()
    }
}

/// Builder for creating JSend clients
pub struct JsendClientBuilder {
    transport: Option<BoxedTransport>,
    config: ClientConfig,
    interceptors: InterceptorStack,
}

impl JsendClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self {
            transport: None,
            config: ClientConfig::default(),
            interceptors: InterceptorStack::new(),
        }
    }

    /// Set transport
    pub fn with_transport(mut self, transport: BoxedTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the parse mode on the current configuration
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.config.parse_mode = mode;
        self
    }

    /// Register an interceptor; hooks run in registration order
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Build the client, falling back to a default HTTP transport when none
    /// was provided.
    pub fn build(self) -> JsendClientResult<JsendClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(HttpTransport::new()?),
        };

        let mut client = JsendClient::new(transport, self.config);
        client.interceptors = self.interceptors;
        Ok(client)
    }
}

impl Default for JsendClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder_defaults() {
        let client = JsendClient::builder().build().unwrap();
        assert_eq!(client.config().parse_mode, ParseMode::Strict);
        assert_eq!(client.transport_stats().requests_sent, 0);
    }

    #[test]
    fn test_builder_parse_mode_override() {
        let client = JsendClient::builder()
            .with_parse_mode(ParseMode::Naked)
            .build()
            .unwrap();
        assert_eq!(client.config().parse_mode, ParseMode::Naked);
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_error() {
        let client = JsendClient::builder().build().unwrap();
        let result = client.get::<serde_json::Value>("not a url").await;
        assert!(matches!(result, Err(JsendClientError::Transport(_))));
    }
}
