//! Request/response interception
//!
//! Interceptors observe and shape the request lifecycle around the parser:
//!
//! 1. **`on_sending`** — before dispatch; may mutate the outgoing request
//!    (inject headers, rewrite the body).
//! 2. **`on_received`** — after the transport responds, before parsing; may
//!    rewrite the raw response in place to normalize a misbehaving endpoint.
//! 3. **`on_parsed`** — after successful parsing; observation only.
//! 4. **`on_exception`** — when any stage fails; observation only, the error
//!    always continues to the caller.
//!
//! All hooks run inline in the request path, in registration order, so they
//! must not block indefinitely. No thread affinity is promised, only the
//! sequence above.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::JsendClientError;
use crate::response::ResponseView;
use crate::transport::{RawResponse, TransportRequest};

/// One observer of the request lifecycle. Every hook defaults to a no-op;
/// implement only the ones you need.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Called before the request is handed to the transport.
    async fn on_sending(&self, _request: &mut TransportRequest) {}

    /// Called with the raw response before the parser runs.
    async fn on_received(&self, _response: &mut RawResponse) {}

    /// Called with the parsed response after a successful round trip.
    async fn on_parsed(&self, _response: &dyn ResponseView) {}

    /// Called when any stage of the round trip fails. The error propagates
    /// regardless of what this hook does.
    async fn on_exception(&self, _error: &JsendClientError) {}
}

/// Ordered collection of interceptors.
///
/// Hooks execute in registration order for every stage, including
/// `on_exception`.
#[derive(Default, Clone)]
pub struct InterceptorStack {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interceptor to the end of the stack
    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Get the number of interceptors in the stack
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub(crate) async fn notify_sending(&self, request: &mut TransportRequest) {
        for interceptor in &self.interceptors {
            interceptor.on_sending(request).await;
        }
    }

    pub(crate) async fn notify_received(&self, response: &mut RawResponse) {
        for interceptor in &self.interceptors {
            interceptor.on_received(response).await;
        }
    }

    pub(crate) async fn notify_parsed(&self, response: &dyn ResponseView) {
        for interceptor in &self.interceptors {
            interceptor.on_parsed(response).await;
        }
    }

    pub(crate) async fn notify_exception(&self, error: &JsendClientError) {
        for interceptor in &self.interceptors {
            interceptor.on_exception(error).await;
        }
    }
}
