//! End-to-end tests for the client façade over an in-memory transport.
//!
//! No sockets: a scripted transport hands back queued responses, which
//! exercises the full send → intercept → parse pipeline exactly as a real
//! HTTP round trip would.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;

use jsend_client::{
    ClientConfig, Interceptor, JsendClient, JsendClientError, ParseError, ParseMode, RawResponse,
    ResponseView, Transport, TransportError, TransportRequest,
};
use jsend_protocol::JsendStatus;

#[derive(Debug, Deserialize, PartialEq)]
struct Order {
    id: u64,
}

/// Transport that replays a script of canned outcomes.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    seen: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn dispatched(&self) -> usize {
        self.seen.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        self.seen.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .expect("scripted transport exhausted")
    }
}

/// Forwards dispatch to a shared scripted transport so tests can keep a
/// handle on the script while the client owns its boxed copy.
struct SharedTransport(Arc<ScriptedTransport>);

#[async_trait]
impl Transport for SharedTransport {
    async fn dispatch(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        self.0.dispatch(request).await
    }
}

fn ok_response(body: &str) -> RawResponse {
    response_with(body, StatusCode::OK)
}

fn response_with(body: &str, status: StatusCode) -> RawResponse {
    let mut raw = RawResponse::empty(status);
    raw.set_body(body.to_string());
    raw
}

fn client_for(
    transport: &Arc<ScriptedTransport>,
    config: ClientConfig,
) -> jsend_client::JsendClientBuilder {
    JsendClient::builder()
        .with_transport(Box::new(SharedTransport(transport.clone())))
        .with_config(config)
}

struct RecordingInterceptor {
    id: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Interceptor for RecordingInterceptor {
    async fn on_sending(&self, request: &mut TransportRequest) {
        self.log.lock().push(format!("sending_{}", self.id));
        request
            .headers
            .insert(format!("x-{}", self.id), "1".to_string());
    }

    async fn on_received(&self, _response: &mut RawResponse) {
        self.log.lock().push(format!("received_{}", self.id));
    }

    async fn on_parsed(&self, response: &dyn ResponseView) {
        self.log
            .lock()
            .push(format!("parsed_{}:{}", self.id, response.status()));
    }

    async fn on_exception(&self, _error: &JsendClientError) {
        self.log.lock().push(format!("exception_{}", self.id));
    }
}

#[tokio::test]
async fn test_happy_path_round_trip() {
    let transport = ScriptedTransport::new(vec![Ok(ok_response(
        r#"{"status":"success","data":{"id":7}}"#,
    ))]);
    let client = client_for(&transport, ClientConfig::default())
        .build()
        .unwrap();

    let response = client
        .get::<Order>("http://localhost:8080/orders/7")
        .await
        .unwrap();

    assert_eq!(response.status(), JsendStatus::Success);
    assert_eq!(response.data().unwrap(), &Order { id: 7 });
    assert_eq!(response.http_status(), StatusCode::OK);

    let seen = transport.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].url.path(), "/orders/7");
}

#[tokio::test]
async fn test_fail_envelope_on_bad_request() {
    let transport = ScriptedTransport::new(vec![Ok(response_with(
        r#"{"status":"fail","data":{"sku":"unknown"}}"#,
        StatusCode::BAD_REQUEST,
    ))]);
    let client = client_for(&transport, ClientConfig::default())
        .build()
        .unwrap();

    let response = client
        .post::<Order, _>("http://localhost:8080/orders", &json!({"sku": "X"}))
        .await
        .unwrap();

    assert_eq!(response.status(), JsendStatus::Fail);
    assert_eq!(response.http_status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error().unwrap().data(),
        Some(&json!({"sku": "unknown"}))
    );
}

#[tokio::test]
async fn test_default_headers_applied() {
    let transport = ScriptedTransport::new(vec![Ok(ok_response(
        r#"{"status":"success","data":null}"#,
    ))]);
    let mut config = ClientConfig::default();
    config
        .headers
        .insert("x-api-key".to_string(), "secret".to_string());
    let client = client_for(&transport, config).build().unwrap();

    client
        .get::<Value>("http://localhost:8080/ping")
        .await
        .unwrap();

    let seen = transport.seen.lock();
    assert_eq!(seen[0].headers.get("x-api-key").unwrap(), "secret");
}

#[tokio::test]
async fn test_interceptor_ordering_on_success() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport::new(vec![Ok(ok_response(
        r#"{"status":"success","data":{"id":1}}"#,
    ))]);

    let client = client_for(&transport, ClientConfig::default())
        .with_interceptor(Arc::new(RecordingInterceptor {
            id: "a",
            log: log.clone(),
        }))
        .with_interceptor(Arc::new(RecordingInterceptor {
            id: "b",
            log: log.clone(),
        }))
        .build()
        .unwrap();

    client
        .get::<Order>("http://localhost:8080/orders/1")
        .await
        .unwrap();

    // Both hooks mutated the outgoing request.
    let seen = transport.seen.lock();
    assert_eq!(seen[0].headers.get("x-a").unwrap(), "1");
    assert_eq!(seen[0].headers.get("x-b").unwrap(), "1");

    let log = log.lock();
    assert_eq!(
        log.as_slice(),
        [
            "sending_a",
            "sending_b",
            "received_a",
            "received_b",
            "parsed_a:success",
            "parsed_b:success"
        ]
    );
}

#[tokio::test]
async fn test_interceptors_observe_parse_errors() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport::new(vec![Ok(ok_response("{not json"))]);

    let client = client_for(&transport, ClientConfig::default())
        .with_interceptor(Arc::new(RecordingInterceptor {
            id: "a",
            log: log.clone(),
        }))
        .with_interceptor(Arc::new(RecordingInterceptor {
            id: "b",
            log: log.clone(),
        }))
        .build()
        .unwrap();

    let result = client.get::<Order>("http://localhost:8080/orders/1").await;

    // The error still reaches the caller, with the raw body attached.
    match result {
        Err(JsendClientError::Parse(ParseError::Syntax { body, .. })) => {
            assert_eq!(body, "{not json");
        }
        other => panic!("expected syntax error, got {:?}", other.map(|_| ())),
    }

    let log = log.lock();
    assert_eq!(
        log.as_slice(),
        [
            "sending_a",
            "sending_b",
            "received_a",
            "received_b",
            "exception_a",
            "exception_b"
        ]
    );
}

/// Rewrites naked bodies into success envelopes before parsing.
struct EnvelopingInterceptor;

#[async_trait]
impl Interceptor for EnvelopingInterceptor {
    async fn on_received(&self, response: &mut RawResponse) {
        let naked = match &response.body {
            Some(body) => {
                let text = String::from_utf8_lossy(body);
                (!text.contains("\"status\"")).then(|| text.into_owned())
            }
            None => None,
        };
        if let Some(text) = naked {
            response.set_body(format!(r#"{{"status":"success","data":{}}}"#, text));
        }
    }
}

#[tokio::test]
async fn test_on_received_can_normalize_response() {
    let transport = ScriptedTransport::new(vec![Ok(ok_response(r#"{"id":42}"#))]);

    // Strict mode, but the interceptor rewraps the body before the parser.
    let client = client_for(&transport, ClientConfig::default())
        .with_interceptor(Arc::new(EnvelopingInterceptor))
        .build()
        .unwrap();

    let response = client
        .get::<Order>("http://localhost:8080/orders/42")
        .await
        .unwrap();
    assert_eq!(response.data().unwrap(), &Order { id: 42 });
}

#[tokio::test]
async fn test_naked_mode_wraps_bare_payloads() {
    let transport = ScriptedTransport::new(vec![Ok(ok_response(r#"{"id":5468}"#))]);
    let client = client_for(&transport, ClientConfig::naked())
        .build()
        .unwrap();

    let response = client
        .get::<Value>("http://localhost:8080/raw")
        .await
        .unwrap();
    assert_eq!(response.data().unwrap()["id"], json!(5468));
}

#[tokio::test]
async fn test_naked_mode_still_classifies_envelopes() {
    let transport = ScriptedTransport::new(vec![Ok(ok_response(
        r#"{"status":"fail","data":"bad input"}"#,
    ))]);
    let client = client_for(&transport, ClientConfig::naked())
        .build()
        .unwrap();

    let response = client
        .get::<Value>("http://localhost:8080/raw")
        .await
        .unwrap();
    assert_eq!(response.status(), JsendStatus::Fail);
    assert_eq!(response.error().unwrap().data(), Some(&json!("bad input")));
}

#[tokio::test(start_paused = true)]
async fn test_transient_transport_errors_are_retried() {
    let transport = ScriptedTransport::new(vec![
        Err(TransportError::Closed),
        Ok(ok_response(r#"{"status":"success","data":{"id":3}}"#)),
    ]);
    let client = client_for(&transport, ClientConfig::default())
        .build()
        .unwrap();

    let response = client
        .get::<Order>("http://localhost:8080/orders/3")
        .await
        .unwrap();
    assert_eq!(response.data().unwrap(), &Order { id: 3 });
    assert_eq!(transport.dispatched(), 2);
}

#[tokio::test]
async fn test_parse_errors_are_never_retried() {
    let transport = ScriptedTransport::new(vec![
        Ok(ok_response("{not json")),
        Ok(ok_response(r#"{"status":"success","data":null}"#)),
    ]);
    let client = client_for(&transport, ClientConfig::default())
        .build()
        .unwrap();

    let result = client.get::<Value>("http://localhost:8080/x").await;
    assert!(matches!(result, Err(JsendClientError::Parse(_))));
    assert_eq!(transport.dispatched(), 1);
}

/// Transport that never answers; used to exercise the request deadline.
struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn dispatch(&self, _request: TransportRequest) -> Result<RawResponse, TransportError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout() {
    let mut config = ClientConfig::default();
    config.retry.max_attempts = 1;
    let client = JsendClient::builder()
        .with_transport(Box::new(StalledTransport))
        .with_config(config)
        .build()
        .unwrap();

    let result = client.get::<Value>("http://localhost:8080/slow").await;
    assert!(matches!(result, Err(JsendClientError::Timeout)));
}

#[tokio::test]
async fn test_empty_body_surfaces_parse_error() {
    let transport =
        ScriptedTransport::new(vec![Ok(RawResponse::empty(StatusCode::NO_CONTENT))]);
    let client = client_for(&transport, ClientConfig::default())
        .build()
        .unwrap();

    let result = client.get::<Value>("http://localhost:8080/x").await;
    assert!(matches!(
        result,
        Err(JsendClientError::Parse(ParseError::EmptyBody { .. }))
    ));
}

#[tokio::test]
async fn test_concurrent_requests_share_one_client() {
    let bodies: Vec<_> = (0..8)
        .map(|i| Ok(ok_response(&format!(r#"{{"status":"success","data":{{"id":{}}}}}"#, i))))
        .collect();
    let transport = ScriptedTransport::new(bodies);
    let client = Arc::new(
        client_for(&transport, ClientConfig::default())
            .build()
            .unwrap(),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.get::<Order>("http://localhost:8080/orders").await
        }));
    }

    let mut ids: Vec<u64> = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        ids.push(response.data().unwrap().id);
    }
    ids.sort_unstable();
    assert_eq!(ids, (0..8).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_parse_mode_selection() {
    // The same naked body: strict refuses it, naked accepts it.
    for (mode, accepted) in [(ParseMode::Strict, false), (ParseMode::Naked, true)] {
        let transport = ScriptedTransport::new(vec![Ok(ok_response(r#"{"id":1}"#))]);
        let client = client_for(&transport, ClientConfig::default())
            .with_parse_mode(mode)
            .build()
            .unwrap();

        let result = client.get::<Order>("http://localhost:8080/x").await;
        assert_eq!(result.is_ok(), accepted);
    }
}
