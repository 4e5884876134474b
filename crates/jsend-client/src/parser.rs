//! Response-parsing pipeline
//!
//! This is where raw bytes become typed results. Both parsers share the same
//! skeleton: read the body once, parse it as generic JSON, then classify it
//! into one of the three JSend shapes and hand off to the per-status
//! handlers. They differ only in how classification works:
//!
//! - [`DefaultJsendParser`] demands a schema-valid envelope and dispatches on
//!   the `status` field.
//! - [`NakedContentParser`] probes the schemas directly (fail, then error,
//!   then success) and wraps anything that matches none of them as the
//!   `data` of a synthesized success message.
//!
//! Nothing from the JSON or schema collaborators escapes this module in its
//! original error type; callers see [`ParseError`] and nothing else.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::type_name;
use tracing::debug;

use jsend_protocol::{JsendError, SchemaKind, SchemaRegistry};

use crate::error::ParseError;
use crate::response::{JsendResponse, ResponseMeta};
use crate::transport::RawResponse;

/// Which parsing discipline the client applies to response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Every body must be a schema-valid JSend envelope.
    #[default]
    Strict,
    /// Envelopes are classified as usual; any other JSON body is accepted
    /// as a bare success payload.
    Naked,
}

/// A response parser: the single entry point the client façade consumes.
///
/// Implementations are selected by [`ParseMode`] configuration, not by any
/// inheritance relationship between them.
#[async_trait]
pub trait ResponseParser: Send + Sync {
    /// Classify and decode one transport response.
    ///
    /// Consumes the response because the body is readable exactly once.
    async fn parse<T>(&self, raw: RawResponse) -> Result<JsendResponse<T>, ParseError>
    where
        T: DeserializeOwned + Send;
}

/// Strict parser: every body must be a schema-valid JSend envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultJsendParser;

impl DefaultJsendParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResponseParser for DefaultJsendParser {
    async fn parse<T>(&self, raw: RawResponse) -> Result<JsendResponse<T>, ParseError>
    where
        T: DeserializeOwned + Send,
    {
        let target = type_name::<T>();
        let (meta, body) = read_body(raw, target)?;
        let document = parse_document(&body, target)?;
        check(SchemaKind::Base, &document, &body).await?;

        let status = document
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default();
        debug!(status, http_status = %meta.status, "classifying enveloped response");

        match status {
            "success" => success_message(&document, meta, &body).await,
            "fail" => fail_message(&document, meta, &body).await,
            "error" => error_message(&document, meta, &body).await,
            other => Err(ParseError::Schema {
                schema: SchemaKind::Base,
                detail: format!("unexpected status value: {:?}", other),
                body,
            }),
        }
    }
}

/// Lenient parser for endpoints that do not reliably emit envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NakedContentParser;

impl NakedContentParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResponseParser for NakedContentParser {
    async fn parse<T>(&self, raw: RawResponse) -> Result<JsendResponse<T>, ParseError>
    where
        T: DeserializeOwned + Send,
    {
        let target = type_name::<T>();
        let (meta, body) = read_body(raw, target)?;
        let document = parse_document(&body, target)?;
        let registry = SchemaRegistry::global();

        // Match order is fixed policy: fail, then error, then success.
        if registry.fail().await?.is_valid(&document) {
            debug!(http_status = %meta.status, "naked body matched the fail schema");
            fail_message(&document, meta, &body).await
        } else if registry.error().await?.is_valid(&document) {
            debug!(http_status = %meta.status, "naked body matched the error schema");
            error_message(&document, meta, &body).await
        } else if registry.success().await?.is_valid(&document) {
            debug!(http_status = %meta.status, "naked body matched the success schema");
            success_message(&document, meta, &body).await
        } else {
            debug!(http_status = %meta.status, "wrapping naked body as success data");
            let wrapped = serde_json::json!({"status": "success", "data": document});
            success_message(&wrapped, meta, &body).await
        }
    }
}

/// Parser instance selected from a [`ParseMode`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum ParserKind {
    Strict(DefaultJsendParser),
    Naked(NakedContentParser),
}

impl From<ParseMode> for ParserKind {
    fn from(mode: ParseMode) -> Self {
        match mode {
            ParseMode::Strict => ParserKind::Strict(DefaultJsendParser::new()),
            ParseMode::Naked => ParserKind::Naked(NakedContentParser::new()),
        }
    }
}

impl ParserKind {
    pub(crate) async fn parse<T>(&self, raw: RawResponse) -> Result<JsendResponse<T>, ParseError>
    where
        T: DeserializeOwned + Send,
    {
        match self {
            ParserKind::Strict(parser) => parser.parse(raw).await,
            ParserKind::Naked(parser) => parser.parse(raw).await,
        }
    }
}

/// Split a transport response into metadata and body text.
fn read_body(raw: RawResponse, target: &'static str) -> Result<(ResponseMeta, String), ParseError> {
    let meta = ResponseMeta::from(&raw);
    match raw.body {
        Some(bytes) if !bytes.is_empty() => {
            Ok((meta, String::from_utf8_lossy(&bytes).into_owned()))
        }
        _ => Err(ParseError::EmptyBody { target }),
    }
}

fn parse_document(body: &str, target: &'static str) -> Result<Value, ParseError> {
    serde_json::from_str(body).map_err(|e| ParseError::Syntax {
        target,
        body: body.to_string(),
        source: e,
    })
}

/// Validate `document` against one of the registry schemas.
async fn check(kind: SchemaKind, document: &Value, body: &str) -> Result<(), ParseError> {
    let validator = SchemaRegistry::global().validator(kind).await?;
    validator.validate(document).map_err(|e| ParseError::Schema {
        schema: kind,
        detail: e.to_string(),
        body: body.to_string(),
    })
}

async fn success_message<T>(
    document: &Value,
    meta: ResponseMeta,
    body: &str,
) -> Result<JsendResponse<T>, ParseError>
where
    T: DeserializeOwned,
{
    check(SchemaKind::Success, document, body).await?;
    match document.get("data") {
        None | Some(Value::Null) => Ok(JsendResponse::success_empty(meta)),
        Some(data) => {
            let decoded = T::deserialize(data).map_err(|e| ParseError::Data {
                target: type_name::<T>(),
                body: body.to_string(),
                source: e,
            })?;
            Ok(JsendResponse::success(decoded, meta))
        }
    }
}

async fn fail_message<T>(
    document: &Value,
    meta: ResponseMeta,
    body: &str,
) -> Result<JsendResponse<T>, ParseError> {
    check(SchemaKind::Fail, document, body).await?;
    // `data` is required and non-null here by schema.
    let data = document.get("data").cloned().unwrap_or(Value::Null);
    Ok(JsendResponse::unsuccessful(JsendError::fail(data), meta))
}

async fn error_message<T>(
    document: &Value,
    meta: ResponseMeta,
    body: &str,
) -> Result<JsendResponse<T>, ParseError> {
    check(SchemaKind::Error, document, body).await?;
    let message = document
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let code = document.get("code").and_then(Value::as_i64);
    // A literal null `data` is treated the same as an absent field.
    let data = document.get("data").filter(|v| !v.is_null()).cloned();
    Ok(JsendResponse::unsuccessful(
        JsendError::error(message, code, data),
        meta,
    ))
}
