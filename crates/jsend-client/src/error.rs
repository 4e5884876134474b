//! Error types for JSend client operations

use thiserror::Error;

use jsend_protocol::{JsendStatus, SchemaError, SchemaKind};

/// Result type for JSend client operations
pub type JsendClientResult<T> = Result<T, JsendClientError>;

/// Top-level error type for JSend client operations
#[derive(Error, Debug)]
pub enum JsendClientError {
    /// Transport-level errors
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be interpreted as JSend
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// JSON serialization errors on the request side
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// The request deadline elapsed
    #[error("operation timed out")]
    Timeout,
}

impl JsendClientError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if the error is worth retrying at the transport level.
    ///
    /// Parse errors are never retryable: the bytes already arrived and will
    /// not improve on a second reading.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(TransportError::Connection(_)) => true,
            Self::Transport(TransportError::Closed) => true,
            Self::Timeout => true,
            _ => false,
        }
    }

    /// Check if the error came out of the response-parsing pipeline
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Transport-specific errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport closed unexpectedly")]
    Closed,
}

/// The response body could not be interpreted as a JSend message.
///
/// Every variant carries enough context to be logged verbatim: the raw body
/// text, the type the caller asked for, and the underlying cause. Errors
/// from the JSON and schema collaborators never escape the parser in their
/// original types; they always arrive wrapped here.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The transport response carried no body at all
    #[error("response without content cannot be parsed into {target}")]
    EmptyBody { target: &'static str },

    /// The body was not syntactically valid JSON
    #[error("response body is not valid JSON while parsing into {target}: {source} (body: {body:?})")]
    Syntax {
        target: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body was JSON but violated one of the JSend schemas
    #[error("response body violates the {schema} schema: {detail} (body: {body:?})")]
    Schema {
        schema: SchemaKind,
        detail: String,
        body: String,
    },

    /// The `data` field could not be materialized into the requested type
    #[error("cannot deserialize response data into {target}: {source} (body: {body:?})")]
    Data {
        target: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The embedded schema resource failed to load or compile
    #[error("schema registry failure: {0}")]
    Registry(#[from] SchemaError),
}

impl ParseError {
    /// The raw body text, where one was read before the failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            ParseError::EmptyBody { .. } | ParseError::Registry(_) => None,
            ParseError::Syntax { body, .. }
            | ParseError::Schema { body, .. }
            | ParseError::Data { body, .. } => Some(body),
        }
    }
}

/// Raised lazily when a caller reads `data()` on a response that has none.
///
/// This is a programmer-contract violation, not a parse failure: check
/// `has_data()` first, or match on `error()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataAccessError {
    #[error("response carries no data")]
    NoData,

    #[error("unsuccessful response: status was \"{status}\"")]
    Unsuccessful { status: JsendStatus },
}
