use serde_json::Value;
use std::fmt;

use crate::status::JsendStatus;

/// The failure detail carried by a `fail` or `error` message.
///
/// A `JsendError` is a value, not an exception: the client surfaces it on the
/// parsed response so callers can inspect what the server reported. The two
/// non-success shapes populate it differently:
///
/// - `fail`: `data` holds the rejection detail verbatim; there is no message
///   or code.
/// - `error`: `message` is always present, `code` and `data` are optional.
///
/// Instances are only ever built through [`JsendError::fail`] and
/// [`JsendError::error`], so the status can never be `Success`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsendError {
    status: JsendStatus,
    message: Option<String>,
    code: Option<i64>,
    data: Option<Value>,
}

impl JsendError {
    /// Build the detail for a `fail` message from its (non-null) `data`.
    pub fn fail(data: Value) -> Self {
        Self {
            status: JsendStatus::Fail,
            message: None,
            code: None,
            data: Some(data),
        }
    }

    /// Build the detail for an `error` message.
    pub fn error(message: impl Into<String>, code: Option<i64>, data: Option<Value>) -> Self {
        Self {
            status: JsendStatus::Error,
            message: Some(message.into()),
            code,
            data,
        }
    }

    /// Which non-success status produced this detail.
    pub fn status(&self) -> JsendStatus {
        self.status
    }

    /// The server-supplied message. Always present for `error`, never for
    /// `fail`.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The optional numeric error code (`error` messages only).
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// The opaque detail payload, if the server sent one.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl fmt::Display for JsendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            JsendStatus::Fail => match &self.data {
                Some(data) => write!(f, "fail: {}", data),
                None => write!(f, "fail"),
            },
            JsendStatus::Error => {
                write!(f, "error: {}", self.message.as_deref().unwrap_or(""))?;
                if let Some(code) = self.code {
                    write!(f, " (code {})", code)?;
                }
                Ok(())
            }
            // Unreachable by construction.
            JsendStatus::Success => write!(f, "success"),
        }
    }
}

impl std::error::Error for JsendError {}
