use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::JsendStatus;

/// A JSend message exactly as it appears on the wire.
///
/// The three shapes:
///
/// ```json
/// {"status":"success","data":{"id":1}}
/// {"status":"fail","data":{"title":"required"}}
/// {"status":"error","message":"oops","code":500,"data":{"trace":"..."}}
/// ```
///
/// Servers build responses through the constructors below; extra top-level
/// fields received from a peer are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    /// `data` is required on the wire but may be `null`.
    Success { data: Value },
    /// `data` is required and must not be `null`.
    Fail { data: Value },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl Envelope {
    /// Build a success message around a serializable payload.
    pub fn success<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Envelope::Success {
            data: serde_json::to_value(data)?,
        })
    }

    /// Build a success message with no payload (`data: null`).
    pub fn success_empty() -> Self {
        Envelope::Success { data: Value::Null }
    }

    /// Build a fail message around a serializable rejection detail.
    pub fn fail<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_value(data)?;
        assert!(!data.is_null(), "fail data must be non-null");
        Ok(Envelope::Fail { data })
    }

    /// Build an error message with just a description.
    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
            code: None,
            data: None,
        }
    }

    /// Build an error message with optional code and detail payload.
    pub fn error_with(message: impl Into<String>, code: Option<i64>, data: Option<Value>) -> Self {
        Envelope::Error {
            message: message.into(),
            code,
            data,
        }
    }

    pub fn status(&self) -> JsendStatus {
        match self {
            Envelope::Success { .. } => JsendStatus::Success,
            Envelope::Fail { .. } => JsendStatus::Fail,
            Envelope::Error { .. } => JsendStatus::Error,
        }
    }

    /// The conventional HTTP status code for this message shape.
    pub fn http_status(&self) -> u16 {
        match self {
            Envelope::Success { .. } => 200,
            Envelope::Fail { .. } => 400,
            Envelope::Error { .. } => 500,
        }
    }
}
