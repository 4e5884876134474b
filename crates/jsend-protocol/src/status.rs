use serde::{Deserialize, Serialize};
use std::fmt;

/// The three JSend message kinds, as carried by the top-level `status` field.
///
/// `status` is a pure discriminant: it selects which other fields a message
/// carries, and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsendStatus {
    /// The request was handled and produced a (possibly empty) result.
    Success,
    /// The request was rejected because of the caller's input.
    Fail,
    /// The request failed because of a server-side problem.
    Error,
}

impl JsendStatus {
    /// The lowercase wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsendStatus::Success => "success",
            JsendStatus::Fail => "fail",
            JsendStatus::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JsendStatus::Success)
    }
}

impl fmt::Display for JsendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
