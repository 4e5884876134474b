//! Parsed response variants
//!
//! A [`JsendResponse`] is the typed outcome of parsing one transport
//! response. It is a value: two parses of the same bytes compare equal, and
//! nothing in it refers back to the connection it came from beyond the
//! status/header snapshot in [`ResponseMeta`].

use reqwest::StatusCode;
use std::collections::HashMap;

use jsend_protocol::{JsendError, JsendStatus};

use crate::error::DataAccessError;
use crate::transport::RawResponse;

/// Transport-level metadata carried on every parsed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
}

impl From<&RawResponse> for ResponseMeta {
    fn from(raw: &RawResponse) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers.clone(),
        }
    }
}

/// The three parsed shapes.
///
/// Exactly one of "data is retrievable" and "error is present" holds for
/// any value of this type; `SuccessEmpty` has neither data nor error.
#[derive(Debug, Clone, PartialEq)]
enum ResponseBody<T> {
    /// `success` with `data: null`
    SuccessEmpty,
    /// `success` with a decoded payload
    SuccessData(T),
    /// `fail` or `error`, with the server's detail
    Unsuccessful(JsendError),
}

/// One parsed JSend response, constructed exclusively by the parsers.
#[derive(Debug, Clone, PartialEq)]
pub struct JsendResponse<T> {
    body: ResponseBody<T>,
    meta: ResponseMeta,
}

impl<T> JsendResponse<T> {
    pub(crate) fn success_empty(meta: ResponseMeta) -> Self {
        Self {
            body: ResponseBody::SuccessEmpty,
            meta,
        }
    }

    pub(crate) fn success(data: T, meta: ResponseMeta) -> Self {
        Self {
            body: ResponseBody::SuccessData(data),
            meta,
        }
    }

    pub(crate) fn unsuccessful(error: JsendError, meta: ResponseMeta) -> Self {
        Self {
            body: ResponseBody::Unsuccessful(error),
            meta,
        }
    }

    /// Which JSend status the message carried.
    pub fn status(&self) -> JsendStatus {
        match &self.body {
            ResponseBody::SuccessEmpty | ResponseBody::SuccessData(_) => JsendStatus::Success,
            ResponseBody::Unsuccessful(error) => error.status(),
        }
    }

    /// Whether [`data`](Self::data) will return a value.
    ///
    /// Callers are expected to consult this (or match on [`error`](Self::error))
    /// before reading the payload.
    pub fn has_data(&self) -> bool {
        matches!(self.body, ResponseBody::SuccessData(_))
    }

    /// The decoded payload.
    ///
    /// Fails with [`DataAccessError::NoData`] on an empty success and
    /// [`DataAccessError::Unsuccessful`] on a fail/error response.
    pub fn data(&self) -> Result<&T, DataAccessError> {
        match &self.body {
            ResponseBody::SuccessData(data) => Ok(data),
            ResponseBody::SuccessEmpty => Err(DataAccessError::NoData),
            ResponseBody::Unsuccessful(error) => Err(DataAccessError::Unsuccessful {
                status: error.status(),
            }),
        }
    }

    /// Consume the response and take the decoded payload.
    pub fn into_data(self) -> Result<T, DataAccessError> {
        match self.body {
            ResponseBody::SuccessData(data) => Ok(data),
            ResponseBody::SuccessEmpty => Err(DataAccessError::NoData),
            ResponseBody::Unsuccessful(error) => Err(DataAccessError::Unsuccessful {
                status: error.status(),
            }),
        }
    }

    /// The server's failure detail; present exactly when the status is not
    /// success.
    pub fn error(&self) -> Option<&JsendError> {
        match &self.body {
            ResponseBody::Unsuccessful(error) => Some(error),
            _ => None,
        }
    }

    /// The transport response this message arrived on.
    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    pub fn http_status(&self) -> StatusCode {
        self.meta.status
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.meta.headers
    }
}

/// The non-generic face of a parsed response.
///
/// `on_parsed` interceptors observe responses through this trait, which
/// carries everything except the decoded payload type.
pub trait ResponseView: Send + Sync {
    fn status(&self) -> JsendStatus;
    fn has_data(&self) -> bool;
    fn error(&self) -> Option<&JsendError>;
    fn meta(&self) -> &ResponseMeta;
}

impl<T: Send + Sync> ResponseView for JsendResponse<T> {
    fn status(&self) -> JsendStatus {
        JsendResponse::status(self)
    }

    fn has_data(&self) -> bool {
        JsendResponse::has_data(self)
    }

    fn error(&self) -> Option<&JsendError> {
        JsendResponse::error(self)
    }

    fn meta(&self) -> &ResponseMeta {
        JsendResponse::meta(self)
    }
}
