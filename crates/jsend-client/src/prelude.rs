//! Convenient imports for common JSend client usage
//!
//! ```rust
//! use jsend_client::prelude::*;
//! ```

pub use crate::client::{JsendClient, JsendClientBuilder};
pub use crate::config::ClientConfig;
pub use crate::error::{DataAccessError, JsendClientError, JsendClientResult, ParseError};
pub use crate::interceptor::Interceptor;
pub use crate::parser::{ParseMode, ResponseParser};
pub use crate::response::{JsendResponse, ResponseView};
pub use crate::transport::{HttpTransport, RawResponse, Transport, TransportRequest};

pub use jsend_protocol::{Envelope, JsendError, JsendStatus};
