//! # JSend Client Library
//!
//! An HTTP client for APIs speaking the [JSend] convention: every response
//! body is a small JSON envelope whose `status` field is one of `success`,
//! `fail` or `error`. The heart of the crate is the response-parsing
//! pipeline, which classifies raw bytes against JSON Schemas and produces a
//! typed, status-discriminated [`JsendResponse`].
//!
//! ## Features
//!
//! - **Schema-validated parsing**: every body is checked against the JSend
//!   schemas before anything is decoded
//! - **Strict and naked modes**: endpoints that emit bare, non-enveloped
//!   JSON can be consumed through [`NakedContentParser`]
//! - **Typed results**: success payloads materialize into any
//!   `serde::Deserialize` type; fail/error details arrive as [`JsendError`]
//! - **Interception**: ordered hooks around sending, receiving, parsing and
//!   failures
//! - **Pluggable transport**: anything that can produce a status, headers
//!   and a body can replace the built-in reqwest transport
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jsend_client::{JsendClient, JsendClientResult};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     id: u64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> JsendClientResult<()> {
//!     let client = JsendClient::builder().build()?;
//!
//!     let response = client.get::<Order>("http://localhost:8080/orders/1").await?;
//!     match response.error() {
//!         None if response.has_data() => println!("order: {:?}", response.data().unwrap()),
//!         None => println!("success without data"),
//!         Some(error) => println!("server said: {}", error),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Naked endpoints
//!
//! ```rust,no_run
//! # async fn example() -> jsend_client::JsendClientResult<()> {
//! use jsend_client::{ClientConfig, JsendClient};
//! use serde_json::Value;
//!
//! let client = JsendClient::builder()
//!     .with_config(ClientConfig::naked())
//!     .build()?;
//!
//! // A body of {"id":5468} parses as a success carrying that object.
//! let response = client.get::<Value>("http://localhost:8080/raw").await?;
//! # Ok(())
//! # }
//! ```
//!
//! [JSend]: https://github.com/omniti-labs/jsend

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod parser;
pub mod prelude;
pub mod response;
pub mod transport;

// Re-export main types
pub use client::{JsendClient, JsendClientBuilder};
pub use config::{ClientConfig, RetryConfig, TimeoutConfig};
pub use error::{
    DataAccessError, JsendClientError, JsendClientResult, ParseError, TransportError,
};
pub use interceptor::{Interceptor, InterceptorStack};
pub use parser::{DefaultJsendParser, NakedContentParser, ParseMode, ResponseParser};
pub use response::{JsendResponse, ResponseMeta, ResponseView};

// Re-export transport types
pub use transport::{BoxedTransport, HttpTransport, RawResponse, Transport, TransportRequest};

// Re-export protocol types for convenience
pub use jsend_protocol::{Envelope, JsendError, JsendStatus, SchemaError, SchemaKind, SchemaRegistry};
