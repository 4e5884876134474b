//! # JSend Protocol
//!
//! Wire-format types and JSON Schemas for the [JSend] convention: a small
//! JSON envelope for HTTP API responses with exactly three shapes, selected
//! by a `status` field.
//!
//! This crate is transport-agnostic. It provides:
//! - [`JsendStatus`] and [`JsendError`] — the status discriminant and the
//!   failure-detail value shared with the client crate
//! - [`Envelope`] — typed server-side builders for the three wire shapes
//! - [`SchemaRegistry`] — the lazily compiled JSON Schemas the response
//!   parser validates against
//!
//! The client side (transports, parsing, interception) lives in
//! `jsend-client`.
//!
//! [JSend]: https://github.com/omniti-labs/jsend

pub mod envelope;
pub mod error;
pub mod schema;
pub mod status;

// Re-export main types
pub use envelope::Envelope;
pub use error::JsendError;
pub use schema::{SchemaError, SchemaKind, SchemaRegistry};
pub use status::JsendStatus;
