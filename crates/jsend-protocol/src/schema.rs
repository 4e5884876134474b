//! Lazily compiled JSON Schemas for the three JSend message shapes.
//!
//! The schema definitions ship inside the crate as a single embedded JSON
//! resource. Compilation happens once per registry on first access; every
//! later call is a cache hit, and concurrent first callers share the one
//! in-flight compilation.

use jsonschema::Validator;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

/// Embedded schema definitions, one document holding all four schemas.
const SCHEMA_RESOURCE: &str = include_str!("../schemas/jsend.schema.json");

static GLOBAL: SchemaRegistry = SchemaRegistry::new();

/// Names the four schemas, mostly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// The envelope schema every JSend message must satisfy.
    Base,
    Success,
    Fail,
    Error,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Base => "base",
            SchemaKind::Success => "success",
            SchemaKind::Fail => "fail",
            SchemaKind::Error => "error",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to load or compile the embedded schema resource.
///
/// This is a fatal configuration problem with the build itself, not a
/// per-request condition.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("embedded schema resource is not valid JSON: {0}")]
    Resource(#[from] serde_json::Error),

    #[error("schema resource is missing the \"{0}\" schema")]
    Missing(SchemaKind),

    #[error("the {kind} schema failed to compile: {detail}")]
    Compile { kind: SchemaKind, detail: String },
}

struct CompiledSchemas {
    base: Validator,
    success: Validator,
    fail: Validator,
    error: Validator,
}

impl CompiledSchemas {
    fn compile(resource: &str) -> Result<Self, SchemaError> {
        let document: Value = serde_json::from_str(resource)?;
        Ok(Self {
            base: Self::compile_one(&document, SchemaKind::Base)?,
            success: Self::compile_one(&document, SchemaKind::Success)?,
            fail: Self::compile_one(&document, SchemaKind::Fail)?,
            error: Self::compile_one(&document, SchemaKind::Error)?,
        })
    }

    fn compile_one(document: &Value, kind: SchemaKind) -> Result<Validator, SchemaError> {
        let schema = document
            .get(kind.as_str())
            .ok_or(SchemaError::Missing(kind))?;
        Validator::new(schema).map_err(|e| SchemaError::Compile {
            kind,
            detail: e.to_string(),
        })
    }

    fn validator(&self, kind: SchemaKind) -> &Validator {
        match kind {
            SchemaKind::Base => &self.base,
            SchemaKind::Success => &self.success,
            SchemaKind::Fail => &self.fail,
            SchemaKind::Error => &self.error,
        }
    }
}

/// Owner of the compiled JSend schemas.
///
/// Most callers want [`SchemaRegistry::global`]; fresh instances exist so
/// tests can exercise first-load behavior in isolation.
pub struct SchemaRegistry {
    schemas: OnceCell<CompiledSchemas>,
}

impl SchemaRegistry {
    pub const fn new() -> Self {
        Self {
            schemas: OnceCell::const_new(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL
    }

    /// The compiled validator for `kind`.
    pub async fn validator(&self, kind: SchemaKind) -> Result<&Validator, SchemaError> {
        Ok(self.load().await?.validator(kind))
    }

    /// The envelope schema: `status` is a required string, one of
    /// `"success" | "fail" | "error"`.
    pub async fn base(&self) -> Result<&Validator, SchemaError> {
        self.validator(SchemaKind::Base).await
    }

    /// The success schema: the `data` key must be present, null allowed.
    pub async fn success(&self) -> Result<&Validator, SchemaError> {
        self.validator(SchemaKind::Success).await
    }

    /// The fail schema: the `data` key must be present and non-null.
    pub async fn fail(&self) -> Result<&Validator, SchemaError> {
        self.validator(SchemaKind::Fail).await
    }

    /// The error schema: `message` is a required string, `code` an optional
    /// integer, `data` unconstrained.
    pub async fn error(&self) -> Result<&Validator, SchemaError> {
        self.validator(SchemaKind::Error).await
    }

    async fn load(&self) -> Result<&CompiledSchemas, SchemaError> {
        self.schemas
            .get_or_try_init(|| async {
                debug!("compiling embedded JSend schemas");
                CompiledSchemas::compile(SCHEMA_RESOURCE)
            })
            .await
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
