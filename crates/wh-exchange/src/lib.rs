//! wh-exchange: the JSON exchange format read and written by the harness editor.
//!
//! A document has two sections, `bom` (designator → part) and `data`
//! (connections, canvas positions, notes, labels). Export walks a [`Harness`];
//! import rebuilds one through the same checked operations a caller would use.

pub mod export;
pub mod import;
pub mod migrate;
pub mod number;
pub mod schema;

pub use export::{to_document, to_value};
pub use import::from_document;
pub use migrate::migrate_legacy_endpoints;
pub use number::Real;
pub use schema::*;

use serde_json::Value;
use thiserror::Error;
use wh_core::ConnectionKey;
use wh_graph::{Finding, GraphError, Harness};

pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema error at {path}: {message}")]
    Schema { path: String, message: String },

    #[error("Invalid harness at {path}: {source}")]
    Model { path: String, source: GraphError },

    #[error("Cable core {0} has only one end connected")]
    IncompleteCoreConnection(ConnectionKey),

    #[error("Harness has {} validation error(s)", .errors.len())]
    Invalid { errors: Vec<Finding> },
}

/// Output formatting for [`to_json_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    pub pretty: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Harness → typed document. Does not validate.
pub fn serialize(harness: &Harness) -> ExchangeResult<ExchangeDocument> {
    to_document(harness)
}

/// Typed document → harness.
pub fn deserialize(document: ExchangeDocument) -> ExchangeResult<Harness> {
    from_document(document)
}

/// Decode a JSON value, accepting legacy endpoint shapes.
pub fn from_value(mut value: Value) -> ExchangeResult<Harness> {
    let rewritten = migrate_legacy_endpoints(&mut value);
    if rewritten > 0 {
        tracing::warn!(rewritten, "document used legacy endpoint shapes");
    }
    let document: ExchangeDocument = import::decode(value, "")?;
    from_document(document)
}

pub fn from_json_str(json: &str) -> ExchangeResult<Harness> {
    let value: Value = serde_json::from_str(json)?;
    from_value(value)
}

/// Validate, then write. Errors in the report refuse the write; warnings don't.
pub fn to_json_string(harness: &Harness, options: &SerializeOptions) -> ExchangeResult<String> {
    let report = harness.validate();
    if !report.is_valid() {
        return Err(ExchangeError::Invalid {
            errors: report.errors().cloned().collect(),
        });
    }
    let document = to_document(harness)?;
    let json = if options.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}
