#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-schema
//!
//! Declarative transaction schemas for X12 EDI.
//!
//! Schemas are data, not code: an ordered graph of segment and loop nodes
//! with loop triggers, cardinality, and element-level rules. The envelope
//! builder and the validator are driven entirely by lookup; adding a
//! transaction type is a data change.

/// Built-in HIPAA 5010 and supply-chain schemas.
pub mod builtin;
/// JSON schema file loader.
pub mod loader;
/// Schema node model.
pub mod model;
/// Registry keyed by transaction type and version.
pub mod registry;

pub use loader::SchemaLoader;
pub use model::{
    DataType, ElementRule, LoopSchema, LoopTrigger, SchemaNode, SegmentSchema, TransactionSchema,
};
pub use registry::SchemaRegistry;

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("schema not found: {0}")]
    NotFound(String),

    #[error("invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Crate-local result type for schema operations.
pub type Result<T> = std::result::Result<T, Error>;
