#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-ir
//!
//! Typed document tree for X12 EDI interchanges.
//!
//! This crate models the envelope hierarchy (Interchange → FunctionalGroup →
//! TransactionSet → Loop → Segment → element) together with the delimiter
//! configuration that governs how a document is tokenized and serialized.
//! Everything here is plain data: parsing lives in `x12-codec`, rules in
//! `x12-schema` and `x12-validation`.

/// Delimiter configuration and validation.
pub mod delimiters;
/// Element value model (atomic, composite, repeated) and typed accessors.
pub mod element;
/// Envelope types: Interchange, FunctionalGroup, TransactionSet.
pub mod envelope;
/// Loop nodes forming the interior of a transaction tree.
pub mod loops;
/// Segments and source positions.
pub mod segment;

pub use delimiters::Delimiters;
pub use element::{Element, ElementValue};
pub use envelope::{FunctionalGroup, Interchange, TransactionSet};
pub use loops::Loop;
pub use segment::{Position, Segment};

use thiserror::Error;

/// Errors that can occur when constructing or navigating the IR
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid delimiter configuration: {0}")]
    InvalidDelimiters(String),

    #[error("loop not found at path: {path}")]
    LoopNotFound { path: String },

    #[error("element {index} out of range for segment {segment_id}")]
    ElementOutOfRange { segment_id: String, index: usize },
}

/// Crate-local result type for IR operations.
pub type Result<T> = std::result::Result<T, Error>;
