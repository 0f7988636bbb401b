#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-codec
//!
//! Syntactic pipeline for X12 EDI: delimiter discovery from the ISA header,
//! lazy tokenization into raw segments, schema-driven envelope and loop
//! assembly, byte-exact generation, and a bounded-memory streaming surface.
//!
//! The pipeline is a pull chain. The tokenizer reads on demand and never
//! buffers more than one pending segment; the builder pulls from the
//! tokenizer; generation walks an already-constructed tree.

/// Envelope and loop assembly.
pub mod builder;
/// Serialization of interchange trees back to bytes.
pub mod serializer;
/// Bounded-memory, per-transaction streaming surface.
pub mod streaming;
/// Delimiter discovery from the ISA segment.
pub mod syntax;
/// Raw segment tokenization.
pub mod tokenizer;

pub use builder::{InterchangeBuilder, ParseOutput, ParseWarning, WarningKind};
pub use serializer::Generator;
pub use streaming::{CrossChecks, EnvelopeSummary, TransactionStream};
pub use syntax::detect_delimiters;
pub use tokenizer::{RawSegment, Tokenizer};

use thiserror::Error;

/// Errors from the syntactic pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Delimiters could not be discovered or validated
    #[error("delimiter error: {0}")]
    Delimiter(String),

    /// Grammar violation below the segment level
    #[error("token error at offset {offset}: {message}")]
    Token { offset: usize, message: String },

    /// Envelope framing broken; every violation is listed
    #[error("structure error: {}", .violations.join("; "))]
    Structure { violations: Vec<String> },

    /// The tree cannot be serialized
    #[error("generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a structure error from collected envelope violations.
    #[must_use]
    pub fn structure(violations: Vec<String>) -> Self {
        Self::Structure { violations }
    }
}

/// Crate-local result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
