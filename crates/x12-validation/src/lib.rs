#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-validation
//!
//! Schema-driven and semantic validation for X12 EDI trees.
//!
//! Validation runs three short-circuit-free passes: structural (cardinality
//! and ordering against the schema), element-level (data type, length, code
//! sets), and semantic/cross-field (HIPAA checks such as NPI Luhn and claim
//! balancing when the profile activates them). All findings accumulate into
//! an ordered report keyed to tree locations.

/// Code-set registry with built-in X12 tables.
pub mod codesets;
/// Three-pass validation engine.
pub mod engine;
/// Format validators: NPI, tax id, ICD-10, CPT/HCPCS, date, time.
pub mod primitives;
/// Validation profiles and strictness.
pub mod profile;
/// Findings, locations, and the ordered report.
pub mod report;

pub use codesets::{CodeRegistry, CodeSet};
pub use engine::Validator;
pub use profile::{StrictnessLevel, ValidationProfile};
pub use report::{Finding, Location, RuleCategory, Severity, ValidationReport};

use thiserror::Error;

/// Errors from the validation layer itself (not findings)
#[derive(Error, Debug)]
pub enum Error {
    /// Strict mode rejected a report containing errors
    #[error("validation failed with {error_count} error(s); first: {first}")]
    Rejected { error_count: usize, first: String },
}

/// Crate-local result type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;
