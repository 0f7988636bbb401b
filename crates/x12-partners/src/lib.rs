#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-partners
//!
//! Trading partner configuration: per-partner delimiters, validation
//! profile selection, and acknowledgment expectations. The processing core
//! consumes the registry read-only.

/// Partner configuration types.
pub mod config;
/// In-memory partner registry.
pub mod registry;

pub use config::{ContactInfo, TradingPartner};
pub use registry::PartnerRegistry;

use thiserror::Error;

/// Errors from partner configuration handling
#[derive(Error, Debug)]
pub enum Error {
    #[error("partner not found: {0}")]
    NotFound(String),

    #[error("invalid partner configuration: {}", .problems.join("; "))]
    Invalid { problems: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Crate-local result type for partner operations.
pub type Result<T> = std::result::Result<T, Error>;
