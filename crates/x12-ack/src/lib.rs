#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # x12-ack
//!
//! Functional (997) and implementation (999) acknowledgment synthesis.
//!
//! Given an inbound interchange and its validation report, the builder
//! derives accept/reject outcomes per transaction and functional group,
//! then assembles a complete outbound acknowledgment interchange whose
//! AK1/AK2 segments echo the inbound control numbers.

/// Acknowledgment assembly from interchange + report.
pub mod builder;
/// Acknowledgment outcome model.
pub mod model;

pub use builder::AckBuilder;
pub use model::{
    AckKind, ElementNote, GroupAck, GroupAckCode, SegmentError, TransactionAck, TransactionAckCode,
};

use thiserror::Error;

/// Errors from acknowledgment synthesis
#[derive(Error, Debug)]
pub enum Error {
    #[error("acknowledgment error: {0}")]
    Synthesis(String),
}

/// Crate-local result type for acknowledgment operations.
pub type Result<T> = std::result::Result<T, Error>;
