//! Delimiter discovery
//!
//! The ISA segment is fixed-width: 106 bytes from the `I` of `ISA` through
//! the segment terminator. The element separator is the byte after `ISA`,
//! the terminator is byte 105, the component separator is ISA16, and the
//! repetition separator is ISA11 for version 00501 and later.

use crate::{Error, Result};
use x12_ir::Delimiters;

/// Fixed length of the ISA segment including its terminator.
pub const ISA_LENGTH: usize = 106;

/// First interchange version that defines ISA11 as the repetition separator.
const REPETITION_VERSION: &str = "00501";

/// Whitespace tolerated around segments in line-wrapped EDI.
pub(crate) fn is_edi_whitespace(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n' | b'\t' | b' ')
}

/// Discover the active delimiters from the leading ISA segment.
///
/// # Errors
///
/// Returns [`Error::Delimiter`] when fewer than 106 usable bytes are
/// present, the content does not begin with `ISA`, the ISA segment is not
/// well-formed, or the discovered delimiters are not pairwise distinct.
pub fn detect_delimiters(input: &[u8]) -> Result<Delimiters> {
    let start = input
        .iter()
        .position(|b| !is_edi_whitespace(*b))
        .ok_or_else(|| Error::Delimiter("content is empty".to_string()))?;
    let isa = &input[start..];

    if !isa.starts_with(b"ISA") {
        return Err(Error::Delimiter("content does not begin with ISA".to_string()));
    }
    if isa.len() < ISA_LENGTH {
        return Err(Error::Delimiter(format!(
            "ISA segment too short: expected {ISA_LENGTH} bytes, got {}",
            isa.len()
        )));
    }

    let element = isa[3];
    let segment = isa[ISA_LENGTH - 1];

    // Everything before the terminator splits into ISA plus 16 elements.
    let fields: Vec<&[u8]> = isa[..ISA_LENGTH - 1].split(|b| *b == element).collect();
    if fields.len() != 17 {
        return Err(Error::Delimiter(format!(
            "ISA segment is not well-formed: expected 16 elements, found {}",
            fields.len() - 1
        )));
    }

    let component = *fields[16]
        .first()
        .ok_or_else(|| Error::Delimiter("ISA16 is empty".to_string()))?;

    let version = fields[12];
    let repetition = if version >= REPETITION_VERSION.as_bytes() {
        match fields[11] {
            [byte] if !byte.is_ascii_alphanumeric() => Some(*byte),
            _ => None,
        }
    } else {
        None
    };

    Delimiters::new(element, segment, component, repetition)
        .map_err(|e| Error::Delimiter(e.to_string()))
}
