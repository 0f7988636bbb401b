//! Raw segment tokenization
//!
//! A lazy, finite, non-restartable pull iterator over raw segments. Each raw
//! segment carries the segment id and the raw element fields; repetition and
//! component splitting happens when a raw segment is materialized into the
//! typed tree.

use crate::syntax::is_edi_whitespace;
use crate::{Error, Result};
use x12_ir::{Delimiters, ElementValue, Position, Segment};

/// A tokenized segment before element typing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    /// Segment identifier
    pub id: String,
    /// Raw element fields in order; empties preserved
    pub fields: Vec<String>,
    /// Source position
    pub position: Position,
}

impl RawSegment {
    /// Materialize into a typed segment, applying repetition splitting
    /// before component splitting.
    #[must_use]
    pub fn into_segment(self, delimiters: &Delimiters) -> Segment {
        let values = self
            .fields
            .into_iter()
            .map(|field| split_field(&field, delimiters))
            .collect();
        Segment::new(self.id, values).at(self.position)
    }
}

fn split_component(field: &str, component: u8) -> ElementValue {
    if field.as_bytes().contains(&component) {
        let parts = field
            .split(char::from(component))
            .map(str::to_string)
            .collect();
        ElementValue::Composite(parts)
    } else {
        ElementValue::Atomic(field.to_string())
    }
}

fn split_field(field: &str, delimiters: &Delimiters) -> ElementValue {
    if let Some(repetition) = delimiters.repetition {
        if field.as_bytes().contains(&repetition) {
            let reps = field
                .split(char::from(repetition))
                .map(|rep| split_component(rep, delimiters.component))
                .collect();
            return ElementValue::Repeated(reps);
        }
    }
    split_component(field, delimiters.component)
}

fn valid_segment_id(id: &str) -> bool {
    (2..=3).contains(&id.len())
        && id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && id.as_bytes()[0].is_ascii_uppercase()
}

/// Parse one raw segment body (without its terminator).
pub(crate) fn parse_raw_segment(
    body: &[u8],
    delimiters: &Delimiters,
    offset: usize,
    ordinal: usize,
) -> Result<RawSegment> {
    let text = String::from_utf8_lossy(body);
    let mut parts = text.split(char::from(delimiters.element));
    let id = parts.next().unwrap_or_default().to_string();

    if !valid_segment_id(&id) {
        return Err(Error::Token {
            offset,
            message: format!("malformed segment id {id:?}"),
        });
    }

    Ok(RawSegment {
        id,
        fields: parts.map(str::to_string).collect(),
        position: Position::new(offset, ordinal),
    })
}

/// Lazy tokenizer over an in-memory byte slice
pub struct Tokenizer<'a> {
    input: &'a [u8],
    delimiters: Delimiters,
    pos: usize,
    ordinal: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer with known delimiters.
    #[must_use]
    pub fn new(input: &'a [u8], delimiters: Delimiters) -> Self {
        Self {
            input,
            delimiters,
            pos: 0,
            ordinal: 0,
            failed: false,
        }
    }

    /// The delimiters in use.
    #[must_use]
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    fn skip_whitespace(&mut self) {
        while self
            .input
            .get(self.pos)
            .is_some_and(|b| is_edi_whitespace(*b) && *b != self.delimiters.segment)
        {
            self.pos += 1;
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<RawSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                return None;
            }

            let start = self.pos;
            let end = self.input[start..]
                .iter()
                .position(|b| *b == self.delimiters.segment)
                .map_or(self.input.len(), |i| start + i);

            let body = &self.input[start..end];
            self.pos = (end + 1).min(self.input.len());

            // Tolerate a trailing newline rendered as an empty segment.
            if body.iter().all(|b| is_edi_whitespace(*b)) {
                continue;
            }

            self.ordinal += 1;
            let parsed = parse_raw_segment(body, &self.delimiters, start, self.ordinal);
            if parsed.is_err() {
                self.failed = true;
            }
            return Some(parsed);
        }
    }
}
