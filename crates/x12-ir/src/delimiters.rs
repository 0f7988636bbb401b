//! X12 delimiter configuration
//!
//! The four active delimiters are fixed at interchange creation and must be
//! pairwise distinct, single non-alphanumeric bytes. The repetition
//! separator is absent for interchanges prior to version 00501.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default X12 delimiters used when nothing else is configured.
pub const DEFAULT_ELEMENT_SEPARATOR: u8 = b'*';
pub const DEFAULT_SEGMENT_TERMINATOR: u8 = b'~';
pub const DEFAULT_COMPONENT_SEPARATOR: u8 = b':';
pub const DEFAULT_REPETITION_SEPARATOR: u8 = b'^';

/// Delimiter configuration for one interchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    /// Element separator (default `*`)
    pub element: u8,
    /// Segment terminator (default `~`)
    pub segment: u8,
    /// Component (sub-element) separator (default `:`)
    pub component: u8,
    /// Repetition separator (default `^`); `None` before version 00501
    pub repetition: Option<u8>,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            element: DEFAULT_ELEMENT_SEPARATOR,
            segment: DEFAULT_SEGMENT_TERMINATOR,
            component: DEFAULT_COMPONENT_SEPARATOR,
            repetition: Some(DEFAULT_REPETITION_SEPARATOR),
        }
    }
}

impl Delimiters {
    /// Create a validated delimiter set.
    pub fn new(element: u8, segment: u8, component: u8, repetition: Option<u8>) -> Result<Self> {
        let delims = Self {
            element,
            segment,
            component,
            repetition,
        };
        delims.validate()?;
        Ok(delims)
    }

    /// Check single-byte, non-alphanumeric, pairwise-distinct constraints.
    pub fn validate(&self) -> Result<()> {
        let mut present = vec![
            ("element", self.element),
            ("segment", self.segment),
            ("component", self.component),
        ];
        if let Some(rep) = self.repetition {
            present.push(("repetition", rep));
        }

        for (name, byte) in &present {
            if byte.is_ascii_alphanumeric() {
                return Err(Error::InvalidDelimiters(format!(
                    "{name} delimiter cannot be alphanumeric: {:?}",
                    char::from(*byte)
                )));
            }
        }

        for (i, (name_a, a)) in present.iter().enumerate() {
            for (name_b, b) in &present[i + 1..] {
                if a == b {
                    return Err(Error::InvalidDelimiters(format!(
                        "{name_a} and {name_b} delimiters are both {:?}",
                        char::from(*a)
                    )));
                }
            }
        }

        Ok(())
    }

    /// True if `byte` is one of the active delimiters.
    #[must_use]
    pub fn is_delimiter(&self, byte: u8) -> bool {
        byte == self.element
            || byte == self.segment
            || byte == self.component
            || self.repetition == Some(byte)
    }

    /// True if `value` contains any active delimiter byte.
    #[must_use]
    pub fn collides_with(&self, value: &str) -> bool {
        value.bytes().any(|b| self.is_delimiter(b))
    }
}
