//! Segments and source positions

use crate::element::{Element, ElementValue};
use serde::{Deserialize, Serialize};

/// Source position carried for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the interchange
    pub offset: usize,
    /// Ordinal index of the segment within the interchange (1-based)
    pub ordinal: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(offset: usize, ordinal: usize) -> Self {
        Self { offset, ordinal }
    }
}

/// An X12 segment: id plus ordered elements, immutable once parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Segment identifier (2-3 uppercase alphanumeric)
    pub id: String,
    /// Elements indexed from 1; trailing empties preserved until serialization
    pub elements: Vec<Element>,
    /// Source position for diagnostics; ignored by equality
    pub position: Position,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.elements == other.elements
    }
}

impl Eq for Segment {}

impl Segment {
    /// Create a segment from element values in positional order.
    pub fn new(id: impl Into<String>, values: Vec<ElementValue>) -> Self {
        let elements = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Element { index: i + 1, value })
            .collect();
        Self {
            id: id.into(),
            elements,
            position: Position::default(),
        }
    }

    /// Build a segment from atomic string values, the common case in tests
    /// and acknowledgment assembly.
    pub fn from_values<S: Into<String>>(id: impl Into<String>, values: Vec<S>) -> Self {
        Self::new(
            id,
            values
                .into_iter()
                .map(|v| ElementValue::Atomic(v.into()))
                .collect(),
        )
    }

    /// Attach a source position.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Element by 1-based index, `None` when out of range.
    #[must_use]
    pub fn element(&self, index: usize) -> Option<&Element> {
        index.checked_sub(1).and_then(|i| self.elements.get(i))
    }

    /// Flattened string value of an element, `""` when absent.
    #[must_use]
    pub fn value(&self, index: usize) -> String {
        self.element(index).map(Element::as_str).unwrap_or_default()
    }

    /// First atomic value of an element, `""` when absent.
    #[must_use]
    pub fn first_value(&self, index: usize) -> &str {
        self.element(index).map_or("", |e| e.value.first())
    }

    /// Highest element index with a non-empty value, 0 if all empty.
    #[must_use]
    pub fn last_populated_index(&self) -> usize {
        self.elements
            .iter()
            .rev()
            .find(|e| !e.value.is_empty())
            .map_or(0, |e| e.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based_access() {
        let seg = Segment::from_values("NM1", vec!["85", "2", "CLINIC"]);
        assert_eq!(seg.value(1), "85");
        assert_eq!(seg.value(3), "CLINIC");
        assert!(seg.element(0).is_none());
        assert!(seg.element(4).is_none());
    }

    #[test]
    fn test_element_indices_are_dense() {
        let seg = Segment::from_values("REF", vec!["EI", "", "X"]);
        let indices: Vec<usize> = seg.elements.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_last_populated_index_skips_trailing_empties() {
        let seg = Segment::from_values("DTP", vec!["472", "D8", "20240105", "", ""]);
        assert_eq!(seg.last_populated_index(), 3);

        let empty = Segment::from_values("LE", Vec::<String>::new());
        assert_eq!(empty.last_populated_index(), 0);
    }
}
