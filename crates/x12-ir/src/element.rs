//! Element values within a segment
//!
//! An element is either atomic, composite (component-separated), or repeated
//! (repetition-separated, each repetition itself atomic or composite). The
//! variant is determined by which separators appeared in the raw field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Value of a single element position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementValue {
    /// A plain string value
    Atomic(String),
    /// Component-separated sub-values, empties preserved
    Composite(Vec<String>),
    /// Repetition-separated occurrences
    Repeated(Vec<ElementValue>),
}

impl ElementValue {
    /// Flattened string form: components joined with `:`, repetitions with `^`.
    ///
    /// This is a diagnostic view; serialization uses the interchange's actual
    /// delimiters.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            ElementValue::Atomic(v) => v.clone(),
            ElementValue::Composite(parts) => parts.join(":"),
            ElementValue::Repeated(reps) => reps
                .iter()
                .map(ElementValue::as_str)
                .collect::<Vec<_>>()
                .join("^"),
        }
    }

    /// First atomic value: the value itself, the first component, or the
    /// first repetition's first value.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            ElementValue::Atomic(v) => v,
            ElementValue::Composite(parts) => parts.first().map_or("", String::as_str),
            ElementValue::Repeated(reps) => reps.first().map_or("", |r| match r {
                ElementValue::Atomic(v) => v,
                ElementValue::Composite(parts) => parts.first().map_or("", String::as_str),
                ElementValue::Repeated(_) => "",
            }),
        }
    }

    /// Component by 1-based index; `None` for atomic values past index 1.
    #[must_use]
    pub fn component(&self, index: usize) -> Option<&str> {
        match self {
            ElementValue::Atomic(v) => (index == 1).then_some(v.as_str()),
            ElementValue::Composite(parts) => {
                index.checked_sub(1).and_then(|i| parts.get(i)).map(String::as_str)
            }
            ElementValue::Repeated(reps) => reps.first().and_then(|r| r.component(index)),
        }
    }

    /// True when every contained value is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ElementValue::Atomic(v) => v.is_empty(),
            ElementValue::Composite(parts) => parts.iter().all(String::is_empty),
            ElementValue::Repeated(reps) => reps.iter().all(ElementValue::is_empty),
        }
    }
}

/// An element with its 1-based position inside a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// 1-based position within the segment
    pub index: usize,
    /// The element's value
    pub value: ElementValue,
}

impl Element {
    /// Create an atomic element.
    pub fn atomic(index: usize, value: impl Into<String>) -> Self {
        Self {
            index,
            value: ElementValue::Atomic(value.into()),
        }
    }

    /// Create a composite element from component strings.
    pub fn composite(index: usize, components: Vec<String>) -> Self {
        Self {
            index,
            value: ElementValue::Composite(components),
        }
    }

    /// Flattened string form of the value.
    #[must_use]
    pub fn as_str(&self) -> String {
        self.value.as_str()
    }

    /// Parse the first atomic value as an integer, `0` if empty or invalid.
    #[must_use]
    pub fn as_int(&self) -> i64 {
        self.value.first().parse().unwrap_or(0)
    }

    /// Parse the first atomic value as a float, `0.0` if empty or invalid.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        self.value.first().parse().unwrap_or(0.0)
    }

    /// Parse the first atomic value as a date.
    ///
    /// Accepts CCYYMMDD and YYMMDD; two-digit years below 50 map to the
    /// 2000s, the rest to the 1900s.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        let raw = self.value.first();
        match raw.len() {
            8 => NaiveDate::parse_from_str(raw, "%Y%m%d").ok(),
            6 => {
                let yy: i32 = raw.get(0..2)?.parse().ok()?;
                let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
                let month: u32 = raw.get(2..4)?.parse().ok()?;
                let day: u32 = raw.get(4..6)?.parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_accessors() {
        let e = Element::atomic(2, "123");
        assert_eq!(e.as_str(), "123");
        assert_eq!(e.as_int(), 123);
        assert_eq!(e.value.component(1), Some("123"));
        assert_eq!(e.value.component(2), None);
    }

    #[test]
    fn test_composite_components() {
        let e = Element::composite(5, vec!["11".into(), "B".into(), "1".into()]);
        assert_eq!(e.value.component(1), Some("11"));
        assert_eq!(e.value.component(3), Some("1"));
        assert_eq!(e.as_str(), "11:B:1");
    }

    #[test]
    fn test_composite_preserves_empty_components() {
        let e = Element::composite(1, vec!["HC".into(), String::new(), "99213".into()]);
        assert_eq!(e.value.component(2), Some(""));
        assert!(!e.value.is_empty());
    }

    #[test]
    fn test_repeated_first() {
        let v = ElementValue::Repeated(vec![
            ElementValue::Atomic("A1".into()),
            ElementValue::Atomic("B2".into()),
        ]);
        assert_eq!(v.first(), "A1");
        assert_eq!(v.as_str(), "A1^B2");
    }

    #[test]
    fn test_as_date_ccyymmdd() {
        let e = Element::atomic(3, "20240229");
        assert_eq!(e.as_date(), NaiveDate::from_ymd_opt(2024, 2, 29));

        let bad = Element::atomic(3, "20230229");
        assert_eq!(bad.as_date(), None);
    }

    #[test]
    fn test_as_date_century_pivot() {
        let modern = Element::atomic(1, "240115");
        assert_eq!(modern.as_date(), NaiveDate::from_ymd_opt(2024, 1, 15));

        let legacy = Element::atomic(1, "991231");
        assert_eq!(legacy.as_date(), NaiveDate::from_ymd_opt(1999, 12, 31));
    }

    #[test]
    fn test_as_int_invalid_is_zero() {
        assert_eq!(Element::atomic(1, "").as_int(), 0);
        assert_eq!(Element::atomic(1, "abc").as_int(), 0);
    }
}
