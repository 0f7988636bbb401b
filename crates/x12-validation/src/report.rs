//! Findings and the ordered validation report

use serde::{Deserialize, Serialize};

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Category of the rule that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleCategory {
    /// Envelope or loop structure
    Structure,
    /// Segment ordering or cardinality against the schema
    Schema,
    /// Element-level type, length, or presence
    Element,
    /// Code-set membership
    CodeSet,
    /// Cross-field or profile-specific rule
    Semantic,
}

/// Path from the interchange down to (optionally) a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Functional group index within the interchange
    pub group: Option<usize>,
    /// Transaction index within the group
    pub transaction: Option<usize>,
    /// Slash-separated loop path (e.g. "2000B/2300")
    pub loop_path: Option<String>,
    /// Segment id at the location
    pub segment_id: Option<String>,
    /// Segment position within the transaction, ST = 1
    pub segment_position: Option<usize>,
    /// 1-based element position
    pub element: Option<usize>,
    /// 1-based component position within a composite
    pub component: Option<usize>,
}

impl Location {
    /// Location at a transaction.
    #[must_use]
    pub fn transaction(group: usize, transaction: usize) -> Self {
        Self {
            group: Some(group),
            transaction: Some(transaction),
            ..Self::default()
        }
    }

    /// Narrow to a loop path.
    #[must_use]
    pub fn in_loop(mut self, path: impl Into<String>) -> Self {
        self.loop_path = Some(path.into());
        self
    }

    /// Narrow to a segment.
    #[must_use]
    pub fn at_segment(mut self, id: impl Into<String>, position: usize) -> Self {
        self.segment_id = Some(id.into());
        self.segment_position = Some(position);
        self
    }

    /// Narrow to an element position.
    #[must_use]
    pub fn at_element(mut self, element: usize) -> Self {
        self.element = Some(element);
        self
    }

    /// Narrow to a component position.
    #[must_use]
    pub fn at_component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }

    /// Sort key for first-occurrence ordering.
    #[must_use]
    pub fn sort_key(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.group.unwrap_or(0),
            self.transaction.unwrap_or(0),
            self.segment_position.unwrap_or(0),
            self.element.unwrap_or(0),
            self.component.unwrap_or(0),
        )
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(g) = self.group {
            parts.push(format!("group[{g}]"));
        }
        if let Some(t) = self.transaction {
            parts.push(format!("txn[{t}]"));
        }
        if let Some(ref path) = self.loop_path {
            parts.push(path.clone());
        }
        if let Some(ref id) = self.segment_id {
            match self.segment_position {
                Some(pos) => parts.push(format!("{id}[{pos}]")),
                None => parts.push(id.clone()),
            }
        }
        if let Some(e) = self.element {
            parts.push(format!("e{e}"));
        }
        if let Some(c) = self.component {
            parts.push(format!("c{c}"));
        }
        write!(f, "{}", parts.join("/"))
    }
}

/// A single validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Error, warning, or info
    pub severity: Severity,
    /// Stable rule code (e.g. "INVALID_NPI")
    pub code: String,
    /// Rule category
    pub category: RuleCategory,
    /// Human-readable description
    pub message: String,
    /// Where the finding applies
    pub location: Location,
    /// The offending value, when one exists
    pub actual: Option<String>,
}

impl Finding {
    /// Create a finding.
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        category: RuleCategory,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            category,
            message: message.into(),
            location,
            actual: None,
        }
    }

    /// Attach the offending value.
    #[must_use]
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

/// Write-once, ordered collection of findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings in first-occurrence order
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding.
    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// True when the report contains no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// All error findings.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    /// All warning findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Warning)
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// True if any error finding is outside the semantic category, i.e. the
    /// document is structurally unusable.
    #[must_use]
    pub fn has_structural_errors(&self) -> bool {
        self.errors()
            .any(|f| !matches!(f.category, RuleCategory::Semantic | RuleCategory::CodeSet))
    }

    /// Findings for one transaction.
    pub fn for_transaction(&self, group: usize, transaction: usize) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| {
            f.location.group == Some(group) && f.location.transaction == Some(transaction)
        })
    }

    /// Merge another report, keeping this report's findings first.
    pub fn merge(&mut self, other: ValidationReport) {
        self.findings.extend(other.findings);
    }

    /// Stable-sort findings by location so the order is first-occurrence and
    /// deterministic run to run.
    pub fn sort_by_location(&mut self) {
        self.findings.sort_by_key(|f| f.location.sort_key());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity, code: &str, location: Location) -> Finding {
        Finding::new(severity, code, RuleCategory::Element, code.to_lowercase(), location)
    }

    #[test]
    fn test_report_validity() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.add(finding(Severity::Warning, "W1", Location::default()));
        assert!(report.is_valid());
        assert_eq!(report.warning_count(), 1);

        report.add(finding(Severity::Error, "E1", Location::default()));
        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_sort_by_location_is_stable() {
        let mut report = ValidationReport::new();
        report.add(finding(
            Severity::Error,
            "LATER",
            Location::transaction(0, 1).at_segment("NM1", 4),
        ));
        report.add(finding(
            Severity::Error,
            "EARLIER",
            Location::transaction(0, 0).at_segment("CLM", 2),
        ));
        report.add(finding(
            Severity::Warning,
            "SAME_SPOT",
            Location::transaction(0, 0).at_segment("CLM", 2),
        ));

        report.sort_by_location();
        let codes: Vec<&str> = report.findings.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["EARLIER", "SAME_SPOT", "LATER"]);
    }

    #[test]
    fn test_location_display() {
        let loc = Location::transaction(0, 2)
            .in_loop("2000B/2300")
            .at_segment("NM1", 7)
            .at_element(9);
        assert_eq!(loc.to_string(), "group[0]/txn[2]/2000B/2300/NM1[7]/e9");
    }

    #[test]
    fn test_structural_error_detection() {
        let mut report = ValidationReport::new();
        report.add(Finding::new(
            Severity::Error,
            "INVALID_NPI",
            RuleCategory::Semantic,
            "bad npi",
            Location::default(),
        ));
        assert!(!report.has_structural_errors());

        report.add(Finding::new(
            Severity::Error,
            "MISSING_SEGMENT",
            RuleCategory::Schema,
            "missing",
            Location::default(),
        ));
        assert!(report.has_structural_errors());
    }
}
