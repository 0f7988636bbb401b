//! Schema model definitions
//!
//! A transaction schema is an ordered graph of nodes; each node is either a
//! segment or a loop. Loop nodes carry a trigger (segment id plus optional
//! qualifier constraint) that the builder uses to open them.

use serde::{Deserialize, Serialize};
use x12_ir::Segment;

/// X12 element data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Identifier code (code-set constrained)
    Id,
    /// Alphanumeric string
    Alphanumeric,
    /// Date, CCYYMMDD
    Date,
    /// Time, HHMM or HHMMSS
    Time,
    /// Whole number
    Integer,
    /// Decimal number
    Decimal,
}

/// Validation rule for one element position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRule {
    /// 1-based element position
    pub position: usize,
    /// Human-readable element name
    pub name: String,
    /// Data type constraint
    pub data_type: DataType,
    /// Minimum length when present
    pub min_length: usize,
    /// Maximum length
    pub max_length: usize,
    /// Whether the element is mandatory
    pub required: bool,
    /// Optional code-set reference resolved by the validator
    pub code_set: Option<String>,
}

impl ElementRule {
    /// Create an alphanumeric rule with the given position and name.
    pub fn new(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            data_type: DataType::Alphanumeric,
            min_length: 1,
            max_length: 80,
            required: false,
            code_set: None,
        }
    }

    /// Set the data type.
    #[must_use]
    pub fn typed(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Set min/max length.
    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Mark the element mandatory.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Reference a code set by name.
    #[must_use]
    pub fn codes(mut self, code_set: impl Into<String>) -> Self {
        self.code_set = Some(code_set.into());
        self
    }
}

/// Definition of a segment within its parent context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSchema {
    /// Segment identifier
    pub id: String,
    /// Human-readable segment name
    pub name: String,
    /// Minimum occurrences (0 = optional)
    pub min_occurs: usize,
    /// Maximum occurrences, `None` = unbounded
    pub max_occurs: Option<usize>,
    /// Element-level rules, sparse by position
    pub elements: Vec<ElementRule>,
}

impl SegmentSchema {
    /// Create an optional, single-occurrence segment definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_occurs: 0,
            max_occurs: Some(1),
            elements: Vec::new(),
        }
    }

    /// Mark the segment mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.min_occurs = 1;
        self
    }

    /// Set maximum occurrences (`None` for unbounded).
    #[must_use]
    pub fn repeats(mut self, max: Option<usize>) -> Self {
        self.max_occurs = max;
        self
    }

    /// Attach element rules.
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<ElementRule>) -> Self {
        self.elements = elements;
        self
    }

    /// Rule for a 1-based element position, if defined.
    #[must_use]
    pub fn element_rule(&self, position: usize) -> Option<&ElementRule> {
        self.elements.iter().find(|e| e.position == position)
    }
}

/// Trigger that opens a loop: segment id plus optional qualifier constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopTrigger {
    /// Segment id that can open the loop
    pub segment_id: String,
    /// 1-based element position of the qualifier, if any
    pub qualifier_position: Option<usize>,
    /// Allowed qualifier values; empty means any
    pub qualifier_values: Vec<String>,
}

impl LoopTrigger {
    /// Trigger on segment id alone.
    pub fn on(segment_id: impl Into<String>) -> Self {
        Self {
            segment_id: segment_id.into(),
            qualifier_position: None,
            qualifier_values: Vec::new(),
        }
    }

    /// Constrain the trigger to qualifier values at an element position.
    #[must_use]
    pub fn qualified<S: Into<String>>(mut self, position: usize, values: Vec<S>) -> Self {
        self.qualifier_position = Some(position);
        self.qualifier_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// True if this trigger is constrained by a qualifier.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.qualifier_position.is_some()
    }

    /// Whether the segment satisfies this trigger.
    #[must_use]
    pub fn matches(&self, segment: &Segment) -> bool {
        if segment.id != self.segment_id {
            return false;
        }
        match self.qualifier_position {
            None => true,
            Some(position) => {
                let value = segment.first_value(position);
                self.qualifier_values.iter().any(|v| v == value)
            }
        }
    }
}

/// Definition of a loop and its children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopSchema {
    /// Loop identifier (e.g. "2000A")
    pub id: String,
    /// Human-readable loop name
    pub name: String,
    /// Trigger that opens the loop
    pub trigger: LoopTrigger,
    /// Minimum occurrences
    pub min_occurs: usize,
    /// Maximum occurrences, `None` = unbounded
    pub max_occurs: Option<usize>,
    /// Child nodes in document order
    pub children: Vec<SchemaNode>,
}

impl LoopSchema {
    /// Create an optional, unbounded loop.
    pub fn new(id: impl Into<String>, name: impl Into<String>, trigger: LoopTrigger) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger,
            min_occurs: 0,
            max_occurs: None,
            children: Vec::new(),
        }
    }

    /// Mark the loop mandatory.
    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.min_occurs = 1;
        self
    }

    /// Attach child nodes.
    #[must_use]
    pub fn with_children(mut self, children: Vec<SchemaNode>) -> Self {
        self.children = children;
        self
    }

    /// Child loop schemas, in order.
    pub fn child_loops(&self) -> impl Iterator<Item = &LoopSchema> {
        self.children.iter().filter_map(|n| match n {
            SchemaNode::Loop(l) => Some(l),
            SchemaNode::Segment(_) => None,
        })
    }

    /// True if a segment id is admissible directly in this loop.
    #[must_use]
    pub fn accepts_segment(&self, segment_id: &str) -> bool {
        self.children.iter().any(|n| match n {
            SchemaNode::Segment(s) => s.id == segment_id,
            SchemaNode::Loop(_) => false,
        })
    }
}

/// A node in the schema graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SchemaNode {
    /// A segment definition
    Segment(SegmentSchema),
    /// A nested loop definition
    Loop(LoopSchema),
}

/// Complete schema for one transaction type and version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSchema {
    /// Transaction set identifier (e.g. "837")
    pub transaction_set_id: String,
    /// Implementation guide version (e.g. "005010X222A1")
    pub version: String,
    /// Human-readable transaction name
    pub name: String,
    /// Functional group identifier code expected in GS01
    pub functional_id_code: String,
    /// Top-level nodes in document order
    pub nodes: Vec<SchemaNode>,
    /// Flat schemas skip loop assembly (envelope checks only)
    pub flat: bool,
}

impl TransactionSchema {
    /// Create an empty structured schema.
    pub fn new(
        transaction_set_id: impl Into<String>,
        version: impl Into<String>,
        name: impl Into<String>,
        functional_id_code: impl Into<String>,
    ) -> Self {
        Self {
            transaction_set_id: transaction_set_id.into(),
            version: version.into(),
            name: name.into(),
            functional_id_code: functional_id_code.into(),
            nodes: Vec::new(),
            flat: false,
        }
    }

    /// Create the fallback schema for an unknown transaction type: no loop
    /// nesting, envelope-level checks only.
    pub fn flat(transaction_set_id: impl Into<String>, version: impl Into<String>) -> Self {
        let transaction_set_id = transaction_set_id.into();
        Self {
            name: format!("Unknown transaction {transaction_set_id}"),
            transaction_set_id,
            version: version.into(),
            functional_id_code: String::new(),
            nodes: Vec::new(),
            flat: true,
        }
    }

    /// Attach top-level nodes.
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<SchemaNode>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Registry key: `"<id>:<version>"`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.transaction_set_id, self.version)
    }

    /// Find a segment definition anywhere in the graph by segment id.
    ///
    /// Used for element-level validation, where the first definition wins;
    /// positional context is the builder's concern.
    #[must_use]
    pub fn find_segment(&self, segment_id: &str) -> Option<&SegmentSchema> {
        fn search<'a>(nodes: &'a [SchemaNode], id: &str) -> Option<&'a SegmentSchema> {
            for node in nodes {
                match node {
                    SchemaNode::Segment(s) if s.id == id => return Some(s),
                    SchemaNode::Segment(_) => {}
                    SchemaNode::Loop(l) => {
                        if let Some(found) = search(&l.children, id) {
                            return Some(found);
                        }
                    }
                }
            }
            None
        }
        search(&self.nodes, segment_id)
    }

    /// Find a loop schema anywhere in the graph by loop id.
    #[must_use]
    pub fn find_loop(&self, loop_id: &str) -> Option<&LoopSchema> {
        fn search<'a>(nodes: &'a [SchemaNode], id: &str) -> Option<&'a LoopSchema> {
            for node in nodes {
                if let SchemaNode::Loop(l) = node {
                    if l.id == id {
                        return Some(l);
                    }
                    if let Some(found) = search(&l.children, id) {
                        return Some(found);
                    }
                }
            }
            None
        }
        search(&self.nodes, loop_id)
    }

    /// Top-level loop schemas, in order.
    pub fn top_loops(&self) -> impl Iterator<Item = &LoopSchema> {
        self.nodes.iter().filter_map(|n| match n {
            SchemaNode::Loop(l) => Some(l),
            SchemaNode::Segment(_) => None,
        })
    }

    /// True if a segment id is admissible at the transaction's top level.
    #[must_use]
    pub fn accepts_segment(&self, segment_id: &str) -> bool {
        self.nodes.iter().any(|n| match n {
            SchemaNode::Segment(s) => s.id == segment_id,
            SchemaNode::Loop(_) => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_ir::Segment;

    #[test]
    fn test_trigger_on_id_alone() {
        let trigger = LoopTrigger::on("CLM");
        assert!(trigger.matches(&Segment::from_values("CLM", vec!["A1", "100"])));
        assert!(!trigger.matches(&Segment::from_values("CLP", vec!["A1"])));
    }

    #[test]
    fn test_trigger_qualifier_constraint() {
        let trigger = LoopTrigger::on("HL").qualified(3, vec!["20"]);
        assert!(trigger.matches(&Segment::from_values("HL", vec!["1", "", "20", "1"])));
        assert!(!trigger.matches(&Segment::from_values("HL", vec!["2", "1", "22", "0"])));
    }

    #[test]
    fn test_trigger_qualifier_on_missing_element() {
        let trigger = LoopTrigger::on("NM1").qualified(1, vec!["85"]);
        assert!(!trigger.matches(&Segment::from_values("NM1", Vec::<String>::new())));
    }

    #[test]
    fn test_find_segment_descends_loops() {
        let schema = TransactionSchema::new("837", "005010X222A1", "Claim", "HC").with_nodes(vec![
            SchemaNode::Segment(SegmentSchema::new("BHT", "Beginning").mandatory()),
            SchemaNode::Loop(
                LoopSchema::new("2300", "Claim", LoopTrigger::on("CLM")).with_children(vec![
                    SchemaNode::Segment(SegmentSchema::new("CLM", "Claim").mandatory()),
                ]),
            ),
        ]);

        assert!(schema.find_segment("CLM").is_some());
        assert!(schema.find_segment("SV1").is_none());
        assert_eq!(schema.find_loop("2300").unwrap().name, "Claim");
        assert!(schema.accepts_segment("BHT"));
        assert!(!schema.accepts_segment("CLM"));
    }

    #[test]
    fn test_flat_schema() {
        let schema = TransactionSchema::flat("999", "005010");
        assert!(schema.flat);
        assert_eq!(schema.qualified_name(), "999:005010");
    }
}
