//! Acknowledgment assembly
//!
//! Policy: errors in the structure or schema categories reject the
//! transaction; semantic-only errors mark it accepted-with-errors unless
//! the caller declares semantics fatal; a clean report accepts it. Group
//! codes roll up from their transactions. Control numbers in the
//! acknowledgment always reference the inbound group and transaction
//! control numbers.

use crate::model::{
    AckKind, ElementNote, GroupAck, GroupAckCode, SegmentError, TransactionAck, TransactionAckCode,
};
use x12_ir::{ElementValue, FunctionalGroup, Interchange, Segment, TransactionSet};
use x12_validation::{Finding, RuleCategory, Severity, ValidationReport};

/// Builds 997/999 acknowledgment interchanges
#[derive(Debug, Clone)]
pub struct AckBuilder {
    /// Treat semantic errors as rejections
    fatal_semantics: bool,
    /// ISA13 assigned to the outbound acknowledgment
    control_number: String,
}

impl Default for AckBuilder {
    fn default() -> Self {
        Self {
            fatal_semantics: false,
            control_number: "000000001".to_string(),
        }
    }
}

impl AckBuilder {
    /// Create a builder with default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject transactions on semantic errors too.
    #[must_use]
    pub fn with_fatal_semantics(mut self) -> Self {
        self.fatal_semantics = true;
        self
    }

    /// Set the outbound interchange control number.
    #[must_use]
    pub fn with_control_number(mut self, control_number: impl Into<String>) -> Self {
        self.control_number = control_number.into();
        self
    }

    /// Derive a 997 Functional Acknowledgment interchange.
    #[must_use]
    pub fn build_997(&self, inbound: &Interchange, report: &ValidationReport) -> Interchange {
        self.build(AckKind::Functional997, inbound, report)
    }

    /// Derive a 999 Implementation Acknowledgment interchange.
    #[must_use]
    pub fn build_999(&self, inbound: &Interchange, report: &ValidationReport) -> Interchange {
        self.build(AckKind::Implementation999, inbound, report)
    }

    /// Derive the per-group outcomes without serializing them.
    #[must_use]
    pub fn outcomes(&self, inbound: &Interchange, report: &ValidationReport) -> Vec<GroupAck> {
        inbound
            .functional_groups
            .iter()
            .enumerate()
            .map(|(group_index, group)| self.group_ack(group_index, group, report))
            .collect()
    }

    fn build(&self, kind: AckKind, inbound: &Interchange, report: &ValidationReport) -> Interchange {
        // The acknowledgment flows back to the sender.
        let mut outbound = Interchange::new(inbound.receiver_id.clone(), inbound.sender_id.clone());
        outbound.sender_qualifier = inbound.receiver_qualifier.clone();
        outbound.receiver_qualifier = inbound.sender_qualifier.clone();
        outbound.usage = inbound.usage.clone();
        outbound.control_number = self.control_number.clone();
        outbound.delimiters = inbound.delimiters;

        for (group_index, group) in inbound.functional_groups.iter().enumerate() {
            let ack = self.group_ack(group_index, group, report);

            let mut out_group = FunctionalGroup::new(
                "FA",
                (group_index + 1).to_string(),
                kind.version().to_string(),
            );
            out_group.sender_code = group.receiver_code.clone();
            out_group.receiver_code = group.sender_code.clone();

            let mut txn = TransactionSet::new(
                kind.transaction_set_id(),
                format!("{:04}", group_index + 1),
            );
            if kind == AckKind::Implementation999 {
                txn.implementation_reference = Some(kind.version().to_string());
            }
            txn.root.segments = ack_segments(kind, &ack);
            out_group.transactions.push(txn);
            outbound.functional_groups.push(out_group);
        }

        outbound
    }

    fn group_ack(&self, group_index: usize, group: &FunctionalGroup, report: &ValidationReport) -> GroupAck {
        let transactions: Vec<TransactionAck> = group
            .transactions
            .iter()
            .enumerate()
            .map(|(txn_index, txn)| self.transaction_ack(group_index, txn_index, txn, report))
            .collect();

        let rejected = transactions
            .iter()
            .filter(|t| t.code == TransactionAckCode::Rejected)
            .count();
        let with_errors = transactions
            .iter()
            .any(|t| t.code == TransactionAckCode::AcceptedWithErrors);

        let code = if rejected == transactions.len() && rejected > 0 {
            GroupAckCode::Rejected
        } else if rejected > 0 {
            GroupAckCode::PartiallyAccepted
        } else if with_errors {
            GroupAckCode::AcceptedWithErrors
        } else {
            GroupAckCode::Accepted
        };

        GroupAck {
            functional_id_code: group.functional_id_code.clone(),
            group_control_number: group.control_number.clone(),
            code,
            transactions,
        }
    }

    fn transaction_ack(
        &self,
        group_index: usize,
        txn_index: usize,
        txn: &TransactionSet,
        report: &ValidationReport,
    ) -> TransactionAck {
        let findings: Vec<&Finding> = report.for_transaction(group_index, txn_index).collect();
        let errors: Vec<&&Finding> = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .collect();

        let structural = errors.iter().any(|f| {
            matches!(f.category, RuleCategory::Structure | RuleCategory::Schema)
        });
        let code = if structural || (self.fatal_semantics && !errors.is_empty()) {
            TransactionAckCode::Rejected
        } else if errors.is_empty() {
            TransactionAckCode::Accepted
        } else {
            TransactionAckCode::AcceptedWithErrors
        };

        TransactionAck {
            transaction_set_id: txn.transaction_set_id.clone(),
            control_number: txn.control_number.clone(),
            code,
            segment_errors: segment_errors(&errors),
        }
    }
}

/// Group error findings into AK3/IK3 records with nested element notes.
fn segment_errors(errors: &[&&Finding]) -> Vec<SegmentError> {
    let mut out: Vec<SegmentError> = Vec::new();

    for finding in errors {
        let Some(ref segment_id) = finding.location.segment_id else {
            continue;
        };
        let segment_position = finding.location.segment_position.unwrap_or(0);
        let loop_id = finding
            .location
            .loop_path
            .as_deref()
            .and_then(|p| p.rsplit('/').next())
            .unwrap_or("")
            .to_string();

        let element_note = finding.location.element.map(|position| ElementNote {
            element_position: position,
            component_position: finding.location.component,
            error_code: element_error_code(&finding.code),
            bad_value: finding.actual.clone(),
        });

        match out
            .iter_mut()
            .find(|e| e.segment_id == *segment_id && e.segment_position == segment_position)
        {
            Some(existing) => {
                existing.elements.extend(element_note);
            }
            None => out.push(SegmentError {
                segment_id: segment_id.clone(),
                segment_position,
                loop_id,
                error_code: segment_error_code(&finding.code),
                elements: element_note.into_iter().collect(),
            }),
        }
    }

    out
}

fn segment_error_code(rule_code: &str) -> String {
    if rule_code.contains("MISSING_SEGMENT") || rule_code.contains("MISSING_LOOP") {
        "3".to_string() // mandatory segment missing
    } else if rule_code.contains("UNKNOWN") {
        "1".to_string() // unrecognized segment id
    } else {
        "8".to_string() // segment has data element errors
    }
}

fn element_error_code(rule_code: &str) -> String {
    if rule_code.contains("MISSING") || rule_code.contains("REQUIRED") {
        "1".to_string() // mandatory data element missing
    } else if rule_code.contains("LENGTH") {
        "4".to_string() // data element too short/long
    } else if rule_code.contains("DATE") || rule_code.contains("DTP") {
        "8".to_string() // invalid date
    } else if rule_code.contains("INVALID") || rule_code.contains("CODE_SET") {
        "7".to_string() // invalid code value
    } else {
        "6".to_string() // invalid character in data element
    }
}

/// Lay out the acknowledgment transaction body as segments.
fn ack_segments(kind: AckKind, ack: &GroupAck) -> Vec<Segment> {
    let (seg_note, elem_note, txn_trailer) = match kind {
        AckKind::Functional997 => ("AK3", "AK4", "AK5"),
        AckKind::Implementation999 => ("IK3", "IK4", "IK5"),
    };

    let mut segments = Vec::new();

    let mut ak1 = vec![
        ack.functional_id_code.clone(),
        ack.group_control_number.clone(),
    ];
    if kind == AckKind::Implementation999 {
        ak1.push(kind.version().to_string());
    }
    segments.push(Segment::from_values("AK1", ak1));

    for txn in &ack.transactions {
        segments.push(Segment::from_values(
            "AK2",
            vec![txn.transaction_set_id.clone(), txn.control_number.clone()],
        ));

        for error in &txn.segment_errors {
            segments.push(Segment::from_values(
                seg_note,
                vec![
                    error.segment_id.clone(),
                    error.segment_position.to_string(),
                    error.loop_id.clone(),
                    error.error_code.clone(),
                ],
            ));
            for note in &error.elements {
                let position = match note.component_position {
                    Some(component) => ElementValue::Composite(vec![
                        note.element_position.to_string(),
                        component.to_string(),
                    ]),
                    None => ElementValue::Atomic(note.element_position.to_string()),
                };
                segments.push(Segment::new(
                    elem_note,
                    vec![
                        position,
                        ElementValue::Atomic(String::new()),
                        ElementValue::Atomic(note.error_code.clone()),
                        ElementValue::Atomic(note.bad_value.clone().unwrap_or_default()),
                    ],
                ));
            }
        }

        segments.push(Segment::from_values(
            txn_trailer,
            vec![txn.code.as_code().to_string()],
        ));
    }

    segments.push(Segment::from_values(
        "AK9",
        vec![
            ack.code.as_code().to_string(),
            ack.transactions.len().to_string(),
            ack.transactions.len().to_string(),
            ack.accepted_count().to_string(),
        ],
    ));

    segments
}
