//! Envelope types
//!
//! Interchange (ISA/IEA), functional group (GS/GE), and transaction set
//! (ST/SE). Control numbers are stored as received; trailer counts are
//! recomputed on generation rather than stored.

use crate::delimiters::Delimiters;
use crate::loops::Loop;
use serde::{Deserialize, Serialize};

/// A single business document framed by ST/SE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSet {
    /// Transaction set identifier code (ST01, e.g. "837")
    pub transaction_set_id: String,
    /// Transaction set control number (ST02 == SE02)
    pub control_number: String,
    /// Implementation convention reference (ST03) when present
    pub implementation_reference: Option<String>,
    /// Root loop holding the transaction body
    pub root: Loop,
}

impl TransactionSet {
    /// Create an empty transaction set with a fresh root loop.
    pub fn new(transaction_set_id: impl Into<String>, control_number: impl Into<String>) -> Self {
        Self {
            transaction_set_id: transaction_set_id.into(),
            control_number: control_number.into(),
            implementation_reference: None,
            root: Loop::new("ROOT"),
        }
    }

    /// Segment count from ST through SE inclusive, as SE01 must declare it.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        // ST and SE frame the body but are not stored in the tree.
        self.root.segment_count() + 2
    }
}

/// A functional group framed by GS/GE
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalGroup {
    /// Functional identifier code (GS01, e.g. "HC")
    pub functional_id_code: String,
    /// Application sender code (GS02)
    pub sender_code: String,
    /// Application receiver code (GS03)
    pub receiver_code: String,
    /// Group date (GS04, CCYYMMDD)
    pub date: String,
    /// Group time (GS05, HHMM)
    pub time: String,
    /// Group control number (GS06 == GE02)
    pub control_number: String,
    /// Responsible agency code (GS07, normally "X")
    pub agency_code: String,
    /// Version/release/implementation identifier (GS08, e.g. "005010X222A1")
    pub version: String,
    /// Transaction sets in document order
    pub transactions: Vec<TransactionSet>,
}

impl FunctionalGroup {
    /// Create an empty group.
    pub fn new(
        functional_id_code: impl Into<String>,
        control_number: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            functional_id_code: functional_id_code.into(),
            sender_code: String::new(),
            receiver_code: String::new(),
            date: String::new(),
            time: String::new(),
            control_number: control_number.into(),
            agency_code: "X".to_string(),
            version: version.into(),
            transactions: Vec::new(),
        }
    }
}

/// The outermost envelope framed by ISA/IEA
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interchange {
    /// Authorization information qualifier (ISA01)
    pub authorization_qualifier: String,
    /// Authorization information (ISA02, fixed width 10)
    pub authorization_info: String,
    /// Security information qualifier (ISA03)
    pub security_qualifier: String,
    /// Security information (ISA04, fixed width 10)
    pub security_info: String,
    /// Sender ID qualifier (ISA05)
    pub sender_qualifier: String,
    /// Interchange sender ID (ISA06, trimmed)
    pub sender_id: String,
    /// Receiver ID qualifier (ISA07)
    pub receiver_qualifier: String,
    /// Interchange receiver ID (ISA08, trimmed)
    pub receiver_id: String,
    /// Interchange date (ISA09, YYMMDD)
    pub date: String,
    /// Interchange time (ISA10, HHMM)
    pub time: String,
    /// Interchange control version number (ISA12)
    pub version: String,
    /// Interchange control number (ISA13 == IEA02)
    pub control_number: String,
    /// Acknowledgment requested (ISA14, "0"/"1")
    pub ack_requested: String,
    /// Usage indicator (ISA15): "P" production, "T" test
    pub usage: String,
    /// Delimiters active for this interchange
    pub delimiters: Delimiters,
    /// Functional groups in document order
    pub functional_groups: Vec<FunctionalGroup>,
}

impl Interchange {
    /// Create a minimal interchange between two parties with default
    /// delimiters, remaining ISA fields blank-defaulted.
    pub fn new(sender_id: impl Into<String>, receiver_id: impl Into<String>) -> Self {
        Self {
            authorization_qualifier: "00".to_string(),
            authorization_info: String::new(),
            security_qualifier: "00".to_string(),
            security_info: String::new(),
            sender_qualifier: "ZZ".to_string(),
            sender_id: sender_id.into(),
            receiver_qualifier: "ZZ".to_string(),
            receiver_id: receiver_id.into(),
            date: String::new(),
            time: String::new(),
            version: "00501".to_string(),
            control_number: "000000001".to_string(),
            ack_requested: "0".to_string(),
            usage: "P".to_string(),
            delimiters: Delimiters::default(),
            functional_groups: Vec::new(),
        }
    }

    /// Total transaction sets across all groups.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.functional_groups.iter().map(|g| g.transactions.len()).sum()
    }

    /// Iterate over `(group index, transaction index, transaction)` in
    /// document order.
    pub fn transactions(&self) -> impl Iterator<Item = (usize, usize, &TransactionSet)> {
        self.functional_groups.iter().enumerate().flat_map(|(gi, group)| {
            group
                .transactions
                .iter()
                .enumerate()
                .map(move |(ti, txn)| (gi, ti, txn))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    #[test]
    fn test_segment_count_includes_st_se() {
        let mut txn = TransactionSet::new("270", "0001");
        txn.root.segments.push(Segment::from_values("BHT", vec!["0022"]));
        txn.root.segments.push(Segment::from_values("HL", vec!["1"]));
        assert_eq!(txn.segment_count(), 4);
    }

    #[test]
    fn test_transaction_iteration_order() {
        let mut interchange = Interchange::new("SENDER", "RECEIVER");
        let mut group = FunctionalGroup::new("HC", "1", "005010X222A1");
        group.transactions.push(TransactionSet::new("837", "0001"));
        group.transactions.push(TransactionSet::new("837", "0002"));
        interchange.functional_groups.push(group);

        let seen: Vec<(usize, usize, String)> = interchange
            .transactions()
            .map(|(gi, ti, t)| (gi, ti, t.control_number.clone()))
            .collect();
        assert_eq!(
            seen,
            vec![(0, 0, "0001".to_string()), (0, 1, "0002".to_string())]
        );
        assert_eq!(interchange.transaction_count(), 2);
    }
}
