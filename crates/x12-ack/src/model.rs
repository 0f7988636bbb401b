//! Acknowledgment outcome model
//!
//! Plain data derived from a validation report; serialization into an
//! outbound interchange happens in the builder.

use serde::{Deserialize, Serialize};

/// Which acknowledgment transaction to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AckKind {
    /// 997 Functional Acknowledgment (AK3/AK4/AK5)
    Functional997,
    /// 999 Implementation Acknowledgment (IK3/IK4/IK5), 005010X231A1
    Implementation999,
}

impl AckKind {
    /// Transaction set identifier for the acknowledgment.
    #[must_use]
    pub fn transaction_set_id(self) -> &'static str {
        match self {
            AckKind::Functional997 => "997",
            AckKind::Implementation999 => "999",
        }
    }

    /// Implementation convention reference for the acknowledgment group.
    #[must_use]
    pub fn version(self) -> &'static str {
        match self {
            AckKind::Functional997 => "005010",
            AckKind::Implementation999 => "005010X231A1",
        }
    }
}

/// Transaction set acknowledgment codes (AK501/IK501)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionAckCode {
    /// Accepted
    Accepted,
    /// Accepted with errors noted
    AcceptedWithErrors,
    /// Rejected
    Rejected,
}

impl TransactionAckCode {
    /// Wire code.
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            TransactionAckCode::Accepted => "A",
            TransactionAckCode::AcceptedWithErrors => "E",
            TransactionAckCode::Rejected => "R",
        }
    }
}

/// Functional group acknowledgment codes (AK901)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupAckCode {
    /// Accepted
    Accepted,
    /// Accepted with errors noted
    AcceptedWithErrors,
    /// Partially accepted: at least one transaction set was rejected
    PartiallyAccepted,
    /// Rejected
    Rejected,
}

impl GroupAckCode {
    /// Wire code.
    #[must_use]
    pub fn as_code(self) -> &'static str {
        match self {
            GroupAckCode::Accepted => "A",
            GroupAckCode::AcceptedWithErrors => "E",
            GroupAckCode::PartiallyAccepted => "P",
            GroupAckCode::Rejected => "R",
        }
    }
}

/// Element-level note (AK4/IK4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementNote {
    /// 1-based element position within the segment
    pub element_position: usize,
    /// 1-based component position for composite elements
    pub component_position: Option<usize>,
    /// Syntax error code
    pub error_code: String,
    /// Copy of the offending data, when available
    pub bad_value: Option<String>,
}

/// Segment-level note (AK3/IK3) with its element notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentError {
    /// Segment id in error
    pub segment_id: String,
    /// Segment position within the transaction set, ST = 1
    pub segment_position: usize,
    /// Innermost loop identifier, when known
    pub loop_id: String,
    /// Segment syntax error code
    pub error_code: String,
    /// Element notes under this segment
    pub elements: Vec<ElementNote>,
}

/// Acknowledgment outcome for one transaction set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionAck {
    /// Inbound transaction set identifier (echoed into AK201)
    pub transaction_set_id: String,
    /// Inbound transaction set control number (echoed into AK202)
    pub control_number: String,
    /// Accept/reject outcome
    pub code: TransactionAckCode,
    /// Segment errors, document order
    pub segment_errors: Vec<SegmentError>,
}

/// Acknowledgment outcome for one functional group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAck {
    /// Inbound functional identifier code (echoed into AK101)
    pub functional_id_code: String,
    /// Inbound group control number (echoed into AK102)
    pub group_control_number: String,
    /// Group-level outcome
    pub code: GroupAckCode,
    /// Per-transaction outcomes
    pub transactions: Vec<TransactionAck>,
}

impl GroupAck {
    /// Number of transaction sets accepted (code A or E).
    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| !matches!(t.code, TransactionAckCode::Rejected))
            .count()
    }
}
