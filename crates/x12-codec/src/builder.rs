//! Envelope and loop assembly
//!
//! Consumes the raw segment stream and constructs the typed
//! Interchange → FunctionalGroup → TransactionSet → Loop tree. Envelope
//! framing violations (missing ISA/IEA, unmatched GS/GE or ST/SE, control
//! number or count mismatches) are terminal: the builder fails with a
//! `StructureError` listing every violation. Everything else accumulates as
//! parse warnings alongside the tree.

use crate::syntax::detect_delimiters;
use crate::tokenizer::{RawSegment, Tokenizer};
use crate::{Error, Result};
use tracing::debug;
use x12_ir::{Delimiters, FunctionalGroup, Interchange, Loop, Segment, TransactionSet};
use x12_schema::{LoopSchema, SchemaRegistry, TransactionSchema};

/// Kinds of non-terminal problems found while building the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Transaction type has no registered schema; the tree is flat
    UnknownTransaction,
    /// Segment id not present in the transaction schema; attached as-is
    UnknownSegment,
    /// Segment known to the schema but not admissible here; skipped
    OutOfOrderSegment,
    /// GS08 and ST03 disagree; ST03 was preferred
    VersionMismatch,
}

impl WarningKind {
    /// Out-of-order segments are errors; the rest are warnings.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, WarningKind::OutOfOrderSegment)
    }

    /// Stable code for reports.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            WarningKind::UnknownTransaction => "UNKNOWN_TRANSACTION",
            WarningKind::UnknownSegment => "UNKNOWN_SEGMENT",
            WarningKind::OutOfOrderSegment => "OUT_OF_ORDER_SEGMENT",
            WarningKind::VersionMismatch => "VERSION_MISMATCH",
        }
    }
}

/// A non-terminal problem found during parsing
#[derive(Debug, Clone)]
pub struct ParseWarning {
    /// What went wrong
    pub kind: WarningKind,
    /// Human-readable description
    pub message: String,
    /// Functional group index, when known
    pub group_index: Option<usize>,
    /// Transaction index within the group, when known
    pub transaction_index: Option<usize>,
    /// Segment ordinal within the interchange, when known
    pub segment_ordinal: Option<usize>,
}

/// Result of a successful parse: the tree plus accumulated warnings
#[derive(Debug)]
pub struct ParseOutput {
    /// The assembled interchange
    pub interchange: Interchange,
    /// Non-terminal problems, document order
    pub warnings: Vec<ParseWarning>,
}

/// Builds interchange trees from raw segment streams, driven by the schema
/// registry
pub struct InterchangeBuilder<'r> {
    registry: &'r SchemaRegistry,
}

struct OpenTransaction {
    st: Segment,
    body: Vec<Segment>,
}

struct BuildState {
    interchange: Option<Interchange>,
    group: Option<FunctionalGroup>,
    transaction: Option<OpenTransaction>,
    saw_iea: bool,
    violations: Vec<String>,
    warnings: Vec<ParseWarning>,
}

impl<'r> InterchangeBuilder<'r> {
    /// Create a builder backed by a schema registry.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Detect delimiters, tokenize, and build the tree from bytes.
    pub fn build(&self, input: &[u8]) -> Result<ParseOutput> {
        let delimiters = detect_delimiters(input)?;
        let tokenizer = Tokenizer::new(input, delimiters);
        self.build_from_raw(tokenizer, delimiters)
    }

    /// Build the tree from an already-tokenized segment stream.
    pub fn build_from_raw<I>(&self, segments: I, delimiters: Delimiters) -> Result<ParseOutput>
    where
        I: Iterator<Item = Result<RawSegment>>,
    {
        let mut state = BuildState {
            interchange: None,
            group: None,
            transaction: None,
            saw_iea: false,
            violations: Vec::new(),
            warnings: Vec::new(),
        };

        for (index, raw) in segments.enumerate() {
            let raw = raw?;
            if index == 0 && raw.id != "ISA" {
                state.violations.push("first segment must be ISA".to_string());
            }
            if state.saw_iea {
                state
                    .violations
                    .push(format!("segment {} found after IEA", raw.id));
            }
            self.consume(&mut state, raw, delimiters);
        }

        self.finish(state)
    }

    fn consume(&self, state: &mut BuildState, raw: RawSegment, delimiters: Delimiters) {
        // ISA fields are parsed raw: ISA11/ISA16 hold separator characters
        // that must not be re-split as repetitions or components.
        if raw.id == "ISA" {
            if state.interchange.is_some() {
                state.violations.push("multiple ISA segments".to_string());
                return;
            }
            state.interchange = Some(parse_isa(&raw, delimiters, &mut state.violations));
            return;
        }

        let seg = raw.into_segment(&delimiters);
        match seg.id.as_str() {
            "GS" => self.open_group(state, &seg),
            "GE" => Self::close_group(state, &seg),
            "ST" => Self::open_transaction(state, seg),
            "SE" => self.close_transaction(state, &seg),
            "IEA" => Self::close_interchange(state, &seg),
            _ => {
                if let Some(txn) = state.transaction.as_mut() {
                    txn.body.push(seg);
                } else {
                    state.violations.push(format!(
                        "segment {} outside any transaction set",
                        seg.id
                    ));
                }
            }
        }
    }

    fn open_group(&self, state: &mut BuildState, seg: &Segment) {
        if state.group.is_some() {
            state
                .violations
                .push("GS encountered while previous group is still open".to_string());
        }
        let mut group = FunctionalGroup::new(seg.value(1), seg.value(6), seg.value(8));
        group.sender_code = seg.value(2);
        group.receiver_code = seg.value(3);
        group.date = seg.value(4);
        group.time = seg.value(5);
        group.agency_code = seg.value(7);
        debug!(functional_id = %group.functional_id_code, control = %group.control_number, "opening functional group");
        state.group = Some(group);
    }

    fn close_group(state: &mut BuildState, seg: &Segment) {
        let Some(group) = state.group.take() else {
            state.violations.push("GE without matching GS".to_string());
            return;
        };
        if state.transaction.is_some() {
            state
                .violations
                .push("GE encountered while transaction set is still open".to_string());
            state.transaction = None;
        }

        let declared = seg.element(1).map_or(0, x12_ir::Element::as_int);
        let actual = i64::try_from(group.transactions.len()).unwrap_or(i64::MAX);
        if declared != actual {
            state.violations.push(format!(
                "GE01 declares {declared} transaction sets, found {actual}"
            ));
        }
        if seg.value(2).trim() != group.control_number.trim() {
            state.violations.push(format!(
                "group control number mismatch: GS06={}, GE02={}",
                group.control_number,
                seg.value(2)
            ));
        }

        match state.interchange.as_mut() {
            Some(interchange) => interchange.functional_groups.push(group),
            None => state
                .violations
                .push("functional group closed before ISA".to_string()),
        }
    }

    fn open_transaction(state: &mut BuildState, seg: Segment) {
        if state.transaction.is_some() {
            state.violations.push("ST without matching SE".to_string());
        }
        if state.group.is_none() {
            state
                .violations
                .push("ST outside any functional group".to_string());
            // Keep collecting into a synthetic group so later checks run.
            state.group = Some(FunctionalGroup::new("", "", ""));
        }
        state.transaction = Some(OpenTransaction {
            st: seg,
            body: Vec::new(),
        });
    }

    fn close_transaction(&self, state: &mut BuildState, seg: &Segment) {
        let Some(open) = state.transaction.take() else {
            state.violations.push("SE without matching ST".to_string());
            return;
        };

        let st_control = open.st.value(2);
        if seg.value(2) != st_control {
            state.violations.push(format!(
                "transaction control number mismatch: ST02={st_control}, SE02={}",
                seg.value(2)
            ));
        }

        let declared = seg.element(1).map_or(0, x12_ir::Element::as_int);
        let actual = i64::try_from(open.body.len() + 2).unwrap_or(i64::MAX);
        if declared != actual {
            state.violations.push(format!(
                "SE01 declares {declared} segments, found {actual}"
            ));
        }

        let Some(group) = state.group.as_mut() else {
            return;
        };
        let group_index = state.interchange.as_ref().map_or(0, |i| i.functional_groups.len());
        let transaction_index = group.transactions.len();
        let txn = assemble_transaction(
            self.registry,
            &open.st,
            open.body,
            &group.version,
            group_index,
            transaction_index,
            &mut state.warnings,
        );
        group.transactions.push(txn);
    }

    fn close_interchange(state: &mut BuildState, seg: &Segment) {
        state.saw_iea = true;
        if state.group.is_some() {
            state
                .violations
                .push("IEA encountered while group is still open".to_string());
            state.group = None;
        }

        let Some(interchange) = state.interchange.as_ref() else {
            state.violations.push("IEA without ISA".to_string());
            return;
        };

        let declared = seg.element(1).map_or(0, x12_ir::Element::as_int);
        let actual = i64::try_from(interchange.functional_groups.len()).unwrap_or(i64::MAX);
        if declared != actual {
            state.violations.push(format!(
                "IEA01 declares {declared} functional groups, found {actual}"
            ));
        }
        if seg.value(2).trim() != interchange.control_number.trim() {
            state.violations.push(format!(
                "interchange control number mismatch: ISA13={}, IEA02={}",
                interchange.control_number,
                seg.value(2)
            ));
        }
    }

    fn finish(&self, mut state: BuildState) -> Result<ParseOutput> {
        if state.interchange.is_none() {
            state.violations.push("missing ISA segment".to_string());
        }
        if !state.saw_iea {
            state.violations.push("missing IEA segment".to_string());
        }
        if state.transaction.is_some() {
            state.violations.push("ST without matching SE".to_string());
        }
        if state.group.is_some() {
            state.violations.push("GS without matching GE".to_string());
        }

        match state.interchange {
            Some(interchange) if state.violations.is_empty() => Ok(ParseOutput {
                interchange,
                warnings: state.warnings,
            }),
            _ => Err(Error::structure(state.violations)),
        }
    }
}

fn parse_isa(raw: &RawSegment, delimiters: Delimiters, violations: &mut Vec<String>) -> Interchange {
    if raw.fields.len() < 16 {
        violations.push(format!(
            "ISA segment has {} elements, expected 16",
            raw.fields.len()
        ));
    }
    let field = |n: usize| raw.fields.get(n - 1).cloned().unwrap_or_default();

    let mut interchange = Interchange::new(field(6).trim_end().to_string(), field(8).trim_end().to_string());
    interchange.authorization_qualifier = field(1);
    interchange.authorization_info = field(2);
    interchange.security_qualifier = field(3);
    interchange.security_info = field(4);
    interchange.sender_qualifier = field(5);
    interchange.receiver_qualifier = field(7);
    interchange.date = field(9);
    interchange.time = field(10);
    interchange.version = field(12);
    interchange.control_number = field(13);
    interchange.ack_requested = field(14);
    interchange.usage = field(15);
    interchange.delimiters = delimiters;
    interchange
}

/// Assemble one transaction set, resolving its schema and building the loop
/// tree. Shared between the full-tree builder and the streaming surface.
pub(crate) fn assemble_transaction(
    registry: &SchemaRegistry,
    st: &Segment,
    body: Vec<Segment>,
    group_version: &str,
    group_index: usize,
    transaction_index: usize,
    warnings: &mut Vec<ParseWarning>,
) -> TransactionSet {
    let transaction_set_id = st.value(1);
    let st03 = st.value(3);

    if !st03.is_empty() && !group_version.is_empty() && st03 != group_version {
        warnings.push(ParseWarning {
            kind: WarningKind::VersionMismatch,
            message: format!(
                "GS08 ({group_version}) disagrees with ST03 ({st03}); using ST03"
            ),
            group_index: Some(group_index),
            transaction_index: Some(transaction_index),
            segment_ordinal: Some(st.position.ordinal),
        });
    }
    let version = if st03.is_empty() { group_version } else { &st03 };

    let mut txn = TransactionSet::new(transaction_set_id.clone(), st.value(2));
    txn.implementation_reference = (!st03.is_empty()).then(|| st03.clone());

    match registry.resolve(&transaction_set_id, version) {
        Some(schema) => {
            txn.root = build_loops(schema, body, group_index, transaction_index, warnings);
        }
        None => {
            warnings.push(ParseWarning {
                kind: WarningKind::UnknownTransaction,
                message: format!(
                    "no schema for transaction {transaction_set_id} version {version}; tree is flat"
                ),
                group_index: Some(group_index),
                transaction_index: Some(transaction_index),
                segment_ordinal: Some(st.position.ordinal),
            });
            txn.root.segments = body;
        }
    }
    txn
}

struct OpenLoop<'s> {
    schema: &'s LoopSchema,
    node: Loop,
}

/// Close loops until the stack is `depth` deep, attaching each closed loop
/// to its parent.
fn close_to(stack: &mut Vec<OpenLoop<'_>>, root: &mut Loop, depth: usize) {
    while stack.len() > depth {
        let Some(closed) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.node.loops.push(closed.node),
            None => root.loops.push(closed.node),
        }
    }
}

/// A trigger match found during the innermost-first scan
struct TriggerMatch<'s> {
    depth: usize,
    schema: &'s LoopSchema,
    qualified: bool,
}

fn build_loops(
    schema: &TransactionSchema,
    body: Vec<Segment>,
    group_index: usize,
    transaction_index: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Loop {
    let mut root = Loop::new("ROOT");
    if schema.flat {
        root.segments = body;
        return root;
    }

    let mut stack: Vec<OpenLoop<'_>> = Vec::new();

    for seg in body {
        // Candidate loops, scanned innermost-first. A qualifier-disambiguated
        // match takes precedence over an unqualified one at any depth.
        let mut best: Option<TriggerMatch<'_>> = None;
        for depth in (0..=stack.len()).rev() {
            let candidates: Vec<&LoopSchema> = if depth == 0 {
                schema.top_loops().collect()
            } else {
                stack[depth - 1].schema.child_loops().collect()
            };
            for candidate in candidates {
                if !candidate.trigger.matches(&seg) {
                    continue;
                }
                let qualified = candidate.trigger.is_qualified();
                let better = match &best {
                    None => true,
                    Some(current) => qualified && !current.qualified,
                };
                if better {
                    best = Some(TriggerMatch {
                        depth,
                        schema: candidate,
                        qualified,
                    });
                }
            }
            if best.as_ref().is_some_and(|m| m.qualified) {
                break;
            }
        }

        if let Some(found) = best {
            close_to(&mut stack, &mut root, found.depth);
            let mut node = Loop::new(found.schema.id.clone());
            node.segments.push(seg);
            stack.push(OpenLoop {
                schema: found.schema,
                node,
            });
            continue;
        }

        // No loop to open: look for a level that admits the segment directly,
        // closing loops down to it.
        let accepted_depth = (0..=stack.len()).rev().find(|depth| {
            if *depth == 0 {
                schema.accepts_segment(&seg.id)
            } else {
                stack[*depth - 1].schema.accepts_segment(&seg.id)
            }
        });

        if let Some(depth) = accepted_depth {
            close_to(&mut stack, &mut root, depth);
            match stack.last_mut() {
                Some(open) => open.node.segments.push(seg),
                None => root.segments.push(seg),
            }
            continue;
        }

        if schema.find_segment(&seg.id).is_some() {
            warnings.push(ParseWarning {
                kind: WarningKind::OutOfOrderSegment,
                message: format!("segment {} out of order; skipped", seg.id),
                group_index: Some(group_index),
                transaction_index: Some(transaction_index),
                segment_ordinal: Some(seg.position.ordinal),
            });
            continue;
        }

        warnings.push(ParseWarning {
            kind: WarningKind::UnknownSegment,
            message: format!("segment {} not in schema; attached unstructured", seg.id),
            group_index: Some(group_index),
            transaction_index: Some(transaction_index),
            segment_ordinal: Some(seg.position.ordinal),
        });
        match stack.last_mut() {
            Some(open) => open.node.segments.push(seg),
            None => root.segments.push(seg),
        }
    }

    close_to(&mut stack, &mut root, 0);
    root
}
