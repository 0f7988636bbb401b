//! Streaming surface
//!
//! A pull iterator that yields one `TransactionSet` at a time from any byte
//! source, holding at most one transaction in memory. Envelope counts are
//! verified with running tallies; a final `EnvelopeSummary` is available
//! after the last transaction is pulled. Cross-transaction findings are not
//! computed on this path and the summary says so explicitly.

use crate::builder::{assemble_transaction, ParseWarning};
use crate::syntax::{detect_delimiters, is_edi_whitespace, ISA_LENGTH};
use crate::tokenizer::{parse_raw_segment, RawSegment};
use crate::Result;
use std::io::Read;
use x12_ir::{Delimiters, Segment, TransactionSet};
use x12_schema::SchemaRegistry;

const CHUNK_SIZE: usize = 4096;

/// Whether cross-transaction checks ran on this path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossChecks {
    /// The streaming surface does not hold the full interchange, so
    /// cross-transaction findings were not computed
    NotComputed,
    /// All cross-transaction checks ran (full-tree path)
    Computed,
}

/// Running envelope tallies reported after the stream is exhausted
#[derive(Debug, Clone)]
pub struct EnvelopeSummary {
    /// ISA13 of the interchange
    pub interchange_control_number: String,
    /// Functional groups seen
    pub functional_groups: usize,
    /// Transaction sets seen
    pub transaction_sets: usize,
    /// Envelope violations accumulated while streaming
    pub violations: Vec<String>,
    /// Cross-transaction finding status
    pub cross_checks: CrossChecks,
}

struct OpenGroup {
    version: String,
    control_number: String,
    transactions: usize,
    index: usize,
}

/// Pull-based transaction iterator over a byte source
pub struct TransactionStream<'r, R: Read> {
    reader: R,
    registry: &'r SchemaRegistry,
    delimiters: Delimiters,
    buffer: Vec<u8>,
    eof: bool,
    offset: usize,
    ordinal: usize,
    open_st: Option<(Segment, Vec<Segment>)>,
    group: Option<OpenGroup>,
    isa_control: String,
    groups_seen: usize,
    transactions_seen: usize,
    violations: Vec<String>,
    warnings: Vec<ParseWarning>,
    saw_iea: bool,
    finished: bool,
    failed: bool,
}

impl<'r, R: Read> TransactionStream<'r, R> {
    /// Create a stream, reading just enough of the source to discover the
    /// delimiters from the leading ISA segment.
    pub fn new(mut reader: R, registry: &'r SchemaRegistry) -> Result<Self> {
        let mut buffer = Vec::with_capacity(CHUNK_SIZE);
        let mut eof = false;
        while buffer.len() < ISA_LENGTH * 2 && !eof {
            let mut chunk = [0u8; CHUNK_SIZE];
            let read = reader.read(&mut chunk)?;
            if read == 0 {
                eof = true;
            } else {
                buffer.extend_from_slice(&chunk[..read]);
            }
        }

        let delimiters = detect_delimiters(&buffer)?;
        Ok(Self {
            reader,
            registry,
            delimiters,
            buffer,
            eof,
            offset: 0,
            ordinal: 0,
            open_st: None,
            group: None,
            isa_control: String::new(),
            groups_seen: 0,
            transactions_seen: 0,
            violations: Vec::new(),
            warnings: Vec::new(),
            saw_iea: false,
            finished: false,
            failed: false,
        })
    }

    /// The delimiters discovered from the source.
    #[must_use]
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Parse warnings accumulated so far.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Envelope tallies; meaningful once the iterator is exhausted.
    #[must_use]
    pub fn summary(&self) -> EnvelopeSummary {
        let mut violations = self.violations.clone();
        if self.finished && !self.saw_iea {
            violations.push("missing IEA segment".to_string());
        }
        EnvelopeSummary {
            interchange_control_number: self.isa_control.clone(),
            functional_groups: self.groups_seen,
            transaction_sets: self.transactions_seen,
            violations,
            cross_checks: CrossChecks::NotComputed,
        }
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let read = self.reader.read(&mut chunk)?;
        if read == 0 {
            self.eof = true;
        } else {
            self.buffer.extend_from_slice(&chunk[..read]);
        }
        Ok(())
    }

    /// Next raw segment from the source; `None` at end of input. The buffer
    /// never retains more than one pending segment plus one read chunk.
    fn next_raw(&mut self) -> Result<Option<RawSegment>> {
        loop {
            let skip = self
                .buffer
                .iter()
                .take_while(|b| is_edi_whitespace(**b) && **b != self.delimiters.segment)
                .count();
            if skip > 0 {
                self.buffer.drain(..skip);
                self.offset += skip;
            }

            match self.buffer.iter().position(|b| *b == self.delimiters.segment) {
                Some(end) => {
                    let body: Vec<u8> = self.buffer.drain(..=end).take(end).collect();
                    let start = self.offset;
                    self.offset += end + 1;
                    if body.iter().all(|b| is_edi_whitespace(*b)) {
                        continue;
                    }
                    self.ordinal += 1;
                    return parse_raw_segment(&body, &self.delimiters, start, self.ordinal).map(Some);
                }
                None if self.eof => {
                    if self.buffer.iter().all(|b| is_edi_whitespace(*b)) {
                        self.buffer.clear();
                        return Ok(None);
                    }
                    let body = std::mem::take(&mut self.buffer);
                    let start = self.offset;
                    self.offset += body.len();
                    self.ordinal += 1;
                    return parse_raw_segment(&body, &self.delimiters, start, self.ordinal).map(Some);
                }
                None => self.fill()?,
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if self.open_st.is_some() {
            self.violations.push("ST without matching SE".to_string());
        }
        if self.group.is_some() {
            self.violations.push("GS without matching GE".to_string());
        }
        if self.isa_control.is_empty() {
            self.violations.push("missing ISA segment".to_string());
        }
    }

    fn handle_se(&mut self, seg: &Segment) -> Option<TransactionSet> {
        let Some((st, body)) = self.open_st.take() else {
            self.violations.push("SE without matching ST".to_string());
            return None;
        };

        if seg.value(2) != st.value(2) {
            self.violations.push(format!(
                "transaction control number mismatch: ST02={}, SE02={}",
                st.value(2),
                seg.value(2)
            ));
        }
        let declared = seg.element(1).map_or(0, x12_ir::Element::as_int);
        let actual = i64::try_from(body.len() + 2).unwrap_or(i64::MAX);
        if declared != actual {
            self.violations.push(format!(
                "SE01 declares {declared} segments, found {actual}"
            ));
        }

        let (version, group_index, txn_index) = match self.group.as_mut() {
            Some(group) => {
                let txn_index = group.transactions;
                group.transactions += 1;
                (group.version.clone(), group.index, txn_index)
            }
            None => {
                self.violations
                    .push("transaction set outside any functional group".to_string());
                (String::new(), 0, 0)
            }
        };

        self.transactions_seen += 1;
        Some(assemble_transaction(
            self.registry,
            &st,
            body,
            &version,
            group_index,
            txn_index,
            &mut self.warnings,
        ))
    }
}

impl<R: Read> Iterator for TransactionStream<'_, R> {
    type Item = Result<TransactionSet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.finished {
            return None;
        }

        loop {
            let raw = match self.next_raw() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    self.finish();
                    return None;
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            if raw.id == "ISA" {
                self.isa_control = raw.fields.get(12).cloned().unwrap_or_default();
                continue;
            }

            let seg = raw.into_segment(&self.delimiters);
            match seg.id.as_str() {
                "GS" => {
                    if self.group.is_some() {
                        self.violations
                            .push("GS encountered while previous group is still open".to_string());
                    }
                    self.group = Some(OpenGroup {
                        version: seg.value(8),
                        control_number: seg.value(6),
                        transactions: 0,
                        index: self.groups_seen,
                    });
                    self.groups_seen += 1;
                }
                "GE" => match self.group.take() {
                    Some(group) => {
                        let declared = seg.element(1).map_or(0, x12_ir::Element::as_int);
                        let actual = i64::try_from(group.transactions).unwrap_or(i64::MAX);
                        if declared != actual {
                            self.violations.push(format!(
                                "GE01 declares {declared} transaction sets, found {actual}"
                            ));
                        }
                        if seg.value(2).trim() != group.control_number.trim() {
                            self.violations.push(format!(
                                "group control number mismatch: GS06={}, GE02={}",
                                group.control_number,
                                seg.value(2)
                            ));
                        }
                    }
                    None => self.violations.push("GE without matching GS".to_string()),
                },
                "ST" => {
                    if self.open_st.is_some() {
                        self.violations.push("ST without matching SE".to_string());
                    }
                    self.open_st = Some((seg, Vec::new()));
                }
                "SE" => {
                    if let Some(txn) = self.handle_se(&seg) {
                        return Some(Ok(txn));
                    }
                }
                "IEA" => {
                    self.saw_iea = true;
                    let declared = seg.element(1).map_or(0, x12_ir::Element::as_int);
                    let actual = i64::try_from(self.groups_seen).unwrap_or(i64::MAX);
                    if declared != actual {
                        self.violations.push(format!(
                            "IEA01 declares {declared} functional groups, found {actual}"
                        ));
                    }
                    if seg.value(2).trim() != self.isa_control.trim() {
                        self.violations.push(format!(
                            "interchange control number mismatch: ISA13={}, IEA02={}",
                            self.isa_control,
                            seg.value(2)
                        ));
                    }
                }
                _ => match self.open_st.as_mut() {
                    Some((_, body)) => body.push(seg),
                    None => self.violations.push(format!(
                        "segment {} outside any transaction set",
                        seg.id
                    )),
                },
            }
        }
    }
}
