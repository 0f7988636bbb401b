//! Generation of EDI bytes from interchange trees
//!
//! Envelope control counts and segment counts are recomputed, never copied;
//! stale trailer fields in the tree are overwritten silently. The ISA
//! segment is emitted with fixed-width, space-padded fields. Trailing empty
//! elements are elided. A delimiter byte appearing in element data is a
//! generation error.

use crate::{Error, Result};
use chrono::Utc;
use x12_ir::{Delimiters, ElementValue, FunctionalGroup, Interchange, Segment, TransactionSet};

/// Serializes interchange trees to X12 bytes
#[derive(Debug, Default)]
pub struct Generator {
    override_delimiters: Option<Delimiters>,
}

impl Generator {
    /// Generate with each tree's own delimiters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate with an explicit delimiter choice, overriding the tree's.
    #[must_use]
    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self {
            override_delimiters: Some(delimiters),
        }
    }

    /// Serialize a complete interchange.
    pub fn generate(&self, interchange: &Interchange) -> Result<Vec<u8>> {
        let delimiters = self.override_delimiters.unwrap_or(interchange.delimiters);
        delimiters
            .validate()
            .map_err(|e| Error::Generation(e.to_string()))?;

        let mut out = Vec::new();
        self.write_isa(&mut out, interchange, &delimiters)?;

        for group in &interchange.functional_groups {
            write_gs(&mut out, group, &delimiters)?;
            for txn in &group.transactions {
                write_transaction(&mut out, txn, &delimiters)?;
            }
            // GE01 is recomputed from the tree, GE02 echoes GS06.
            write_segment(
                &mut out,
                &Segment::from_values(
                    "GE",
                    vec![group.transactions.len().to_string(), group.control_number.clone()],
                ),
                &delimiters,
            )?;
        }

        // IEA01 recomputed, IEA02 echoes ISA13.
        write_segment(
            &mut out,
            &Segment::from_values(
                "IEA",
                vec![
                    interchange.functional_groups.len().to_string(),
                    zero_pad(&interchange.control_number, 9),
                ],
            ),
            &delimiters,
        )?;

        Ok(out)
    }

    /// Serialize one transaction set (ST through SE) with explicit
    /// delimiters, for callers working below the interchange level.
    pub fn transaction_bytes(&self, txn: &TransactionSet, fallback: &Delimiters) -> Result<Vec<u8>> {
        let delimiters = self.override_delimiters.unwrap_or(*fallback);
        let mut out = Vec::new();
        write_transaction(&mut out, txn, &delimiters)?;
        Ok(out)
    }

    fn write_isa(
        &self,
        out: &mut Vec<u8>,
        interchange: &Interchange,
        delimiters: &Delimiters,
    ) -> Result<()> {
        let now = Utc::now();
        let date = non_empty_or(&interchange.date, || now.format("%y%m%d").to_string());
        let time = non_empty_or(&interchange.time, || now.format("%H%M").to_string());

        // ISA11 carries the repetition separator for 00501 interchanges; the
        // legacy standards identifier is emitted when none is configured.
        let repetition = delimiters.repetition.map_or("U".to_string(), |b| {
            char::from(b).to_string()
        });

        let fields = [
            fixed(&interchange.authorization_qualifier, 2),
            fixed(&interchange.authorization_info, 10),
            fixed(&interchange.security_qualifier, 2),
            fixed(&interchange.security_info, 10),
            fixed(&interchange.sender_qualifier, 2),
            fixed(&interchange.sender_id, 15),
            fixed(&interchange.receiver_qualifier, 2),
            fixed(&interchange.receiver_id, 15),
            fixed(&date, 6),
            fixed(&time, 4),
            repetition,
            fixed(&interchange.version, 5),
            zero_pad(&interchange.control_number, 9),
            fixed(&interchange.ack_requested, 1),
            fixed(&interchange.usage, 1),
            char::from(delimiters.component).to_string(),
        ];

        out.extend_from_slice(b"ISA");
        for (index, field) in fields.iter().enumerate() {
            out.push(delimiters.element);
            // ISA11 and ISA16 are delimiter characters by definition.
            if !matches!(index, 10 | 15) {
                check_collision(field, delimiters)?;
            }
            out.extend_from_slice(field.as_bytes());
        }
        out.push(delimiters.segment);
        Ok(())
    }
}

fn non_empty_or(value: &str, default: impl FnOnce() -> String) -> String {
    if value.is_empty() {
        default()
    } else {
        value.to_string()
    }
}

/// Fixed-width field: truncated or right-padded with spaces.
fn fixed(value: &str, width: usize) -> String {
    let mut field: String = value.chars().take(width).collect();
    while field.chars().count() < width {
        field.push(' ');
    }
    field
}

/// Zero-pad a numeric control number to `width`; non-numeric values are
/// space-padded instead.
fn zero_pad(value: &str, width: usize) -> String {
    if value.len() >= width {
        return value.to_string();
    }
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("{value:0>width$}")
    } else {
        fixed(value, width)
    }
}

fn check_collision(value: &str, delimiters: &Delimiters) -> Result<()> {
    if delimiters.collides_with(value) {
        return Err(Error::Generation(format!(
            "element data {value:?} contains an active delimiter"
        )));
    }
    Ok(())
}

fn write_value(out: &mut Vec<u8>, value: &ElementValue, delimiters: &Delimiters) -> Result<()> {
    match value {
        ElementValue::Atomic(v) => {
            check_collision(v, delimiters)?;
            out.extend_from_slice(v.as_bytes());
        }
        ElementValue::Composite(parts) => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push(delimiters.component);
                }
                check_collision(part, delimiters)?;
                out.extend_from_slice(part.as_bytes());
            }
        }
        ElementValue::Repeated(reps) => {
            let separator = delimiters.repetition.ok_or_else(|| {
                Error::Generation(
                    "repeated element present but no repetition separator is configured"
                        .to_string(),
                )
            })?;
            for (i, rep) in reps.iter().enumerate() {
                if i > 0 {
                    out.push(separator);
                }
                write_value(out, rep, delimiters)?;
            }
        }
    }
    Ok(())
}

/// Serialize one segment, eliding trailing empty elements.
pub(crate) fn write_segment(
    out: &mut Vec<u8>,
    seg: &Segment,
    delimiters: &Delimiters,
) -> Result<()> {
    out.extend_from_slice(seg.id.as_bytes());
    for element in &seg.elements[..seg.last_populated_index()] {
        out.push(delimiters.element);
        write_value(out, &element.value, delimiters)?;
    }
    out.push(delimiters.segment);
    Ok(())
}

fn write_gs(out: &mut Vec<u8>, group: &FunctionalGroup, delimiters: &Delimiters) -> Result<()> {
    let now = Utc::now();
    let date = non_empty_or(&group.date, || now.format("%Y%m%d").to_string());
    let time = non_empty_or(&group.time, || now.format("%H%M").to_string());
    let agency = non_empty_or(&group.agency_code, || "X".to_string());

    write_segment(
        out,
        &Segment::from_values(
            "GS",
            vec![
                group.functional_id_code.clone(),
                group.sender_code.clone(),
                group.receiver_code.clone(),
                date,
                time,
                group.control_number.clone(),
                agency,
                group.version.clone(),
            ],
        ),
        delimiters,
    )
}

fn write_transaction(out: &mut Vec<u8>, txn: &TransactionSet, delimiters: &Delimiters) -> Result<()> {
    let mut st_values = vec![txn.transaction_set_id.clone(), txn.control_number.clone()];
    if let Some(ref implementation) = txn.implementation_reference {
        if !implementation.is_empty() {
            st_values.push(implementation.clone());
        }
    }
    write_segment(out, &Segment::from_values("ST", st_values), delimiters)?;

    let mut body = Vec::new();
    txn.root.walk_segments(&mut body);
    for seg in &body {
        write_segment(out, seg, delimiters)?;
    }

    // SE01 recomputed from the tree, SE02 echoes ST02.
    write_segment(
        out,
        &Segment::from_values(
            "SE",
            vec![(body.len() + 2).to_string(), txn.control_number.clone()],
        ),
        delimiters,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_ir::Loop;

    fn sample_interchange() -> Interchange {
        let mut interchange = Interchange::new("SENDER", "RECEIVER");
        interchange.date = "240101".to_string();
        interchange.time = "1200".to_string();
        interchange.control_number = "1".to_string();

        let mut group = FunctionalGroup::new("HS", "1", "005010X279A1");
        group.sender_code = "SENDER".to_string();
        group.receiver_code = "RECEIVER".to_string();
        group.date = "20240101".to_string();
        group.time = "1200".to_string();

        let mut txn = TransactionSet::new("270", "0001");
        txn.implementation_reference = Some("005010X279A1".to_string());
        txn.root
            .segments
            .push(Segment::from_values("BHT", vec!["0022", "13", "REF1", "20240101", "1200"]));
        let mut source = Loop::new("2000A");
        source
            .segments
            .push(Segment::from_values("HL", vec!["1", "", "20", "1"]));
        txn.root.loops.push(source);

        group.transactions.push(txn);
        interchange.functional_groups.push(group);
        interchange
    }

    #[test]
    fn test_isa_is_fixed_width() {
        let interchange = sample_interchange();
        let bytes = Generator::new().generate(&interchange).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let isa_end = text.find('~').unwrap();
        assert_eq!(isa_end + 1, 106, "ISA spans exactly 106 bytes");
        assert!(text.starts_with("ISA*00*          *00*          *ZZ*SENDER         *ZZ*"));
        assert!(text.contains("*^*00501*000000001*0*P*:~"));
    }

    #[test]
    fn test_counts_recomputed_not_copied() {
        let interchange = sample_interchange();
        let bytes = Generator::new().generate(&interchange).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        // ST + BHT + HL + SE = 4 segments.
        assert!(text.contains("SE*4*0001~"));
        assert!(text.contains("GE*1*1~"));
        assert!(text.ends_with("IEA*1*000000001~"));
    }

    #[test]
    fn test_trailing_empty_elements_elided() {
        let mut out = Vec::new();
        let seg = Segment::from_values("DTP", vec!["472", "D8", "20240105", "", ""]);
        write_segment(&mut out, &seg, &Delimiters::default()).unwrap();
        assert_eq!(out, b"DTP*472*D8*20240105~");
    }

    #[test]
    fn test_interior_empty_elements_kept() {
        let mut out = Vec::new();
        let seg = Segment::from_values("HL", vec!["1", "", "20", "1"]);
        write_segment(&mut out, &seg, &Delimiters::default()).unwrap();
        assert_eq!(out, b"HL*1**20*1~");
    }

    #[test]
    fn test_composite_serialization() {
        let mut out = Vec::new();
        let seg = Segment::new(
            "SV1",
            vec![
                ElementValue::Composite(vec!["HC".into(), "99213".into()]),
                ElementValue::Atomic("100".into()),
            ],
        );
        write_segment(&mut out, &seg, &Delimiters::default()).unwrap();
        assert_eq!(out, b"SV1*HC:99213*100~");
    }

    #[test]
    fn test_delimiter_collision_is_generation_error() {
        let mut interchange = sample_interchange();
        interchange.functional_groups[0].transactions[0]
            .root
            .segments
            .push(Segment::from_values("NM1", vec!["IL", "1", "DOE~SMITH"]));

        let err = Generator::new().generate(&interchange).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_repeated_value_without_separator_fails() {
        let delims = Delimiters::new(b'*', b'~', b':', None).unwrap();
        let mut out = Vec::new();
        let seg = Segment::new(
            "EB",
            vec![ElementValue::Repeated(vec![
                ElementValue::Atomic("1".into()),
                ElementValue::Atomic("2".into()),
            ])],
        );
        let err = write_segment(&mut out, &seg, &delims).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_override_delimiters() {
        let interchange = sample_interchange();
        let custom = Delimiters::new(b'|', b'!', b'>', Some(b'^')).unwrap();
        let bytes = Generator::with_delimiters(custom).generate(&interchange).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("ISA|00|"));
        assert!(text.contains("SE|4|0001!"));
        assert!(text.ends_with("IEA|1|000000001!"));
    }

    #[test]
    fn test_transaction_bytes_subtree() {
        let interchange = sample_interchange();
        let txn = &interchange.functional_groups[0].transactions[0];
        let bytes = Generator::new()
            .transaction_bytes(txn, &Delimiters::default())
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("ST*270*0001*005010X279A1~"));
        assert!(text.ends_with("SE*4*0001~"));
    }
}
