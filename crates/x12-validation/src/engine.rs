//! Three-pass validation engine
//!
//! Pass 1 checks loop/segment cardinality against the schema, pass 2 checks
//! element-level rules, pass 3 applies semantic and cross-field rules (the
//! HIPAA family when the profile activates it). No pass short-circuits;
//! every finding accumulates.

use crate::codesets::CodeRegistry;
use crate::primitives;
use crate::profile::ValidationProfile;
use crate::report::{Finding, Location, RuleCategory, Severity, ValidationReport};
use tracing::debug;
use x12_ir::{Element, Interchange, Loop, Segment, TransactionSet};
use x12_schema::{DataType, ElementRule, SchemaNode, SchemaRegistry, TransactionSchema};

/// Validates interchange trees against schemas and profile rules
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
    codes: CodeRegistry,
    profile: ValidationProfile,
}

impl<'r> Validator<'r> {
    /// Create a validator with the default profile.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_profile(registry, ValidationProfile::default())
    }

    /// Create a validator with an explicit profile.
    #[must_use]
    pub fn with_profile(registry: &'r SchemaRegistry, profile: ValidationProfile) -> Self {
        Self {
            registry,
            codes: CodeRegistry::with_builtin(),
            profile,
        }
    }

    /// The active profile.
    #[must_use]
    pub fn profile(&self) -> &ValidationProfile {
        &self.profile
    }

    /// Validate every transaction in the interchange.
    #[must_use]
    pub fn validate(&self, interchange: &Interchange) -> ValidationReport {
        let mut report = ValidationReport::new();

        for (group_index, group) in interchange.functional_groups.iter().enumerate() {
            for (txn_index, txn) in group.transactions.iter().enumerate() {
                let version = txn
                    .implementation_reference
                    .as_deref()
                    .unwrap_or(&group.version);
                let schema = self.registry.resolve(&txn.transaction_set_id, version);
                self.validate_transaction(txn, schema, group_index, txn_index, &mut report);
            }
        }

        report.sort_by_location();
        debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validation complete"
        );
        report
    }

    /// Validate a single transaction set (used by the streaming surface).
    #[must_use]
    pub fn validate_transaction_set(
        &self,
        txn: &TransactionSet,
        group_version: &str,
        group_index: usize,
        txn_index: usize,
    ) -> ValidationReport {
        let version = txn
            .implementation_reference
            .as_deref()
            .unwrap_or(group_version);
        let schema = self.registry.resolve(&txn.transaction_set_id, version);
        let mut report = ValidationReport::new();
        self.validate_transaction(txn, schema, group_index, txn_index, &mut report);
        report.sort_by_location();
        report
    }

    fn validate_transaction(
        &self,
        txn: &TransactionSet,
        schema: Option<&TransactionSchema>,
        group_index: usize,
        txn_index: usize,
        report: &mut ValidationReport,
    ) {
        let base = Location::transaction(group_index, txn_index);

        if let Some(schema) = schema.filter(|s| !s.flat) {
            self.check_structure(&schema.nodes, &txn.root, &base, None, report);
            self.check_elements(schema, txn, &base, report);
        }

        self.check_semantics(txn, &base, report);
    }

    fn add(
        &self,
        report: &mut ValidationReport,
        severity: Severity,
        code: &str,
        category: RuleCategory,
        message: String,
        location: Location,
    ) {
        let severity = self.profile.strictness.effective_severity(severity);
        report.add(Finding::new(severity, code, category, message, location));
    }

    // Pass 1: loop and segment cardinality.
    fn check_structure(
        &self,
        nodes: &[SchemaNode],
        tree: &Loop,
        base: &Location,
        loop_path: Option<&str>,
        report: &mut ValidationReport,
    ) {
        for node in nodes {
            match node {
                SchemaNode::Segment(seg_schema) => {
                    let count = tree.segments_by_id(&seg_schema.id).len();
                    let location = match loop_path {
                        Some(path) => base.clone().in_loop(path),
                        None => base.clone(),
                    };
                    if count < seg_schema.min_occurs {
                        self.add(
                            report,
                            Severity::Error,
                            "MISSING_SEGMENT",
                            RuleCategory::Schema,
                            format!(
                                "mandatory segment {} occurs {count} time(s), minimum is {}",
                                seg_schema.id, seg_schema.min_occurs
                            ),
                            location,
                        );
                    } else if seg_schema.max_occurs.is_some_and(|max| count > max) {
                        self.add(
                            report,
                            Severity::Error,
                            "TOO_MANY_SEGMENTS",
                            RuleCategory::Schema,
                            format!(
                                "segment {} occurs {count} time(s), maximum is {}",
                                seg_schema.id,
                                seg_schema.max_occurs.unwrap_or(0)
                            ),
                            location,
                        );
                    }
                }
                SchemaNode::Loop(loop_schema) => {
                    let instances = tree.loops_by_id(&loop_schema.id);
                    let child_path = match loop_path {
                        Some(path) => format!("{path}/{}", loop_schema.id),
                        None => loop_schema.id.clone(),
                    };
                    if instances.len() < loop_schema.min_occurs {
                        self.add(
                            report,
                            Severity::Error,
                            "MISSING_LOOP",
                            RuleCategory::Schema,
                            format!(
                                "mandatory loop {} occurs {} time(s), minimum is {}",
                                loop_schema.id,
                                instances.len(),
                                loop_schema.min_occurs
                            ),
                            base.clone().in_loop(child_path.clone()),
                        );
                    } else if loop_schema.max_occurs.is_some_and(|max| instances.len() > max) {
                        self.add(
                            report,
                            Severity::Error,
                            "TOO_MANY_LOOPS",
                            RuleCategory::Schema,
                            format!(
                                "loop {} occurs {} time(s), maximum is {}",
                                loop_schema.id,
                                instances.len(),
                                loop_schema.max_occurs.unwrap_or(0)
                            ),
                            base.clone().in_loop(child_path.clone()),
                        );
                    }
                    for instance in instances {
                        self.check_structure(
                            &loop_schema.children,
                            instance,
                            base,
                            Some(&child_path),
                            report,
                        );
                    }
                }
            }
        }
    }

    // Pass 2: element-level rules.
    fn check_elements(
        &self,
        schema: &TransactionSchema,
        txn: &TransactionSet,
        base: &Location,
        report: &mut ValidationReport,
    ) {
        walk_transaction(txn, |path, seg, ordinal| {
            let Some(seg_schema) = schema.find_segment(&seg.id) else {
                return;
            };
            for rule in &seg_schema.elements {
                let location = locate(base, path, seg, ordinal).at_element(rule.position);
                match seg.element(rule.position) {
                    None => {
                        if rule.required {
                            self.add(
                                report,
                                Severity::Error,
                                "MISSING_ELEMENT",
                                RuleCategory::Element,
                                format!(
                                    "mandatory element {}{:02} ({}) is missing",
                                    seg.id, rule.position, rule.name
                                ),
                                location,
                            );
                        }
                    }
                    Some(element) if element.value.is_empty() => {
                        if rule.required {
                            self.add(
                                report,
                                Severity::Error,
                                "MISSING_ELEMENT",
                                RuleCategory::Element,
                                format!(
                                    "mandatory element {}{:02} ({}) is empty",
                                    seg.id, rule.position, rule.name
                                ),
                                location,
                            );
                        }
                    }
                    Some(element) => self.check_element_value(seg, element, rule, location, report),
                }
            }
        });
    }

    fn check_element_value(
        &self,
        seg: &Segment,
        element: &Element,
        rule: &ElementRule,
        location: Location,
        report: &mut ValidationReport,
    ) {
        let flat = element.as_str();
        let head = element.value.first();

        if flat.len() < rule.min_length || flat.len() > rule.max_length {
            self.add(
                report,
                Severity::Error,
                "INVALID_ELEMENT",
                RuleCategory::Element,
                format!(
                    "element {}{:02} length {} outside {}..={}",
                    seg.id,
                    rule.position,
                    flat.len(),
                    rule.min_length,
                    rule.max_length
                ),
                location.clone(),
            );
        }

        let type_ok = match rule.data_type {
            DataType::Id | DataType::Alphanumeric => true,
            DataType::Date => primitives::validate_date(head),
            DataType::Time => primitives::validate_time(head),
            DataType::Integer => primitives::validate_integer(head),
            DataType::Decimal => primitives::validate_decimal(head),
        };
        if !type_ok {
            self.add(
                report,
                Severity::Error,
                "INVALID_ELEMENT",
                RuleCategory::Element,
                format!(
                    "element {}{:02} value {head:?} violates data type {:?}",
                    seg.id, rule.position, rule.data_type
                ),
                location.clone(),
            );
        }

        if let Some(ref set_name) = rule.code_set {
            if !self.codes.is_valid(set_name, head) {
                self.add(
                    report,
                    Severity::Error,
                    "CODE_SET_VIOLATION",
                    RuleCategory::CodeSet,
                    format!(
                        "element {}{:02} value {head:?} is not in code set {set_name}",
                        seg.id, rule.position
                    ),
                    location,
                );
            }
        }
    }

    // Pass 3: semantic and cross-field rules.
    fn check_semantics(&self, txn: &TransactionSet, base: &Location, report: &mut ValidationReport) {
        walk_transaction(txn, |path, seg, ordinal| {
            match seg.id.as_str() {
                "NM1" if self.profile.hipaa => self.check_nm1(seg, base, path, ordinal, report),
                "REF" if self.profile.hipaa => self.check_ref(seg, base, path, ordinal, report),
                "HI" if self.profile.hipaa => self.check_hi(seg, base, path, ordinal, report),
                "SV1" if self.profile.hipaa => self.check_sv1(seg, base, path, ordinal, report),
                "DTP" if self.profile.hipaa => self.check_dtp(seg, base, path, ordinal, report),
                "CLM" if self.profile.hipaa => self.check_clm(seg, base, path, ordinal, report),
                "BEG" => {
                    if seg.value(3).is_empty() {
                        self.add(
                            report,
                            Severity::Error,
                            "BEG_PO_REQUIRED",
                            RuleCategory::Semantic,
                            "BEG03 purchase order number required".to_string(),
                            locate(base, path, seg, ordinal).at_element(3),
                        );
                    }
                }
                "PO1" => {
                    if seg.value(2).is_empty() {
                        self.add(
                            report,
                            Severity::Warning,
                            "PO1_QTY_RECOMMENDED",
                            RuleCategory::Semantic,
                            "PO102 quantity recommended".to_string(),
                            locate(base, path, seg, ordinal).at_element(2),
                        );
                    }
                }
                _ => {}
            }
        });

        if self.profile.hipaa {
            self.check_claim_balance(&txn.root, base, &mut Vec::new(), report);
        }
    }

    fn check_nm1(
        &self,
        seg: &Segment,
        base: &Location,
        path: &str,
        ordinal: usize,
        report: &mut ValidationReport,
    ) {
        let entity = seg.first_value(1);
        let name = seg.value(3);
        if matches!(entity, "85" | "IL" | "QC" | "PR") && name.is_empty() {
            self.add(
                report,
                Severity::Error,
                "NM1_NAME_REQUIRED",
                RuleCategory::Semantic,
                format!("NM103 (name) required for entity {entity}"),
                locate(base, path, seg, ordinal).at_element(3),
            );
        }

        let qualifier = seg.value(8);
        let id_value = seg.value(9);
        if !id_value.is_empty() && qualifier.is_empty() {
            self.add(
                report,
                Severity::Error,
                "NM1_ID_REQUIRES_QUALIFIER",
                RuleCategory::Semantic,
                "NM109 (identifier) present but NM108 (qualifier) missing".to_string(),
                locate(base, path, seg, ordinal).at_element(8),
            );
        }
        if qualifier.len() > 3 && qualifier.bytes().all(|b| b.is_ascii_digit()) {
            self.add(
                report,
                Severity::Warning,
                "NM1_POSSIBLE_MISPLACED_ID",
                RuleCategory::Semantic,
                format!("NM108 contains numeric value that looks like an identifier: {qualifier}"),
                locate(base, path, seg, ordinal).at_element(8),
            );
        }
        if qualifier == "XX" && !id_value.is_empty() && !primitives::validate_npi(&id_value) {
            let finding_location = locate(base, path, seg, ordinal).at_element(9);
            let severity = self.profile.strictness.effective_severity(Severity::Error);
            report.add(
                Finding::new(
                    severity,
                    "INVALID_NPI",
                    RuleCategory::Semantic,
                    format!("NM109 fails the NPI check: {id_value}"),
                    finding_location,
                )
                .with_actual(id_value),
            );
        }
    }

    fn check_ref(
        &self,
        seg: &Segment,
        base: &Location,
        path: &str,
        ordinal: usize,
        report: &mut ValidationReport,
    ) {
        let qualifier = seg.value(1);
        let value = seg.value(2);
        if matches!(qualifier.as_str(), "EI" | "SY")
            && !value.is_empty()
            && !primitives::validate_tax_id(&value)
        {
            self.add(
                report,
                Severity::Error,
                "INVALID_TAX_ID",
                RuleCategory::Semantic,
                format!("REF02 is not a valid tax id for qualifier {qualifier}: {value}"),
                locate(base, path, seg, ordinal).at_element(2),
            );
        }
    }

    fn check_hi(
        &self,
        seg: &Segment,
        base: &Location,
        path: &str,
        ordinal: usize,
        report: &mut ValidationReport,
    ) {
        for element in &seg.elements {
            let qualifier = element.value.component(1).unwrap_or_default();
            if qualifier.is_empty() {
                continue;
            }
            if !self.codes.is_valid("diagnosis_type", qualifier) {
                self.add(
                    report,
                    Severity::Warning,
                    "HI_UNKNOWN_QUALIFIER",
                    RuleCategory::CodeSet,
                    format!("HI qualifier may be invalid: {qualifier}"),
                    locate(base, path, seg, ordinal)
                        .at_element(element.index)
                        .at_component(1),
                );
                continue;
            }
            // ICD-10 qualifiers demand an ICD-10-CM shaped code.
            if matches!(qualifier, "ABK" | "ABF" | "ABJ" | "ABN" | "APR") {
                let code = element.value.component(2).unwrap_or_default();
                if !code.is_empty() && !primitives::validate_icd10_cm(code) {
                    self.add(
                        report,
                        Severity::Error,
                        "INVALID_DIAGNOSIS_CODE",
                        RuleCategory::Semantic,
                        format!("HI diagnosis code is not valid ICD-10-CM: {code}"),
                        locate(base, path, seg, ordinal)
                            .at_element(element.index)
                            .at_component(2),
                    );
                }
            }
        }
    }

    fn check_sv1(
        &self,
        seg: &Segment,
        base: &Location,
        path: &str,
        ordinal: usize,
        report: &mut ValidationReport,
    ) {
        let procedure = seg.element(1);
        match procedure {
            None => self.add(
                report,
                Severity::Error,
                "SV1_PROCEDURE_REQUIRED",
                RuleCategory::Semantic,
                "SV101 procedure code required".to_string(),
                locate(base, path, seg, ordinal).at_element(1),
            ),
            Some(element) => {
                // SV101 is a composite: qualifier in component 1, code in 2.
                let code = element
                    .value
                    .component(2)
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| element.value.first());
                if !code.is_empty() && !primitives::validate_procedure_code(code) {
                    self.add(
                        report,
                        Severity::Error,
                        "INVALID_PROCEDURE_CODE",
                        RuleCategory::Semantic,
                        format!("SV101 is not a valid CPT/HCPCS code: {code}"),
                        locate(base, path, seg, ordinal).at_element(1).at_component(2),
                    );
                }
            }
        }

        if seg.value(2).is_empty() {
            self.add(
                report,
                Severity::Error,
                "SV1_CHARGE_REQUIRED",
                RuleCategory::Semantic,
                "SV102 charge amount required".to_string(),
                locate(base, path, seg, ordinal).at_element(2),
            );
        }
        if seg.value(4).is_empty() {
            self.add(
                report,
                Severity::Warning,
                "SV1_UNITS_RECOMMENDED",
                RuleCategory::Semantic,
                "SV104 unit count recommended".to_string(),
                locate(base, path, seg, ordinal).at_element(4),
            );
        }
    }

    fn check_dtp(
        &self,
        seg: &Segment,
        base: &Location,
        path: &str,
        ordinal: usize,
        report: &mut ValidationReport,
    ) {
        let format = seg.value(2);
        let value = seg.value(3);
        if format == "D8" && !value.is_empty() && !primitives::validate_date(&value) {
            self.add(
                report,
                Severity::Error,
                "DTP_INVALID_DATE",
                RuleCategory::Semantic,
                format!("DTP03 is not a valid CCYYMMDD date: {value}"),
                locate(base, path, seg, ordinal).at_element(3),
            );
        } else if format != "D8" && value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
            self.add(
                report,
                Severity::Warning,
                "DTP_QUALIFIER_MISMATCH",
                RuleCategory::Semantic,
                format!("8-character date should use the D8 qualifier, found {format:?}"),
                locate(base, path, seg, ordinal).at_element(2),
            );
        }
    }

    fn check_clm(
        &self,
        seg: &Segment,
        base: &Location,
        path: &str,
        ordinal: usize,
        report: &mut ValidationReport,
    ) {
        if seg.value(1).is_empty() {
            self.add(
                report,
                Severity::Error,
                "CLM_ID_REQUIRED",
                RuleCategory::Semantic,
                "CLM01 claim identifier required".to_string(),
                locate(base, path, seg, ordinal).at_element(1),
            );
        }
        let charge = seg.value(2);
        if charge.is_empty() {
            self.add(
                report,
                Severity::Error,
                "CLM_CHARGE_REQUIRED",
                RuleCategory::Semantic,
                "CLM02 total charge required".to_string(),
                locate(base, path, seg, ordinal).at_element(2),
            );
        } else if !primitives::validate_decimal(&charge) {
            self.add(
                report,
                Severity::Error,
                "CLM_INVALID_CHARGE",
                RuleCategory::Semantic,
                format!("CLM02 must be numeric: {charge}"),
                locate(base, path, seg, ordinal).at_element(2),
            );
        }
        if seg.value(5).is_empty() {
            self.add(
                report,
                Severity::Error,
                "CLM_FACILITY_REQUIRED",
                RuleCategory::Semantic,
                "CLM05 facility code information required".to_string(),
                locate(base, path, seg, ordinal).at_element(5),
            );
        }
    }

    // Claim totals must equal the sum of their service lines within the
    // profile tolerance.
    fn check_claim_balance(
        &self,
        tree: &Loop,
        base: &Location,
        path: &mut Vec<String>,
        report: &mut ValidationReport,
    ) {
        if tree.id == "2300" {
            if let Some(clm) = tree.segment("CLM") {
                let total = clm.element(2).map_or(0.0, Element::as_number);
                let lines: Vec<f64> = tree
                    .loops_by_id("2400")
                    .iter()
                    .filter_map(|line| line.segment("SV1"))
                    .map(|sv1| sv1.element(2).map_or(0.0, Element::as_number))
                    .collect();
                if !lines.is_empty() {
                    let sum: f64 = lines.iter().sum();
                    if (sum - total).abs() > self.profile.claim_balance_tolerance {
                        self.add(
                            report,
                            Severity::Error,
                            "CLAIM_BALANCE",
                            RuleCategory::Semantic,
                            format!(
                                "CLM02 total {total} does not equal service line sum {sum}"
                            ),
                            base.clone()
                                .in_loop(path.join("/"))
                                .at_segment("CLM", clm.position.ordinal)
                                .at_element(2),
                        );
                    }
                }
            }
        }

        for child in &tree.loops {
            path.push(child.id.clone());
            self.check_claim_balance(child, base, path, report);
            path.pop();
        }
    }
}

fn locate(base: &Location, path: &str, seg: &Segment, ordinal: usize) -> Location {
    let mut location = base.clone();
    if !path.is_empty() {
        location = location.in_loop(path);
    }
    location.at_segment(seg.id.clone(), ordinal)
}

/// Walk every segment of a transaction in document order, tracking the loop
/// path and the segment position within the transaction (ST = 1, so the
/// first body segment is 2).
fn walk_transaction(txn: &TransactionSet, mut visit: impl FnMut(&str, &Segment, usize)) {
    fn recurse(
        node: &Loop,
        path: &mut Vec<String>,
        ordinal: &mut usize,
        visit: &mut impl FnMut(&str, &Segment, usize),
    ) {
        let path_str = path.join("/");
        for seg in &node.segments {
            *ordinal += 1;
            visit(&path_str, seg, *ordinal);
        }
        for child in &node.loops {
            path.push(child.id.clone());
            recurse(child, path, ordinal, visit);
            path.pop();
        }
    }

    let mut ordinal = 1; // ST occupies position 1
    recurse(&txn.root, &mut Vec::new(), &mut ordinal, &mut visit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use x12_ir::FunctionalGroup;

    fn interchange_with(txn: TransactionSet, version: &str, functional_id: &str) -> Interchange {
        let mut interchange = Interchange::new("SENDER", "RECEIVER");
        let mut group = FunctionalGroup::new(functional_id, "1", version);
        group.transactions.push(txn);
        interchange.functional_groups.push(group);
        interchange
    }

    fn minimal_837() -> TransactionSet {
        let mut txn = TransactionSet::new("837", "0001");
        txn.implementation_reference = Some("005010X222A1".to_string());
        txn.root
            .segments
            .push(Segment::from_values("BHT", vec!["0019", "00", "X1", "20240101", "1200"]));

        let mut submitter = Loop::new("1000A");
        submitter
            .segments
            .push(Segment::from_values("NM1", vec!["41", "2", "SUBMITTER"]));
        txn.root.loops.push(submitter);

        let mut receiver = Loop::new("1000B");
        receiver
            .segments
            .push(Segment::from_values("NM1", vec!["40", "2", "RECEIVER"]));
        txn.root.loops.push(receiver);

        let mut billing = Loop::new("2000A");
        billing
            .segments
            .push(Segment::from_values("HL", vec!["1", "", "20", "1"]));
        let mut billing_name = Loop::new("2010AA");
        billing_name.segments.push(Segment::from_values(
            "NM1",
            vec!["85", "2", "CLINIC", "", "", "", "", "XX", "1234567893"],
        ));
        billing.loops.push(billing_name);
        txn.root.loops.push(billing);

        let mut subscriber = Loop::new("2000B");
        subscriber
            .segments
            .push(Segment::from_values("HL", vec!["2", "1", "22", "0"]));
        subscriber
            .segments
            .push(Segment::from_values("SBR", vec!["P", "18", "", "", "", "", "", "", "MC"]));
        let mut subscriber_name = Loop::new("2010BA");
        subscriber_name
            .segments
            .push(Segment::from_values("NM1", vec!["IL", "1", "DOE", "JANE"]));
        subscriber.loops.push(subscriber_name);

        let mut claim = Loop::new("2300");
        claim.segments.push(Segment::new(
            "CLM",
            vec![
                x12_ir::ElementValue::Atomic("A37YH556".into()),
                x12_ir::ElementValue::Atomic("100".into()),
                x12_ir::ElementValue::Atomic(String::new()),
                x12_ir::ElementValue::Atomic(String::new()),
                x12_ir::ElementValue::Composite(vec!["11".into(), "B".into(), "1".into()]),
            ],
        ));
        claim.segments.push(Segment::new(
            "HI",
            vec![x12_ir::ElementValue::Composite(vec![
                "ABK".into(),
                "J45.909".into(),
            ])],
        ));
        let mut line = Loop::new("2400");
        line.segments.push(Segment::from_values("LX", vec!["1"]));
        line.segments.push(Segment::new(
            "SV1",
            vec![
                x12_ir::ElementValue::Composite(vec!["HC".into(), "99213".into()]),
                x12_ir::ElementValue::Atomic("100".into()),
                x12_ir::ElementValue::Atomic("UN".into()),
                x12_ir::ElementValue::Atomic("1".into()),
            ],
        ));
        claim.loops.push(line);
        subscriber.loops.push(claim);
        txn.root.loops.push(subscriber);

        txn
    }

    #[test]
    fn test_valid_837_produces_clean_report() {
        let interchange = interchange_with(minimal_837(), "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::with_profile(&registry, ValidationProfile::hipaa_5010());

        let report = validator.validate(&interchange);
        assert!(
            report.is_valid(),
            "expected clean report, got: {:?}",
            report.findings
        );
    }

    #[test]
    fn test_missing_mandatory_loop_reported() {
        let mut txn = minimal_837();
        txn.root.loops.retain(|l| l.id != "1000A");
        let interchange = interchange_with(txn, "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::new(&registry);

        let report = validator.validate(&interchange);
        assert!(report
            .errors()
            .any(|f| f.code == "MISSING_LOOP" && f.location.loop_path.as_deref() == Some("1000A")));
    }

    #[test]
    fn test_npi_luhn_failure_located_at_nm109() {
        let mut txn = minimal_837();
        // Corrupt the billing provider NPI.
        let billing = txn
            .root
            .loops
            .iter_mut()
            .find(|l| l.id == "2000A")
            .unwrap()
            .loops
            .iter_mut()
            .find(|l| l.id == "2010AA")
            .unwrap();
        billing.segments[0] = Segment::from_values(
            "NM1",
            vec!["85", "2", "CLINIC", "", "", "", "", "XX", "1234567890"],
        );

        let interchange = interchange_with(txn, "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::with_profile(&registry, ValidationProfile::hipaa_5010());

        let report = validator.validate(&interchange);
        let finding = report.errors().find(|f| f.code == "INVALID_NPI").unwrap();
        assert_eq!(finding.location.segment_id.as_deref(), Some("NM1"));
        assert_eq!(finding.location.element, Some(9));
        assert_eq!(finding.actual.as_deref(), Some("1234567890"));
        assert_eq!(finding.category, RuleCategory::Semantic);
    }

    #[test]
    fn test_bad_diagnosis_code_reported() {
        let mut txn = minimal_837();
        let claim = txn
            .root
            .loops
            .iter_mut()
            .find(|l| l.id == "2000B")
            .unwrap()
            .loops
            .iter_mut()
            .find(|l| l.id == "2300")
            .unwrap();
        claim.segments[1] = Segment::new(
            "HI",
            vec![x12_ir::ElementValue::Composite(vec![
                "ABK".into(),
                "NOTACODE".into(),
            ])],
        );

        let interchange = interchange_with(txn, "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::with_profile(&registry, ValidationProfile::hipaa_5010());

        let report = validator.validate(&interchange);
        let finding = report
            .errors()
            .find(|f| f.code == "INVALID_DIAGNOSIS_CODE")
            .unwrap();
        assert_eq!(finding.location.component, Some(2));
    }

    #[test]
    fn test_claim_balance_mismatch() {
        let mut txn = minimal_837();
        let claim = txn
            .root
            .loops
            .iter_mut()
            .find(|l| l.id == "2000B")
            .unwrap()
            .loops
            .iter_mut()
            .find(|l| l.id == "2300")
            .unwrap();
        // Claim says 100, single line says 40.
        claim.loops[0].segments[1] = Segment::new(
            "SV1",
            vec![
                x12_ir::ElementValue::Composite(vec!["HC".into(), "99213".into()]),
                x12_ir::ElementValue::Atomic("40".into()),
                x12_ir::ElementValue::Atomic("UN".into()),
                x12_ir::ElementValue::Atomic("1".into()),
            ],
        );

        let interchange = interchange_with(txn, "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::with_profile(&registry, ValidationProfile::hipaa_5010());

        let report = validator.validate(&interchange);
        assert!(report.errors().any(|f| f.code == "CLAIM_BALANCE"));
    }

    #[test]
    fn test_missing_mandatory_element_reported() {
        let mut txn = TransactionSet::new("850", "0001");
        // BEG with no PO number in BEG03.
        txn.root
            .segments
            .push(Segment::from_values("BEG", vec!["00", "SA"]));
        let mut po1 = Loop::new("PO1");
        po1.segments
            .push(Segment::from_values("PO1", vec!["1", "10", "EA", "9.95"]));
        txn.root.loops.push(po1);

        let interchange = interchange_with(txn, "004010", "PO");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::new(&registry);

        let report = validator.validate(&interchange);
        assert!(report
            .errors()
            .any(|f| f.code == "MISSING_ELEMENT" && f.location.element == Some(3)));
        assert!(report.errors().any(|f| f.code == "BEG_PO_REQUIRED"));
    }

    #[test]
    fn test_strict_profile_escalates_warnings() {
        let mut txn = minimal_837();
        let claim = txn
            .root
            .loops
            .iter_mut()
            .find(|l| l.id == "2000B")
            .unwrap()
            .loops
            .iter_mut()
            .find(|l| l.id == "2300")
            .unwrap();
        // Drop SV104 units: a warning under the standard profile.
        claim.loops[0].segments[1] = Segment::new(
            "SV1",
            vec![
                x12_ir::ElementValue::Composite(vec!["HC".into(), "99213".into()]),
                x12_ir::ElementValue::Atomic("100".into()),
            ],
        );

        let interchange = interchange_with(txn, "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();

        let standard = Validator::with_profile(&registry, ValidationProfile::hipaa_5010());
        let report = standard.validate(&interchange);
        assert!(report.warnings().any(|f| f.code == "SV1_UNITS_RECOMMENDED"));
        assert!(report.is_valid());

        let strict = Validator::with_profile(
            &registry,
            ValidationProfile::hipaa_5010().with_strictness(crate::StrictnessLevel::Strict),
        );
        let report = strict.validate(&interchange);
        assert!(report.errors().any(|f| f.code == "SV1_UNITS_RECOMMENDED"));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let interchange = interchange_with(minimal_837(), "005010X222A1", "HC");
        let registry = SchemaRegistry::with_builtin();
        let validator = Validator::with_profile(&registry, ValidationProfile::hipaa_5010());

        let first = validator.validate(&interchange);
        let second = validator.validate(&interchange);
        let codes = |r: &ValidationReport| {
            r.findings
                .iter()
                .map(|f| (f.code.clone(), f.location.sort_key()))
                .collect::<Vec<_>>()
        };
        assert_eq!(codes(&first), codes(&second));
    }
}
