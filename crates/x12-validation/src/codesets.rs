//! Code-set registry
//!
//! Built-in X12 code tables referenced by element rules. Lookups against an
//! unregistered set are permissive: membership cannot be checked, so the
//! value passes.

use std::collections::HashMap;
use tracing::trace;

/// A named set of valid codes with descriptions
#[derive(Debug, Clone, Default)]
pub struct CodeSet {
    /// Unique identifier for the code set
    pub name: String,
    /// Human-readable description
    pub description: String,
    codes: HashMap<String, String>,
}

impl CodeSet {
    /// Create an empty code set.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            codes: HashMap::new(),
        }
    }

    /// Create a code set from `(code, description)` pairs.
    pub fn from_pairs(
        name: impl Into<String>,
        description: impl Into<String>,
        pairs: &[(&str, &str)],
    ) -> Self {
        let mut set = Self::new(name, description);
        for (code, desc) in pairs {
            set.insert(*code, *desc);
        }
        set
    }

    /// Insert a code.
    pub fn insert(&mut self, code: impl Into<String>, description: impl Into<String>) {
        self.codes.insert(code.into(), description.into());
    }

    /// Membership check.
    #[must_use]
    pub fn is_valid(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    /// Description for a code.
    #[must_use]
    pub fn description_of(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when no codes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Registry of code sets, read-only after initialization
#[derive(Debug, Clone, Default)]
pub struct CodeRegistry {
    sets: HashMap<String, CodeSet>,
}

impl CodeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry loaded with the built-in X12 tables.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for set in builtin_code_sets() {
            registry.register(set);
        }
        registry
    }

    /// Register a code set, replacing any previous one with the same name.
    pub fn register(&mut self, set: CodeSet) {
        self.sets.insert(set.name.clone(), set);
    }

    /// Code set by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CodeSet> {
        self.sets.get(name)
    }

    /// Validate a value against a named set; unknown sets pass.
    #[must_use]
    pub fn is_valid(&self, set_name: &str, value: &str) -> bool {
        match self.sets.get(set_name) {
            Some(set) => set.is_valid(value),
            None => {
                trace!(set = set_name, "code set not registered, passing value");
                true
            }
        }
    }

    /// Sorted names of all registered sets.
    #[must_use]
    pub fn names(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.sets.keys().collect();
        names.sort();
        names
    }
}

/// Built-in code tables.
#[must_use]
pub fn builtin_code_sets() -> Vec<CodeSet> {
    vec![
        CodeSet::from_pairs(
            "entity_identifier",
            "Entity Identifier Codes (NM101)",
            &[
                ("03", "Dependent"),
                ("1P", "Provider"),
                ("36", "Employer"),
                ("40", "Receiver"),
                ("41", "Submitter"),
                ("71", "Attending Physician"),
                ("72", "Operating Physician"),
                ("77", "Service Location"),
                ("82", "Rendering Provider"),
                ("85", "Billing Provider"),
                ("87", "Pay-to Provider"),
                ("DK", "Ordering Physician"),
                ("DN", "Referring Provider"),
                ("DQ", "Supervising Physician"),
                ("FA", "Facility"),
                ("IL", "Insured or Subscriber"),
                ("P3", "Primary Care Provider"),
                ("PE", "Payee"),
                ("PR", "Payer"),
                ("QC", "Patient"),
                ("QD", "Responsible Party"),
                ("TT", "Transfer To"),
                ("VN", "Vendor"),
            ],
        ),
        CodeSet::from_pairs(
            "place_of_service",
            "Place of Service Codes (CLM05-1)",
            &[
                ("01", "Pharmacy"),
                ("02", "Telehealth"),
                ("11", "Office"),
                ("12", "Home"),
                ("19", "Off Campus-Outpatient Hospital"),
                ("20", "Urgent Care Facility"),
                ("21", "Inpatient Hospital"),
                ("22", "On Campus-Outpatient Hospital"),
                ("23", "Emergency Room - Hospital"),
                ("24", "Ambulatory Surgical Center"),
                ("31", "Skilled Nursing Facility"),
                ("32", "Nursing Facility"),
                ("34", "Hospice"),
                ("41", "Ambulance - Land"),
                ("49", "Independent Clinic"),
                ("50", "Federally Qualified Health Center"),
                ("65", "End Stage Renal Disease Treatment Facility"),
                ("71", "Public Health Clinic"),
                ("81", "Independent Laboratory"),
                ("99", "Other Place of Service"),
            ],
        ),
        CodeSet::from_pairs(
            "claim_status",
            "Claim Status Codes (CLP02)",
            &[
                ("1", "Processed as Primary"),
                ("2", "Processed as Secondary"),
                ("3", "Processed as Tertiary"),
                ("4", "Denied"),
                ("19", "Processed as Primary, Forwarded to Additional Payer"),
                ("20", "Processed as Secondary, Forwarded to Additional Payer"),
                ("22", "Reversal of Previous Payment"),
                ("25", "Predetermination Pricing Only - No Payment"),
            ],
        ),
        CodeSet::from_pairs(
            "claim_filing_indicator",
            "Claim Filing Indicator Codes (SBR09)",
            &[
                ("09", "Self Pay"),
                ("11", "Other Non-Federal Programs"),
                ("12", "Preferred Provider Organization (PPO)"),
                ("13", "Point of Service (POS)"),
                ("14", "Exclusive Provider Organization (EPO)"),
                ("15", "Indemnity Insurance"),
                ("16", "HMO Medicare Risk"),
                ("17", "Dental Maintenance Organization"),
                ("AM", "Automobile Medical"),
                ("BL", "Blue Cross/Blue Shield"),
                ("CH", "CHAMPUS"),
                ("CI", "Commercial Insurance"),
                ("DS", "Disability"),
                ("FI", "Federal Employees Program"),
                ("HM", "Health Maintenance Organization"),
                ("LM", "Liability Medical"),
                ("MA", "Medicare Part A"),
                ("MB", "Medicare Part B"),
                ("MC", "Medicaid"),
                ("OF", "Other Federal Program"),
                ("TV", "Title V"),
                ("VA", "Veterans Affairs Plan"),
                ("WC", "Workers' Compensation Health Claim"),
                ("ZZ", "Mutually Defined"),
            ],
        ),
        CodeSet::from_pairs(
            "diagnosis_type",
            "Diagnosis Code Qualifiers (HI01-1)",
            &[
                ("ABK", "ICD-10-CM Principal Diagnosis"),
                ("ABF", "ICD-10-CM Diagnosis"),
                ("ABJ", "ICD-10-CM Admitting Diagnosis"),
                ("ABN", "ICD-10-CM External Cause of Injury"),
                ("APR", "ICD-10-CM Patient Reason for Visit"),
                ("BK", "ICD-9-CM Principal Diagnosis"),
                ("BF", "ICD-9-CM Diagnosis"),
            ],
        ),
        CodeSet::from_pairs(
            "reference_qualifier",
            "Reference Identification Qualifiers (REF01)",
            &[
                ("0B", "State License Number"),
                ("1G", "Provider UPIN Number"),
                ("2U", "Payer Identification Number"),
                ("D9", "Claim Number"),
                ("EA", "Medical Record Identification Number"),
                ("EI", "Employer's Identification Number"),
                ("F8", "Original Reference Number"),
                ("G2", "Provider Commercial Number"),
                ("LU", "Location Number"),
                ("SY", "Social Security Number"),
                ("TJ", "Federal Taxpayer's Identification Number"),
            ],
        ),
        CodeSet::from_pairs(
            "date_format",
            "Date Time Period Format Qualifiers (DTP02)",
            &[
                ("D8", "Date Expressed in Format CCYYMMDD"),
                ("DT", "Date and Time Expressed in Format CCYYMMDDHHMM"),
                ("RD8", "Range of Dates CCYYMMDD-CCYYMMDD"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_membership() {
        let registry = CodeRegistry::with_builtin();
        assert!(registry.is_valid("entity_identifier", "85"));
        assert!(registry.is_valid("entity_identifier", "IL"));
        assert!(!registry.is_valid("entity_identifier", "XX"));
        assert!(registry.is_valid("claim_status", "4"));
        assert!(!registry.is_valid("claim_status", "99"));
        assert!(registry.is_valid("diagnosis_type", "ABK"));
    }

    #[test]
    fn test_unregistered_set_is_permissive() {
        let registry = CodeRegistry::with_builtin();
        assert!(registry.is_valid("not_a_real_set", "ANY"));
    }

    #[test]
    fn test_descriptions() {
        let registry = CodeRegistry::with_builtin();
        let set = registry.get("place_of_service").unwrap();
        assert_eq!(set.description_of("11"), Some("Office"));
        assert_eq!(set.description_of("98"), None);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_register_custom_set() {
        let mut registry = CodeRegistry::new();
        registry.register(CodeSet::from_pairs("units", "Units", &[("UN", "Unit")]));
        assert!(registry.is_valid("units", "UN"));
        assert!(!registry.is_valid("units", "KG"));
        assert_eq!(registry.names(), vec!["units"]);
    }
}
