//! Trading partner configuration

use serde::{Deserialize, Serialize};
use x12_ir::Delimiters;
use x12_validation::{StrictnessLevel, ValidationProfile};

/// Contact information for a trading partner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// Everything needed to exchange EDI with one partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingPartner {
    /// Unique internal identifier
    pub partner_id: String,
    /// Human-readable partner name
    pub name: String,
    /// ISA sender/receiver ID (ISA06/ISA08), at most 15 characters
    #[serde(default)]
    pub interchange_id: String,
    /// ISA ID qualifier (ISA05/ISA07), exactly 2 characters
    #[serde(default = "default_qualifier")]
    pub interchange_qualifier: String,
    /// GS application sender code (GS02)
    #[serde(default)]
    pub application_sender_code: String,
    /// GS application receiver code (GS03)
    #[serde(default)]
    pub application_receiver_code: String,
    /// Transaction types this partner exchanges
    #[serde(default)]
    pub supported_transactions: Vec<String>,
    /// Preferred delimiters, if the partner deviates from defaults
    #[serde(default)]
    pub delimiters: Option<Delimiters>,
    /// Partner expects a 997 for each inbound group
    #[serde(default)]
    pub requires_997: bool,
    /// Partner expects a 999 for each inbound group
    #[serde(default)]
    pub requires_999: bool,
    /// Run the HIPAA semantic pass for this partner
    #[serde(default)]
    pub hipaa: bool,
    /// Validation strictness for this partner
    #[serde(default)]
    pub strictness: StrictnessLevel,
    /// Production partner (false = test)
    #[serde(default = "default_true")]
    pub is_production: bool,
    /// Preferred X12 version
    #[serde(default = "default_version")]
    pub preferred_version: String,
    /// Contact information
    #[serde(default)]
    pub contact: Option<ContactInfo>,
}

fn default_qualifier() -> String {
    "ZZ".to_string()
}

fn default_version() -> String {
    "005010".to_string()
}

fn default_true() -> bool {
    true
}

impl TradingPartner {
    /// Create a minimal partner.
    pub fn new(partner_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            partner_id: partner_id.into(),
            name: name.into(),
            interchange_id: String::new(),
            interchange_qualifier: default_qualifier(),
            application_sender_code: String::new(),
            application_receiver_code: String::new(),
            supported_transactions: Vec::new(),
            delimiters: None,
            requires_997: false,
            requires_999: false,
            hipaa: false,
            strictness: StrictnessLevel::default(),
            is_production: true,
            preferred_version: default_version(),
            contact: None,
        }
    }

    /// Set the interchange identity.
    #[must_use]
    pub fn with_interchange(mut self, id: impl Into<String>, qualifier: impl Into<String>) -> Self {
        self.interchange_id = id.into();
        self.interchange_qualifier = qualifier.into();
        self
    }

    /// Set preferred delimiters.
    #[must_use]
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = Some(delimiters);
        self
    }

    /// Enable HIPAA validation at the given strictness.
    #[must_use]
    pub fn with_hipaa(mut self, strictness: StrictnessLevel) -> Self {
        self.hipaa = true;
        self.strictness = strictness;
        self
    }

    /// Delimiters to use for this partner, defaults when unconfigured.
    #[must_use]
    pub fn effective_delimiters(&self) -> Delimiters {
        self.delimiters.unwrap_or_default()
    }

    /// Validation profile derived from the partner's flags.
    #[must_use]
    pub fn validation_profile(&self) -> ValidationProfile {
        let profile = if self.hipaa {
            ValidationProfile::hipaa_5010()
        } else {
            ValidationProfile::default()
        };
        profile.with_strictness(self.strictness)
    }

    /// True if the partner exchanges the given transaction type; an empty
    /// list means all types are accepted.
    #[must_use]
    pub fn supports_transaction(&self, transaction_set_id: &str) -> bool {
        self.supported_transactions.is_empty()
            || self.supported_transactions.iter().any(|t| t == transaction_set_id)
    }

    /// Configuration problems, empty when the partner is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.partner_id.is_empty() {
            problems.push("partner id is required".to_string());
        }
        if self.name.is_empty() {
            problems.push("partner name is required".to_string());
        }
        if self.interchange_id.len() > 15 {
            problems.push("interchange id must be at most 15 characters".to_string());
        }
        if !self.interchange_id.is_empty() && self.interchange_qualifier.len() != 2 {
            problems.push("interchange qualifier must be exactly 2 characters".to_string());
        }
        if let Some(delimiters) = self.delimiters {
            if let Err(e) = delimiters.validate() {
                problems.push(e.to_string());
            }
        }
        problems
    }
}
