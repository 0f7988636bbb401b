//! Validation profiles
//!
//! Partner-specific strictness is modeled as a flag set consumed by the
//! validator, not as conditionally-loaded code paths.

use crate::report::Severity;
use serde::{Deserialize, Serialize};

/// Strictness level for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrictnessLevel {
    /// Accept with warnings (real-world EDI)
    Permissive,
    /// Standard validation
    #[default]
    Standard,
    /// Escalate warnings to errors
    Strict,
}

impl StrictnessLevel {
    /// Severity actually recorded for a finding under this level.
    #[must_use]
    pub fn effective_severity(self, severity: Severity) -> Severity {
        match (self, severity) {
            (StrictnessLevel::Strict, Severity::Warning) => Severity::Error,
            (StrictnessLevel::Permissive, Severity::Error) => Severity::Warning,
            _ => severity,
        }
    }
}

/// Flag set selecting which rule families run and how failures rank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationProfile {
    /// Run the HIPAA semantic pass (NPI, tax id, ICD-10, CPT, claim balance)
    pub hipaa: bool,
    /// Strictness applied to every finding
    pub strictness: StrictnessLevel,
    /// Tolerance for claim total vs. line-item sum comparisons
    pub claim_balance_tolerance: f64,
    /// Treat semantic errors as fatal when deriving acknowledgments
    pub fatal_semantics: bool,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        Self {
            hipaa: false,
            strictness: StrictnessLevel::Standard,
            claim_balance_tolerance: 0.01,
            fatal_semantics: false,
        }
    }
}

impl ValidationProfile {
    /// Profile for HIPAA 5010 healthcare documents.
    #[must_use]
    pub fn hipaa_5010() -> Self {
        Self {
            hipaa: true,
            ..Self::default()
        }
    }

    /// Override the strictness level.
    #[must_use]
    pub fn with_strictness(mut self, strictness: StrictnessLevel) -> Self {
        self.strictness = strictness;
        self
    }

    /// Mark semantic errors fatal for acknowledgment purposes.
    #[must_use]
    pub fn with_fatal_semantics(mut self) -> Self {
        self.fatal_semantics = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_severity() {
        assert_eq!(
            StrictnessLevel::Strict.effective_severity(Severity::Warning),
            Severity::Error
        );
        assert_eq!(
            StrictnessLevel::Standard.effective_severity(Severity::Warning),
            Severity::Warning
        );
        assert_eq!(
            StrictnessLevel::Permissive.effective_severity(Severity::Error),
            Severity::Warning
        );
        assert_eq!(
            StrictnessLevel::Permissive.effective_severity(Severity::Info),
            Severity::Info
        );
    }

    #[test]
    fn test_hipaa_profile_defaults() {
        let profile = ValidationProfile::hipaa_5010();
        assert!(profile.hipaa);
        assert!(!profile.fatal_semantics);
        assert!((profile.claim_balance_tolerance - 0.01).abs() < f64::EPSILON);
    }
}
