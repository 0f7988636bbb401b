//! Partner registry
//!
//! In-memory registry keyed by partner id and by interchange identity so an
//! inbound ISA can be matched to its sender's configuration.

use crate::config::TradingPartner;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registry of trading partners
#[derive(Debug, Default)]
pub struct PartnerRegistry {
    partners: HashMap<String, TradingPartner>,
    by_interchange: HashMap<String, String>,
}

fn interchange_key(id: &str, qualifier: &str) -> String {
    format!("{id}:{qualifier}")
}

impl PartnerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a partner after validating its configuration.
    pub fn register(&mut self, partner: TradingPartner) -> Result<()> {
        let problems = partner.validate();
        if !problems.is_empty() {
            return Err(Error::Invalid { problems });
        }
        if !partner.interchange_id.is_empty() {
            self.by_interchange.insert(
                interchange_key(&partner.interchange_id, &partner.interchange_qualifier),
                partner.partner_id.clone(),
            );
        }
        self.partners.insert(partner.partner_id.clone(), partner);
        Ok(())
    }

    /// Partner by internal id.
    #[must_use]
    pub fn get(&self, partner_id: &str) -> Option<&TradingPartner> {
        self.partners.get(partner_id)
    }

    /// Partner by ISA identity (sender or receiver id plus qualifier).
    #[must_use]
    pub fn get_by_interchange(&self, id: &str, qualifier: &str) -> Option<&TradingPartner> {
        self.by_interchange
            .get(&interchange_key(id.trim_end(), qualifier))
            .and_then(|pid| self.partners.get(pid))
    }

    /// Remove a partner by id, returning it if present.
    pub fn remove(&mut self, partner_id: &str) -> Option<TradingPartner> {
        let partner = self.partners.remove(partner_id)?;
        if !partner.interchange_id.is_empty() {
            self.by_interchange.remove(&interchange_key(
                &partner.interchange_id,
                &partner.interchange_qualifier,
            ));
        }
        Some(partner)
    }

    /// All partners, sorted by id.
    #[must_use]
    pub fn list(&self) -> Vec<&TradingPartner> {
        let mut partners: Vec<_> = self.partners.values().collect();
        partners.sort_by(|a, b| a.partner_id.cmp(&b.partner_id));
        partners
    }

    /// Number of registered partners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Load a registry from a JSON file holding an array of partners.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let partners: Vec<TradingPartner> = serde_json::from_str(&content)?;
        let mut registry = Self::new();
        for partner in partners {
            registry.register(partner)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PartnerRegistry::new();
        registry
            .register(TradingPartner::new("P001", "Acme").with_interchange("ACME01", "ZZ"))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.get("P001").is_some());
        assert!(registry.get_by_interchange("ACME01", "ZZ").is_some());
        assert!(registry.get_by_interchange("ACME01", "01").is_none());
    }

    #[test]
    fn test_interchange_lookup_ignores_isa_padding() {
        let mut registry = PartnerRegistry::new();
        registry
            .register(TradingPartner::new("P001", "Acme").with_interchange("ACME01", "ZZ"))
            .unwrap();

        // ISA06 is fixed-width and arrives space padded.
        assert!(registry.get_by_interchange("ACME01         ", "ZZ").is_some());
    }

    #[test]
    fn test_invalid_partner_rejected() {
        let mut registry = PartnerRegistry::new();
        let err = registry.register(TradingPartner::new("", "")).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_clears_interchange_index() {
        let mut registry = PartnerRegistry::new();
        registry
            .register(TradingPartner::new("P001", "Acme").with_interchange("ACME01", "ZZ"))
            .unwrap();

        let removed = registry.remove("P001").unwrap();
        assert_eq!(removed.name, "Acme");
        assert!(registry.get_by_interchange("ACME01", "ZZ").is_none());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partners.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(
            br#"[
                {"partner_id": "P001", "name": "Acme", "interchange_id": "ACME01", "hipaa": true},
                {"partner_id": "P002", "name": "Globex", "supported_transactions": ["850"]}
            ]"#,
        )
        .unwrap();

        let registry = PartnerRegistry::from_file(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("P001").unwrap().hipaa);
        assert!(registry.get("P002").unwrap().supports_transaction("850"));
        assert_eq!(registry.list()[0].partner_id, "P001");
    }
}
