//! Schema registry
//!
//! Read-only after initialization; safe for concurrent readers.

use crate::model::TransactionSchema;
use std::collections::HashMap;
use tracing::debug;

/// Registry of transaction schemas keyed by transaction id and version
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, TransactionSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry preloaded with the built-in schemas.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for schema in crate::builtin::builtin_schemas() {
            registry.register(schema);
        }
        registry
    }

    /// Register a schema, replacing any previous entry for the same
    /// transaction id and version.
    pub fn register(&mut self, schema: TransactionSchema) {
        debug!(key = %schema.qualified_name(), "registering schema");
        self.schemas.insert(schema.qualified_name(), schema);
    }

    /// Exact lookup by transaction id and version.
    #[must_use]
    pub fn get(&self, transaction_set_id: &str, version: &str) -> Option<&TransactionSchema> {
        self.schemas.get(&format!("{transaction_set_id}:{version}"))
    }

    /// Resolve the schema for a transaction: exact `(id, version)` match
    /// first, then any registered version of the same transaction id, else
    /// `None` (callers fall back to a flat schema).
    #[must_use]
    pub fn resolve(&self, transaction_set_id: &str, version: &str) -> Option<&TransactionSchema> {
        if let Some(schema) = self.get(transaction_set_id, version) {
            return Some(schema);
        }
        let fallback = self
            .schemas
            .values()
            .find(|s| s.transaction_set_id == transaction_set_id);
        if fallback.is_some() {
            debug!(
                transaction = transaction_set_id,
                version, "no exact version match, using registered fallback"
            );
        }
        fallback
    }

    /// True if any schema is registered for the transaction id.
    #[must_use]
    pub fn knows_transaction(&self, transaction_set_id: &str) -> bool {
        self.schemas
            .values()
            .any(|s| s.transaction_set_id == transaction_set_id)
    }

    /// All registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&String> {
        let mut keys: Vec<_> = self.schemas.keys().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register(TransactionSchema::new("850", "004010", "Purchase Order", "PO"));

        assert!(registry.get("850", "004010").is_some());
        assert!(registry.get("850", "005010").is_none());
        assert!(registry.knows_transaction("850"));
        assert!(!registry.knows_transaction("810"));
    }

    #[test]
    fn test_resolve_falls_back_across_versions() {
        let mut registry = SchemaRegistry::new();
        registry.register(TransactionSchema::new("837", "005010X222A1", "Claim", "HC"));

        let resolved = registry.resolve("837", "005010X999A9").unwrap();
        assert_eq!(resolved.version, "005010X222A1");
        assert!(registry.resolve("999", "005010").is_none());
    }

    #[test]
    fn test_builtin_registry_contents() {
        let registry = SchemaRegistry::with_builtin();
        assert!(registry.get("837", "005010X222A1").is_some());
        assert!(registry.get("835", "005010X221A1").is_some());
        assert!(registry.get("270", "005010X279A1").is_some());
        assert!(registry.get("850", "004010").is_some());
        assert!(registry.knows_transaction("997"));
        assert!(registry.knows_transaction("999"));
    }
}
