//! Per-connection cache of table schemas.

use std::sync::Arc;

use dashmap::DashMap;

use crate::schema::TableSchema;

/// Table name to the latest schema snapshot.
///
/// Entries are never mutated; a refresh swaps in a new `Arc`, so readers
/// holding the old snapshot keep a consistent view.
#[derive(Debug, Default)]
pub struct SchemaCache {
    tables: DashMap<String, Arc<TableSchema>>,
}

impl SchemaCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot for `table`.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<Arc<TableSchema>> {
        self.tables.get(table).map(|r| Arc::clone(r.value()))
    }

    /// Store `schema` under `table`, replacing any previous snapshot.
    pub fn insert(&self, table: &str, schema: TableSchema) -> Arc<TableSchema> {
        let schema = Arc::new(schema);
        self.tables.insert(table.to_owned(), Arc::clone(&schema));
        schema
    }

    /// Drop the snapshot for `table`.
    pub fn remove(&self, table: &str) -> Option<Arc<TableSchema>> {
        self.tables.remove(table).map(|(_, s)| s)
    }

    /// Number of cached tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use dynawire_model::types::{AttributeDefinition, KeySchemaElement, ScalarAttributeType};

    use super::*;

    fn schema(name: &str, hash: &str) -> TableSchema {
        TableSchema::new(
            name,
            vec![KeySchemaElement::hash(hash)],
            vec![AttributeDefinition::new(hash, ScalarAttributeType::S)],
        )
    }

    #[test]
    fn test_should_replace_snapshot_on_insert() {
        let cache = SchemaCache::new();
        let old = cache.insert("users", schema("users", "id"));
        let new = cache.insert("users", schema("users", "user_id"));

        assert_eq!(cache.len(), 1);
        assert_eq!(old.hash_key_name().unwrap(), "id");
        assert!(Arc::ptr_eq(&cache.get("users").unwrap(), &new));
        assert_eq!(new.hash_key_name().unwrap(), "user_id");
    }

    #[test]
    fn test_should_remove_snapshot() {
        let cache = SchemaCache::new();
        cache.insert("users", schema("users", "id"));
        assert!(cache.remove("users").is_some());
        assert!(cache.get("users").is_none());
        assert!(cache.is_empty());
    }
}
