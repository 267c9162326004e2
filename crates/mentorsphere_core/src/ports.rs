//! crates/mentorsphere_core/src/ports.rs
//!
//! Defines the storage contract for the application's core logic.
//! Both the remote document store and the in-process dataset implement
//! `DocumentStore`, which lets the tiered resolver treat them uniformly.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all storage operations.
/// This abstracts away the specific errors from the backing stores (database, memory).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// The store cannot be reached. Triggers fallback; never shown to callers.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A stored record could not be decoded into its entity type.
    #[error("Failed to parse stored record: {0}")]
    ParseFailure(String),
    /// A unique field already holds the requested value.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// An edit refused the record it was handed. The record itself exists,
    /// so this never sends the edit to another tier.
    #[error("Edit rejected: {0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Query description
//=========================================================================================

/// A stored document: a JSON object that always carries its own `id` field
/// (or `userId` for per-account singletons, see `Entity::KEY_FIELD`).
pub type Document = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Equality filters plus an optional ordered scan, the only query shape the
/// remote store is required to support.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document satisfies every equality filter.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

/// An in-place edit applied atomically by `DocumentStore::modify`.
/// Shared rather than boxed so the same edit can be replayed on the fallback tier.
pub type Mutation = Arc<dyn Fn(&mut Document) -> PortResult<()> + Send + Sync>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap probe used by the tiered resolver before routing a call here.
    async fn is_available(&self) -> bool;

    async fn get(&self, collection: &str, key_field: &str, id: &str) -> PortResult<Document>;

    async fn query(&self, collection: &str, query: &Query) -> PortResult<Vec<Document>>;

    async fn insert(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()>;

    /// Inserts unless another document in the collection already has the same
    /// value for `unique_field`, in which case `Conflict` is returned.
    async fn insert_unique(
        &self,
        collection: &str,
        key_field: &str,
        unique_field: &str,
        doc: Document,
    ) -> PortResult<()>;

    /// Insert-or-overwrite by key.
    async fn put(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()>;

    /// Overwrites an existing document. `NotFound` if the key is absent.
    async fn replace(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()>;

    /// Read-modify-write of one document as a single atomic step.
    async fn modify(
        &self,
        collection: &str,
        key_field: &str,
        id: &str,
        mutation: Mutation,
    ) -> PortResult<Document>;

    async fn delete(&self, collection: &str, key_field: &str, id: &str) -> PortResult<()>;
}

/// Reads a document's key as a string.
pub fn document_key(doc: &Document, key_field: &str) -> PortResult<String> {
    doc.get(key_field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PortError::ParseFailure(format!("document has no '{}' key", key_field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_matches_all_filters() {
        let doc = json!({ "id": "1", "userId": "4", "read": false });
        assert!(Query::new().filter("userId", "4").matches(&doc));
        assert!(Query::new().filter("userId", "4").filter("read", false).matches(&doc));
        assert!(!Query::new().filter("read", true).matches(&doc));
        assert!(!Query::new().filter("missing", "x").matches(&doc));
    }

    #[test]
    fn document_key_requires_a_string() {
        assert_eq!(document_key(&json!({ "id": "a" }), "id"), Ok("a".to_string()));
        assert!(matches!(
            document_key(&json!({ "id": 3 }), "id"),
            Err(PortError::ParseFailure(_))
        ));
    }
}
