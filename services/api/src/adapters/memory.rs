//! services/api/src/adapters/memory.rs
//!
//! The in-process dataset: a `DocumentStore` held entirely in memory.
//!
//! It is built once at startup (usually from the seed dataset), shared by `Arc`,
//! and mutated in place for the lifetime of the process. Compound operations
//! hold the write lock for their whole duration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mentorsphere_core::ports::{
    document_key, Document, DocumentStore, Mutation, PortError, PortResult, Query, SortOrder,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-filled with `(collection, documents)` pairs.
    pub fn with_documents(seed: Vec<(&str, Vec<Document>)>) -> Self {
        let collections = seed
            .into_iter()
            .map(|(name, docs)| (name.to_string(), docs))
            .collect();
        Self {
            collections: RwLock::new(collections),
        }
    }
}

fn has_key(doc: &Document, key_field: &str, id: &str) -> bool {
    doc.get(key_field).and_then(Value::as_str) == Some(id)
}

fn not_found(collection: &str, id: &str) -> PortError {
    PortError::NotFound(format!("{} {}", collection, id))
}

fn as_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Numbers compare numerically, RFC 3339 timestamps chronologically, other
/// strings lexically; missing fields sort first.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (as_timestamp(x), as_timestamp(y)) {
                (Some(tx), Some(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn is_available(&self) -> bool {
        true
    }

    async fn get(&self, collection: &str, key_field: &str, id: &str) -> PortResult<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| has_key(doc, key_field, id)))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn query(&self, collection: &str, query: &Query) -> PortResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| query.matches(doc)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, order)) = &query.order_by {
            docs.sort_by(|a, b| {
                let ord = compare_field(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn insert(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| has_key(d, key_field, &id)) {
            return Err(PortError::Conflict(format!("{} {} already exists", collection, id)));
        }
        docs.push(doc);
        Ok(())
    }

    async fn insert_unique(
        &self,
        collection: &str,
        key_field: &str,
        unique_field: &str,
        doc: Document,
    ) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        let unique_value = doc.get(unique_field).cloned();
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs
            .iter()
            .any(|d| has_key(d, key_field, &id) || (unique_value.is_some() && d.get(unique_field) == unique_value.as_ref()))
        {
            return Err(PortError::Conflict(format!(
                "{} with this {} already exists",
                collection, unique_field
            )));
        }
        docs.push(doc);
        Ok(())
    }

    async fn put(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| has_key(d, key_field, &id)) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
        Ok(())
    }

    async fn replace(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_key(d, key_field, &id)))
            .ok_or_else(|| not_found(collection, &id))?;
        *existing = doc;
        Ok(())
    }

    async fn modify(
        &self,
        collection: &str,
        key_field: &str,
        id: &str,
        mutation: Mutation,
    ) -> PortResult<Document> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_key(d, key_field, id)))
            .ok_or_else(|| not_found(collection, id))?;

        // Edit a copy so a failed mutation leaves the stored record untouched.
        let mut updated = existing.clone();
        mutation(&mut updated)?;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, collection: &str, key_field: &str, id: &str) -> PortResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let before = docs.len();
        docs.retain(|d| !has_key(d, key_field, id));
        if docs.len() == before {
            return Err(not_found(collection, id));
        }
        Ok(())
    }
}
