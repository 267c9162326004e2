//! services/api/src/adapters/db.rs
//!
//! This module contains the remote document store, the Postgres implementation
//! of the `DocumentStore` port from the `core` crate. Every collection lives in
//! one `documents` table as JSONB bodies keyed by `(collection, id)`, where
//! `id` holds the value of the entity's key field.

use async_trait::async_trait;
use mentorsphere_core::ports::{
    document_key, Document, DocumentStore, Mutation, PortError, PortResult, Query, SortOrder,
};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Creates a new `PgDocumentStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Struct
//=========================================================================================

#[derive(FromRow)]
struct DocumentRecord {
    body: Json<Value>,
}

impl DocumentRecord {
    fn to_domain(self) -> Document {
        self.body.0
    }
}

/// Maps driver errors onto the port taxonomy. Connection-level failures become
/// `Unavailable` so the resolver can fall back to the in-memory dataset.
fn map_sqlx_error(e: sqlx::Error, what: impl FnOnce() -> String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => PortError::Unavailable(e.to_string()),
        sqlx::Error::Decode(_) | sqlx::Error::ColumnDecode { .. } => {
            PortError::ParseFailure(e.to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    map_sqlx_error(e, || "unexpected missing row".to_string())
}

/// Builds the `{"field": value, ...}` object used for JSONB containment filters.
fn containment(query: &Query) -> Value {
    let mut map = Map::new();
    for (field, value) in &query.filters {
        map.insert(field.clone(), value.clone());
    }
    Value::Object(map)
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn is_available(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn get(&self, collection: &str, _key_field: &str, id: &str) -> PortResult<Document> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, || format!("{} {} not found", collection, id)))?;

        Ok(record.to_domain())
    }

    async fn query(&self, collection: &str, query: &Query) -> PortResult<Vec<Document>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT body FROM documents WHERE collection = ");
        builder.push_bind(collection);

        if !query.filters.is_empty() {
            builder.push(" AND body @> ");
            builder.push_bind(Json(containment(query)));
        }

        match &query.order_by {
            Some((field, order)) => {
                builder.push(" ORDER BY body->>");
                builder.push_bind(field.clone());
                builder.push(match order {
                    SortOrder::Ascending => " ASC",
                    SortOrder::Descending => " DESC",
                });
            }
            None => {
                builder.push(" ORDER BY created_at ASC");
            }
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit as i64);
        }

        let records = builder
            .build_query_as::<DocumentRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(records.into_iter().map(DocumentRecord::to_domain).collect())
    }

    async fn insert(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    PortError::Conflict(format!("{} {} already exists", collection, id))
                }
                other => unexpected(other),
            })?;
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
        let unique_value = doc.get(unique_field).cloned().unwrap_or(Value::Null);

        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // Serialises writers claiming the same value until the transaction ends.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1 || ':' || $2 || ':' || $3))")
            .bind(collection)
            .bind(unique_field)
            .bind(unique_value.to_string())
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        let result = sqlx::query(
            "INSERT INTO documents (collection, id, body)
             SELECT $1, $2, $3
             WHERE NOT EXISTS (
                 SELECT 1 FROM documents WHERE collection = $1 AND body->$4 = $5
             )
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&doc))
        .bind(unique_field)
        .bind(Json(&unique_value))
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::Conflict(format!(
                "{} with this {} already exists",
                collection, unique_field
            )));
        }
        Ok(())
    }

    async fn put(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&doc))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn replace(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        let id = document_key(&doc, key_field)?;
        let result = sqlx::query("UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(&id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("{} {} not found", collection, id)));
        }
        Ok(())
    }

    async fn modify(
        &self,
        collection: &str,
        _key_field: &str,
        id: &str,
        mutation: Mutation,
    ) -> PortResult<Document> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let record = sqlx::query_as::<_, DocumentRecord>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(collection)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(e, || format!("{} {} not found", collection, id)))?;

        let mut doc = record.to_domain();
        mutation(&mut doc)?;

        sqlx::query("UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .bind(Json(&doc))
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(doc)
    }

    async fn delete(&self, collection: &str, _key_field: &str, id: &str) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("{} {} not found", collection, id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connection_failures_trigger_fallback() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, || "x".into());
        assert!(matches!(err, PortError::Unavailable(_)));
        let err = map_sqlx_error(sqlx::Error::RowNotFound, || "users 1 not found".into());
        assert_eq!(err, PortError::NotFound("users 1 not found".into()));
        let err = map_sqlx_error(sqlx::Error::Protocol("bad".into()), || "x".into());
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    #[test]
    fn filters_become_one_containment_object() {
        let query = Query::new().filter("userId", "4").filter("read", false);
        assert_eq!(containment(&query), json!({ "userId": "4", "read": false }));
    }
}
