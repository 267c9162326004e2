//! crates/mentorsphere_core/src/fallback.rs
//!
//! The two-tier resolver sitting in front of every repository.
//!
//! Calls go to the remote document store when one is configured and its
//! `is_available()` probe succeeds. A remote `Unavailable` error re-runs the
//! same call against the in-process dataset. Nothing is ever copied between
//! tiers: a record written while the remote store was down stays local.

use crate::ports::{Document, DocumentStore, Mutation, PortError, PortResult, Query};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a remote "not found" is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Remote `NotFound` (or an empty remote match) is the final answer.
    Strict,
    /// Remote `NotFound` (or an empty remote match) is followed by a local
    /// lookup; absence is reported only when both tiers lack the record.
    Exhaustive,
}

/// Which tier is currently serving calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Remote,
    Local,
}

/// Runs `$call` against the remote tier when it is available, and against the
/// local tier otherwise or when remote reports `Unavailable` (or `NotFound`
/// in exhaustive mode). `$store` is bound to the tier being tried.
macro_rules! route {
    ($self:ident, $mode:expr, $op:literal, |$store:ident| $call:expr) => {{
        if let Some($store) = $self.available_remote().await {
            match $call.await {
                Err(PortError::Unavailable(reason)) => {
                    warn!(operation = $op, %reason, "Remote store unavailable, using in-memory dataset");
                }
                Err(PortError::NotFound(what)) if $mode == Lookup::Exhaustive => {
                    debug!(operation = $op, %what, "Not found remotely, checking in-memory dataset");
                }
                other => return other,
            }
        }
        let $store = &$self.local;
        $call.await
    }};
}

/// Routes storage calls across the optional remote tier and the local tier.
#[derive(Clone)]
pub struct TieredStore {
    remote: Option<Arc<dyn DocumentStore>>,
    local: Arc<dyn DocumentStore>,
}

impl TieredStore {
    pub fn new(remote: Option<Arc<dyn DocumentStore>>, local: Arc<dyn DocumentStore>) -> Self {
        Self { remote, local }
    }

    /// A resolver with no remote tier at all.
    pub fn local_only(local: Arc<dyn DocumentStore>) -> Self {
        Self::new(None, local)
    }

    /// The remote tier, but only if it is configured and currently reachable.
    pub async fn available_remote(&self) -> Option<&Arc<dyn DocumentStore>> {
        match &self.remote {
            Some(remote) if remote.is_available().await => Some(remote),
            Some(_) => {
                debug!("Remote store configured but not available");
                None
            }
            None => None,
        }
    }

    pub async fn active_tier(&self) -> Tier {
        if self.available_remote().await.is_some() {
            Tier::Remote
        } else {
            Tier::Local
        }
    }

    pub async fn get(
        &self,
        collection: &str,
        key_field: &str,
        id: &str,
        mode: Lookup,
    ) -> PortResult<Document> {
        route!(self, mode, "get", |store| store.get(collection, key_field, id))
    }

    pub async fn query(
        &self,
        collection: &str,
        query: &Query,
        mode: Lookup,
    ) -> PortResult<Vec<Document>> {
        if let Some(remote) = self.available_remote().await {
            match remote.query(collection, query).await {
                Ok(docs) if docs.is_empty() && mode == Lookup::Exhaustive => {
                    debug!(collection, "No remote matches, checking in-memory dataset");
                }
                Err(PortError::Unavailable(reason)) => {
                    warn!(operation = "query", %reason, "Remote store unavailable, using in-memory dataset");
                }
                other => return other,
            }
        }
        self.local.query(collection, query).await
    }

    pub async fn insert(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        route!(self, Lookup::Strict, "insert", |store| store.insert(
            collection,
            key_field,
            doc.clone()
        ))
    }

    pub async fn insert_unique(
        &self,
        collection: &str,
        key_field: &str,
        unique_field: &str,
        doc: Document,
    ) -> PortResult<()> {
        route!(self, Lookup::Strict, "insert_unique", |store| store
            .insert_unique(collection, key_field, unique_field, doc.clone()))
    }

    pub async fn put(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        route!(self, Lookup::Strict, "put", |store| store.put(
            collection,
            key_field,
            doc.clone()
        ))
    }

    pub async fn replace(&self, collection: &str, key_field: &str, doc: Document) -> PortResult<()> {
        route!(self, Lookup::Exhaustive, "replace", |store| store.replace(
            collection,
            key_field,
            doc.clone()
        ))
    }

    pub async fn modify(
        &self,
        collection: &str,
        key_field: &str,
        id: &str,
        mutation: Mutation,
    ) -> PortResult<Document> {
        route!(self, Lookup::Exhaustive, "modify", |store| store.modify(
            collection,
            key_field,
            id,
            mutation.clone()
        ))
    }

    pub async fn delete(&self, collection: &str, key_field: &str, id: &str) -> PortResult<()> {
        route!(self, Lookup::Exhaustive, "delete", |store| store.delete(
            collection, key_field, id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// A scripted tier: answers every call with a fixed outcome and counts calls.
    struct ScriptedStore {
        available: AtomicBool,
        outcome: Mutex<PortResult<Vec<Document>>>,
        calls: AtomicUsize,
    }

    impl ScriptedStore {
        fn new(available: bool, outcome: PortResult<Vec<Document>>) -> Arc<Self> {
            Arc::new(Self {
                available: AtomicBool::new(available),
                outcome: Mutex::new(outcome),
                calls: AtomicUsize::new(0),
            })
        }

        fn answer(&self) -> PortResult<Vec<Document>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.lock().unwrap().clone()
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for ScriptedStore {
        async fn is_available(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }
        async fn get(&self, _: &str, _: &str, _: &str) -> PortResult<Document> {
            self.answer().map(|docs| docs.into_iter().next().unwrap_or(Document::Null))
        }
        async fn query(&self, _: &str, _: &Query) -> PortResult<Vec<Document>> {
            self.answer()
        }
        async fn insert(&self, _: &str, _: &str, _: Document) -> PortResult<()> {
            self.answer().map(|_| ())
        }
        async fn insert_unique(&self, _: &str, _: &str, _: &str, _: Document) -> PortResult<()> {
            self.answer().map(|_| ())
        }
        async fn put(&self, _: &str, _: &str, _: Document) -> PortResult<()> {
            self.answer().map(|_| ())
        }
        async fn replace(&self, _: &str, _: &str, _: Document) -> PortResult<()> {
            self.answer().map(|_| ())
        }
        async fn modify(&self, _: &str, _: &str, _: &str, _: Mutation) -> PortResult<Document> {
            self.answer().map(|docs| docs.into_iter().next().unwrap_or(Document::Null))
        }
        async fn delete(&self, _: &str, _: &str, _: &str) -> PortResult<()> {
            self.answer().map(|_| ())
        }
    }

    fn tiered(remote: &Arc<ScriptedStore>, local: &Arc<ScriptedStore>) -> TieredStore {
        let remote: Arc<dyn DocumentStore> = remote.clone();
        TieredStore::new(Some(remote), local.clone())
    }

    fn local_doc() -> Vec<Document> {
        vec![json!({ "id": "1", "tier": "local" })]
    }

    #[tokio::test]
    async fn uses_remote_when_available() {
        let remote = ScriptedStore::new(true, Ok(vec![json!({ "id": "1", "tier": "remote" })]));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        let doc = store.get("users", "id", "1", Lookup::Strict).await.unwrap();
        assert_eq!(doc["tier"], "remote");
        assert_eq!(local.calls(), 0);
        assert_eq!(store.active_tier().await, Tier::Remote);
    }

    #[tokio::test]
    async fn falls_back_when_remote_unavailable() {
        let remote = ScriptedStore::new(true, Err(PortError::Unavailable("connection reset".into())));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        let doc = store.get("users", "id", "1", Lookup::Strict).await.unwrap();
        assert_eq!(doc["tier"], "local");
        assert_eq!(remote.calls(), 1);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test]
    async fn skips_remote_when_probe_fails() {
        let remote = ScriptedStore::new(false, Ok(vec![]));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        store.query("users", &Query::new(), Lookup::Strict).await.unwrap();
        assert_eq!(remote.calls(), 0);
        assert_eq!(store.active_tier().await, Tier::Local);
    }

    #[tokio::test]
    async fn remote_not_found_is_terminal_for_strict_reads() {
        let remote = ScriptedStore::new(true, Err(PortError::NotFound("user 9".into())));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        let err = store.get("users", "id", "9", Lookup::Strict).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(local.calls(), 0);
    }

    #[tokio::test]
    async fn exhaustive_lookup_checks_both_tiers() {
        let remote = ScriptedStore::new(true, Err(PortError::NotFound("user 1".into())));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        let doc = store.get("users", "id", "1", Lookup::Exhaustive).await.unwrap();
        assert_eq!(doc["tier"], "local");

        let empty_remote = ScriptedStore::new(true, Ok(vec![]));
        let store = tiered(&empty_remote, &local);
        let docs = store
            .query("users", &Query::new().filter("email", "a@b.c"), Lookup::Exhaustive)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn writes_on_missing_records_consult_local_tier() {
        let remote = ScriptedStore::new(true, Err(PortError::NotFound("intervention 4".into())));
        let local = ScriptedStore::new(true, Err(PortError::NotFound("intervention 4".into())));
        let store = tiered(&remote, &local);

        let err = store.delete("interventions", "id", "4").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert_eq!(remote.calls(), 1);
        assert_eq!(local.calls(), 1);
    }

    #[tokio::test]
    async fn other_remote_errors_are_not_masked() {
        let remote = ScriptedStore::new(true, Err(PortError::Unexpected("syntax error".into())));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        let err = store.put("users", "id", json!({ "id": "1" })).await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
        assert_eq!(local.calls(), 0);
    }

    #[tokio::test]
    async fn rejected_edits_stay_on_the_tier_that_holds_the_record() {
        let remote = ScriptedStore::new(true, Err(PortError::Rejected("module 5".into())));
        let local = ScriptedStore::new(true, Ok(local_doc()));
        let store = tiered(&remote, &local);

        let mutation: Mutation = Arc::new(|_: &mut Document| Ok(()));
        let err = store.modify("courses", "id", "1", mutation).await.unwrap_err();
        assert_eq!(err, PortError::Rejected("module 5".into()));
        assert_eq!(local.calls(), 0);
    }
}
