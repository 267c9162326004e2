//! crates/mentorsphere_core/src/repository.rs
//!
//! Typed access to the tiered document store, one repository per entity.

use crate::domain::{
    AccountCredentials, ActivityLog, Course, Intervention, Notification, Reflection, UserSettings,
};
use crate::fallback::{Lookup, TieredStore};
use crate::ports::{Document, Mutation, PortError, PortResult, Query};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

//=========================================================================================
// Entity
//=========================================================================================

/// A record type that lives in one collection of the document store.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Name of the document field holding the record's key.
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> &str;
    fn set_key(&mut self, key: String);
}

impl Entity for AccountCredentials {
    const COLLECTION: &'static str = "users";

    fn key(&self) -> &str {
        &self.account.id
    }
    fn set_key(&mut self, key: String) {
        self.account.id = key;
    }
}

impl Entity for Course {
    const COLLECTION: &'static str = "courses";

    fn key(&self) -> &str {
        &self.id
    }
    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

impl Entity for ActivityLog {
    const COLLECTION: &'static str = "activities";

    fn key(&self) -> &str {
        &self.id
    }
    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

impl Entity for Intervention {
    const COLLECTION: &'static str = "interventions";

    fn key(&self) -> &str {
        &self.id
    }
    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

impl Entity for Notification {
    const COLLECTION: &'static str = "notifications";

    fn key(&self) -> &str {
        &self.id
    }
    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

impl Entity for Reflection {
    const COLLECTION: &'static str = "reflections";
    const KEY_FIELD: &'static str = "userId";

    fn key(&self) -> &str {
        &self.user_id
    }
    fn set_key(&mut self, key: String) {
        self.user_id = key;
    }
}

impl Entity for UserSettings {
    const COLLECTION: &'static str = "user_settings";
    const KEY_FIELD: &'static str = "userId";

    fn key(&self) -> &str {
        &self.user_id
    }
    fn set_key(&mut self, key: String) {
        self.user_id = key;
    }
}

fn encode<T: Entity>(entity: &T) -> PortResult<Document> {
    serde_json::to_value(entity).map_err(|e| PortError::Unexpected(e.to_string()))
}

fn decode<T: Entity>(doc: Document) -> PortResult<T> {
    serde_json::from_value(doc)
        .map_err(|e| PortError::ParseFailure(format!("{} record: {}", T::COLLECTION, e)))
}

//=========================================================================================
// Repository
//=========================================================================================

/// Typed operations over one collection, resolved through the tiered store.
pub struct Repository<T: Entity> {
    store: Arc<TieredStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<TieredStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Fetches one record. A stored record that cannot be decoded is an error here.
    pub async fn find_by_id(&self, id: &str, mode: Lookup) -> PortResult<T> {
        let doc = self.store.get(T::COLLECTION, T::KEY_FIELD, id, mode).await?;
        decode(doc)
    }

    /// Lists matching records, skipping any that fail to decode.
    pub async fn find_by(&self, query: &Query) -> PortResult<Vec<T>> {
        let docs = self.store.query(T::COLLECTION, query, Lookup::Strict).await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| match decode::<T>(doc) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!(collection = T::COLLECTION, error = %e, "Skipping undecodable record");
                    None
                }
            })
            .collect())
    }

    pub async fn find_all(&self) -> PortResult<Vec<T>> {
        self.find_by(&Query::new()).await
    }

    /// The first record whose `field` equals `value`, if any.
    pub async fn find_one_by(
        &self,
        field: &str,
        value: impl Into<Value>,
        mode: Lookup,
    ) -> PortResult<Option<T>> {
        let query = Query::new().filter(field, value).limit(1);
        let docs = self.store.query(T::COLLECTION, &query, mode).await?;
        docs.into_iter().next().map(decode).transpose()
    }

    /// Inserts a new record under a freshly generated id.
    pub async fn create(&self, mut entity: T) -> PortResult<T> {
        entity.set_key(Uuid::new_v4().to_string());
        self.store
            .insert(T::COLLECTION, T::KEY_FIELD, encode(&entity)?)
            .await?;
        Ok(entity)
    }

    /// Like `create`, but fails with `Conflict` if `unique_field` is already taken.
    pub async fn create_unique(&self, mut entity: T, unique_field: &str) -> PortResult<T> {
        entity.set_key(Uuid::new_v4().to_string());
        self.store
            .insert_unique(T::COLLECTION, T::KEY_FIELD, unique_field, encode(&entity)?)
            .await?;
        Ok(entity)
    }

    /// Overwrites an existing record.
    pub async fn update(&self, entity: &T) -> PortResult<()> {
        self.store
            .replace(T::COLLECTION, T::KEY_FIELD, encode(entity)?)
            .await
    }

    /// Inserts or overwrites, keeping the entity's own key.
    pub async fn put(&self, entity: &T) -> PortResult<()> {
        self.store
            .put(T::COLLECTION, T::KEY_FIELD, encode(entity)?)
            .await
    }

    /// Applies `edit` to the stored record as one atomic read-modify-write and
    /// returns the result.
    pub async fn modify<F>(&self, id: &str, edit: F) -> PortResult<T>
    where
        F: Fn(&mut T) -> PortResult<()> + Send + Sync + 'static,
    {
        let mutation: Mutation = Arc::new(move |doc: &mut Document| {
            let mut entity: T = decode(doc.clone())?;
            edit(&mut entity)?;
            *doc = encode(&entity)?;
            Ok(())
        });
        let doc = self
            .store
            .modify(T::COLLECTION, T::KEY_FIELD, id, mutation)
            .await?;
        decode(doc)
    }

    pub async fn delete(&self, id: &str) -> PortResult<()> {
        self.store.delete(T::COLLECTION, T::KEY_FIELD, id).await
    }
}

//=========================================================================================
// Repositories
//=========================================================================================

/// All repositories, sharing one tiered store.
#[derive(Clone)]
pub struct Repositories {
    pub store: Arc<TieredStore>,
    pub users: Repository<AccountCredentials>,
    pub courses: Repository<Course>,
    pub activities: Repository<ActivityLog>,
    pub interventions: Repository<Intervention>,
    pub notifications: Repository<Notification>,
    pub reflections: Repository<Reflection>,
    pub settings: Repository<UserSettings>,
}

impl Repositories {
    pub fn new(store: Arc<TieredStore>) -> Self {
        Self {
            users: Repository::new(store.clone()),
            courses: Repository::new(store.clone()),
            activities: Repository::new(store.clone()),
            interventions: Repository::new(store.clone()),
            notifications: Repository::new(store.clone()),
            reflections: Repository::new(store.clone()),
            settings: Repository::new(store.clone()),
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NotificationKind, UserSettings};
    use crate::ports::{document_key, DocumentStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Just enough of a store to exercise the typed layer.
    #[derive(Default)]
    struct MapStore {
        docs: Mutex<HashMap<String, Vec<Document>>>,
    }

    impl MapStore {
        fn with(collection: &str, docs: Vec<Document>) -> Arc<Self> {
            let store = Self::default();
            store.docs.lock().unwrap().insert(collection.to_string(), docs);
            Arc::new(store)
        }
    }

    #[async_trait]
    impl DocumentStore for MapStore {
        async fn is_available(&self) -> bool {
            true
        }
        async fn get(&self, collection: &str, key_field: &str, id: &str) -> PortResult<Document> {
            let docs = self.docs.lock().unwrap();
            docs.get(collection)
                .and_then(|c| c.iter().find(|d| d.get(key_field) == Some(&json!(id))))
                .cloned()
                .ok_or_else(|| PortError::NotFound(id.to_string()))
        }
        async fn query(&self, collection: &str, query: &Query) -> PortResult<Vec<Document>> {
            let docs = self.docs.lock().unwrap();
            Ok(docs
                .get(collection)
                .map(|c| c.iter().filter(|d| query.matches(d)).cloned().collect())
                .unwrap_or_default())
        }
        async fn insert(&self, collection: &str, _: &str, doc: Document) -> PortResult<()> {
            let mut docs = self.docs.lock().unwrap();
            docs.entry(collection.to_string()).or_default().push(doc);
            Ok(())
        }
        async fn insert_unique(&self, c: &str, k: &str, _: &str, doc: Document) -> PortResult<()> {
            self.insert(c, k, doc).await
        }
        async fn put(&self, c: &str, k: &str, doc: Document) -> PortResult<()> {
            self.insert(c, k, doc).await
        }
        async fn replace(&self, c: &str, k: &str, doc: Document) -> PortResult<()> {
            self.insert(c, k, doc).await
        }
        async fn modify(
            &self,
            collection: &str,
            key_field: &str,
            id: &str,
            mutation: Mutation,
        ) -> PortResult<Document> {
            let mut docs = self.docs.lock().unwrap();
            let doc = docs
                .get_mut(collection)
                .and_then(|c| {
                    c.iter_mut()
                        .find(|d| document_key(d, key_field).ok().as_deref() == Some(id))
                })
                .ok_or_else(|| PortError::NotFound(id.to_string()))?;
            mutation(doc)?;
            Ok(doc.clone())
        }
        async fn delete(&self, _: &str, _: &str, _: &str) -> PortResult<()> {
            Ok(())
        }
    }

    fn notification(id: &str) -> Document {
        json!({
            "id": id,
            "userId": "4",
            "type": "info",
            "title": "Hello",
            "message": "World",
            "createdAt": Utc::now(),
            "read": false
        })
    }

    fn repo<T: Entity>(store: Arc<MapStore>) -> Repository<T> {
        Repository::new(Arc::new(TieredStore::local_only(store)))
    }

    #[tokio::test]
    async fn listing_skips_malformed_records_but_single_fetch_reports_them() {
        let store = MapStore::with(
            "notifications",
            vec![notification("1"), json!({ "id": "2", "userId": "4", "type": 17 })],
        );
        let notifications = repo::<Notification>(store);

        let listed = notifications.find_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, NotificationKind::Info);

        let err = notifications.find_by_id("2", Lookup::Strict).await.unwrap_err();
        assert!(matches!(err, PortError::ParseFailure(_)));
    }

    #[tokio::test]
    async fn modify_edits_the_typed_record() {
        let store = MapStore::with("notifications", vec![notification("1")]);
        let notifications = repo::<Notification>(store);

        let updated = notifications
            .modify("1", |n: &mut Notification| {
                n.read = true;
                Ok(())
            })
            .await
            .unwrap();
        assert!(updated.read);
        assert!(notifications.find_by_id("1", Lookup::Strict).await.unwrap().read);
    }

    #[tokio::test]
    async fn create_assigns_a_fresh_key() {
        let settings = repo::<UserSettings>(Arc::new(MapStore::default()));
        let mut record = UserSettings::defaults_for("");
        record.user_id = "ignored".to_string();

        let created = settings.create(record).await.unwrap();
        assert_ne!(created.user_id, "ignored");
        assert!(Uuid::parse_str(&created.user_id).is_ok());
    }
}
