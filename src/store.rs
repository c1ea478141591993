use std::{
    collections::{BTreeMap, HashMap},
    ops::AddAssign,
    time::Duration,
};

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    db,
    entities::document,
    error::{StoreError, StoreResult},
};

/// A stored document: field name to value, including `_id`.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Write outcome counters, for a single write or summed over a batch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UpsertResult {
    pub matched: u64,
    pub modified: u64,
    pub inserted: u64,
}

impl UpsertResult {
    pub fn inserted() -> Self {
        Self { inserted: 1, ..Self::default() }
    }

    pub fn matched(modified: bool) -> Self {
        Self { matched: 1, modified: u64::from(modified), inserted: 0 }
    }

    /// Number of entities this result accounts for.
    pub fn written(&self) -> u64 {
        self.matched + self.inserted
    }
}

impl AddAssign for UpsertResult {
    fn add_assign(&mut self, rhs: Self) {
        self.matched += rhs.matched;
        self.modified += rhs.modified;
        self.inserted += rhs.inserted;
    }
}

/// A document-oriented store addressed by collection name and document id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `fields` as a new document keyed by `id`, or sets each of
    /// `fields` on the existing document. Fields already stored but absent
    /// from `fields` are left as they are.
    async fn upsert_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> StoreResult<UpsertResult>;

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;
}

/// Applies `$set` semantics: overlay `fields` onto `doc`, reporting whether
/// anything changed.
fn set_fields(doc: &mut Document, fields: Document) -> bool {
    let mut changed = false;
    for (key, value) in fields {
        if doc.get(&key) != Some(&value) {
            doc.insert(key, value);
            changed = true;
        }
    }
    changed
}

/// Documents persisted in the `documents` table, one row per
/// `(collection, id)` with the body kept as a JSON object.
#[derive(Clone)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    /// Connects, brings the schema up to date and checks the database answers.
    pub async fn connect(database_url: &str, connect_timeout: Duration) -> StoreResult<Self> {
        let db = db::connect_and_migrate(database_url, connect_timeout).await?;
        db.ping().await?;
        debug!("document store reachable");
        Ok(Self { db })
    }

    pub async fn close(self) -> StoreResult<()> {
        self.db.close().await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for DbStore {
    async fn upsert_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> StoreResult<UpsertResult> {
        let existing = document::Entity::find_by_id((collection.to_string(), id.to_string()))
            .one(&self.db)
            .await?;

        let now = now_sec();

        let Some(row) = existing else {
            let model = document::ActiveModel {
                collection: Set(collection.to_string()),
                doc_id: Set(id.to_string()),
                body: Set(encode(collection, &fields)?),
                updated_at: Set(now),
            };
            document::Entity::insert(model).exec(&self.db).await?;
            return Ok(UpsertResult::inserted());
        };

        let mut doc: Document =
            serde_json::from_str(&row.body).map_err(|source| StoreError::Corrupt {
                collection: collection.to_string(),
                id: id.to_string(),
                source,
            })?;

        if !set_fields(&mut doc, fields) {
            return Ok(UpsertResult::matched(false));
        }

        let mut model: document::ActiveModel = row.into();
        model.body = Set(encode(collection, &doc)?);
        model.updated_at = Set(now);
        model.update(&self.db).await?;

        Ok(UpsertResult::matched(true))
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let Some(row) = document::Entity::find_by_id((collection.to_string(), id.to_string()))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        serde_json::from_str(&row.body).map(Some).map_err(|source| StoreError::Corrupt {
            collection: collection.to_string(),
            id: id.to_string(),
            source,
        })
    }
}

fn encode(collection: &str, doc: &Document) -> StoreResult<String> {
    serde_json::to_string(doc).map_err(|e| StoreError::Serialize {
        collection: collection.to_string(),
        reason: e.to_string(),
    })
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

/// Process-local store with the same write semantics as [`DbStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections.lock().await.get(collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> StoreResult<UpsertResult> {
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.get_mut(id) {
            Some(doc) => Ok(UpsertResult::matched(set_fields(doc, fields))),
            None => {
                docs.insert(id.to_string(), fields);
                Ok(UpsertResult::inserted())
            },
        }
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }
}
