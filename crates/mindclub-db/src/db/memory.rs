use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use mindclub_core::models::{Collection, Document, SortDirection, SortKey, SortSpec};
use mindclub_core::AppError;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{json_contains, DocumentStore};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    document: Document,
}

/// In-process document store for development without Postgres and for tests
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, HashMap<Uuid, Entry>>>,
    seq: AtomicU64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, |docs| docs.len())
    }

    pub async fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection).await == 0
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

fn compare_entries(a: &Entry, b: &Entry, sort: SortSpec) -> Ordering {
    let directed = |ord: Ordering| match sort.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    };

    match sort.key {
        SortKey::CreatedAt => directed(
            a.document
                .created_at
                .cmp(&b.document.created_at)
                .then(a.seq.cmp(&b.seq)),
        ),
        SortKey::Field(field) => {
            let value = |entry: &Entry| {
                entry
                    .document
                    .body
                    .get(field)
                    .filter(|v| !v.is_null())
                    .cloned()
            };
            // Missing values sort last in both directions
            match (value(a), value(b)) {
                (Some(x), Some(y)) => directed(compare_values(&x, &y).then(a.seq.cmp(&b.seq))),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.seq.cmp(&b.seq),
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .map(|entry| entry.document.clone()))
    }

    async fn find_all(
        &self,
        collection: Collection,
        sort: SortSpec,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        let mut entries: Vec<&Entry> = collections
            .get(&collection)
            .map(|docs| docs.values().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| compare_entries(a, b, sort));
        Ok(entries.into_iter().map(|e| e.document.clone()).collect())
    }

    async fn find_by(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> Result<Vec<Document>, AppError> {
        let mut found = self.find_all(collection, SortSpec::NEWEST_FIRST).await?;
        found.retain(|doc| json_contains(&doc.body, filter));
        Ok(found)
    }

    async fn create(&self, collection: Collection, body: Value) -> Result<Document, AppError> {
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            body,
            created_at: now,
            updated_at: now,
        };
        let entry = Entry {
            seq: self.seq.fetch_add(1, AtomicOrdering::SeqCst),
            document: document.clone(),
        };
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(document.id, entry);
        Ok(document)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> Result<Option<Document>, AppError> {
        let mut collections = self.collections.write().await;
        let Some(entry) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(None);
        };
        entry.document.body = body;
        entry.document.updated_at = Utc::now();
        Ok(Some(entry.document.clone()))
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(&id))
            .is_some())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
