use async_trait::async_trait;
use mindclub_core::models::{Collection, Document, SortSpec};
use mindclub_core::AppError;
use serde_json::Value;
use uuid::Uuid;

/// Persistence for JSON documents grouped into named collections.
///
/// Bodies are opaque to the store apart from top-level sort fields and
/// containment filters.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, AppError>;

    async fn find_all(
        &self,
        collection: Collection,
        sort: SortSpec,
    ) -> Result<Vec<Document>, AppError>;

    /// Documents whose body contains `filter` (JSON containment, as Postgres `@>`)
    async fn find_by(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> Result<Vec<Document>, AppError>;

    async fn create(&self, collection: Collection, body: Value) -> Result<Document, AppError>;

    /// Replace the whole body. `None` when no document has this id.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> Result<Option<Document>, AppError>;

    /// `true` when a document was removed
    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<bool, AppError>;

    /// Connectivity probe used by health checks
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// JSON containment with Postgres `jsonb @>` semantics
pub fn json_contains(haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::Object(h), Value::Object(n)) => n
            .iter()
            .all(|(key, nv)| h.get(key).is_some_and(|hv| json_contains(hv, nv))),
        (Value::Array(h), Value::Array(n)) => n
            .iter()
            .all(|nv| h.iter().any(|hv| json_contains(hv, nv))),
        (Value::Array(h), scalar) if !scalar.is_object() => h.iter().any(|hv| hv == scalar),
        (h, n) => h == n,
    }
}
