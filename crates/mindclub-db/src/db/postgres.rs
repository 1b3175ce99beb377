use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindclub_core::models::{Collection, Document, SortDirection, SortKey, SortSpec};
use mindclub_core::AppError;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::store::DocumentStore;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            body: row.body.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Document store over a single JSONB `documents` table
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn order_clause(sort: SortSpec) -> &'static str {
    match (sort.key, sort.direction) {
        (SortKey::CreatedAt, SortDirection::Ascending) => "created_at ASC",
        (SortKey::CreatedAt, SortDirection::Descending) => "created_at DESC",
        (SortKey::Field(_), SortDirection::Ascending) => "body -> $2::text ASC NULLS LAST, created_at ASC",
        (SortKey::Field(_), SortDirection::Descending) => {
            "body -> $2::text DESC NULLS LAST, created_at DESC"
        }
    }
}

fn map_write_error(collection: Collection, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return AppError::Conflict(format!("Duplicate entry in {}", collection));
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select", db.record_id = %id))]
    async fn find(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(
            "SELECT id, body, created_at, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "select"))]
    async fn find_all(
        &self,
        collection: Collection,
        sort: SortSpec,
    ) -> Result<Vec<Document>, AppError> {
        let sql = format!(
            "SELECT id, body, created_at, updated_at FROM documents WHERE collection = $1 ORDER BY {}",
            order_clause(sort)
        );

        let query = sqlx::query_as::<Postgres, DocumentRow>(&sql).bind(collection.as_str());
        let query = match sort.key {
            SortKey::Field(field) => query.bind(field),
            SortKey::CreatedAt => query,
        };

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    #[tracing::instrument(skip(self, filter), fields(db.table = "documents", db.operation = "select"))]
    async fn find_by(
        &self,
        collection: Collection,
        filter: &Value,
    ) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            SELECT id, body, created_at, updated_at
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(collection.as_str())
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    #[tracing::instrument(skip(self, body), fields(db.table = "documents", db.operation = "insert"))]
    async fn create(&self, collection: Collection, body: Value) -> Result<Document, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            INSERT INTO documents (id, collection, body, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(collection.as_str())
        .bind(Json(&body))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(collection, e))?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self, body), fields(db.table = "documents", db.operation = "update", db.record_id = %id))]
    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<Postgres, DocumentRow>(
            r#"
            UPDATE documents
            SET body = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, body, created_at, updated_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(&body))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(collection, e))?;

        Ok(row.map(Document::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "documents", db.operation = "delete", db.record_id = %id))]
    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
