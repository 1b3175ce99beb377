//! Entity lifecycle: create, update and delete with media kept in step.
//!
//! Update runs `RECEIVED -> OLD_IDS_COLLECTED -> MEDIA_RESOLVED -> PERSISTED ->
//! ORPHANS_DELETED`. A resolve failure moves to `FAILED` before anything is
//! written. Cleanup after the write never fails the request.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use mindclub_core::models::{strip_managed_keys, Document, EntityKind};
use mindclub_core::AppError;
use mindclub_db::DocumentStore;
use serde_json::Value;
use uuid::Uuid;

use crate::reconciler::{
    collect_file_ids, restore_file_ids, retain_known_file_ids, CleanupReport, MediaReconciler,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Received,
    OldIdsCollected,
    MediaResolved,
    Persisted,
    OrphansDeleted,
    Failed,
}

impl Display for UpdateState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            UpdateState::Received => "RECEIVED",
            UpdateState::OldIdsCollected => "OLD_IDS_COLLECTED",
            UpdateState::MediaResolved => "MEDIA_RESOLVED",
            UpdateState::Persisted => "PERSISTED",
            UpdateState::OrphansDeleted => "ORPHANS_DELETED",
            UpdateState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub document: Document,
    pub cleanup: CleanupReport,
}

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub id: Uuid,
    pub cleanup: CleanupReport,
}

#[derive(Clone)]
pub struct EntityService {
    store: Arc<dyn DocumentStore>,
    reconciler: Arc<MediaReconciler>,
}

fn transition(kind: EntityKind, id: Uuid, state: UpdateState) {
    tracing::debug!(entity = %kind, document_id = %id, state = %state, "Update state");
}

impl EntityService {
    pub fn new(store: Arc<dyn DocumentStore>, reconciler: Arc<MediaReconciler>) -> Self {
        Self { store, reconciler }
    }

    pub fn reconciler(&self) -> &Arc<MediaReconciler> {
        &self.reconciler
    }

    pub async fn list(&self, kind: EntityKind) -> Result<Vec<Document>, AppError> {
        self.store
            .find_all(kind.collection(), kind.default_sort())
            .await
    }

    pub async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Document, AppError> {
        self.store
            .find(kind.collection(), id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.display_name())))
    }

    #[tracing::instrument(skip(self, payload), fields(entity = %kind))]
    pub async fn create(&self, kind: EntityKind, mut payload: Value) -> Result<Document, AppError> {
        strip_managed_keys(&mut payload);
        kind.validate(&payload)?;

        let resolved = self.reconciler.resolve(kind, &payload).await?;
        let document = self.store.create(kind.collection(), resolved).await?;

        tracing::info!(
            entity = %kind,
            document_id = %document.id,
            media = collect_file_ids(&document.body).len(),
            "Entity created"
        );
        Ok(document)
    }

    #[tracing::instrument(skip(self, payload), fields(entity = %kind, document_id = %id))]
    pub async fn update(
        &self,
        kind: EntityKind,
        id: Uuid,
        mut payload: Value,
    ) -> Result<UpdateOutcome, AppError> {
        transition(kind, id, UpdateState::Received);
        let existing = self.get(kind, id).await?;

        strip_managed_keys(&mut payload);
        if kind == EntityKind::UserProfile {
            retain_known_file_ids(&existing.body, &mut payload);
        }
        restore_file_ids(&existing.body, &mut payload);

        let candidate = kind.merge_update(&existing.body, payload);
        kind.validate(&candidate)?;
        transition(kind, id, UpdateState::OldIdsCollected);

        let resolved = match self.reconciler.resolve(kind, &candidate).await {
            Ok(resolved) => resolved,
            Err(e) => {
                transition(kind, id, UpdateState::Failed);
                return Err(e);
            }
        };
        transition(kind, id, UpdateState::MediaResolved);

        let document = self
            .store
            .update_by_id(kind.collection(), id, resolved)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.display_name())))?;
        transition(kind, id, UpdateState::Persisted);

        let cleanup = self
            .reconciler
            .reconcile_after_update(&existing.body, &document.body)
            .await;
        transition(kind, id, UpdateState::OrphansDeleted);

        if !cleanup.is_clean() {
            tracing::warn!(
                entity = %kind,
                document_id = %id,
                failed = cleanup.failed.len(),
                "Some orphaned media could not be deleted"
            );
        }

        Ok(UpdateOutcome { document, cleanup })
    }

    #[tracing::instrument(skip(self), fields(entity = %kind, document_id = %id))]
    pub async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let existing = self.get(kind, id).await?;

        let cleanup = self.reconciler.delete_all(&existing.body).await;
        self.store.delete_by_id(kind.collection(), id).await?;

        tracing::info!(
            entity = %kind,
            document_id = %id,
            deleted = cleanup.deleted.len(),
            failed = cleanup.failed.len(),
            "Entity deleted"
        );
        Ok(DeleteOutcome { id, cleanup })
    }
}
