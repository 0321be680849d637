use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{AuditRepo, RepoError};
use crate::domain::entities::AuditLogRecord;
use crate::domain::types::{AuditAction, ContentKind};

/// Thin wrapper around the audit repository to simplify logging admin actions.
#[derive(Clone)]
pub struct AdminAuditService {
    repo: Arc<dyn AuditRepo>,
}

impl AdminAuditService {
    pub fn new(repo: Arc<dyn AuditRepo>) -> Self {
        Self { repo }
    }

    pub async fn record<S>(
        &self,
        actor: &str,
        action: AuditAction,
        kind: ContentKind,
        entity_id: Option<Uuid>,
        payload: Option<&S>,
    ) -> Result<(), RepoError>
    where
        S: Serialize,
    {
        let payload_text = match payload {
            Some(value) => Some(serde_json::to_string(value).map_err(RepoError::from_persistence)?),
            None => None,
        };

        let record = AuditLogRecord {
            id: Uuid::new_v4(),
            actor: actor.to_string(),
            action: action.key(kind),
            entity_type: kind.as_str().to_string(),
            entity_id: entity_id.map(|value| value.to_string()),
            payload_text,
            created_at: OffsetDateTime::now_utc(),
        };

        self.repo.append_log(record).await
    }

    /// Record an entry after the change it describes has already been committed.
    /// A failed append is logged rather than surfaced.
    pub async fn record_committed<S>(
        &self,
        actor: &str,
        action: AuditAction,
        kind: ContentKind,
        entity_id: Option<Uuid>,
        payload: Option<&S>,
    ) where
        S: Serialize,
    {
        if let Err(err) = self.record(actor, action, kind, entity_id, payload).await {
            warn!(
                target = "folio::admin::audit",
                action = %action.key(kind),
                entity_id = ?entity_id,
                error = %err,
                "failed to append admin audit entry"
            );
        }
    }

    pub async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        self.repo.list_recent(limit).await
    }
}
