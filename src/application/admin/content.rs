//! Create, update and delete flows shared by every entity editor.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{BlogsRepo, ContentRepo, RepoError, SingletonRepo};
use crate::domain::entities::{BlogRecord, ContentDraft, ContentRecord};
use crate::domain::types::{AuditAction, ContentKind};
use crate::domain::validation::{FieldErrors, FormFields};

#[derive(Debug, Error)]
pub enum AdminContentError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminContentError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

pub struct AdminContentService<E: ContentRecord> {
    repo: Arc<dyn ContentRepo<E>>,
    audit: AdminAuditService,
}

impl<E: ContentRecord> Clone for AdminContentService<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<E: ContentRecord> AdminContentService<E> {
    pub fn new(repo: Arc<dyn ContentRepo<E>>, audit: AdminAuditService) -> Self {
        Self { repo, audit }
    }

    pub fn kind(&self) -> ContentKind {
        E::KIND
    }

    pub async fn list(&self) -> Result<Vec<E>, AdminContentError> {
        Ok(self.repo.list().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<E>, AdminContentError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn count(&self) -> Result<u64, RepoError> {
        self.repo.count().await
    }

    pub async fn create(&self, actor: &str, fields: &FormFields) -> Result<E, AdminContentError> {
        let draft = E::Draft::parse(fields).map_err(AdminContentError::Validation)?;
        let record = self.repo.insert(&draft).await?;
        self.audit
            .record_committed(
                actor,
                AuditAction::Create,
                E::KIND,
                Some(record.id()),
                Some(&draft),
            )
            .await;
        Ok(record)
    }

    pub async fn update(
        &self,
        actor: &str,
        id: Uuid,
        fields: &FormFields,
    ) -> Result<E, AdminContentError> {
        let draft = E::Draft::parse(fields).map_err(AdminContentError::Validation)?;
        let record = self.repo.update(id, &draft).await?;
        self.audit
            .record_committed(actor, AuditAction::Update, E::KIND, Some(id), Some(&draft))
            .await;
        Ok(record)
    }

    pub async fn delete(&self, actor: &str, id: Uuid) -> Result<(), AdminContentError> {
        self.repo.delete(id).await?;
        self.audit
            .record_committed::<()>(actor, AuditAction::Delete, E::KIND, Some(id), None)
            .await;
        Ok(())
    }
}

/// Publish state of blog posts.
#[derive(Clone)]
pub struct AdminBlogService {
    repo: Arc<dyn BlogsRepo>,
    audit: AdminAuditService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlogStatusCounts {
    pub published: u64,
    pub drafts: u64,
}

impl AdminBlogService {
    pub fn new(repo: Arc<dyn BlogsRepo>, audit: AdminAuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn set_published(
        &self,
        actor: &str,
        id: Uuid,
        published: bool,
    ) -> Result<BlogRecord, AdminContentError> {
        let record = self.repo.set_published(id, published).await?;
        let action = if published {
            AuditAction::Publish
        } else {
            AuditAction::Unpublish
        };
        self.audit
            .record_committed::<()>(actor, action, ContentKind::Blog, Some(id), None)
            .await;
        Ok(record)
    }

    pub async fn status_counts(&self, total: u64) -> Result<BlogStatusCounts, RepoError> {
        let published = self.repo.count_published().await?;
        Ok(BlogStatusCounts {
            published,
            drafts: total.saturating_sub(published),
        })
    }
}

/// Editors for single-row content (hero, profile).
pub struct AdminSingletonService<E: ContentRecord> {
    repo: Arc<dyn SingletonRepo<E>>,
    audit: AdminAuditService,
}

impl<E: ContentRecord> Clone for AdminSingletonService<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<E: ContentRecord> AdminSingletonService<E> {
    pub fn new(repo: Arc<dyn SingletonRepo<E>>, audit: AdminAuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn load(&self) -> Result<Option<E>, AdminContentError> {
        Ok(self.repo.load().await?)
    }

    pub async fn save(&self, actor: &str, fields: &FormFields) -> Result<E, AdminContentError> {
        let draft = E::Draft::parse(fields).map_err(AdminContentError::Validation)?;
        let record = self.repo.save(&draft).await?;
        self.audit
            .record_committed(
                actor,
                AuditAction::Save,
                E::KIND,
                Some(record.id()),
                Some(&draft),
            )
            .await;
        Ok(record)
    }
}

/// Toast shown after a successful mutation.
pub fn success_message(kind: ContentKind, action: AuditAction) -> String {
    match action {
        AuditAction::Create => format!("{} added successfully", kind.label()),
        AuditAction::Update => format!("{} updated successfully", kind.label()),
        AuditAction::Delete => format!("{} deleted successfully", kind.label()),
        AuditAction::Publish => format!("{} published successfully", kind.label()),
        AuditAction::Unpublish => format!("{} unpublished successfully", kind.label()),
        AuditAction::Save => format!("{} saved successfully", kind.label()),
    }
}

/// Toast shown when a mutation fails.
pub fn failure_message(kind: ContentKind, action: AuditAction) -> String {
    let verb = match action {
        AuditAction::Create | AuditAction::Update | AuditAction::Save => "save",
        AuditAction::Delete => "delete",
        AuditAction::Publish | AuditAction::Unpublish => "update",
    };
    format!("Failed to {verb} {}", kind.label().to_lowercase())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::application::repos::AuditRepo;
    use crate::domain::entities::{AuditLogRecord, SkillDraft, SkillRecord};

    #[derive(Default)]
    struct MemorySkills {
        rows: Mutex<Vec<SkillRecord>>,
    }

    #[async_trait]
    impl ContentRepo<SkillRecord> for MemorySkills {
        async fn list(&self) -> Result<Vec<SkillRecord>, RepoError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<SkillRecord>, RepoError> {
            Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
        }

        async fn insert(&self, draft: &SkillDraft) -> Result<SkillRecord, RepoError> {
            let now = OffsetDateTime::now_utc();
            let record = SkillRecord {
                id: Uuid::new_v4(),
                name: draft.name.clone(),
                icon: draft.icon.clone(),
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: Uuid, draft: &SkillDraft) -> Result<SkillRecord, RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or(RepoError::NotFound)?;
            row.name = draft.name.clone();
            row.icon = draft.icon.clone();
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }

        async fn count(&self) -> Result<u64, RepoError> {
            Ok(self.rows.lock().unwrap().len() as u64)
        }
    }

    #[derive(Default)]
    struct MemoryAudit {
        records: Mutex<Vec<AuditLogRecord>>,
    }

    #[async_trait]
    impl AuditRepo for MemoryAudit {
        async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
            self.records.lock().unwrap().push(record);
            Ok(())
        }

        async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().rev().take(limit as usize).cloned().collect())
        }
    }

    struct UnavailableAudit;

    #[async_trait]
    impl AuditRepo for UnavailableAudit {
        async fn append_log(&self, _record: AuditLogRecord) -> Result<(), RepoError> {
            Err(RepoError::from_persistence("audit table unavailable"))
        }

        async fn list_recent(&self, _limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
            Ok(Vec::new())
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    fn service() -> (AdminContentService<SkillRecord>, Arc<MemoryAudit>) {
        let audit = Arc::new(MemoryAudit::default());
        let service = AdminContentService::new(
            Arc::new(MemorySkills::default()),
            AdminAuditService::new(audit.clone()),
        );
        (service, audit)
    }

    #[tokio::test]
    async fn create_update_delete_are_audited() {
        let (service, audit) = service();

        let created = service
            .create("admin@example.com", &fields(&[("name", "Rust"), ("icon", "FaRust")]))
            .await
            .expect("create");
        service
            .update(
                "admin@example.com",
                created.id,
                &fields(&[("name", "Rust 2024"), ("icon", "FaRust")]),
            )
            .await
            .expect("update");
        service
            .delete("admin@example.com", created.id)
            .await
            .expect("delete");

        let actions: Vec<_> = audit
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.action.clone())
            .collect();
        assert_eq!(actions, vec!["skill.create", "skill.update", "skill.delete"]);
        assert!(service.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn committed_writes_succeed_when_audit_append_fails() {
        let service = AdminContentService::<SkillRecord>::new(
            Arc::new(MemorySkills::default()),
            AdminAuditService::new(Arc::new(UnavailableAudit)),
        );

        let created = service
            .create("admin@example.com", &fields(&[("name", "Rust"), ("icon", "FaRust")]))
            .await
            .expect("row is saved even without an audit entry");
        assert_eq!(service.count().await.expect("count"), 1);

        service
            .delete("admin@example.com", created.id)
            .await
            .expect("delete");
        assert_eq!(service.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn invalid_form_is_not_persisted() {
        let (service, audit) = service();

        let err = service
            .create("admin@example.com", &fields(&[("name", "Rust")]))
            .await
            .expect_err("missing icon");
        match err {
            AdminContentError::Validation(errors) => {
                assert_eq!(errors.message_for("icon"), Some("Icon name is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.count().await.expect("count"), 0);
        assert!(audit.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.delete("admin@example.com", Uuid::new_v4()).await,
            Err(AdminContentError::NotFound)
        ));
        assert!(matches!(
            service
                .update(
                    "admin@example.com",
                    Uuid::new_v4(),
                    &fields(&[("name", "Go"), ("icon", "FaGo")])
                )
                .await,
            Err(AdminContentError::NotFound)
        ));
    }

    #[test]
    fn toast_messages_follow_editor_wording() {
        assert_eq!(
            success_message(ContentKind::Project, AuditAction::Create),
            "Project added successfully"
        );
        assert_eq!(
            success_message(ContentKind::Blog, AuditAction::Unpublish),
            "Blog unpublished successfully"
        );
        assert_eq!(
            success_message(ContentKind::Hero, AuditAction::Save),
            "Hero content saved successfully"
        );
        assert_eq!(
            failure_message(ContentKind::Education, AuditAction::Delete),
            "Failed to delete education"
        );
        assert_eq!(
            failure_message(ContentKind::Project, AuditAction::Create),
            "Failed to save project"
        );
        assert_eq!(
            failure_message(ContentKind::Project, AuditAction::Update),
            "Failed to save project"
        );
        assert_eq!(
            failure_message(ContentKind::Blog, AuditAction::Publish),
            "Failed to update blog"
        );
    }
}
