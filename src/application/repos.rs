//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    AdminSessionRecord, AdminUserRecord, AuditLogRecord, BlogRecord, ContentRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// CRUD over a list-style content table.
///
/// Skills list oldest first; every other kind lists newest first.
#[async_trait]
pub trait ContentRepo<E: ContentRecord>: Send + Sync {
    async fn list(&self) -> Result<Vec<E>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, RepoError>;

    async fn insert(&self, draft: &E::Draft) -> Result<E, RepoError>;

    /// Replace every editable column. `NotFound` when `id` is unknown.
    async fn update(&self, id: Uuid, draft: &E::Draft) -> Result<E, RepoError>;

    /// `NotFound` when `id` is unknown.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}

/// Single-row content (hero and profile). The first row by creation time wins.
#[async_trait]
pub trait SingletonRepo<E: ContentRecord>: Send + Sync {
    async fn load(&self) -> Result<Option<E>, RepoError>;

    /// Update the existing row or insert the first one.
    async fn save(&self, draft: &E::Draft) -> Result<E, RepoError>;
}

#[async_trait]
pub trait BlogsRepo: Send + Sync {
    async fn set_published(&self, id: Uuid, published: bool) -> Result<BlogRecord, RepoError>;

    async fn list_published(&self, limit: u32, offset: u64) -> Result<Vec<BlogRecord>, RepoError>;

    async fn count_published(&self) -> Result<u64, RepoError>;

    async fn find_published(&self, id: Uuid) -> Result<Option<BlogRecord>, RepoError>;
}

#[async_trait]
pub trait AdminUsersRepo: Send + Sync {
    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUserRecord>, RepoError>;

    async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminUserRecord, RepoError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepoError>;

    async fn list_admins(&self) -> Result<Vec<AdminUserRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: Vec<u8>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

#[async_trait]
pub trait AdminSessionsRepo: Send + Sync {
    async fn create_session(&self, params: CreateSessionParams) -> Result<(), RepoError>;

    /// Session joined with its owner's email.
    async fn find_session(&self, id: Uuid) -> Result<Option<AdminSessionRecord>, RepoError>;

    async fn touch_session(&self, id: Uuid, seen_at: OffsetDateTime) -> Result<(), RepoError>;

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError>;

    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<u64, RepoError>;

    /// Remove sessions whose expiry is at or before `now`.
    async fn delete_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait AuditRepo: Send + Sync {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError>;

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
