use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{AdminSessionsRepo, CreateSessionParams, RepoError},
    domain::entities::AdminSessionRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    email: String,
    token_hash: Vec<u8>,
    created_at: OffsetDateTime,
    expires_at: OffsetDateTime,
    last_seen_at: Option<OffsetDateTime>,
}

impl From<SessionRow> for AdminSessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            email: row.email,
            token_hash: row.token_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
            last_seen_at: row.last_seen_at,
        }
    }
}

#[async_trait]
impl AdminSessionsRepo for PostgresRepositories {
    async fn create_session(&self, params: CreateSessionParams) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO admin_sessions (id, user_id, token_hash, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(params.id)
        .bind(params.user_id)
        .bind(params.token_hash)
        .bind(params.created_at)
        .bind(params.expires_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<AdminSessionRecord>, RepoError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT s.id, s.user_id, u.email, s.token_hash, s.created_at, s.expires_at, s.last_seen_at \
             FROM admin_sessions s INNER JOIN admin_users u ON u.id = s.user_id \
             WHERE s.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminSessionRecord::from))
    }

    async fn touch_session(&self, id: Uuid, seen_at: OffsetDateTime) -> Result<(), RepoError> {
        sqlx::query("UPDATE admin_sessions SET last_seen_at = $1 WHERE id = $2")
            .bind(seen_at)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
