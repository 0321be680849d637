use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{AdminUsersRepo, RepoError},
    domain::entities::AdminUserRecord,
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(FromRow)]
struct AdminUserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: OffsetDateTime,
}

impl From<AdminUserRow> for AdminUserRecord {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AdminUsersRepo for PostgresRepositories {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "SELECT id, email, password_hash, created_at FROM admin_users \
             WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminUserRecord::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminUserRecord>, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "SELECT id, email, password_hash, created_at FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(AdminUserRecord::from))
    }

    async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminUserRecord, RepoError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "INSERT INTO admin_users (email, password_hash) VALUES ($1, $2) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE admin_users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list_admins(&self) -> Result<Vec<AdminUserRecord>, RepoError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            "SELECT id, email, password_hash, created_at FROM admin_users ORDER BY created_at ASC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(AdminUserRecord::from).collect())
    }
}
