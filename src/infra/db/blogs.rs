use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::repos::{BlogsRepo, RepoError},
    domain::entities::BlogRecord,
};

use super::content::{BlogRow, ContentTable, select_sql};
use super::{PostgresRepositories, map_sqlx_error};

const PUBLISHED_ORDER: &str = "created_at DESC, id DESC";

#[async_trait]
impl BlogsRepo for PostgresRepositories {
    async fn set_published(&self, id: Uuid, published: bool) -> Result<BlogRecord, RepoError> {
        let sql = format!(
            "UPDATE {} SET published = $1, updated_at = now() WHERE id = $2 \
             RETURNING id, title, excerpt, content, image_url, published, created_at, updated_at",
            BlogRecord::TABLE
        );
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(published)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(BlogRecord::from).ok_or(RepoError::NotFound)
    }

    async fn list_published(&self, limit: u32, offset: u64) -> Result<Vec<BlogRecord>, RepoError> {
        let offset = i64::try_from(offset)
            .map_err(|_| RepoError::InvalidInput {
                message: "offset exceeds supported range".to_string(),
            })?;
        let sql = format!(
            "{} WHERE published ORDER BY {PUBLISHED_ORDER} LIMIT $1 OFFSET $2",
            select_sql::<BlogRecord>()
        );
        let rows = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogRecord::from).collect())
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE published")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(total)
    }

    async fn find_published(&self, id: Uuid) -> Result<Option<BlogRecord>, RepoError> {
        let sql = format!("{} WHERE id = $1 AND published", select_sql::<BlogRecord>());
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(BlogRecord::from))
    }
}
