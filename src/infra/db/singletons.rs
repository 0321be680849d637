use async_trait::async_trait;

use crate::application::repos::{RepoError, SingletonRepo};

use super::content::{ContentTable, insert_query, select_sql, update_query};
use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl<E: ContentTable> SingletonRepo<E> for PostgresRepositories {
    async fn load(&self) -> Result<Option<E>, RepoError> {
        let sql = format!("{} ORDER BY created_at ASC, id ASC LIMIT 1", select_sql::<E>());
        let row = sqlx::query_as::<_, E::Row>(&sql)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn save(&self, draft: &E::Draft) -> Result<E, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        // Concurrent first saves must not both insert.
        sqlx::query(&format!(
            "LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE",
            E::TABLE
        ))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let existing: Option<uuid::Uuid> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} ORDER BY created_at ASC, id ASC LIMIT 1",
            E::TABLE
        ))
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let mut qb = match existing {
            Some(id) => update_query::<E>(id, draft),
            None => insert_query::<E>(draft),
        };
        let row = qb
            .build_query_as::<E::Row>()
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into())
    }
}
