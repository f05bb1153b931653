use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, SubscribersRepo};
use crate::domain::entities::SubscriberRecord;

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[derive(Debug, FromRow)]
struct SubscriberRow {
    id: Uuid,
    email: String,
    created_at: OffsetDateTime,
}

impl From<SubscriberRow> for SubscriberRecord {
    fn from(row: SubscriberRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SubscribersRepo for PostgresRepositories {
    async fn insert_subscriber(&self, email: &str) -> Result<SubscriberRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, SubscriberRow>(
            "INSERT INTO subscribers (id, email, created_at) VALUES ($1, $2, $3) \
             RETURNING id, email, created_at",
        )
        .bind(id)
        .bind(email)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(SubscriberRecord::from(row))
    }

    async fn list_subscribers(&self) -> Result<Vec<SubscriberRecord>, RepoError> {
        let rows = sqlx::query_as::<_, SubscriberRow>(
            "SELECT id, email, created_at FROM subscribers ORDER BY created_at DESC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubscriberRecord::from).collect())
    }
}
