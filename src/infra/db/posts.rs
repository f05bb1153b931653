use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{PostDetailRecord, PostRecord, PostSummaryRecord};

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    excerpt: String,
    content: String,
    date: String,
    category: String,
    image: String,
    images: Vec<String>,
    pdf: Option<String>,
    author: String,
    created_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            date: row.date,
            category: row.category,
            image: row.image,
            images: row.images,
            pdf: row.pdf,
            author: row.author,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PostSummaryRow {
    id: Uuid,
    title: String,
    excerpt: String,
    date: String,
    category: String,
    image: String,
    author: String,
    created_at: OffsetDateTime,
}

impl From<PostSummaryRow> for PostSummaryRecord {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            date: row.date,
            category: row.category,
            image: row.image,
            author: row.author,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PostDetailRow {
    id: Uuid,
    title: String,
    excerpt: String,
    content: String,
    date: String,
    category: String,
    image: String,
    author: String,
    created_at: OffsetDateTime,
}

impl From<PostDetailRow> for PostDetailRecord {
    fn from(row: PostDetailRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            excerpt: row.excerpt,
            content: row.content,
            date: row.date,
            category: row.category,
            image: row.image,
            author: row.author,
            created_at: row.created_at,
        }
    }
}

const FULL_COLUMNS: &str =
    "id, title, excerpt, content, date, category, image, images, pdf, author, created_at";

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_summaries(&self) -> Result<Vec<PostSummaryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PostSummaryRow>(
            "SELECT id, title, excerpt, date, category, image, author, created_at \
             FROM posts ORDER BY created_at DESC",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostSummaryRecord::from).collect())
    }

    async fn fetch_detail(&self, id: Uuid) -> Result<Option<PostDetailRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostDetailRow>(
            "SELECT id, title, excerpt, content, date, category, image, author, created_at \
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostDetailRecord::from))
    }

    async fn fetch_full(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {FULL_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn fetch_gallery(&self, id: Uuid) -> Result<Vec<String>, RepoError> {
        let images: Option<(Vec<String>,)> =
            sqlx::query_as("SELECT images FROM posts WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(images.map(|(images,)| images).unwrap_or_default())
    }

    async fn fetch_attachment(&self, id: Uuid) -> Result<Option<String>, RepoError> {
        let pdf: Option<(Option<String>,)> =
            sqlx::query_as("SELECT pdf FROM posts WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(pdf.and_then(|(pdf,)| pdf))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts ({FULL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {FULL_COLUMNS}"
        ))
        .bind(id)
        .bind(&params.title)
        .bind(&params.excerpt)
        .bind(&params.content)
        .bind(&params.date)
        .bind(&params.category)
        .bind(&params.image)
        .bind(&params.images)
        .bind(&params.pdf)
        .bind(&params.author)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts SET title = $2, excerpt = $3, content = $4, date = $5, \
             category = $6, image = $7, images = $8, pdf = $9, author = $10 \
             WHERE id = $1 RETURNING {FULL_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.excerpt)
        .bind(&params.content)
        .bind(&params.date)
        .bind(&params.category)
        .bind(&params.image)
        .bind(&params.images)
        .bind(&params.pdf)
        .bind(&params.author)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
