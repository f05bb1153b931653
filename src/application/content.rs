//! Split-fetch content service.
//!
//! List and detail reads never carry the gallery or the PDF attachment;
//! those travel only through their own explicitly invoked read paths. The
//! write side owns the one ordering rule that matters here: a partial
//! update is merged onto the freshly re-read full record, never onto the
//! caller's in-memory copy, so heavy fields a client never loaded cannot
//! be silently erased by a save.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use time::{OffsetDateTime, macros::format_description};
use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{PostDetailRecord, PostRecord, PostSummaryRecord};
use crate::domain::{DomainError, ensure_non_empty};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Fields supplied by an editor when creating a post. Identity, date and
/// author are assigned by the service.
#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub pdf: Option<String>,
}

/// Partial edit: `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub pdf: Option<Option<String>>,
}

#[derive(Clone)]
pub struct ContentService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    author: String,
}

impl ContentService {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>, author: String) -> Self {
        Self {
            reader,
            writer,
            author,
        }
    }

    pub async fn list_summaries(&self) -> Result<Vec<PostSummaryRecord>, ContentError> {
        Ok(self.reader.list_summaries().await?)
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<PostDetailRecord, ContentError> {
        self.reader
            .fetch_detail(id)
            .await?
            .ok_or(ContentError::NotFound)
    }

    /// Gallery reads are supplementary to the article view: a missing post
    /// or a store failure degrades to an empty gallery rather than an error.
    pub async fn get_gallery(&self, id: Uuid) -> Vec<String> {
        match self.reader.fetch_gallery(id).await {
            Ok(images) => images,
            Err(err) => {
                warn!(post_id = %id, error = %err, "gallery fetch failed, serving empty");
                Vec::new()
            }
        }
    }

    /// The raw stored attachment payload, wire tag and all. Decoding is the
    /// attachment codec's job, not this service's.
    pub async fn get_attachment(&self, id: Uuid) -> Option<String> {
        match self.reader.fetch_attachment(id).await {
            Ok(pdf) => pdf,
            Err(err) => {
                warn!(post_id = %id, error = %err, "attachment fetch failed, serving none");
                None
            }
        }
    }

    pub async fn create(&self, command: CreatePostCommand) -> Result<PostRecord, ContentError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.excerpt, "excerpt")?;
        ensure_non_empty(&command.content, "content")?;

        let params = CreatePostParams {
            title: command.title,
            excerpt: command.excerpt,
            content: command.content,
            date: display_date(OffsetDateTime::now_utc()),
            category: command.category,
            image: command.image,
            images: command.images,
            pdf: command.pdf,
            author: self.author.clone(),
        };

        let post = self.writer.create_post(params).await?;
        counter!("circolare_posts_created_total").increment(1);
        Ok(post)
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, ContentError> {
        // Re-read the authoritative record, heavy fields included. Merging
        // onto anything narrower would null out gallery or attachment data
        // the caller never had in hand.
        let existing = self
            .reader
            .fetch_full(id)
            .await?
            .ok_or(ContentError::NotFound)?;

        let params = UpdatePostParams {
            id,
            title: command.title.unwrap_or(existing.title),
            excerpt: command.excerpt.unwrap_or(existing.excerpt),
            content: command.content.unwrap_or(existing.content),
            date: existing.date,
            category: command.category.unwrap_or(existing.category),
            image: command.image.unwrap_or(existing.image),
            images: command.images.unwrap_or(existing.images),
            pdf: command.pdf.unwrap_or(existing.pdf),
            author: existing.author,
        };

        ensure_non_empty(&params.title, "title")?;
        ensure_non_empty(&params.excerpt, "excerpt")?;
        ensure_non_empty(&params.content, "content")?;

        Ok(self.writer.update_post(params).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ContentError> {
        Ok(self.writer.delete_post(id).await?)
    }
}

/// Human-facing creation date, fixed once at create time.
fn display_date(at: OffsetDateTime) -> String {
    let format = format_description!("[day] [month repr:short] [year]");
    at.format(&format)
        .unwrap_or_else(|_| at.date().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn display_date_is_short_and_stable() {
        assert_eq!(display_date(datetime!(2026-03-07 12:00 UTC)), "07 Mar 2026");
    }
}
