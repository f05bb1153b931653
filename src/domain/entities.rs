//! Domain entities mirrored from persistent storage.
//!
//! The post shape is deliberately split three ways: the full record (every
//! column, used for merge-then-write updates), the detail projection (body
//! included, heavy attachments excluded) and the summary projection (light
//! columns only). Read paths pick the narrowest shape that serves them so
//! a feed request never drags a multi-megabyte gallery over the wire.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A post with every column loaded, heavy fields included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// Display date fixed at creation, e.g. `07 Mar 2026`.
    pub date: String,
    pub category: String,
    /// Cover image reference, always present.
    pub image: String,
    /// Ordered gallery payloads, possibly empty.
    pub images: Vec<String>,
    /// Optional attachment in wire form; see [`crate::domain::attachment`].
    pub pdf: Option<String>,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// List-view projection: no body, no gallery, no attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummaryRecord {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub category: String,
    pub image: String,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Detail projection: body included, heavy attachments still excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailRecord {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub category: String,
    pub image: String,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<PostRecord> for PostDetailRecord {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            date: post.date,
            category: post.category,
            image: post.image,
            author: post.author,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriberRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
