//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{
    PostDetailRecord, PostRecord, PostSummaryRecord, SubscriberRecord,
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
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Full column set written at create time. Heavy fields go in the same
/// insert as the light ones so a post is never half-persisted.
#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub pdf: Option<String>,
    pub author: String,
}

/// Full column set written at update time. Callers must populate this from
/// the authoritative stored record, not from a partial in-memory copy.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
    pub pdf: Option<String>,
    pub author: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Light columns only, newest first.
    async fn list_summaries(&self) -> Result<Vec<PostSummaryRecord>, RepoError>;

    /// Body included, gallery and attachment excluded.
    async fn fetch_detail(&self, id: Uuid) -> Result<Option<PostDetailRecord>, RepoError>;

    /// Every column, heavy fields included. The merge-then-write update
    /// path depends on this being complete.
    async fn fetch_full(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    async fn fetch_gallery(&self, id: Uuid) -> Result<Vec<String>, RepoError>;

    async fn fetch_attachment(&self, id: Uuid) -> Result<Option<String>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    /// Returns true when a row was actually removed.
    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait SubscribersRepo: Send + Sync {
    /// Insert a new subscriber. A duplicate email surfaces as
    /// [`RepoError::Duplicate`]; the service layer softens it.
    async fn insert_subscriber(&self, email: &str) -> Result<SubscriberRecord, RepoError>;

    /// Newest first.
    async fn list_subscribers(&self) -> Result<Vec<SubscriberRecord>, RepoError>;
}
