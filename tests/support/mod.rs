//! In-memory fakes for service-level tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use circolare::application::mail::{MailAck, MailError, MailMessage, Mailer};
use circolare::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, SubscribersRepo, UpdatePostParams,
};
use circolare::domain::entities::{
    PostDetailRecord, PostRecord, PostSummaryRecord, SubscriberRecord,
};

#[derive(Default)]
pub struct InMemoryStore {
    posts: Mutex<Vec<PostRecord>>,
    subscribers: Mutex<Vec<SubscriberRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn post_count(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub async fn raw_post(&self, id: Uuid) -> Option<PostRecord> {
        self.posts.lock().await.iter().find(|p| p.id == id).cloned()
    }
}

fn summarize(post: &PostRecord) -> PostSummaryRecord {
    PostSummaryRecord {
        id: post.id,
        title: post.title.clone(),
        excerpt: post.excerpt.clone(),
        date: post.date.clone(),
        category: post.category.clone(),
        image: post.image.clone(),
        author: post.author.clone(),
        created_at: post.created_at,
    }
}

#[async_trait]
impl PostsRepo for InMemoryStore {
    async fn list_summaries(&self) -> Result<Vec<PostSummaryRecord>, RepoError> {
        let mut posts = self.posts.lock().await.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts.iter().map(summarize).collect())
    }

    async fn fetch_detail(&self, id: Uuid) -> Result<Option<PostDetailRecord>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .map(PostDetailRecord::from))
    }

    async fn fetch_full(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.posts.lock().await.iter().find(|p| p.id == id).cloned())
    }

    async fn fetch_gallery(&self, id: Uuid) -> Result<Vec<String>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.images.clone())
            .unwrap_or_default())
    }

    async fn fetch_attachment(&self, id: Uuid) -> Result<Option<String>, RepoError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.pdf.clone()))
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            excerpt: params.excerpt,
            content: params.content,
            date: params.date,
            category: params.category,
            image: params.image,
            images: params.images,
            pdf: params.pdf,
            author: params.author,
            created_at: OffsetDateTime::now_utc(),
        };
        self.posts.lock().await.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.excerpt = params.excerpt;
        post.content = params.content;
        post.date = params.date;
        post.category = params.category;
        post.image = params.image;
        post.images = params.images;
        post.pdf = params.pdf;
        post.author = params.author;
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }
}

#[async_trait]
impl SubscribersRepo for InMemoryStore {
    async fn insert_subscriber(&self, email: &str) -> Result<SubscriberRecord, RepoError> {
        let mut subscribers = self.subscribers.lock().await;
        if subscribers.iter().any(|s| s.email == email) {
            return Err(RepoError::Duplicate {
                constraint: "subscribers_email_key".to_owned(),
            });
        }
        let record = SubscriberRecord {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        subscribers.push(record.clone());
        Ok(record)
    }

    async fn list_subscribers(&self) -> Result<Vec<SubscriberRecord>, RepoError> {
        let mut subscribers = self.subscribers.lock().await.clone();
        subscribers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subscribers)
    }
}

/// Mailer double: records every message and replays scripted responses in
/// order, falling back to a generic acknowledgment.
#[derive(Default)]
pub struct ScriptedMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    script: Mutex<VecDeque<Result<MailAck, MailError>>>,
}

impl ScriptedMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn push_response(&self, response: Result<MailAck, MailError>) {
        self.script.lock().await.push_back(response);
    }

    pub async fn sent_messages(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn send(&self, message: &MailMessage) -> Result<MailAck, MailError> {
        self.sent.lock().await.push(message.clone());
        match self.script.lock().await.pop_front() {
            Some(response) => response,
            None => Ok(MailAck {
                provider_id: Some("msg_test".to_owned()),
            }),
        }
    }
}
