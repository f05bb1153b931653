//! Subscriber registry.
//!
//! Public signup is deliberately idempotent-feeling: a duplicate email is
//! reported back as "already subscribed", not surfaced as a failure. There
//! is intentionally no unsubscribe path yet; see DESIGN.md.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{RepoError, SubscribersRepo};
use crate::domain::entities::SubscriberRecord;

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Terminal signup states. Both are successes from the caller's side.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscribeOutcome {
    Subscribed { id: Uuid },
    AlreadySubscribed,
}

#[derive(Clone)]
pub struct SubscriberService {
    repo: Arc<dyn SubscribersRepo>,
}

impl SubscriberService {
    pub fn new(repo: Arc<dyn SubscribersRepo>) -> Self {
        Self { repo }
    }

    pub async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, SubscribeError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(SubscribeError::InvalidEmail(email.to_owned()));
        }

        match self.repo.insert_subscriber(email).await {
            Ok(record) => {
                counter!("circolare_subscribers_total").increment(1);
                Ok(SubscribeOutcome::Subscribed { id: record.id })
            }
            Err(RepoError::Duplicate { .. }) => Ok(SubscribeOutcome::AlreadySubscribed),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<SubscriberRecord>, SubscribeError> {
        Ok(self.repo.list_subscribers().await?)
    }
}
