//! Notification dispatcher.
//!
//! A dispatch is one-shot: render, send to every subscriber over bcc, and
//! report a terminal outcome. There is no retry queue; the one automatic
//! retry happens when the provider reports its sandbox restriction, in
//! which case the send is narrowed to the single allowed address and the
//! outcome carries a warning instead of failing.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::mail::{MailError, MailMessage, Mailer};
use crate::application::repos::{PostsRepo, RepoError, SubscribersRepo};
use crate::application::templates::{render_digest, render_post_announcement};

/// Inline notice prepended to the body of a sandbox-restricted resend.
const TEST_MODE_BANNER: &str = "<p><strong>Notice: this email was delivered only to you \
because the sending domain has not been verified with the mail provider.</strong></p><hr/>";

const TEST_MODE_SUBJECT_PREFIX: &str = "[TEST MODE] ";

#[derive(Debug, Error)]
pub enum NewsletterError {
    #[error("post not found")]
    PostNotFound,
    #[error("no posts to include in a digest")]
    NothingToSend,
    #[error("no subscribers to notify")]
    NoSubscribers,
    #[error("email template failed to render: {0}")]
    Template(#[from] askama::Error),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Dispatch(#[from] MailError),
}

/// Terminal state of a dispatch. `warning` distinguishes
/// succeeded-with-warning (sandbox fallback) from a clean success.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub provider_id: Option<String>,
    pub recipients: usize,
    pub warning: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsletterOptions {
    pub from: String,
    /// Fixed visible `to` address; real recipients ride in bcc.
    pub placeholder_to: String,
    pub public_url: String,
    pub digest_size: usize,
}

#[derive(Clone)]
pub struct NewsletterService {
    posts: Arc<dyn PostsRepo>,
    subscribers: Arc<dyn SubscribersRepo>,
    mailer: Arc<dyn Mailer>,
    options: NewsletterOptions,
}

impl NewsletterService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        subscribers: Arc<dyn SubscribersRepo>,
        mailer: Arc<dyn Mailer>,
        options: NewsletterOptions,
    ) -> Self {
        Self {
            posts,
            subscribers,
            mailer,
            options,
        }
    }

    /// Announce a single post to every subscriber.
    pub async fn announce_post(&self, post_id: Uuid) -> Result<DispatchOutcome, NewsletterError> {
        let post = self
            .posts
            .fetch_detail(post_id)
            .await?
            .ok_or(NewsletterError::PostNotFound)?;

        let subject = format!("New article: {}", post.title);
        let html = render_post_announcement(&post, &self.options.public_url)?;
        self.dispatch(subject, html).await
    }

    /// Send a digest of the latest posts, capped at the configured size.
    pub async fn send_digest(
        &self,
        limit: Option<usize>,
    ) -> Result<DispatchOutcome, NewsletterError> {
        let mut posts = self.posts.list_summaries().await?;
        posts.truncate(limit.unwrap_or(self.options.digest_size).max(1));
        if posts.is_empty() {
            return Err(NewsletterError::NothingToSend);
        }

        let html = render_digest(&posts, &self.options.public_url)?;
        self.dispatch("Weekly highlights".to_owned(), html).await
    }

    async fn dispatch(
        &self,
        subject: String,
        html: String,
    ) -> Result<DispatchOutcome, NewsletterError> {
        let recipients: Vec<String> = self
            .subscribers
            .list_subscribers()
            .await?
            .into_iter()
            .map(|s| s.email)
            .collect();
        if recipients.is_empty() {
            return Err(NewsletterError::NoSubscribers);
        }

        let recipient_count = recipients.len();
        let message = MailMessage {
            from: self.options.from.clone(),
            to: vec![self.options.placeholder_to.clone()],
            bcc: recipients,
            subject: subject.clone(),
            html: html.clone(),
        };

        counter!("circolare_newsletter_dispatch_total").increment(1);
        match self.mailer.send(&message).await {
            Ok(ack) => {
                info!(recipients = recipient_count, subject = %subject, "newsletter dispatched");
                Ok(DispatchOutcome {
                    provider_id: ack.provider_id,
                    recipients: recipient_count,
                    warning: None,
                })
            }
            Err(MailError::SandboxRestricted { allowed }) => {
                self.dispatch_sandboxed(subject, html, allowed).await
            }
            Err(err) => {
                counter!("circolare_newsletter_dispatch_failed_total").increment(1);
                Err(err.into())
            }
        }
    }

    /// Sandbox fallback: resend to the single allowed address with an
    /// explicit test-mode subject and banner. Still counts as a success,
    /// but the outcome carries a warning for the operator.
    async fn dispatch_sandboxed(
        &self,
        subject: String,
        html: String,
        allowed: String,
    ) -> Result<DispatchOutcome, NewsletterError> {
        warn!(allowed = %allowed, "provider sandboxed, retrying to allowed address only");
        counter!("circolare_newsletter_sandbox_fallback_total").increment(1);

        let retry = MailMessage {
            from: self.options.from.clone(),
            to: vec![allowed.clone()],
            bcc: Vec::new(),
            subject: format!("{TEST_MODE_SUBJECT_PREFIX}{subject}"),
            html: format!("{TEST_MODE_BANNER}{html}"),
        };

        let ack = self.mailer.send(&retry).await.map_err(|err| {
            counter!("circolare_newsletter_dispatch_failed_total").increment(1);
            NewsletterError::from(err)
        })?;

        Ok(DispatchOutcome {
            provider_id: ack.provider_id,
            recipients: 1,
            warning: Some(format!(
                "sending domain not verified; email delivered to test address `{allowed}` only"
            )),
        })
    }
}
