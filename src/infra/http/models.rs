//! Request and response bodies for the JSON API.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::content::{CreatePostCommand, UpdatePostCommand};
use crate::application::newsletter::DispatchOutcome;
use crate::application::subscribers::SubscribeOutcome;

#[derive(Debug, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub pdf: Option<String>,
}

impl From<PostCreateRequest> for CreatePostCommand {
    fn from(req: PostCreateRequest) -> Self {
        Self {
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            category: req.category,
            image: req.image,
            images: req.images,
            pdf: req.pdf,
        }
    }
}

/// Distinguishes an absent field (leave alone) from an explicit `null`
/// (clear the attachment).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct PostUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pdf: Option<Option<String>>,
}

impl From<PostUpdateRequest> for UpdatePostCommand {
    fn from(req: PostUpdateRequest) -> Self {
        Self {
            title: req.title,
            excerpt: req.excerpt,
            content: req.content,
            category: req.category,
            image: req.image,
            images: req.images,
            pdf: req.pdf,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    pub pdf: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl From<SubscribeOutcome> for SubscribeResponse {
    fn from(outcome: SubscribeOutcome) -> Self {
        match outcome {
            SubscribeOutcome::Subscribed { .. } => Self {
                status: "subscribed",
                message: "Subscription confirmed.",
            },
            SubscribeOutcome::AlreadySubscribed => Self {
                status: "already_subscribed",
                message: "This email address is already subscribed.",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnnounceRequest {
    pub post_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct DigestRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub provider_id: Option<String>,
    pub recipients: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<DispatchOutcome> for DispatchResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            provider_id: outcome.provider_id,
            recipients: outcome.recipients,
            warning: outcome.warning,
        }
    }
}
