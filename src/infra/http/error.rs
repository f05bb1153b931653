use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::content::ContentError;
use crate::application::newsletter::NewsletterError;
use crate::application::repos::RepoError;
use crate::application::subscribers::SubscribeError;
use crate::domain::attachment::AttachmentError;

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const ATTACHMENT_CORRUPT: &str = "attachment_corrupt";
    pub const DISPATCH: &str = "dispatch_error";
    pub const NO_SUBSCRIBERS: &str = "no_subscribers";
    pub const REPO: &str = "repo_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INVALID_INPUT,
            "duplicate record",
            Some(format!("unique constraint `{constraint}`")),
        ),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            message,
            None,
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "database timeout",
            None,
        ),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "persistence failure",
            Some(message),
        ),
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound => ApiError::not_found("post not found"),
            ContentError::Domain(err) => ApiError::bad_request(err.to_string()),
            ContentError::Repo(err) => repo_to_api(err),
        }
    }
}

impl From<SubscribeError> for ApiError {
    fn from(err: SubscribeError) -> Self {
        match err {
            SubscribeError::InvalidEmail(email) => {
                ApiError::bad_request(format!("`{email}` is not a valid email address"))
            }
            SubscribeError::Repo(err) => repo_to_api(err),
        }
    }
}

impl From<NewsletterError> for ApiError {
    fn from(err: NewsletterError) -> Self {
        match err {
            NewsletterError::PostNotFound => ApiError::not_found("post not found"),
            NewsletterError::NothingToSend => {
                ApiError::bad_request("no posts to include in a digest")
            }
            NewsletterError::NoSubscribers => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::NO_SUBSCRIBERS,
                "no subscribers to notify",
                None,
            ),
            NewsletterError::Template(err) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::DISPATCH,
                "email template failed to render",
                Some(err.to_string()),
            ),
            NewsletterError::Repo(err) => repo_to_api(err),
            NewsletterError::Dispatch(err) => ApiError::new(
                StatusCode::BAD_GATEWAY,
                codes::DISPATCH,
                "mail provider rejected the dispatch",
                Some(err.to_string()),
            ),
        }
    }
}

impl From<AttachmentError> for ApiError {
    fn from(err: AttachmentError) -> Self {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::ATTACHMENT_CORRUPT,
            "could not prepare download",
            Some(err.to_string()),
        )
    }
}
