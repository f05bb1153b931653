//! JSON API handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use crate::domain::attachment::Attachment;

use super::error::ApiError;
use super::models::*;
use super::state::AppState;

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.content.list_summaries().await?;
    Ok(Json(summaries))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.content.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.content.get_detail(id).await?;
    Ok(Json(detail))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.content.update(id, payload.into()).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.content.delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn get_gallery(State(state): State<AppState>, Path(id): Path<Uuid>) -> Json<Vec<String>> {
    Json(state.content.get_gallery(id).await)
}

pub async fn get_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<AttachmentResponse> {
    Json(AttachmentResponse {
        pdf: state.content.get_attachment(id).await,
    })
}

/// Serve the attachment as a downloadable document. Compressed payloads are
/// inflated here and streamed as binary; legacy rows hold a resource
/// reference the client can use directly, so those come back as JSON.
pub async fn download_attachment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let stored = state
        .content
        .get_attachment(id)
        .await
        .ok_or_else(|| ApiError::not_found("post has no attachment"))?;

    match Attachment::from_wire(&stored)? {
        Attachment::Compressed(bytes) => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{id}.pdf\""),
                ),
            ],
            bytes,
        )
            .into_response()),
        Attachment::Reference(reference) => {
            Ok(Json(json!({ "reference": reference })).into_response())
        }
    }
}

pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.subscribers.subscribe(&payload.email).await?;
    Ok(Json(SubscribeResponse::from(outcome)))
}

pub async fn list_subscribers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let subscribers = state.subscribers.list_all().await?;
    Ok(Json(subscribers))
}

pub async fn announce(
    State(state): State<AppState>,
    Json(payload): Json<AnnounceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.newsletter.announce_post(payload.post_id).await?;
    Ok(Json(DispatchResponse::from(outcome)))
}

pub async fn digest(
    State(state): State<AppState>,
    Json(payload): Json<DigestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.newsletter.send_digest(payload.limit).await?;
    Ok(Json(DispatchResponse::from(outcome)))
}

pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .health_check()
        .await
        .map_err(|err| super::error::repo_to_api(crate::infra::db::map_sqlx_error(err)))?;
    Ok(Json(json!({ "status": "ok" })))
}
