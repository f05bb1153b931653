pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route(
            "/api/v1/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/v1/posts/{id}",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/api/v1/posts/{id}/gallery", get(handlers::get_gallery))
        .route(
            "/api/v1/posts/{id}/attachment",
            get(handlers::get_attachment),
        )
        .route(
            "/api/v1/posts/{id}/attachment/file",
            get(handlers::download_attachment),
        )
        .route(
            "/api/v1/subscribers",
            get(handlers::list_subscribers).post(handlers::subscribe),
        )
        .route("/api/v1/newsletter/announce", post(handlers::announce))
        .route("/api/v1/newsletter/digest", post(handlers::digest))
        .with_state(state)
}
