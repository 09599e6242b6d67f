pub mod health;
pub mod profile;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers as doc_handlers;
use crate::errors::AppError;
use crate::github::handlers as github_handlers;
use crate::seo::handlers as seo_handlers;
use crate::state::AppState;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route(
            "/api/v1/documents",
            get(doc_handlers::handle_list_documents).post(doc_handlers::handle_create_document),
        )
        .route(
            "/api/v1/documents/current",
            get(doc_handlers::handle_current_document),
        )
        .route(
            "/api/v1/documents/:id",
            get(doc_handlers::handle_get_document)
                .put(doc_handlers::handle_update_document)
                .delete(doc_handlers::handle_delete_document),
        )
        // SEO API (public)
        .route("/api/v1/score", post(seo_handlers::handle_score))
        .route("/api/v1/optimize", post(seo_handlers::handle_optimize))
        .route("/api/v1/keywords", post(seo_handlers::handle_keywords))
        // GitHub passthrough (public)
        .route(
            "/api/v1/github/readme",
            get(github_handlers::handle_fetch_readme),
        )
        // Profile
        .route(
            "/api/v1/user/profile",
            get(profile::profile_handler).patch(not_implemented),
        )
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// End-to-end tests against the full router, with an in-memory store
// ────────────────────────────────────────────────────────────────────────────
