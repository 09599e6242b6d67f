//! Axum route handlers for the document API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::document::{
    CreateDocumentInput, DocumentMetadata, DocumentRow, DocumentSummary, UpdateDocumentInput,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub document: DocumentRow,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentDocumentQuery {
    pub source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub metadata: Option<DocumentMetadata>,
    pub score: Option<f64>,
    pub source_url: Option<String>,
    pub template_id: Option<String>,
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DocumentListResponse>, AppError> {
    let documents = state.documents.list(user.id).await?;
    Ok(Json(DocumentListResponse { documents }))
}

/// GET /api/v1/documents/current
///
/// The editor's entry point: the caller's working document, created on
/// first contact.
pub async fn handle_current_document(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CurrentDocumentQuery>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state
        .documents
        .get_or_create(user.id, query.source_url.as_deref())
        .await?;
    Ok(Json(DocumentResponse { document }))
}

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let content = match request.content {
        Some(c) if !c.is_empty() => c,
        _ => {
            return Err(AppError::Validation(
                "content is required and must be a non-empty string".to_string(),
            ))
        }
    };

    let document = state
        .documents
        .create(
            user.id,
            CreateDocumentInput {
                title: request.title,
                content,
                metadata: request.metadata,
                score: request.score,
                source_url: request.source_url,
                template_id: request.template_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse { document })))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state
        .documents
        .get(user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    Ok(Json(DocumentResponse { document }))
}

/// PUT /api/v1/documents/:id
///
/// Partial update: absent fields stay untouched, `"title": null` clears
/// the title.
pub async fn handle_update_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateDocumentInput>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state
        .documents
        .update(user.id, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    Ok(Json(DocumentResponse { document }))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.documents.delete(user.id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Document {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
