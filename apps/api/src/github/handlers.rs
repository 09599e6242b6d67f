//! Axum handler for the repository README passthrough.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::github::is_valid_repo_slug;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReadmeQuery {
    pub repo: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Legacy alias for `ref`.
    pub branch: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadmeResponse {
    pub content: String,
    pub sha: String,
    pub path: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

/// GET /api/v1/github/readme
///
/// Proxies a repository README through the server-held token so clients
/// never need GitHub credentials of their own. The slug is validated before
/// the token is even looked at.
pub async fn handle_fetch_readme(
    State(state): State<AppState>,
    Query(query): Query<ReadmeQuery>,
) -> Result<Json<ReadmeResponse>, AppError> {
    let repo = query.repo.as_deref().unwrap_or_default();
    if !is_valid_repo_slug(repo) {
        return Err(AppError::Validation(
            "Invalid or missing repo (expected owner/name)".to_string(),
        ));
    }

    let git_ref = query
        .git_ref
        .or(query.branch)
        .filter(|r| !r.is_empty());

    let github = state
        .github
        .as_ref()
        .ok_or(AppError::MissingConfig("GITHUB_TOKEN"))?;

    let readme = github.readme(repo, git_ref.as_deref()).await?;

    Ok(Json(ReadmeResponse {
        content: readme.content,
        sha: readme.sha,
        path: readme.path,
        git_ref,
    }))
}
