//! Axum route handlers for the SEO API: score, optimize, keywords.
//!
//! All three are public: identity is recorded when a valid token happens to
//! be present but never required. Validation runs before any credential
//! check, so a bad request is a 400 even on an unconfigured server.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::auth::MaybeAuthUser;
use crate::errors::AppError;
use crate::models::document::{KeywordReport, ScoreResult};
use crate::seo::keywords::analyze_keywords;
use crate::seo::optimize::{optimize_direct, optimize_grounded, select_path, OptimizePath};
use crate::seo::score::score_content;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub content: Option<String>,
    pub goals: Option<String>,
    /// `owner/name` repository slug.
    pub repo: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Legacy alias for `ref`.
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub content: Option<String>,
}

/// POST /api/v1/score
pub async fn handle_score(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    let content = request.content.as_deref().unwrap_or_default();
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing 'content' (README markdown) in request body".to_string(),
        ));
    }

    let llm = state
        .llm
        .as_ref()
        .ok_or(AppError::MissingConfig("ANTHROPIC_API_KEY"))?;

    if let Some(user) = &user {
        debug!("Score requested by {}", user.id);
    }

    let result = score_content(llm, content).await?;
    Ok(Json(result))
}

/// POST /api/v1/optimize
///
/// Succeeds with raw `text/markdown` rather than a JSON envelope, so the
/// body can be dropped straight into an editor.
pub async fn handle_optimize(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(request): Json<OptimizeRequest>,
) -> Result<Response, AppError> {
    let content = request.content.as_deref();
    let repo = request.repo.as_deref();
    let git_ref = request
        .git_ref
        .as_deref()
        .or(request.branch.as_deref())
        .filter(|r| !r.is_empty());
    let goals = request.goals.as_deref();

    if let Some(user) = &user {
        debug!("Optimize requested by {}", user.id);
    }

    let markdown = match select_path(content, repo) {
        OptimizePath::Unusable => {
            return Err(AppError::Validation(
                "Provide 'content' (a draft README) or 'repo' (owner/name) to optimize"
                    .to_string(),
            ));
        }
        OptimizePath::DirectRewrite => {
            let llm = state
                .llm
                .as_ref()
                .ok_or(AppError::MissingConfig("ANTHROPIC_API_KEY"))?;
            optimize_direct(llm, content.unwrap_or_default(), goals, repo).await?
        }
        OptimizePath::RepoGrounded => {
            // The grounded path needs GitHub before it needs the LLM.
            let github = state
                .github
                .as_ref()
                .ok_or(AppError::MissingConfig("GITHUB_TOKEN"))?;
            let llm = state
                .llm
                .as_ref()
                .ok_or(AppError::MissingConfig("ANTHROPIC_API_KEY"))?;
            let repo = repo.unwrap_or_default();
            optimize_grounded(llm, github, repo, git_ref, goals).await?
        }
    };

    Ok(markdown_response(markdown))
}

/// POST /api/v1/keywords
pub async fn handle_keywords(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(request): Json<KeywordsRequest>,
) -> Result<Json<KeywordReport>, AppError> {
    let content = request.content.as_deref().unwrap_or_default();
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing 'content' (README markdown) in request body".to_string(),
        ));
    }

    let llm = state
        .llm
        .as_ref()
        .ok_or(AppError::MissingConfig("ANTHROPIC_API_KEY"))?;

    if let Some(user) = &user {
        debug!("Keywords requested by {}", user.id);
    }

    let report = analyze_keywords(llm, content).await?;
    Ok(Json(report))
}

fn markdown_response(markdown: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    )
        .into_response()
}
