use std::sync::Arc;

use crate::auth::AuthBackend;
use crate::documents::store::DocumentStore;
use crate::github::GithubClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Document access layer. Postgres-backed in production, in-memory in tests.
    pub documents: Arc<dyn DocumentStore>,
    /// Token resolver behind the `AuthUser` extractor.
    pub auth: Arc<dyn AuthBackend>,
    /// `None` until ANTHROPIC_API_KEY is set; LLM endpoints answer 500.
    pub llm: Option<LlmClient>,
    /// `None` until GITHUB_TOKEN is set; repository endpoints answer 500.
    pub github: Option<GithubClient>,
}
