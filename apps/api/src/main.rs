mod auth;
mod config;
mod db;
mod documents;
mod errors;
mod github;
mod llm_client;
mod models;
mod routes;
mod seo;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::PgAuthBackend;
use crate::config::Config;
use crate::db::create_pool;
use crate::documents::store::PgDocumentStore;
use crate::github::GithubClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Readsmith API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client (optional: scoring and rewriting 500 without it)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(LlmClient::new(key.clone()))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; score/optimize/keywords endpoints disabled");
            None
        }
    };

    // Initialize GitHub client (optional: repo-grounded features 500 without it)
    let github = match &config.github_token {
        Some(token) => {
            info!("GitHub client initialized");
            Some(GithubClient::new(token.clone()))
        }
        None => {
            warn!("GITHUB_TOKEN not set; repository fetch endpoints disabled");
            None
        }
    };

    // Build app state
    let state = AppState {
        documents: Arc::new(PgDocumentStore::new(db.clone())),
        auth: Arc::new(PgAuthBackend::new(db)),
        llm,
        github,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
