//! Request authentication.
//!
//! Identity is explicit: a handler that needs a caller takes `AuthUser` as
//! an argument and a handler that merely records one takes `MaybeAuthUser`.
//! Bearer tokens are opaque; the database holds only their SHA-256 hash.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::collections::HashMap;
use std::convert::Infallible;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The resolved caller. Carries enough of the user row that the profile
/// endpoint needs no second lookup.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        AuthUser {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}

/// Resolves a hashed bearer token to a user. `Ok(None)` means the token is
/// unknown; `Err` means the backend itself failed.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn resolve(&self, token_hash: &str) -> Result<Option<AuthUser>, AppError>;
}

pub struct PgAuthBackend {
    pool: PgPool,
}

impl PgAuthBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthBackend for PgAuthBackend {
    async fn resolve(&self, token_hash: &str) -> Result<Option<AuthUser>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.display_name, u.created_at
            FROM api_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(AuthUser::from))
    }
}

/// Fixed token-to-user map for tests and local development.
#[derive(Default)]
#[allow(dead_code)]
pub struct StaticAuthBackend {
    users: HashMap<String, AuthUser>,
}

#[allow(dead_code)]
impl StaticAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, user: AuthUser) -> Self {
        self.users.insert(hash_token(token), user);
        self
    }
}

#[async_trait]
impl AuthBackend for StaticAuthBackend {
    async fn resolve(&self, token_hash: &str) -> Result<Option<AuthUser>, AppError> {
        Ok(self.users.get(token_hash).cloned())
    }
}

/// Hex-encoded SHA-256 of an opaque bearer token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        state
            .auth
            .resolve(&hash_token(token))
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional identity for public endpoints. A missing, unknown, or
/// unresolvable token degrades to anonymous instead of failing the request.
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts) {
            Some(token) => state
                .auth
                .resolve(&hash_token(token))
                .await
                .ok()
                .flatten(),
            None => None,
        };
        Ok(MaybeAuthUser(user))
    }
}
