//! Document access layer.
//!
//! Every operation takes the owner id explicitly and scopes the query to
//! it, so a row that belongs to someone else is indistinguishable from a
//! missing row. Nothing here reads ambient identity.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{
    CreateDocumentInput, DocumentRow, DocumentSummary, UpdateDocumentInput,
};

/// Title given to the row that get-or-create makes on first contact.
pub const DEFAULT_TITLE: &str = "My README Project";
/// Starter content for that row.
pub const DEFAULT_CONTENT: &str =
    "# Welcome to your README Editor\n\nStart editing your README here...";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All of a user's documents, most recently updated first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<DocumentSummary>, AppError>;

    /// A single document, or `None` when it does not exist or is not owned
    /// by `user_id`.
    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<DocumentRow>, AppError>;

    /// The user's working document: the most recent row matching
    /// `source_url` if one is given, else the most recent row overall, else
    /// a freshly created starter row. Creates at most one row per call.
    async fn get_or_create(
        &self,
        user_id: Uuid,
        source_url: Option<&str>,
    ) -> Result<DocumentRow, AppError>;

    async fn create(
        &self,
        user_id: Uuid,
        input: CreateDocumentInput,
    ) -> Result<DocumentRow, AppError>;

    /// Partial update. Absent fields are left untouched; `updated_at` is
    /// always bumped. `None` when the row is missing or not owned.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateDocumentInput,
    ) -> Result<Option<DocumentRow>, AppError>;

    /// Returns whether a row was actually deleted. Deleting someone else's
    /// row deletes nothing.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<DocumentSummary>, AppError> {
        let rows = sqlx::query_as::<_, DocumentSummary>(
            r#"
            SELECT id, title, source_url, score, created_at, updated_at
            FROM documents
            WHERE user_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<DocumentRow>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT * FROM documents
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_or_create(
        &self,
        user_id: Uuid,
        source_url: Option<&str>,
    ) -> Result<DocumentRow, AppError> {
        if let Some(url) = source_url {
            let row = sqlx::query_as::<_, DocumentRow>(
                r#"
                SELECT * FROM documents
                WHERE user_id = $1 AND source_url = $2
                ORDER BY updated_at DESC
                LIMIT 1
                "#,
            )
            .bind(user_id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(row) = row {
                return Ok(row);
            }
        }

        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT * FROM documents
            WHERE user_id = $1
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row);
        }

        self.create(
            user_id,
            CreateDocumentInput {
                title: Some(DEFAULT_TITLE.to_string()),
                content: DEFAULT_CONTENT.to_string(),
                source_url: source_url.map(str::to_string),
                ..Default::default()
            },
        )
        .await
    }

    async fn create(
        &self,
        user_id: Uuid,
        input: CreateDocumentInput,
    ) -> Result<DocumentRow, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents
                (id, user_id, title, content, metadata, score, source_url, template_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(input.title)
        .bind(input.content)
        .bind(input.metadata.map(Json))
        .bind(input.score)
        .bind(input.source_url)
        .bind(input.template_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateDocumentInput,
    ) -> Result<Option<DocumentRow>, AppError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE documents SET updated_at = now()");

        if let Some(title) = input.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(content) = input.content {
            builder.push(", content = ").push_bind(content);
        }
        if let Some(metadata) = input.metadata {
            builder.push(", metadata = ").push_bind(Json(metadata));
        }
        if let Some(score) = input.score {
            builder.push(", score = ").push_bind(score);
        }
        if let Some(source_url) = input.source_url {
            builder.push(", source_url = ").push_bind(source_url);
        }
        if let Some(template_id) = input.template_id {
            builder.push(", template_id = ").push_bind(template_id);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" AND user_id = ").push_bind(user_id);
        builder.push(" RETURNING *");

        let row = builder
            .build_query_as::<DocumentRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
