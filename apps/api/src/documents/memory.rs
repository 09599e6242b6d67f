#![allow(dead_code)]

//! In-memory `DocumentStore`.
//!
//! Mirrors the Postgres semantics (owner scoping, partial update,
//! `updated_at` ordering) without a database, and counts update calls so
//! tests can assert how many writes a flow actually issued.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::documents::store::{DocumentStore, DEFAULT_CONTENT, DEFAULT_TITLE};
use crate::errors::AppError;
use crate::models::document::{
    CreateDocumentInput, DocumentRow, DocumentSummary, UpdateDocumentInput,
};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    rows: Mutex<HashMap<Uuid, DocumentRow>>,
    update_calls: AtomicUsize,
    fail_updates: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `update` calls issued so far, successful or not.
    pub fn update_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// When set, `update` fails without touching any row.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, DocumentRow>> {
        self.rows.lock().expect("document store lock poisoned")
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<DocumentSummary>, AppError> {
        let rows = self.lock();
        let mut docs: Vec<&DocumentRow> =
            rows.values().filter(|d| d.user_id == user_id).collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(docs
            .into_iter()
            .map(|d| DocumentSummary {
                id: d.id,
                title: d.title.clone(),
                source_url: d.source_url.clone(),
                score: d.score,
                created_at: d.created_at,
                updated_at: d.updated_at,
            })
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<DocumentRow>, AppError> {
        let rows = self.lock();
        Ok(rows.get(&id).filter(|d| d.user_id == user_id).cloned())
    }

    async fn get_or_create(
        &self,
        user_id: Uuid,
        source_url: Option<&str>,
    ) -> Result<DocumentRow, AppError> {
        {
            let rows = self.lock();
            if let Some(url) = source_url {
                let matched = rows
                    .values()
                    .filter(|d| d.user_id == user_id && d.source_url.as_deref() == Some(url))
                    .max_by_key(|d| d.updated_at);
                if let Some(doc) = matched {
                    return Ok(doc.clone());
                }
            }
            let latest = rows
                .values()
                .filter(|d| d.user_id == user_id)
                .max_by_key(|d| d.updated_at);
            if let Some(doc) = latest {
                return Ok(doc.clone());
            }
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
        let now = Utc::now();
        let row = DocumentRow {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            content: input.content,
            metadata: input.metadata.map(Json),
            score: input.score,
            source_url: input.source_url,
            template_id: input.template_id,
            created_at: now,
            updated_at: now,
        };

        self.lock().insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: UpdateDocumentInput,
    ) -> Result<Option<DocumentRow>, AppError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!(
                "injected update failure"
            )));
        }

        let mut rows = self.lock();
        let Some(row) = rows.get_mut(&id).filter(|d| d.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            row.title = title;
        }
        if let Some(content) = input.content {
            row.content = content;
        }
        if let Some(metadata) = input.metadata {
            row.metadata = Some(Json(metadata));
        }
        if let Some(score) = input.score {
            row.score = Some(score);
        }
        if let Some(source_url) = input.source_url {
            row.source_url = Some(source_url);
        }
        if let Some(template_id) = input.template_id {
            row.template_id = Some(template_id);
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.lock();
        match rows.get(&id) {
            Some(d) if d.user_id == user_id => {
                rows.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::new()
    }

    #[tokio::test]
    async fn test_create_then_get_preserves_fields() {
        let store = make_store();
        let user = Uuid::new_v4();

        let created = store
            .create(
                user,
                CreateDocumentInput {
                    title: Some("Guide".to_string()),
                    content: "# Guide".to_string(),
                    source_url: Some("https://github.com/octocat/hello-world".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let fetched = store.get(user, created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title.as_deref(), Some("Guide"));
        assert_eq!(fetched.content, "# Guide");
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn test_get_is_owner_scoped() {
        let store = make_store();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let doc = store
            .create(
                alice,
                CreateDocumentInput {
                    content: "# Alice".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store.get(bob, doc.id).await.unwrap().is_none());
        assert!(store.get(alice, doc.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_first() {
        let store = make_store();
        let user = Uuid::new_v4();

        let first = store
            .create(
                user,
                CreateDocumentInput {
                    content: "a".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let second = store
            .create(
                user,
                CreateDocumentInput {
                    content: "b".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Touch the first one so it becomes the most recent.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store
            .update(
                user,
                first.id,
                UpdateDocumentInput {
                    content: Some("a2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let listed = store.list(user).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_absent_fields() {
        let store = make_store();
        let user = Uuid::new_v4();

        let doc = store
            .create(
                user,
                CreateDocumentInput {
                    title: Some("Before".to_string()),
                    content: "# Body".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update(
                user,
                doc.id,
                UpdateDocumentInput {
                    title: Some(Some("After".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("After"));
        assert_eq!(updated.content, "# Body");
        assert!(updated.updated_at > doc.updated_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_title() {
        let store = make_store();
        let user = Uuid::new_v4();

        let doc = store
            .create(
                user,
                CreateDocumentInput {
                    title: Some("Named".to_string()),
                    content: "x".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update(
                user,
                doc.id,
                UpdateDocumentInput {
                    title: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, None);
    }

    #[tokio::test]
    async fn test_update_wrong_owner_is_none() {
        let store = make_store();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let doc = store
            .create(
                alice,
                CreateDocumentInput {
                    content: "x".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = store
            .update(
                bob,
                doc.id,
                UpdateDocumentInput {
                    content: Some("hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_none());
        let untouched = store.get(alice, doc.id).await.unwrap().unwrap();
        assert_eq!(untouched.content, "x");
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = make_store();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let doc = store
            .create(
                alice,
                CreateDocumentInput {
                    content: "x".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!store.delete(bob, doc.id).await.unwrap());
        assert!(store.get(alice, doc.id).await.unwrap().is_some());

        assert!(store.delete(alice, doc.id).await.unwrap());
        assert!(store.get(alice, doc.id).await.unwrap().is_none());
        assert!(!store.delete(alice, doc.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_or_create_prefers_source_url_match() {
        let store = make_store();
        let user = Uuid::new_v4();
        let url = "https://github.com/octocat/hello-world";

        let matching = store
            .create(
                user,
                CreateDocumentInput {
                    content: "matching".to_string(),
                    source_url: Some(url.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        // A newer row without the URL must not shadow the match.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        store
            .create(
                user,
                CreateDocumentInput {
                    content: "newer".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let found = store.get_or_create(user, Some(url)).await.unwrap();
        assert_eq!(found.id, matching.id);
    }

    #[tokio::test]
    async fn test_get_or_create_falls_back_to_most_recent() {
        let store = make_store();
        let user = Uuid::new_v4();

        store
            .create(
                user,
                CreateDocumentInput {
                    content: "older".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let recent = store
            .create(
                user,
                CreateDocumentInput {
                    content: "recent".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let found = store
            .get_or_create(user, Some("https://github.com/none/matches"))
            .await
            .unwrap();
        assert_eq!(found.id, recent.id);
    }

    #[tokio::test]
    async fn test_get_or_create_makes_starter_row_once() {
        let store = make_store();
        let user = Uuid::new_v4();

        let first = store.get_or_create(user, None).await.unwrap();
        assert_eq!(first.title.as_deref(), Some(DEFAULT_TITLE));
        assert_eq!(first.content, DEFAULT_CONTENT);

        let second = store.get_or_create(user, None).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(store.list(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_counter_counts_calls() {
        let store = make_store();
        let user = Uuid::new_v4();
        let doc = store
            .create(
                user,
                CreateDocumentInput {
                    content: "x".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(store.update_count(), 0);
        store
            .update(user, doc.id, UpdateDocumentInput::default())
            .await
            .unwrap();
        store.update(user, Uuid::new_v4(), UpdateDocumentInput::default())
            .await
            .unwrap();
        assert_eq!(store.update_count(), 2);
    }
}
