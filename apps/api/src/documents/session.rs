#![allow(dead_code)]

//! Draft persistence controller.
//!
//! One `DocumentSession` owns the in-memory draft of a single user's
//! working document and reconciles it against the store: edits land in
//! pending state immediately, a trailing-edge debounce flushes them after a
//! quiet period, and a failed flush keeps the pending delta intact so the
//! next attempt retries the same data. Interactive clients embed this type;
//! the HTTP layer stays stateless.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::documents::scheduler::SaveScheduler;
use crate::documents::store::DocumentStore;
use crate::errors::AppError;
use crate::models::document::{
    CreateDocumentInput, DocumentMetadata, DocumentRow, MetadataPatch, UpdateDocumentInput,
};

/// Quiet period between the last edit and its flush.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/// Title and starter content for explicitly created documents.
pub const NEW_DOCUMENT_TITLE: &str = "New README Project";
pub const NEW_DOCUMENT_CONTENT: &str = "# New README\n\nStart editing your README here...";

/// Point-in-time view of a session, for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub document_id: Option<Uuid>,
    pub content: String,
    pub title: String,
    pub metadata: DocumentMetadata,
    pub saving: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

struct SessionState {
    /// The row as the store last confirmed it. `None` until the first load.
    persisted: Option<DocumentRow>,
    pending_content: String,
    pending_title: String,
    pending_metadata: DocumentMetadata,
    saving: bool,
    last_saved_at: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl SessionState {
    fn new() -> Self {
        SessionState {
            persisted: None,
            pending_content: String::new(),
            pending_title: String::new(),
            pending_metadata: DocumentMetadata::default(),
            saving: false,
            last_saved_at: None,
            error: None,
        }
    }

    /// Resets pending state to mirror a freshly loaded row. Unsaved edits
    /// are discarded by design of the load operation.
    fn adopt(&mut self, row: DocumentRow) {
        self.pending_content = row.content.clone();
        self.pending_title = row.title.clone().unwrap_or_default();
        self.pending_metadata = persisted_metadata(&row);
        self.error = None;
        self.persisted = Some(row);
    }

    fn is_dirty(&self, persisted: &DocumentRow) -> bool {
        self.pending_content != persisted.content
            || self.pending_title != persisted.title.as_deref().unwrap_or_default()
            || self.pending_metadata != persisted_metadata(persisted)
    }
}

/// A row with no metadata blob compares equal to the default, so loading
/// such a row does not count as a pending change.
fn persisted_metadata(row: &DocumentRow) -> DocumentMetadata {
    row.metadata.as_ref().map(|m| m.0.clone()).unwrap_or_default()
}

pub struct DocumentSession {
    store: Arc<dyn DocumentStore>,
    user_id: Uuid,
    autosave_delay: Duration,
    state: Mutex<SessionState>,
    scheduler: SaveScheduler,
    /// Serializes flushes: a save that arrives while one is in flight waits
    /// its turn instead of racing it.
    save_lock: AsyncMutex<()>,
}

impl DocumentSession {
    pub fn new(store: Arc<dyn DocumentStore>, user_id: Uuid) -> Arc<Self> {
        Self::with_autosave_delay(store, user_id, DEFAULT_AUTOSAVE_DELAY)
    }

    pub fn with_autosave_delay(
        store: Arc<dyn DocumentStore>,
        user_id: Uuid,
        autosave_delay: Duration,
    ) -> Arc<Self> {
        Arc::new(DocumentSession {
            store,
            user_id,
            autosave_delay,
            state: Mutex::new(SessionState::new()),
            scheduler: SaveScheduler::new(),
            save_lock: AsyncMutex::new(()),
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session state lock poisoned")
    }

    /// Loads the user's working document via get-or-create. On success any
    /// unsaved edits (and their timers) are discarded; on failure the prior
    /// state stays untouched apart from the recorded error.
    pub async fn load(&self, source_url: Option<&str>) -> Result<Uuid, AppError> {
        match self.store.get_or_create(self.user_id, source_url).await {
            Ok(row) => {
                let id = row.id;
                self.scheduler.cancel_all();
                self.lock().adopt(row);
                Ok(id)
            }
            Err(e) => {
                self.lock().error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Creates a fresh starter document and switches the session to it.
    pub async fn create_new(&self) -> Result<Uuid, AppError> {
        let input = CreateDocumentInput {
            title: Some(NEW_DOCUMENT_TITLE.to_string()),
            content: NEW_DOCUMENT_CONTENT.to_string(),
            metadata: Some(DocumentMetadata::default()),
            ..Default::default()
        };
        match self.store.create(self.user_id, input).await {
            Ok(row) => {
                let id = row.id;
                self.scheduler.cancel_all();
                self.lock().adopt(row);
                Ok(id)
            }
            Err(e) => {
                self.lock().error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Replaces the pending content, clears any prior save error, and arms
    /// the autosave timer. The edit is visible in snapshots immediately.
    pub fn update_content(self: &Arc<Self>, content: impl Into<String>) {
        let document_id = {
            let mut state = self.lock();
            state.pending_content = content.into();
            state.error = None;
            state.persisted.as_ref().map(|row| row.id)
        };
        if let Some(id) = document_id {
            self.schedule_autosave(id);
        }
    }

    /// Merges a metadata patch into the pending metadata, clears any prior
    /// save error, and arms the autosave timer.
    pub fn update_metadata(self: &Arc<Self>, patch: MetadataPatch) {
        let document_id = {
            let mut state = self.lock();
            state.pending_metadata.apply(patch);
            state.error = None;
            state.persisted.as_ref().map(|row| row.id)
        };
        if let Some(id) = document_id {
            self.schedule_autosave(id);
        }
    }

    /// Title edits do not arm the timer; they ride along with the next
    /// content or metadata flush.
    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().pending_title = title.into();
    }

    /// Immediate flush, bypassing the debounce window. A flush with no
    /// pending delta issues no store call and reports `Ok(false)`.
    pub async fn flush(&self) -> Result<bool, AppError> {
        self.do_save().await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            document_id: state.persisted.as_ref().map(|row| row.id),
            content: state.pending_content.clone(),
            title: state.pending_title.clone(),
            metadata: state.pending_metadata.clone(),
            saving: state.saving,
            last_saved_at: state.last_saved_at,
            error: state.error.clone(),
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.lock();
        state
            .persisted
            .as_ref()
            .is_some_and(|row| state.is_dirty(row))
    }

    fn schedule_autosave(self: &Arc<Self>, document_id: Uuid) {
        let session = Arc::clone(self);
        self.scheduler
            .schedule(document_id, self.autosave_delay, async move {
                // Autosave outcomes land in session state; nothing to report.
                let _ = session.do_save().await;
            });
    }

    async fn do_save(&self) -> Result<bool, AppError> {
        let _guard = self.save_lock.lock().await;

        let (document_id, input) = {
            let mut state = self.lock();
            let Some(persisted) = state.persisted.clone() else {
                return Ok(false);
            };
            if !state.is_dirty(&persisted) {
                return Ok(false);
            }
            state.saving = true;
            let title = if state.pending_title.is_empty() {
                None
            } else {
                Some(state.pending_title.clone())
            };
            (
                persisted.id,
                UpdateDocumentInput {
                    title: Some(title),
                    content: Some(state.pending_content.clone()),
                    metadata: Some(state.pending_metadata.clone()),
                    ..Default::default()
                },
            )
        };

        // The armed timer is redundant once a flush is underway.
        self.scheduler.cancel(document_id);

        let result = self.store.update(self.user_id, document_id, input).await;

        let mut state = self.lock();
        state.saving = false;
        match result {
            Ok(Some(row)) => {
                // Only the persisted side moves forward. Pending is left
                // alone so edits made during the flight stay unsaved-dirty.
                state.persisted = Some(row);
                state.last_saved_at = Some(Utc::now());
                state.error = None;
                Ok(true)
            }
            Ok(None) => {
                let err = AppError::NotFound(format!("Document {document_id} not found"));
                state.error = Some(err.to_string());
                Err(err)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
