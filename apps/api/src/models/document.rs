#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Version stamped into `DocumentMetadata` on every write.
pub const METADATA_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub metadata: Option<Json<DocumentMetadata>>,
    pub score: Option<f64>,
    pub source_url: Option<String>,
    pub template_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slim row used by the list endpoint; content is deliberately omitted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub source_url: Option<String>,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Structured side-channel stored alongside a document's markdown.
///
/// Every known key is an explicit optional field. Keys this build does not
/// know about land in `extra` and survive a read-modify-write cycle, so a
/// newer writer's data is never dropped by an older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Blobs written before versioning carry no tag and parse as version 1.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// `owner/name` slug of the repository this document describes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordReport>,
    /// Most recent optimized draft, kept next to the editor draft.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_source: Option<DraftSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_source: Option<DraftSource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        DocumentMetadata {
            schema_version: METADATA_SCHEMA_VERSION,
            repo: None,
            branch: None,
            sha: None,
            last_action: None,
            score: None,
            keywords: None,
            optimized: None,
            action_source: None,
            preview_source: None,
            extra: Map::new(),
        }
    }
}

fn default_schema_version() -> u32 {
    METADATA_SCHEMA_VERSION
}

/// Which draft a metadata-recorded action operated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftSource {
    Editor,
    Optimized,
}

/// Parsed LLM scoring verdict. The whole structure must deserialize or the
/// scoring request fails; there is no partial acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Overall 0-100.
    pub score: f64,
    /// Per-category 0-10, keyed by category name.
    pub breakdown: BTreeMap<String, f64>,
    pub summary: Vec<String>,
    pub top_fixes: Vec<String>,
}

/// Parsed LLM keyword analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    /// `[keyword, occurrences]` pairs, most frequent first.
    pub density: Vec<(String, u32)>,
    pub suggestions: Vec<String>,
}

/// Field-wise metadata patch. `Some` overwrites the target field, `None`
/// leaves it alone; unknown keys in `extra` overwrite same-named keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataPatch {
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub sha: Option<String>,
    pub last_action: Option<String>,
    pub score: Option<ScoreResult>,
    pub keywords: Option<KeywordReport>,
    pub optimized: Option<String>,
    pub action_source: Option<DraftSource>,
    pub preview_source: Option<DraftSource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentMetadata {
    /// Shallow merge: patched keys replace, absent keys persist. The schema
    /// version is re-stamped to the current writer's version.
    pub fn apply(&mut self, patch: MetadataPatch) {
        self.schema_version = METADATA_SCHEMA_VERSION;
        if patch.repo.is_some() {
            self.repo = patch.repo;
        }
        if patch.branch.is_some() {
            self.branch = patch.branch;
        }
        if patch.sha.is_some() {
            self.sha = patch.sha;
        }
        if patch.last_action.is_some() {
            self.last_action = patch.last_action;
        }
        if patch.score.is_some() {
            self.score = patch.score;
        }
        if patch.keywords.is_some() {
            self.keywords = patch.keywords;
        }
        if patch.optimized.is_some() {
            self.optimized = patch.optimized;
        }
        if patch.action_source.is_some() {
            self.action_source = patch.action_source;
        }
        if patch.preview_source.is_some() {
            self.preview_source = patch.preview_source;
        }
        for (key, value) in patch.extra {
            self.extra.insert(key, value);
        }
    }
}

/// Input for a document insert. Content is a `String`, not an option: a
/// document can never exist without content.
#[derive(Debug, Clone, Default)]
pub struct CreateDocumentInput {
    pub title: Option<String>,
    pub content: String,
    pub metadata: Option<DocumentMetadata>,
    pub score: Option<f64>,
    pub source_url: Option<String>,
    pub template_id: Option<String>,
}

/// Input for a partial document update. Absent fields are never touched.
///
/// `title` is double-optional so callers can distinguish "leave alone"
/// (absent) from "clear" (explicit null).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocumentInput {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    pub content: Option<String>,
    pub metadata: Option<DocumentMetadata>,
    pub score: Option<f64>,
    pub source_url: Option<String>,
    pub template_id: Option<String>,
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
