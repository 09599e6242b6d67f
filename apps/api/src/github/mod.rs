//! GitHub content client.
//!
//! Fetches repository metadata, READMEs, and individual files through the
//! server-held token. Single-file fetches are best-effort: a missing or
//! oversized file yields `None` so callers can keep going.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

pub mod handlers;

const GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "readsmith-api";
/// Files above this size are skipped when collecting repository context.
pub const MAX_FILE_BYTES: u64 = 200_000;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Undecodable content: {0}")]
    Decode(String),
}

fn repo_slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // owner: anything but whitespace or slash; name: word chars, dots, dashes
    RE.get_or_init(|| Regex::new(r"^[^\s/]+/[\w.-]+$").expect("repo slug pattern is valid"))
}

/// Validates the `owner/name` shape used by every repository parameter.
pub fn is_valid_repo_slug(repo: &str) -> bool {
    repo_slug_re().is_match(repo)
}

/// Repository metadata, as returned by `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoMeta {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub default_branch: String,
    #[serde(default)]
    pub license: Option<RepoLicense>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoLicense {
    pub key: String,
    pub name: String,
}

/// A decoded repository README.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedReadme {
    pub content: String,
    pub sha: String,
    pub path: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: Option<String>,
    encoding: Option<String>,
    sha: Option<String>,
    path: Option<String>,
    size: Option<u64>,
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    token: String,
}

impl GithubClient {
    pub fn new(token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GithubError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("Authorization", format!("token {}", self.token))
            .header("User-Agent", USER_AGENT)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn repo_meta(&self, repo: &str) -> Result<RepoMeta, GithubError> {
        self.get_json(&format!("{GITHUB_API_URL}/repos/{repo}"), &[])
            .await
    }

    /// Fetches and decodes the repository README, optionally pinned to a ref.
    pub async fn readme(
        &self,
        repo: &str,
        git_ref: Option<&str>,
    ) -> Result<FetchedReadme, GithubError> {
        let mut query = Vec::new();
        if let Some(r) = git_ref {
            query.push(("ref", r));
        }
        let data: ContentsResponse = self
            .get_json(&format!("{GITHUB_API_URL}/repos/{repo}/readme"), &query)
            .await?;

        let content = decode_content(
            data.content.as_deref().unwrap_or_default(),
            data.encoding.as_deref(),
        )?;
        Ok(FetchedReadme {
            content,
            sha: data.sha.unwrap_or_default(),
            path: data.path.unwrap_or_default(),
        })
    }

    /// Best-effort fetch of a single text file. Any failure, an oversized
    /// file, or undecodable content yields `None`.
    pub async fn text_file(&self, repo: &str, path: &str, git_ref: Option<&str>) -> Option<String> {
        let mut query = Vec::new();
        if let Some(r) = git_ref {
            query.push(("ref", r));
        }
        let url = format!("{GITHUB_API_URL}/repos/{repo}/contents/{path}");
        let data: ContentsResponse = match self.get_json(&url, &query).await {
            Ok(d) => d,
            Err(e) => {
                debug!("Skipping {repo}/{path}: {e}");
                return None;
            }
        };

        if data.size.unwrap_or(0) > MAX_FILE_BYTES {
            debug!("Skipping {repo}/{path}: file too large");
            return None;
        }

        let raw = data.content?;
        decode_content(&raw, data.encoding.as_deref()).ok()
    }
}

/// GitHub wraps base64 payloads at 60 columns; the whitespace must go
/// before decoding.
fn decode_content(raw: &str, encoding: Option<&str>) -> Result<String, GithubError> {
    match encoding {
        Some("base64") | None => {}
        Some(other) => {
            return Err(GithubError::Decode(format!("unsupported encoding {other}")));
        }
    }
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| GithubError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GithubError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_repo_slugs() {
        assert!(is_valid_repo_slug("octocat/hello-world"));
        assert!(is_valid_repo_slug("rust-lang/rust"));
        assert!(is_valid_repo_slug("user/repo.name"));
        assert!(is_valid_repo_slug("user/repo_name"));
    }

    #[test]
    fn test_invalid_repo_slugs() {
        assert!(!is_valid_repo_slug(""));
        assert!(!is_valid_repo_slug("no-slash"));
        assert!(!is_valid_repo_slug("too/many/parts"));
        assert!(!is_valid_repo_slug("has space/repo"));
        assert!(!is_valid_repo_slug("owner/has space"));
        assert!(!is_valid_repo_slug("owner/"));
    }

    #[test]
    fn test_decode_content_strips_line_wrapping() {
        // "# Hello\n\nWorld" base64-encoded, wrapped the way GitHub wraps it
        let wrapped = "IyBIZWxs\nbwoKV29y\nbGQ=\n";
        assert_eq!(
            decode_content(wrapped, Some("base64")).unwrap(),
            "# Hello\n\nWorld"
        );
    }

    #[test]
    fn test_decode_content_rejects_unknown_encoding() {
        assert!(decode_content("abc", Some("utf-16")).is_err());
    }

    #[test]
    fn test_decode_content_rejects_garbage() {
        assert!(decode_content("!!!not-base64!!!", Some("base64")).is_err());
    }

    #[test]
    fn test_decode_content_empty_is_empty() {
        assert_eq!(decode_content("", Some("base64")).unwrap(), "");
    }
}
