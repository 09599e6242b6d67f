//! README optimization.
//!
//! Two prompt paths share one endpoint: a draft with real substance is
//! rewritten directly, while a near-empty draft with a named repository is
//! regenerated from fetched repository context. Context collection is
//! best-effort and budgeted; a thin context still produces a README.

use tracing::debug;

use crate::errors::AppError;
use crate::github::{GithubClient, RepoMeta};
use crate::llm_client::{CallParams, LlmClient};
use crate::seo::prompts::{
    GROUNDED_PROMPT_TEMPLATE, GROUNDED_SYSTEM, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM,
};

/// Drafts shorter than this (after trimming) are not worth rewriting.
pub const MIN_CONTENT_LEN: usize = 50;
/// Context collection stops once the running total passes this.
pub const MAX_CONTEXT_CHARS: usize = 80_000;
/// Each collected file is trimmed to this many chars in the context block.
pub const SNIPPET_TRIM_CHARS: usize = 4_000;
pub const OPTIMIZE_MAX_TOKENS: u32 = 3000;
pub const OPTIMIZE_TEMPERATURE: f32 = 0.2;

/// Representative files fetched, best-effort, to ground a regeneration.
pub const CANDIDATE_FILES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "go.mod",
    "README.md",
    "LICENSE",
    "CONTRIBUTING.md",
    "CHANGELOG.md",
    "docs/README.md",
    "src/main.rs",
    "src/lib.rs",
    "src/index.ts",
    "src/index.js",
    "src/main.py",
    "main.go",
    "src/app/page.tsx",
    "src/app/layout.tsx",
    "app/page.tsx",
];

/// Which prompt path an optimize request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizePath {
    /// The draft has substance: rewrite it directly.
    DirectRewrite,
    /// The draft is missing or too short but a repository is named:
    /// regenerate from repository context.
    RepoGrounded,
    /// Neither a usable draft nor a repository.
    Unusable,
}

/// Pure routing decision. A draft at or above the length threshold always
/// wins, even when a repository is also supplied.
pub fn select_path(content: Option<&str>, repo: Option<&str>) -> OptimizePath {
    let draft_len = content.map(|c| c.trim().len()).unwrap_or(0);
    if draft_len >= MIN_CONTENT_LEN {
        return OptimizePath::DirectRewrite;
    }
    if repo.is_some_and(|r| !r.is_empty()) {
        return OptimizePath::RepoGrounded;
    }
    OptimizePath::Unusable
}

pub async fn optimize_direct(
    llm: &LlmClient,
    content: &str,
    goals: Option<&str>,
    repo: Option<&str>,
) -> Result<String, AppError> {
    let goals_line = goals
        .filter(|g| !g.trim().is_empty())
        .map(|g| format!("\nOptimization goals: {g}\n"))
        .unwrap_or_default();
    let repo_line = repo
        .filter(|r| !r.is_empty())
        .map(|r| format!("\nThe README belongs to the repository {r}.\n"))
        .unwrap_or_default();

    let prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{goals_line}", &goals_line)
        .replace("{repo_line}", &repo_line)
        .replace("{content}", content);

    let markdown = llm
        .call_text(
            &prompt,
            REWRITE_SYSTEM,
            CallParams {
                max_tokens: OPTIMIZE_MAX_TOKENS,
                temperature: OPTIMIZE_TEMPERATURE,
            },
        )
        .await?;
    Ok(markdown)
}

pub async fn optimize_grounded(
    llm: &LlmClient,
    github: &GithubClient,
    repo: &str,
    git_ref: Option<&str>,
    goals: Option<&str>,
) -> Result<String, AppError> {
    let meta = github.repo_meta(repo).await?;
    let branch = git_ref.unwrap_or(&meta.default_branch);

    let snippets = collect_snippets(github, repo, branch).await;
    debug!(
        "Grounding {} with {} files from {branch}",
        meta.full_name,
        snippets.len()
    );
    let context = build_context_block(&meta, &snippets);

    let goals_line = goals
        .filter(|g| !g.trim().is_empty())
        .map(|g| format!("\nOptimization goals: {g}\n"))
        .unwrap_or_default();

    let prompt = GROUNDED_PROMPT_TEMPLATE
        .replace("{goals_line}", &goals_line)
        .replace("{repo}", &meta.full_name)
        .replace("{context}", &context);

    let markdown = llm
        .call_text(
            &prompt,
            GROUNDED_SYSTEM,
            CallParams {
                max_tokens: OPTIMIZE_MAX_TOKENS,
                temperature: OPTIMIZE_TEMPERATURE,
            },
        )
        .await?;
    Ok(markdown)
}

/// Fetches candidate files until the list runs out or the budget is spent.
/// Individual misses are skipped silently; a repository with none of the
/// candidates simply grounds on its metadata alone.
async fn collect_snippets(
    github: &GithubClient,
    repo: &str,
    branch: &str,
) -> Vec<(String, String)> {
    let mut snippets = Vec::new();
    let mut total = 0usize;

    for path in CANDIDATE_FILES {
        if total > MAX_CONTEXT_CHARS {
            break;
        }
        if let Some(text) = github.text_file(repo, path, Some(branch)).await {
            total += text.len() + 1;
            snippets.push((path.to_string(), text));
        }
    }

    snippets
}

/// Renders repository metadata and collected files into one grounding block.
fn build_context_block(meta: &RepoMeta, snippets: &[(String, String)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Repo: {}\n", meta.full_name));
    out.push_str(&format!("URL: https://github.com/{}\n", meta.full_name));
    if let Some(description) = &meta.description {
        out.push_str(&format!("Description: {description}\n"));
    }
    if let Some(homepage) = meta.homepage.as_deref().filter(|h| !h.is_empty()) {
        out.push_str(&format!("Homepage: {homepage}\n"));
    }
    if !meta.topics.is_empty() {
        out.push_str(&format!("Topics: {}\n", meta.topics.join(", ")));
    }
    if let Some(license) = &meta.license {
        out.push_str(&format!("License: {}\n", license.name));
    }
    out.push_str(&format!("Default branch: {}\n", meta.default_branch));

    for (path, text) in snippets {
        out.push_str(&format!("\n---- {path} ----\n"));
        out.push_str(&trim_snippet(text));
        out.push('\n');
    }

    out
}

/// Char-boundary-safe trim to `SNIPPET_TRIM_CHARS`.
fn trim_snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_TRIM_CHARS) {
        Some((idx, _)) => format!("{}\n/* …trimmed… */", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_meta() -> RepoMeta {
        RepoMeta {
            name: "hello-world".to_string(),
            full_name: "octocat/hello-world".to_string(),
            description: Some("A demo".to_string()),
            homepage: None,
            topics: vec!["demo".to_string(), "example".to_string()],
            default_branch: "main".to_string(),
            license: None,
        }
    }

    #[test]
    fn test_substantial_draft_takes_direct_path() {
        let draft = "x".repeat(MIN_CONTENT_LEN);
        assert_eq!(
            select_path(Some(&draft), None),
            OptimizePath::DirectRewrite
        );
        // The repo does not override a usable draft.
        assert_eq!(
            select_path(Some(&draft), Some("octocat/hello-world")),
            OptimizePath::DirectRewrite
        );
    }

    #[test]
    fn test_short_draft_with_repo_takes_grounded_path() {
        assert_eq!(
            select_path(Some("# stub"), Some("octocat/hello-world")),
            OptimizePath::RepoGrounded
        );
        assert_eq!(
            select_path(None, Some("octocat/hello-world")),
            OptimizePath::RepoGrounded
        );
    }

    #[test]
    fn test_whitespace_padding_does_not_reach_threshold() {
        let padded = format!("# stub{}", " ".repeat(200));
        assert_eq!(
            select_path(Some(&padded), Some("octocat/hello-world")),
            OptimizePath::RepoGrounded
        );
    }

    #[test]
    fn test_nothing_usable_is_unusable() {
        assert_eq!(select_path(None, None), OptimizePath::Unusable);
        assert_eq!(select_path(Some("# stub"), None), OptimizePath::Unusable);
        assert_eq!(select_path(Some(""), Some("")), OptimizePath::Unusable);
    }

    #[test]
    fn test_context_block_lists_metadata_and_files() {
        let block = build_context_block(
            &make_meta(),
            &[("Cargo.toml".to_string(), "[package]".to_string())],
        );
        assert!(block.contains("Repo: octocat/hello-world"));
        assert!(block.contains("Description: A demo"));
        assert!(block.contains("Topics: demo, example"));
        assert!(block.contains("---- Cargo.toml ----"));
        assert!(block.contains("[package]"));
    }

    #[test]
    fn test_trim_snippet_leaves_short_text_alone() {
        assert_eq!(trim_snippet("short"), "short");
    }

    #[test]
    fn test_trim_snippet_cuts_long_text() {
        let long = "a".repeat(SNIPPET_TRIM_CHARS + 100);
        let trimmed = trim_snippet(&long);
        assert!(trimmed.len() < long.len());
        assert!(trimmed.ends_with("*/"));
    }

    #[test]
    fn test_trim_snippet_respects_char_boundaries() {
        // Multibyte content must not trigger a mid-char slice.
        let long = "é".repeat(SNIPPET_TRIM_CHARS + 10);
        let trimmed = trim_snippet(&long);
        assert!(trimmed.starts_with("é"));
        assert!(trimmed.ends_with("*/"));
    }
}
