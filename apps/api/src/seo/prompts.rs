// All LLM prompt constants for the SEO module.
// Score and keyword prompts enforce strict JSON; rewrite prompts ask for
// raw Markdown and nothing else.

/// The thirteen categories every score verdict must cover, each 0-10.
pub const SCORE_CATEGORIES: &[&str] = &[
    "clarity",
    "structure",
    "headings",
    "keywords",
    "install",
    "usage",
    "examples",
    "links",
    "badges",
    "images",
    "contribution",
    "license",
    "metadata",
];

/// System prompt for README scoring. JSON-only output.
pub const SCORE_SYSTEM: &str =
    "You are an expert reviewer of open-source README files, judging how \
    discoverable and useful a README is for GitHub search, web search, and \
    AI assistants. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Scoring prompt template. Replace `{content}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Evaluate the following README for search and discovery quality.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 72,
  "breakdown": {
    "clarity": 8,
    "structure": 7,
    "headings": 6,
    "keywords": 5,
    "install": 9,
    "usage": 8,
    "examples": 6,
    "links": 5,
    "badges": 4,
    "images": 3,
    "contribution": 5,
    "license": 10,
    "metadata": 4
  },
  "summary": ["one-sentence strength", "one-sentence weakness", "one-sentence overall verdict"],
  "top_fixes": ["most impactful concrete fix", "second fix", "third fix"]
}

Rules:
- "score" is the overall quality, an integer 0-100.
- "breakdown" must contain exactly the thirteen keys shown above, each an integer 0-10.
- "summary" is exactly three short sentences.
- "top_fixes" is three to five concrete, actionable changes, most impactful first.

README:
{content}"#;

/// System prompt for direct README rewriting. Markdown-only output.
pub const REWRITE_SYSTEM: &str =
    "You are an expert technical writer who optimizes README files for \
    search engines, GitHub discovery, and AI assistants without inventing \
    facts. \
    Respond with the complete rewritten README as raw Markdown. \
    Do NOT wrap the output in code fences. \
    Do NOT add commentary before or after the document.";

/// Direct rewrite prompt template.
/// Replace: {goals_line}, {repo_line}, {content}
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the following README to maximize its search and discovery quality while preserving every factual claim.

Requirements:
- Keep all project-specific facts, names, versions, and commands exactly as given.
- Improve heading hierarchy, keyword coverage, and section ordering.
- Add standard sections (installation, usage, contributing, license) only when the source gives enough material for them.
- Output raw Markdown only.
{goals_line}{repo_line}
README:
{content}"#;

/// System prompt for repository-grounded README generation. Markdown-only.
pub const GROUNDED_SYSTEM: &str =
    "You are an expert technical writer who produces README files grounded \
    strictly in supplied repository context. \
    Every claim must be supported by the context; omit what you cannot \
    support. \
    Respond with the complete README as raw Markdown. \
    Do NOT wrap the output in code fences. \
    Do NOT add commentary before or after the document.";

/// Grounded generation prompt template.
/// Replace: {goals_line}, {repo}, {context}
pub const GROUNDED_PROMPT_TEMPLATE: &str = r#"Write a complete, search-optimized README for the repository {repo}, grounded ONLY in the repository context below.

Requirements:
- State what the project does, how to install it, and how to use it, citing only facts present in the context.
- Use a clear heading hierarchy and descriptive, keyword-bearing section titles.
- Include badges, links, and license information when the context supports them.
- Output raw Markdown only.
{goals_line}
Repository context:
{context}"#;

/// System prompt for keyword analysis. JSON-only output.
pub const KEYWORDS_SYSTEM: &str =
    "You are an expert in open-source project discoverability and search \
    keywords. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Keyword analysis prompt template. Replace `{content}` before sending.
pub const KEYWORDS_PROMPT_TEMPLATE: &str = r#"Analyze the keyword profile of the following README.

Return a JSON object with this EXACT schema (no extra fields):
{
  "density": [["keyword", 4], ["another keyword", 2]],
  "suggestions": ["missing keyword", "another missing keyword"]
}

Rules:
- "density" lists the ten most frequent meaningful keywords or phrases already in the README as [keyword, occurrence_count] pairs, most frequent first. Ignore stop words and markdown syntax.
- "suggestions" lists ten keywords or phrases users would search for that the README should cover but does not.

README:
{content}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_template_names_every_category() {
        for category in SCORE_CATEGORIES {
            assert!(
                SCORE_PROMPT_TEMPLATE.contains(&format!("\"{category}\"")),
                "score template is missing {category}"
            );
        }
    }

    #[test]
    fn test_templates_keep_their_placeholders() {
        assert!(SCORE_PROMPT_TEMPLATE.contains("{content}"));
        assert!(REWRITE_PROMPT_TEMPLATE.contains("{content}"));
        assert!(REWRITE_PROMPT_TEMPLATE.contains("{goals_line}"));
        assert!(REWRITE_PROMPT_TEMPLATE.contains("{repo_line}"));
        assert!(GROUNDED_PROMPT_TEMPLATE.contains("{repo}"));
        assert!(GROUNDED_PROMPT_TEMPLATE.contains("{context}"));
        assert!(GROUNDED_PROMPT_TEMPLATE.contains("{goals_line}"));
        assert!(KEYWORDS_PROMPT_TEMPLATE.contains("{content}"));
    }
}
