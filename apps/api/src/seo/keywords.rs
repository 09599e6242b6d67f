//! Keyword analysis: density of what the README already says, suggestions
//! for what searchers would look for and not find.

use crate::errors::AppError;
use crate::llm_client::{CallParams, LlmClient};
use crate::models::document::KeywordReport;
use crate::seo::prompts::{KEYWORDS_PROMPT_TEMPLATE, KEYWORDS_SYSTEM};

pub const KEYWORDS_MAX_TOKENS: u32 = 2048;
pub const KEYWORDS_TEMPERATURE: f32 = 0.2;

pub async fn analyze_keywords(llm: &LlmClient, content: &str) -> Result<KeywordReport, AppError> {
    let prompt = KEYWORDS_PROMPT_TEMPLATE.replace("{content}", content);
    let report: KeywordReport = llm
        .call_json(
            &prompt,
            KEYWORDS_SYSTEM,
            CallParams {
                max_tokens: KEYWORDS_MAX_TOKENS,
                temperature: KEYWORDS_TEMPERATURE,
            },
        )
        .await?;
    Ok(report)
}
