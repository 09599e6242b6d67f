//! README scoring.
//!
//! One cold, short LLM call per request. The verdict must deserialize as a
//! whole; a malformed upstream answer fails the request instead of being
//! patched up, so a stored score is only ever replaced by a complete one.

use crate::errors::AppError;
use crate::llm_client::{CallParams, LlmClient};
use crate::models::document::ScoreResult;
use crate::seo::prompts::{SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM};

pub const SCORE_MAX_TOKENS: u32 = 1500;
pub const SCORE_TEMPERATURE: f32 = 0.0;

pub async fn score_content(llm: &LlmClient, content: &str) -> Result<ScoreResult, AppError> {
    let prompt = SCORE_PROMPT_TEMPLATE.replace("{content}", content);
    let mut result: ScoreResult = llm
        .call_json(
            &prompt,
            SCORE_SYSTEM,
            CallParams {
                max_tokens: SCORE_MAX_TOKENS,
                temperature: SCORE_TEMPERATURE,
            },
        )
        .await?;

    clamp_ranges(&mut result);
    Ok(result)
}

/// Forces upstream numbers into their documented ranges: overall 0-100,
/// per-category 0-10.
fn clamp_ranges(result: &mut ScoreResult) {
    result.score = result.score.clamp(0.0, 100.0);
    for value in result.breakdown.values_mut() {
        *value = value.clamp(0.0, 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn make_result(score: f64) -> ScoreResult {
        ScoreResult {
            score,
            breakdown: BTreeMap::from([
                ("clarity".to_string(), 8.0),
                ("license".to_string(), 10.0),
            ]),
            summary: vec!["fine".to_string()],
            top_fixes: vec!["add usage".to_string()],
        }
    }

    #[test]
    fn test_clamp_leaves_in_range_values() {
        let mut result = make_result(72.0);
        clamp_ranges(&mut result);
        assert_eq!(result.score, 72.0);
        assert_eq!(result.breakdown["clarity"], 8.0);
    }

    #[test]
    fn test_clamp_caps_out_of_range_values() {
        let mut result = make_result(140.0);
        result.breakdown.insert("badges".to_string(), -3.0);
        result.breakdown.insert("images".to_string(), 25.0);
        clamp_ranges(&mut result);

        assert_eq!(result.score, 100.0);
        assert_eq!(result.breakdown["badges"], 0.0);
        assert_eq!(result.breakdown["images"], 10.0);
    }

    #[test]
    fn test_verdict_deserializes_from_typical_payload() {
        let result: ScoreResult = serde_json::from_value(json!({
            "score": 64,
            "breakdown": {"clarity": 7, "structure": 6},
            "summary": ["a", "b", "c"],
            "top_fixes": ["x", "y", "z"]
        }))
        .unwrap();
        assert_eq!(result.score, 64.0);
        assert_eq!(result.breakdown.len(), 2);
    }

    #[test]
    fn test_partial_verdict_is_rejected() {
        // A verdict without a breakdown must not half-parse.
        let result = serde_json::from_value::<ScoreResult>(json!({
            "score": 64,
            "summary": [],
            "top_fixes": []
        }));
        assert!(result.is_err());
    }
}
