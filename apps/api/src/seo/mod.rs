// SEO analysis: LLM-backed scoring, rewriting, and keyword reporting.

pub mod handlers;
pub mod keywords;
pub mod optimize;
pub mod prompts;
pub mod score;
