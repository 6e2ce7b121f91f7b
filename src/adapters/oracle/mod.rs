//! Oracle adapters backed by an `AIProvider`.
//!
//! - `LlmExtractionOracle` - structured slot extraction in JSON mode
//! - `LlmReplyOracle` - conversational reply drafting

mod json_payload;
mod llm_extraction;
mod llm_reply;
mod prompts;

pub use json_payload::{parse_object, PayloadError, MAX_RESPONSE_LENGTH};
pub use llm_extraction::LlmExtractionOracle;
pub use llm_reply::LlmReplyOracle;
pub use prompts::format_history;

/// Sampling settings shared by both oracles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleSettings {
    pub extraction_temperature: f32,
    pub reply_temperature: f32,
    pub reply_max_tokens: u32,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            extraction_temperature: 0.2,
            reply_temperature: 0.7,
            reply_max_tokens: 150,
        }
    }
}
