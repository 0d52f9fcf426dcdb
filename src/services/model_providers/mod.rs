pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicGenerator;
pub use openai::OpenAiGenerator;

use crate::errors::{AppError, AppResult};

/// Treats a missing or whitespace-only completion as no content.
pub(crate) fn require_text(provider: &str, text: Option<String>) -> AppResult<String> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::NoContent(provider.to_string())),
    }
}
