use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{Config, LlmProvider},
    errors::AppResult,
    services::model_providers::{AnthropicGenerator, OpenAiGenerator},
};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Sampling settings for a single generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    /// Overrides the generator's configured model for this call.
    pub model: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: None,
            model: None,
        }
    }
}

impl GenerationOptions {
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// The model to request: the per-call override, else `configured`.
    pub fn model_or<'a>(&'a self, configured: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(configured)
    }
}

/// A hosted model that turns a prompt into text.
///
/// One call per invocation: no retries, no streaming. An empty completion is
/// reported as [`AppError::NoContent`](crate::errors::AppError::NoContent).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        options: &GenerationOptions,
    ) -> AppResult<String>;

    fn provider_name(&self) -> &'static str;
}

pub fn build_text_generator(config: &Config) -> Arc<dyn TextGenerator> {
    log::info!(
        "Using {} text generation with model {}",
        config.llm_provider,
        config.llm_model
    );

    match config.llm_provider {
        LlmProvider::OpenAi => Arc::new(OpenAiGenerator::new(
            config.openai_api_key.clone(),
            config.llm_model.clone(),
        )),
        LlmProvider::Anthropic => Arc::new(AnthropicGenerator::new(
            config.anthropic_api_key.clone(),
            config.llm_model.clone(),
            config.anthropic_base_url.clone(),
        )),
    }
}
