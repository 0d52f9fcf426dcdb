use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppResult,
    services::{
        model_providers::require_text,
        model_service::{GenerationOptions, TextGenerator},
    },
};

const PROVIDER: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: SecretString, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn request(
        &self,
        prompt: &str,
        system_instruction: &str,
        options: &GenerationOptions,
    ) -> ChatRequest {
        ChatRequest {
            model: options.model_or(&self.model).to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: options.temperature,
            max_tokens: options.max_output_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        options: &GenerationOptions,
    ) -> AppResult<String> {
        let request = self.request(prompt, system_instruction, options);
        log::debug!("Requesting chat completion from {} ({})", PROVIDER, request.model);

        let response: ChatResponse = self.client.chat().create_byot(request).await?;
        require_text(PROVIDER, response.into_text())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
