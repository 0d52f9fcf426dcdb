use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult},
    services::{
        model_providers::require_text,
        model_service::{GenerationOptions, TextGenerator},
    },
};

const PROVIDER: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
    }
}

/// Calls the Anthropic Messages API directly over HTTP.
pub struct AnthropicGenerator {
    api_key: SecretString,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicGenerator {
    pub fn new(api_key: SecretString, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn request(
        &self,
        prompt: &str,
        system_instruction: &str,
        options: &GenerationOptions,
    ) -> MessagesRequest {
        MessagesRequest {
            model: options.model_or(&self.model).to_string(),
            max_tokens: options.max_output_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature,
            system: system_instruction.to_string(),
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        options: &GenerationOptions,
    ) -> AppResult<String> {
        let request = self.request(prompt, system_instruction, options);
        log::debug!("Requesting message from {} ({})", PROVIDER, request.model);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "{} returned {}: {}",
                PROVIDER, status, body
            )));
        }

        let body: MessagesResponse = response.json().await?;
        require_text(PROVIDER, body.into_text())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
