use std::{env, fmt, str::FromStr};

use secrecy::SecretString;

/// Hosted text-generation backend shared by every feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4",
            LlmProvider::Anthropic => "claude-3-sonnet-20240229",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => Err(format!("unknown LLM provider '{}'", other)),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => write!(f, "openai"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Optional per-feature model names; `None` falls back to `Config::llm_model`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureModels {
    pub quiz: Option<String>,
    pub schedule: Option<String>,
    pub summary: Option<String>,
}

impl FeatureModels {
    fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|m| !m.trim().is_empty());
        Self {
            quiz: read("QUIZ_LLM_MODEL"),
            schedule: read("SCHEDULE_LLM_MODEL"),
            summary: read("SUMMARY_LLM_MODEL"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub llm_provider: LlmProvider,
    pub llm_model: String,
    pub models: FeatureModels,
    pub openai_api_key: SecretString,
    pub anthropic_api_key: SecretString,
    pub anthropic_base_url: String,
    pub max_upload_bytes: usize,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let llm_provider = env::var("LLM_PROVIDER")
            .ok()
            .and_then(|p| match p.parse() {
                Ok(provider) => Some(provider),
                Err(err) => {
                    log::warn!("{}, falling back to openai", err);
                    None
                }
            })
            .unwrap_or(LlmProvider::OpenAi);

        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017/?replicaSet=rs0".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "tutor-ai-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            llm_model: env::var("LLM_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| llm_provider.default_model().to_string()),
            models: FeatureModels::from_env(),
            llm_provider,
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            anthropic_api_key: SecretString::from(
                env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            ),
            anthropic_base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if the selected provider has no API key
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let key = match self.llm_provider {
            LlmProvider::OpenAi => self.openai_api_key.expose_secret(),
            LlmProvider::Anthropic => self.anthropic_api_key.expose_secret(),
        };

        if key.trim().is_empty() {
            panic!(
                "FATAL: no API key configured for LLM provider '{}'. Set {} environment variable.",
                self.llm_provider,
                match self.llm_provider {
                    LlmProvider::OpenAi => "OPENAI_API_KEY",
                    LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
                }
            );
        }

        if self.max_upload_bytes == 0 {
            panic!("FATAL: MAX_UPLOAD_BYTES must be greater than zero.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "tutor-ai-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            llm_provider: LlmProvider::OpenAi,
            llm_model: "gpt-4".to_string(),
            models: FeatureModels::default(),
            openai_api_key: SecretString::from("sk-test".to_string()),
            anthropic_api_key: SecretString::from(String::new()),
            anthropic_base_url: "http://127.0.0.1:9".to_string(),
            max_upload_bytes: 1024 * 1024,
            cors_allowed_origin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(!config.llm_model.is_empty());
        assert!(config.max_upload_bytes > 0);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_db_name, "tutor-ai-test");
        assert_eq!(config.llm_provider, LlmProvider::OpenAi);
        config.validate_for_production();
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<LlmProvider>(), Ok(LlmProvider::OpenAi));
        assert_eq!(" anthropic ".parse::<LlmProvider>(), Ok(LlmProvider::Anthropic));
        assert!("gemini".parse::<LlmProvider>().is_err());
    }

    #[test]
    #[should_panic(expected = "ANTHROPIC_API_KEY")]
    fn production_validation_requires_key_for_selected_provider() {
        let mut config = Config::test_config();
        config.llm_provider = LlmProvider::Anthropic;
        config.validate_for_production();
    }
}
