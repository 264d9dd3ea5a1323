use super::wire::{send_chat, ChatCompletionRequest};
use super::LLMClient;
use crate::domain::chat::{AssistantTurn, ChatMessage, ToolDefinition};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use tracing::info;

/// Client for OpenAI and OpenAI-compatible `/chat/completions` servers.
pub struct OpenAIClient {
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(config: &LLMConfig) -> String {
        if config.base_url.ends_with('/') {
            format!("{}chat/completions", config.base_url)
        } else {
            format!("{}/chat/completions", config.base_url)
        }
    }

    fn api_key(config: &LLMConfig) -> Result<Option<String>> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());
        match key {
            Some(key) => Ok(Some(key.to_string())),
            None if config.provider.requires_api_key() => Err(AppError::LLMError(
                "Missing API key for OpenAI".to_string(),
            )),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn chat(
        &self,
        config: &LLMConfig,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        let api_key = Self::api_key(config)?;
        let url = Self::endpoint(config);

        let body =
            ChatCompletionRequest::new(config, Some(config.model.clone()), messages, tools);

        info!(
            url = %url,
            model = %config.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion"
        );

        let mut request = self.client.post(&url);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        send_chat(request, config, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    #[test]
    fn test_endpoint_joins_path() {
        let mut config = LLMConfig {
            base_url: "https://api.openai.com/v1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            OpenAIClient::endpoint(&config),
            "https://api.openai.com/v1/chat/completions"
        );

        config.base_url = "http://localhost:1234/v1/".to_string();
        assert_eq!(
            OpenAIClient::endpoint(&config),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_key_optional_for_local() {
        let config = LLMConfig::default();
        assert!(OpenAIClient::api_key(&config).unwrap().is_none());

        let config = LLMConfig {
            provider: LLMProvider::OpenAI,
            ..Default::default()
        };
        assert!(OpenAIClient::api_key(&config).is_err());
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = LLMConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(OpenAIClient::api_key(&config).unwrap().is_none());

        let config = LLMConfig {
            provider: LLMProvider::OpenAI,
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(OpenAIClient::api_key(&config).is_err());
    }
}
