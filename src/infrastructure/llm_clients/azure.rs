use super::wire::{send_chat, ChatCompletionRequest};
use super::LLMClient;
use crate::domain::chat::{AssistantTurn, ChatMessage, ToolDefinition};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use tracing::info;
use url::Url;

/// Client for an Azure OpenAI deployment. `config.model` is the deployment
/// name and `config.base_url` the resource endpoint.
pub struct AzureOpenAIClient {
    client: reqwest::Client,
}

impl AzureOpenAIClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build the deployment URL. An endpoint that already points at
    /// `.../chat/completions` is used as given, keeping its `api-version`
    /// when present.
    fn endpoint(config: &LLMConfig) -> Result<Url> {
        let base = config.base_url.trim_end_matches('/');
        let raw = if base.contains("/chat/completions") {
            base.to_string()
        } else {
            format!(
                "{}/openai/deployments/{}/chat/completions",
                base,
                config.model.trim()
            )
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::ConfigError(format!("Invalid Azure endpoint '{}': {}", raw, e)))?;
        if !url.query_pairs().any(|(k, _)| k == "api-version") {
            url.query_pairs_mut()
                .append_pair("api-version", &config.api_version);
        }
        Ok(url)
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::LLMError("Missing API key for Azure OpenAI".to_string()))
    }
}

#[async_trait]
impl LLMClient for AzureOpenAIClient {
    async fn chat(
        &self,
        config: &LLMConfig,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        let api_key = Self::api_key(config)?;
        let url = Self::endpoint(config)?;

        // The deployment in the URL selects the model.
        let body = ChatCompletionRequest::new(config, None, messages, tools);

        info!(
            url = %url,
            deployment = %config.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending Azure chat completion"
        );

        let request = self.client.post(url).header("api-key", api_key);
        send_chat(request, config, &body).await
    }
}
