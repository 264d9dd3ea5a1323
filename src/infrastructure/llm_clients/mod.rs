pub mod azure;
pub mod openai;
mod wire;

use crate::domain::chat::{AssistantTurn, ChatMessage, ToolDefinition};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::llm_config::LLMProvider;
use async_trait::async_trait;
use azure::AzureOpenAIClient;
use openai::OpenAIClient;

#[async_trait]
pub trait LLMClient {
    /// Send a conversation. When `tools` is non-empty the model may answer
    /// with tool calls instead of content.
    async fn chat(
        &self,
        config: &LLMConfig,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn>;

    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let turn = self.chat(config, &messages, &[]).await?;
        turn.content
            .ok_or_else(|| AppError::LLMError("Completion has no content".to_string()))
    }
}

pub struct RouterClient {
    openai: OpenAIClient,
    azure: AzureOpenAIClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            openai: OpenAIClient::new(),
            azure: AzureOpenAIClient::new(),
        }
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn chat(
        &self,
        config: &LLMConfig,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn> {
        match config.provider {
            LLMProvider::AzureOpenAI => self.azure.chat(config, messages, tools).await,
            LLMProvider::OpenAI | LLMProvider::Local => {
                self.openai.chat(config, messages, tools).await
            }
        }
    }
}
