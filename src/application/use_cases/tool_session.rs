use std::sync::Arc;

use tracing::{debug, info};

use crate::application::use_cases::data_tools::DataTools;
use crate::domain::chat::ChatMessage;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::prompt::ReportPrompt;
use crate::infrastructure::llm_clients::LLMClient;

/// Drives a tool-calling conversation until the model answers with content.
pub struct ToolSession {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    tools: DataTools,
}

impl ToolSession {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, tools: DataTools) -> Self {
        Self { llm_client, tools }
    }

    pub async fn run(&self, config: &LLMConfig, prompt: &ReportPrompt) -> Result<String> {
        let definitions = DataTools::definitions();
        let mut messages = prompt.to_messages();

        for round in 1..=config.max_tool_rounds {
            let turn = self
                .llm_client
                .chat(config, &messages, &definitions)
                .await?;

            if turn.tool_calls.is_empty() {
                info!(round, "Model finished without further tool calls");
                return turn
                    .content
                    .ok_or_else(|| AppError::LLMError("Completion has no content".to_string()));
            }

            let calls = turn.tool_calls.clone();
            debug!(round, calls = calls.len(), "Model requested tools");
            messages.push(turn.into_message());

            for call in calls {
                let output = self.tools.invoke(&call.name, &call.arguments)?;
                messages.push(ChatMessage::tool_result(call.id, output));
            }
        }

        Err(AppError::LLMError(format!(
            "Model did not produce a report within {} tool rounds",
            config.max_tool_rounds
        )))
    }
}
