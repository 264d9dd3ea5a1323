//! Chat Completions request and response bodies, shared by the OpenAI and
//! Azure OpenAI clients.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::chat::{AssistantTurn, ChatMessage, ChatRole, ToolCall, ToolDefinition};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

#[derive(Serialize)]
pub(super) struct ChatCompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatCompletionRequest {
    pub(super) fn new(
        config: &LLMConfig,
        model: Option<String>,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Self {
        Self {
            model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.iter().map(WireTool::from).collect(),
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Serialize)]
struct WireMessage {
    role: ChatRole,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            tool_calls: message.tool_calls.iter().map(WireToolCall::from).collect(),
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: WireFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_type(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

#[derive(Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolDefinition> for WireTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: WireFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

impl ChatCompletionResponse {
    fn into_turn(self) -> Result<AssistantTurn> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLMError("Invalid response format: no choices".to_string()))?;

        debug!(finish_reason = ?choice.finish_reason, "Completion received");

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();
        let content = choice.message.content.filter(|c| !c.trim().is_empty());

        if content.is_none() && tool_calls.is_empty() {
            return Err(AppError::LLMError(
                "Invalid response format: empty message".to_string(),
            ));
        }

        Ok(AssistantTurn {
            content,
            tool_calls,
        })
    }
}

/// Send the request and decode the first choice.
pub(super) async fn send_chat(
    request: reqwest::RequestBuilder,
    config: &LLMConfig,
    body: &ChatCompletionRequest,
) -> Result<AssistantTurn> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let response = request
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                AppError::LLMError(format!("Request timed out after {}s", config.timeout_secs))
            } else {
                AppError::LLMError(format!("Request failed: {}", e))
            }
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::LLMError(format!(
            "API error ({}): {}",
            status, text
        )));
    }

    let json: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

    json.into_turn()
}
