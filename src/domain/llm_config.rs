use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LLMProvider {
    /// OpenAI-compatible server without authentication (LM Studio, Ollama).
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "azure")]
    AzureOpenAI,
}

impl LLMProvider {
    /// Keyring account name for this provider.
    pub fn key_name(&self) -> &'static str {
        match self {
            LLMProvider::Local => "local",
            LLMProvider::OpenAI => "openai",
            LLMProvider::AzureOpenAI => "azure",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Local)
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(LLMProvider::Local),
            "openai" => Ok(LLMProvider::OpenAI),
            "azure" | "azure-openai" => Ok(LLMProvider::AzureOpenAI),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    /// Base URL for OpenAI-style providers, resource endpoint for Azure.
    #[validate(url)]
    pub base_url: String,
    /// Model name, or deployment name for Azure.
    #[validate(length(min = 1))]
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Azure `api-version` query parameter.
    pub api_version: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    #[validate(range(min = 1))]
    pub max_tool_rounds: u32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Local,
            base_url: "http://localhost:1234/v1".to_string(),
            model: "local-model".to_string(),
            api_key: None,
            api_version: "2024-02-01".to_string(),
            max_tokens: Some(2048),
            temperature: Some(0.2),
            timeout_secs: 120,
            max_tool_rounds: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Azure".parse::<LLMProvider>().unwrap(), LLMProvider::AzureOpenAI);
        assert_eq!("openai".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert!("gemini".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(LLMConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let config = LLMConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
