use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::prompt::ReportPrompt;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::HtmlReport;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Turns a composed prompt into a validated HTML report.
pub struct ScientistAgent {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ScientistAgent {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn write_report(&self, config: &LLMConfig, prompt: &ReportPrompt) -> Result<HtmlReport> {
        prompt
            .validate()
            .map_err(|e| AppError::Internal(format!("Composed prompt is invalid: {}", e)))?;

        info!(
            system_chars = prompt.system().len(),
            user_chars = prompt.user().len(),
            "Requesting HTML report"
        );
        let raw_result = self
            .llm_client
            .generate(config, prompt.system(), prompt.user())
            .await?;

        let report = HtmlReport::parse(&raw_result)?;
        info!(subject = ?report.subject(), "Report received");
        Ok(report)
    }
}
