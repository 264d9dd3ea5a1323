// ============================================================
// DIAGNOSTIC PIPELINE
// ============================================================
// load -> correlate -> decide -> compose -> complete -> validate

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::use_cases::analyst::AnalystAgent;
use crate::application::use_cases::data_tools::DataTools;
use crate::application::use_cases::diagnosis::diagnose;
use crate::application::use_cases::report_prompt::{build_direct_prompt, build_tools_prompt};
use crate::application::use_cases::report_renderer::render_report;
use crate::application::use_cases::scientist::ScientistAgent;
use crate::application::use_cases::tool_session::ToolSession;
use crate::domain::correlation::CorrelationSet;
use crate::domain::diagnosis::Diagnosis;
use crate::domain::error::Result;
use crate::domain::sensor::SensorDataset;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::HtmlReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Data and decision embedded in the prompt, model writes the report
    Direct,
    /// Model gathers the data through tool calls
    Tools,
    /// No model, report rendered locally
    Offline,
}

/// Loaded data and everything derived from it
#[derive(Debug, Clone)]
pub struct Analysis {
    pub dataset: SensorDataset,
    pub correlations: CorrelationSet,
    pub diagnosis: Diagnosis,
}

pub struct DiagnosticPipeline {
    config: AppConfig,
    analyst: AnalystAgent,
    scientist: ScientistAgent,
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl DiagnosticPipeline {
    pub fn new(config: AppConfig, llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self {
            analyst: AnalystAgent::new(config.data.clone()),
            scientist: ScientistAgent::new(llm_client.clone()),
            llm_client,
            config,
        }
    }

    pub fn analyze(&self) -> Result<Analysis> {
        let dataset = self.analyst.load_dataset()?;
        let correlations = self.analyst.correlate(&dataset.series);
        let diagnosis = diagnose(&dataset, &correlations, &self.config.analysis)?;
        Ok(Analysis {
            dataset,
            correlations,
            diagnosis,
        })
    }

    pub async fn run(&self, mode: RunMode) -> Result<HtmlReport> {
        let span = info_span!("diagnose", run_id = %Uuid::new_v4(), ?mode);
        async move {
            let analysis = self.analyze()?;
            info!(subject = analysis.diagnosis.subject(), "Decision made");

            let report = match mode {
                RunMode::Offline => HtmlReport::parse(&render_report(
                    &analysis.diagnosis,
                    &analysis.correlations,
                    chrono::Utc::now(),
                ))?,
                RunMode::Direct => {
                    let prompt = build_direct_prompt(
                        &analysis.dataset,
                        &analysis.correlations,
                        &analysis.diagnosis,
                    );
                    self.scientist.write_report(&self.config.llm, &prompt).await?
                }
                RunMode::Tools => {
                    let prompt = build_tools_prompt(&self.config.data, &self.config.analysis);
                    let tools = DataTools::new(self.analyst.clone(), self.config.analysis.clone());
                    let session = ToolSession::new(self.llm_client.clone(), tools);
                    let raw = session.run(&self.config.llm, &prompt).await?;
                    HtmlReport::parse(&raw)?
                }
            };

            if report.subject() != Some(analysis.diagnosis.subject()) {
                warn!(
                    expected = analysis.diagnosis.subject(),
                    actual = ?report.subject(),
                    "Report subject differs from the decided branch"
                );
            }

            info!("Report ready");
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
