use serde_json::{json, Value};
use tracing::{info, warn};

use crate::application::use_cases::analyst::AnalystAgent;
use crate::application::use_cases::diagnosis::diagnose;
use crate::domain::analysis_config::AnalysisSettings;
use crate::domain::chat::ToolDefinition;
use crate::domain::error::{AppError, Result};

pub const READ_SENSOR_CONFIG: &str = "read_sensor_config";
pub const READ_SENSOR_CALIBRATION: &str = "read_sensor_calibration";
pub const READ_TIME_SERIES_DATA: &str = "read_time_series_data";
pub const EVALUATE_DIAGNOSIS: &str = "evaluate_diagnosis";

/// Functions the model may call to gather the sensor data itself.
pub struct DataTools {
    analyst: AnalystAgent,
    settings: AnalysisSettings,
}

impl DataTools {
    pub fn new(analyst: AnalystAgent, settings: AnalysisSettings) -> Self {
        Self { analyst, settings }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        let no_arguments = json!({"type": "object", "properties": {}, "required": []});
        [
            (
                READ_SENSOR_CONFIG,
                "Read the sensor configuration rows (ID, Measure, LowAlarm, UpperAlarm).",
            ),
            (
                READ_SENSOR_CALIBRATION,
                "Read the sensor calibration rows (ID, Measure, Status).",
            ),
            (
                READ_TIME_SERIES_DATA,
                "Read the hourly time series (Time, Temp, Tr1, Tr2, Tr3, pH) and the Pearson correlation coefficients between pH and Temp, Tr1, Tr2, Tr3.",
            ),
            (
                EVALUATE_DIAGNOSIS,
                "Apply the low pH rule to the data and return the report subject, root cause statement and the treatment to increase with its correlation coefficient.",
            ),
        ]
        .into_iter()
        .map(|(name, description)| ToolDefinition {
            name: name.to_string(),
            description: description.to_string(),
            parameters: no_arguments.clone(),
        })
        .collect()
    }

    /// Run one tool and return its JSON result. Unknown tools yield an error
    /// payload for the model; data errors abort the session.
    pub fn invoke(&self, name: &str, arguments: &str) -> Result<String> {
        info!(tool = name, arguments, "Invoking tool");

        let value = match name {
            READ_SENSOR_CONFIG => json!({ "rows": self.analyst.read_sensor_config()? }),
            READ_SENSOR_CALIBRATION => json!({ "rows": self.analyst.read_sensor_calibration()? }),
            READ_TIME_SERIES_DATA => {
                let series = self.analyst.read_time_series()?;
                let correlations = self.analyst.correlate(&series);
                json!({ "rows": series, "correlations_with_ph": correlations })
            }
            EVALUATE_DIAGNOSIS => self.evaluate_diagnosis()?,
            other => {
                warn!(tool = other, "Model requested an unknown tool");
                json!({ "error": format!("unknown function '{}'", other) })
            }
        };

        serde_json::to_string(&value)
            .map_err(|e| AppError::Internal(format!("Failed to encode tool result: {}", e)))
    }

    fn evaluate_diagnosis(&self) -> Result<Value> {
        let dataset = self.analyst.load_dataset()?;
        let correlations = self.analyst.correlate(&dataset.series);
        let diagnosis = diagnose(&dataset, &correlations, &self.settings)?;

        Ok(json!({
            "subject": diagnosis.subject(),
            "root_cause_statement": diagnosis.root_cause.statement(),
            "treatment": diagnosis.treatment,
            "treatment_correlation": diagnosis.treatment_correlation,
            "suggested_action": diagnosis.suggested_action(),
            "details": diagnosis,
        }))
    }
}
