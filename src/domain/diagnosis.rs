use serde::Serialize;

use super::correlation::{Correlation, Treatment};
use super::sensor::CalibrationStatus;

/// Outcome of the low-pH decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RootCause {
    LowTemperature,
    Unknown,
}

impl RootCause {
    pub fn subject(&self) -> &'static str {
        match self {
            RootCause::LowTemperature => "pH Low ROA: Low Temperature",
            RootCause::Unknown => "pH Low ROA: Unknown",
        }
    }

    /// Fixed statement for the "Root cause analysis" row.
    pub fn statement(&self) -> &'static str {
        match self {
            RootCause::LowTemperature => {
                "The system is in Abnormal status and the pH values are lower than the threshold due to the low temperature."
            }
            RootCause::Unknown => {
                "The system is in Abnormal status and the pH values are lower than the threshold but may not be due to the low temperature."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub root_cause: RootCause,
    pub measure: String,
    pub low_alarm: f64,
    /// Last pH readings inspected by the rule, oldest first.
    pub trailing_ph: Vec<f64>,
    pub ph_below_alarm: bool,
    pub temp_correlation: Correlation,
    pub correlation_threshold: f64,
    pub calibration_status: CalibrationStatus,
    pub treatment: Treatment,
    pub treatment_correlation: f64,
}

impl Diagnosis {
    pub fn subject(&self) -> &'static str {
        self.root_cause.subject()
    }

    pub fn suggested_action(&self) -> String {
        format!(
            "Increase treatment {}, which has the highest correlation with pH (correlation coefficient {}).",
            self.treatment, self.treatment_correlation
        )
    }
}
