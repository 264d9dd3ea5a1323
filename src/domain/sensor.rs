// ============================================================
// SENSOR RECORDS
// ============================================================
// Typed rows of the three CSV exports

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One row of `sensor_config.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Measure")]
    pub measure: String,

    #[serde(rename = "LowAlarm")]
    pub low_alarm: f64,

    #[serde(rename = "UpperAlarm")]
    pub upper_alarm: f64,
}

impl SensorConfig {
    pub const HEADERS: [&'static str; 4] = ["ID", "Measure", "LowAlarm", "UpperAlarm"];
}

/// Instrument trust flag from `sensor_calibration.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationStatus {
    Normal,
    Abnormal,
    Other(String),
}

impl CalibrationStatus {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("normal") {
            CalibrationStatus::Normal
        } else if trimmed.eq_ignore_ascii_case("abnormal") {
            CalibrationStatus::Abnormal
        } else {
            CalibrationStatus::Other(trimmed.to_string())
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, CalibrationStatus::Normal)
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationStatus::Normal => write!(f, "Normal"),
            CalibrationStatus::Abnormal => write!(f, "Abnormal"),
            CalibrationStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for CalibrationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalibrationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CalibrationStatus::parse(&raw))
    }
}

/// One row of `sensor_calibration.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Measure")]
    pub measure: String,

    #[serde(rename = "Status")]
    pub status: CalibrationStatus,
}

impl CalibrationRecord {
    pub const HEADERS: [&'static str; 3] = ["ID", "Measure", "Status"];
}

/// One hourly measurement of `time_series_data_1.csv`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesSample {
    #[serde(rename = "Time")]
    pub time: String,

    #[serde(rename = "Temp")]
    pub temp: f64,

    #[serde(rename = "Tr1")]
    pub tr1: f64,

    #[serde(rename = "Tr2")]
    pub tr2: f64,

    #[serde(rename = "Tr3")]
    pub tr3: f64,

    #[serde(rename = "pH")]
    pub ph: f64,
}

impl TimeSeriesSample {
    pub const HEADERS: [&'static str; 6] = ["Time", "Temp", "Tr1", "Tr2", "Tr3", "pH"];
}

/// The three loaded tables, passed as-is to the prompt composer and the tools
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorDataset {
    pub configs: Vec<SensorConfig>,
    pub calibrations: Vec<CalibrationRecord>,
    pub series: Vec<TimeSeriesSample>,
}

impl SensorDataset {
    pub fn ph_values(&self) -> Vec<f64> {
        self.series.iter().map(|s| s.ph).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_status_parse() {
        assert_eq!(CalibrationStatus::parse(" normal "), CalibrationStatus::Normal);
        assert_eq!(CalibrationStatus::parse("ABNORMAL"), CalibrationStatus::Abnormal);
        assert_eq!(
            CalibrationStatus::parse("Pending"),
            CalibrationStatus::Other("Pending".to_string())
        );
        assert!(!CalibrationStatus::parse("Pending").is_normal());
    }

    #[test]
    fn test_calibration_status_serializes_as_text() {
        let record = CalibrationRecord {
            id: "1".to_string(),
            measure: "pH".to_string(),
            status: CalibrationStatus::Normal,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Status"], "Normal");
        assert_eq!(json["Measure"], "pH");
    }
}
