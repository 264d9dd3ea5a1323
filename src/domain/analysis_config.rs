use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Location of the three CSV exports
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DataPaths {
    pub dir: PathBuf,
    #[validate(length(min = 1))]
    pub sensor_config: String,
    #[validate(length(min = 1))]
    pub sensor_calibration: String,
    #[validate(length(min = 1))]
    pub time_series: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            sensor_config: "sensor_config.csv".to_string(),
            sensor_calibration: "sensor_calibration.csv".to_string(),
            time_series: "time_series_data_1.csv".to_string(),
        }
    }
}

impl DataPaths {
    pub fn sensor_config_path(&self) -> PathBuf {
        self.dir.join(&self.sensor_config)
    }

    pub fn sensor_calibration_path(&self) -> PathBuf {
        self.dir.join(&self.sensor_calibration)
    }

    pub fn time_series_path(&self) -> PathBuf {
        self.dir.join(&self.time_series)
    }
}

/// Parameters of the low-pH decision rule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalysisSettings {
    /// Measure name selecting the config and calibration rows
    #[validate(length(min = 1))]
    pub measure: String,

    /// Temp-pH correlation must be strictly above this for the low temperature branch
    #[validate(range(min = -1.0, max = 1.0))]
    pub correlation_threshold: f64,

    /// Number of most recent pH readings that must sit below the low alarm
    #[validate(range(min = 1))]
    pub trailing_samples: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            measure: "pH".to_string(),
            correlation_threshold: 0.9,
            trailing_samples: 3,
        }
    }
}
