use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::analysis_config::DataPaths;
use crate::domain::correlation::CorrelationSet;
use crate::domain::error::{AppError, Result};
use crate::domain::sensor::{CalibrationRecord, SensorConfig, SensorDataset, TimeSeriesSample};
use crate::infrastructure::csv::CsvParser;

/// Loads the CSV exports and computes the pH correlations.
#[derive(Debug, Clone)]
pub struct AnalystAgent {
    parser: CsvParser,
    paths: DataPaths,
}

impl AnalystAgent {
    pub fn new(paths: DataPaths) -> Self {
        Self {
            parser: CsvParser::new(),
            paths,
        }
    }

    pub fn read_sensor_config(&self) -> Result<Vec<SensorConfig>> {
        self.read_table(&self.paths.sensor_config_path(), &SensorConfig::HEADERS)
    }

    pub fn read_sensor_calibration(&self) -> Result<Vec<CalibrationRecord>> {
        self.read_table(
            &self.paths.sensor_calibration_path(),
            &CalibrationRecord::HEADERS,
        )
    }

    pub fn read_time_series(&self) -> Result<Vec<TimeSeriesSample>> {
        self.read_table(&self.paths.time_series_path(), &TimeSeriesSample::HEADERS)
    }

    pub fn load_dataset(&self) -> Result<SensorDataset> {
        Ok(SensorDataset {
            configs: self.read_sensor_config()?,
            calibrations: self.read_sensor_calibration()?,
            series: self.read_time_series()?,
        })
    }

    pub fn correlate(&self, series: &[TimeSeriesSample]) -> CorrelationSet {
        let correlations = CorrelationSet::from_series(series);
        info!(
            samples = series.len(),
            temp_ph = %correlations.temp,
            tr1_ph = %correlations.tr1,
            tr2_ph = %correlations.tr2,
            tr3_ph = %correlations.tr3,
            "Computed Pearson correlations with pH"
        );
        correlations
    }

    fn read_table<T: DeserializeOwned>(&self, path: &Path, headers: &[&str]) -> Result<Vec<T>> {
        info!(path = %path.display(), "Reading CSV file");
        let rows: Vec<T> = self.parser.parse_file(path, headers)?;
        if rows.is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} has no data rows",
                path.display()
            )));
        }
        info!(path = %path.display(), rows = rows.len(), "CSV file read successfully");
        Ok(rows)
    }
}
