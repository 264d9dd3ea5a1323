// ============================================================
// LOW pH DECISION RULE
// ============================================================
// Pick the root-cause branch and the treatment to increase

use tracing::{info, warn};

use crate::domain::analysis_config::AnalysisSettings;
use crate::domain::correlation::{Correlation, CorrelationSet};
use crate::domain::diagnosis::{Diagnosis, RootCause};
use crate::domain::error::{AppError, Result};
use crate::domain::sensor::SensorDataset;

/// Row describing `measure`, or the only row when none matches by name
fn select_measure_row<'a, T>(
    rows: &'a [T],
    measure: &str,
    measure_of: impl Fn(&T) -> &str,
    table: &str,
) -> Result<&'a T> {
    if let Some(row) = rows
        .iter()
        .find(|row| measure_of(row).trim().eq_ignore_ascii_case(measure))
    {
        return Ok(row);
    }

    match rows {
        [only] => {
            warn!(
                table,
                measure,
                found = measure_of(only),
                "No row for measure, using the only row"
            );
            Ok(only)
        }
        _ => Err(AppError::ValidationError(format!(
            "{} has no row for measure '{}'",
            table, measure
        ))),
    }
}

/// Branch A (low temperature) when the trailing pH readings are all below the
/// low alarm, pH tracks Temp above the threshold and the sensor calibration
/// is Normal. Branch B otherwise.
pub fn diagnose(
    dataset: &SensorDataset,
    correlations: &CorrelationSet,
    settings: &AnalysisSettings,
) -> Result<Diagnosis> {
    let config = select_measure_row(
        &dataset.configs,
        &settings.measure,
        |c| c.measure.as_str(),
        "sensor configuration",
    )?;
    let calibration = select_measure_row(
        &dataset.calibrations,
        &settings.measure,
        |c| c.measure.as_str(),
        "sensor calibration",
    )?;

    let ph = dataset.ph_values();
    if ph.len() < settings.trailing_samples {
        return Err(AppError::ValidationError(format!(
            "time series has {} samples, at least {} required",
            ph.len(),
            settings.trailing_samples
        )));
    }
    let trailing_ph = ph[ph.len() - settings.trailing_samples..].to_vec();
    let ph_below_alarm = trailing_ph.iter().all(|v| *v < config.low_alarm);

    let temp_tracks_ph = match correlations.temp {
        Correlation::Defined(r) => r > settings.correlation_threshold,
        Correlation::Undefined => false,
    };
    let calibration_normal = calibration.status.is_normal();

    let root_cause = if ph_below_alarm && temp_tracks_ph && calibration_normal {
        RootCause::LowTemperature
    } else {
        RootCause::Unknown
    };

    let (treatment, treatment_correlation) = correlations.strongest_treatment().ok_or_else(|| {
        AppError::AnalysisError(
            "no treatment has a defined correlation with pH".to_string(),
        )
    })?;

    info!(
        ?root_cause,
        ph_below_alarm,
        temp_tracks_ph,
        calibration_normal,
        treatment = %treatment,
        treatment_correlation,
        "Evaluated low pH rule"
    );

    Ok(Diagnosis {
        root_cause,
        measure: config.measure.clone(),
        low_alarm: config.low_alarm,
        trailing_ph,
        ph_below_alarm,
        temp_correlation: correlations.temp,
        correlation_threshold: settings.correlation_threshold,
        calibration_status: calibration.status.clone(),
        treatment,
        treatment_correlation,
    })
}
