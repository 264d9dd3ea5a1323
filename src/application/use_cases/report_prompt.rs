use crate::domain::analysis_config::{AnalysisSettings, DataPaths};
use crate::domain::correlation::CorrelationSet;
use crate::domain::diagnosis::Diagnosis;
use crate::domain::prompt::ReportPrompt;
use crate::domain::sensor::{CalibrationRecord, SensorConfig, SensorDataset, TimeSeriesSample};
use crate::infrastructure::response::HTML4_DOCTYPE;

fn html_requirements() -> String {
    format!(
        "The HTML report must be a complete document starting with {doctype}.\n\
         It contains one table of 3 rows and 2 columns:\n\
         - Row 1: a cell with the string 'Subject' and a cell with the subject.\n\
         - Row 2: a cell with the string 'Root cause analysis' and a cell with the root cause statement.\n\
         - Row 3: a cell with the string 'Suggested Actions' and a cell suggesting to increase the treatment \
         (Tr1, Tr2 or Tr3) with the highest correlation with pH. Include the treatment name and its \
         correlation coefficient with pH exactly as given.\n\
         The report must be ready to display in a browser. Return only the HTML document.",
        doctype = HTML4_DOCTYPE
    )
}

/// Render rows as a whitespace-aligned text table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let format_line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = vec![format_line(headers.to_vec())];
    for row in rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

fn config_table(rows: &[SensorConfig]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.measure.clone(),
                r.low_alarm.to_string(),
                r.upper_alarm.to_string(),
            ]
        })
        .collect();
    render_table(&SensorConfig::HEADERS, &rows)
}

fn calibration_table(rows: &[CalibrationRecord]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.id.clone(), r.measure.clone(), r.status.to_string()])
        .collect();
    render_table(&CalibrationRecord::HEADERS, &rows)
}

fn series_table(rows: &[TimeSeriesSample]) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.time.clone(),
                r.temp.to_string(),
                r.tr1.to_string(),
                r.tr2.to_string(),
                r.tr3.to_string(),
                r.ph.to_string(),
            ]
        })
        .collect();
    render_table(&TimeSeriesSample::HEADERS, &rows)
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Analyst/scientist conversation: the data, the coefficients and the
/// already decided branch go to the model, which only writes the report.
pub fn build_direct_prompt(
    dataset: &SensorDataset,
    correlations: &CorrelationSet,
    diagnosis: &Diagnosis,
) -> ReportPrompt {
    let system = format!(
        "This is a conversation between an analyst and a scientist.\n\
         The analyst has read three CSV files, calculated the Pearson correlation coefficients between \
         pH and Temp, Tr1, Tr2 and Tr3, and evaluated the low pH rule.\n\
         You are the scientist. Generate one HTML report from the data provided by the analyst.\n\
         Use the subject, root cause statement, treatment and correlation coefficient from the analyst's \
         decision exactly as given; you may add one or two sentences of explanation citing the pH readings.\n\
         {}\n\
         The scientist uses the exact values provided by the analyst, is laser focused on the goal at hand \
         and doesn't waste time with chit chat.",
        html_requirements()
    );

    let mut user = String::new();
    user.push_str("The data provided by the analyst are as follows:\n\n");
    user.push_str(&format!(
        "1. Sensor configuration (columns: {}):\n{}\n\n",
        SensorConfig::HEADERS.join(", "),
        config_table(&dataset.configs)
    ));
    user.push_str(&format!(
        "2. Sensor calibration (columns: {}):\n{}\n\n",
        CalibrationRecord::HEADERS.join(", "),
        calibration_table(&dataset.calibrations)
    ));
    user.push_str(&format!(
        "3. Time series of {} hourly measurements (columns: {}):\n{}\n\n",
        dataset.series.len(),
        TimeSeriesSample::HEADERS.join(", "),
        series_table(&dataset.series)
    ));

    user.push_str("Pearson correlation coefficients with pH, based on the time series:\n");
    user.push_str(&format!("- Temp and pH: {}\n", correlations.temp));
    user.push_str(&format!("- Tr1 and pH: {}\n", correlations.tr1));
    user.push_str(&format!("- Tr2 and pH: {}\n", correlations.tr2));
    user.push_str(&format!("- Tr3 and pH: {}\n\n", correlations.tr3));

    user.push_str("Analyst decision:\n");
    user.push_str(&format!(
        "- Last {} {} values: {} (LowAlarm {}), {}\n",
        diagnosis.trailing_ph.len(),
        diagnosis.measure,
        join_values(&diagnosis.trailing_ph),
        diagnosis.low_alarm,
        if diagnosis.ph_below_alarm {
            "all below the low alarm"
        } else {
            "not all below the low alarm"
        }
    ));
    user.push_str(&format!(
        "- Temp and pH correlation: {} (threshold {})\n",
        diagnosis.temp_correlation, diagnosis.correlation_threshold
    ));
    user.push_str(&format!(
        "- Calibration status: {}\n",
        diagnosis.calibration_status
    ));
    user.push_str(&format!("- Subject: {}\n", diagnosis.subject()));
    user.push_str(&format!(
        "- Root cause analysis: {}\n",
        diagnosis.root_cause.statement()
    ));
    user.push_str(&format!(
        "- Suggested treatment: {} with correlation coefficient {}\n",
        diagnosis.treatment, diagnosis.treatment_correlation
    ));

    ReportPrompt::new(system, user)
}

/// Tool-calling conversation: the model fetches the data itself.
pub fn build_tools_prompt(paths: &DataPaths, settings: &AnalysisSettings) -> ReportPrompt {
    let system = "You are a friendly assistant who likes to follow the rules. You complete the required \
                  steps in order, using the provided functions to obtain data. You never invent values: \
                  every number in your answer comes from a function result."
        .to_string();

    let user = format!(
        "1. Use function read_sensor_config to read {config}. It has four columns: ID, Measure, LowAlarm, UpperAlarm.\n\
         2. Use function read_sensor_calibration to read {calibration}. It has three columns: ID, Measure, Status.\n\
         3. Use function read_time_series_data to read {series}. It has six columns: Time, Temp, Tr1, Tr2, Tr3, pH, \
         one row per hourly measurement, and also returns the correlation coefficients between pH and Temp, Tr1, Tr2 and Tr3.\n\
         4. Once all the data is collected, call evaluate_diagnosis. It applies the rule: if the last {trailing} {measure} values \
         are lower than LowAlarm, {measure} is highly correlated to Temp (correlation coefficient greater than {threshold}) and the \
         calibration status is Normal, the subject is 'pH Low ROA: Low Temperature'; otherwise it is \
         'pH Low ROA: Unknown'. Use its subject, root_cause_statement, treatment and treatment_correlation exactly.\n\
         5. Generate the HTML report.\n\n\
         {requirements}",
        config = paths.sensor_config_path().display(),
        calibration = paths.sensor_calibration_path().display(),
        series = paths.time_series_path().display(),
        trailing = settings.trailing_samples,
        measure = settings.measure,
        threshold = settings.correlation_threshold,
        requirements = html_requirements()
    );

    ReportPrompt::new(system, user)
}
