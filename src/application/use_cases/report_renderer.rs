//! Deterministic HTML report, used when no model is involved.

use chrono::{DateTime, Utc};

use crate::domain::correlation::CorrelationSet;
use crate::domain::diagnosis::Diagnosis;
use crate::infrastructure::response::HTML4_DOCTYPE;

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn root_cause_details(diagnosis: &Diagnosis) -> String {
    let readings = diagnosis
        .trailing_ph
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} Last {} {} readings: {} (low alarm {}). Temp and pH correlation: {}. Calibration status: {}.",
        diagnosis.root_cause.statement(),
        diagnosis.trailing_ph.len(),
        diagnosis.measure,
        readings,
        diagnosis.low_alarm,
        diagnosis.temp_correlation,
        diagnosis.calibration_status
    )
}

pub fn render_report(
    diagnosis: &Diagnosis,
    correlations: &CorrelationSet,
    generated_at: DateTime<Utc>,
) -> String {
    let rows = [
        ("Subject", diagnosis.subject().to_string()),
        ("Root cause analysis", root_cause_details(diagnosis)),
        ("Suggested Actions", diagnosis.suggested_action()),
    ];

    let mut html = String::new();
    html.push_str(HTML4_DOCTYPE);
    html.push_str("\n<html>\n<head>\n");
    html.push_str("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(diagnosis.subject())));
    html.push_str("</head>\n<body>\n<table border=\"1\" cellpadding=\"4\">\n");
    for (label, value) in rows.iter() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            label,
            escape_html(value)
        ));
    }
    html.push_str("</table>\n");
    html.push_str(&format!(
        "<p>Correlation with pH: Temp {}, Tr1 {}, Tr2 {}, Tr3 {}.</p>\n",
        correlations.temp, correlations.tr1, correlations.tr2, correlations.tr3
    ));
    html.push_str(&format!(
        "<p>Generated {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</body>\n</html>\n");
    html
}
