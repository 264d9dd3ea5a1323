use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;

use crate::domain::error::{AppError, Result};

pub const HTML4_DOCTYPE: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static FENCED_BLOCK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:[hH][tT][mM][lL])?[ \t]*\r?\n([\s\S]*?)```").unwrap());

static DOCUMENT_START_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!doctype|<html").unwrap());

static DOCUMENT_END_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</html\s*>").unwrap());

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table tr").unwrap());

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());

/// Cleans LLM response by removing reasoning tags and markdown fences
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    // Keep only the fenced block when the model wrapped the document in prose
    if let Some(block) = FENCED_BLOCK_PATTERN
        .captures(&cleaned)
        .and_then(|caps| caps.get(1))
    {
        cleaned = block.as_str().to_string();
    }

    cleaned.trim().to_string()
}

/// A validated HTML diagnostic report
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlReport {
    html: String,
    rows: Vec<(String, String)>,
}

impl HtmlReport {
    /// Validate a model reply: it must contain an `<html>` document with a
    /// table of at least three two-cell rows. Text outside the document is
    /// dropped and a missing DOCTYPE is added.
    pub fn parse(response: &str) -> Result<Self> {
        let cleaned = clean_llm_response(response);

        let start = DOCUMENT_START_PATTERN.find(&cleaned).ok_or_else(|| {
            AppError::ReportError("response does not contain an HTML document".to_string())
        })?;
        let mut document = &cleaned[start.start()..];
        match DOCUMENT_END_PATTERN.find_iter(document).last() {
            Some(end) => document = &document[..end.end()],
            None => warn!("HTML report has no closing </html> tag"),
        }
        if !document.to_ascii_lowercase().contains("<html") {
            return Err(AppError::ReportError(
                "response has a DOCTYPE but no <html> element".to_string(),
            ));
        }

        let parsed = Html::parse_document(document);
        let rows: Vec<(String, String)> = parsed
            .select(&ROW_SELECTOR)
            .filter_map(|row| {
                let cells: Vec<String> = row
                    .select(&CELL_SELECTOR)
                    .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
                    .collect();
                match cells.as_slice() {
                    [label, value, ..] => Some((label.clone(), value.clone())),
                    _ => None,
                }
            })
            .collect();

        if rows.len() < 3 {
            return Err(AppError::ReportError(format!(
                "expected a table with 3 rows of 2 cells, found {}",
                rows.len()
            )));
        }

        let html = if document.trim_start().to_ascii_lowercase().starts_with("<!doctype") {
            document.to_string()
        } else {
            format!("{}\n{}", HTML4_DOCTYPE, document)
        };

        Ok(Self { html, rows })
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Text of the row whose first cell matches `label`, ignoring case.
    pub fn cell(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| v.as_str())
    }

    pub fn subject(&self) -> Option<&str> {
        self.cell("Subject")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "<table>\
        <tr><td>Subject</td><td>pH Low ROA: Low Temperature</td></tr>\
        <tr><td>Root cause analysis</td><td>Low temperature.</td></tr>\
        <tr><td>Suggested Actions</td><td>Increase Tr2 (0.92).</td></tr>\
        </table>";

    fn document() -> String {
        format!("{}\n<html><body>{}</body></html>", HTML4_DOCTYPE, TABLE)
    }

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think />The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_reasoning_tags() {
        let input = "<reasoning>Internal reasoning</reasoning>Final answer";
        assert_eq!(clean_llm_response(input), "Final answer");
    }

    #[test]
    fn test_clean_code_fence() {
        let input = "Here is the report:\n```html\n<html></html>\n```\nLet me know.";
        assert_eq!(clean_llm_response(input), "<html></html>");
    }

    #[test]
    fn test_clean_preserves_normal_text() {
        let input = "This is a normal response without any special tags.";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_parse_valid_report() {
        let report = HtmlReport::parse(&document()).unwrap();
        assert_eq!(report.subject(), Some("pH Low ROA: Low Temperature"));
        assert_eq!(report.cell("suggested actions"), Some("Increase Tr2 (0.92)."));
        assert!(report.as_str().starts_with("<!DOCTYPE HTML PUBLIC"));
    }

    #[test]
    fn test_parse_adds_missing_doctype_and_drops_prose() {
        let input = format!("Sure! <html><body>{}</body></html> Hope this helps.", TABLE);
        let report = HtmlReport::parse(&input).unwrap();
        assert!(report.as_str().starts_with(HTML4_DOCTYPE));
        assert!(report.as_str().ends_with("</html>"));
        assert!(!report.as_str().contains("Hope this helps"));
    }

    #[test]
    fn test_parse_fenced_report() {
        let input = format!("```html\n{}\n```", document());
        assert!(HtmlReport::parse(&input).is_ok());
    }

    #[test]
    fn test_plain_text_is_report_error() {
        let err = HtmlReport::parse("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AppError::ReportError(_)));
    }

    #[test]
    fn test_short_table_is_report_error() {
        let input = "<html><body><table><tr><td>Subject</td><td>x</td></tr></table></body></html>";
        let err = HtmlReport::parse(input).unwrap_err();
        assert!(matches!(err, AppError::ReportError(ref msg) if msg.contains("found 1")));
    }
}
