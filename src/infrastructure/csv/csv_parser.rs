// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files into typed records with encoding fallback

use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};

/// Comma-separated parser producing typed rows, with fields trimmed
#[derive(Debug, Clone, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Read a CSV file and deserialize every row, checking that all
    /// `required` headers are present
    pub fn parse_file<T: DeserializeOwned>(&self, path: &Path, required: &[&str]) -> Result<Vec<T>> {
        let content = Self::read_with_encoding_detection(path)?;
        let source = path.display().to_string();
        self.parse_content(&content, required, &source)
    }

    /// Parse CSV content from string
    pub fn parse_content<T: DeserializeOwned>(
        &self,
        content: &str,
        required: &[&str],
        source: &str,
    ) -> Result<Vec<T>> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers of {}: {}", source, e)))?
            .clone();

        for column in required {
            if !headers.iter().any(|h| h == *column) {
                return Err(AppError::ParseError(format!(
                    "Missing column '{}' in {}",
                    column, source
                )));
            }
        }

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize::<T>().enumerate() {
            let row = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse {} row {}: {}", source, index + 1, e))
            })?;
            rows.push(row);
        }

        debug!(source, rows = rows.len(), "Parsed CSV");
        Ok(rows)
    }

    /// Read file as UTF-8, falling back to Windows-1252
    fn read_with_encoding_detection(path: &Path) -> Result<String> {
        let buffer = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(format!("CSV file {}", path.display())),
            _ => AppError::IoError(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        match String::from_utf8(buffer) {
            Ok(mut content) => {
                if content.starts_with('\u{feff}') {
                    content.drain(..'\u{feff}'.len_utf8());
                }
                Ok(content)
            }
            Err(err) => {
                warn!(path = %path.display(), "CSV is not valid UTF-8, decoding as Windows-1252");
                let (decoded, _, _) = WINDOWS_1252.decode(err.as_bytes());
                Ok(decoded.into_owned())
            }
        }
    }
}
