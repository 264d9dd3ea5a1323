use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    ValidationError(String),
    ParseError(String),
    ConfigError(String),
    AnalysisError(String),
    LLMError(String),
    ReportError(String),
    SecurityError(String),
    IoError(String),
}

impl AppError {
    /// Process exit code for this error category.
    ///
    /// Input-data problems exit with 2, configuration and secrets with 3,
    /// provider and report failures with 4, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotFound(_)
            | AppError::ValidationError(_)
            | AppError::ParseError(_)
            | AppError::IoError(_) => 2,
            AppError::ConfigError(_) | AppError::SecurityError(_) => 3,
            AppError::LLMError(_) | AppError::ReportError(_) => 4,
            AppError::Internal(_) | AppError::AnalysisError(_) => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::AnalysisError(msg) => write!(f, "Analysis error: {}", msg),
            AppError::LLMError(msg) => write!(f, "LLM error: {}", msg),
            AppError::ReportError(msg) => write!(f, "Report error: {}", msg),
            AppError::SecurityError(msg) => write!(f, "Security error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
