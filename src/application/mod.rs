pub mod use_cases;

pub use use_cases::analyst::AnalystAgent;
pub use use_cases::pipeline::{Analysis, DiagnosticPipeline, RunMode};
pub use use_cases::scientist::ScientistAgent;
