pub mod analysis_config;
pub mod chat;
pub mod correlation;
pub mod diagnosis;
pub mod error;
pub mod llm_config;
pub mod prompt;
pub mod sensor;
