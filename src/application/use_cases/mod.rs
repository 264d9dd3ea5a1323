pub mod analyst;
pub mod data_tools;
pub mod diagnosis;
pub mod pipeline;
pub mod report_prompt;
pub mod report_renderer;
pub mod scientist;
pub mod tool_session;
