//! Batch pipeline: orchestration, configuration and reporting.

mod config;
mod orchestrator;
mod report;

pub use config::PipelineConfig;
pub use orchestrator::Pipeline;
pub use report::{report_file_name, write_report, ReportError};
