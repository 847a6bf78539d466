//! Prompt templates for report generation

mod report;

pub use report::{REPORT_TEMPLATE_NAME, report_template};
