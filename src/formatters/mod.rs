pub mod json;
pub mod report;

pub use json::JsonFormatter;
pub use report::ReportFormatter;
