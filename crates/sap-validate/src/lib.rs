//! Runs every validator over a parsed SAP program and aggregates the
//! findings into one [`ValidationReport`].

#[macro_use]
mod log_macros;

pub mod driver;
pub mod format;
pub mod report;

pub use driver::{build_core_engine, validate_program};
pub use format::{
    JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter, formatter_for,
};
pub use report::{ReportBuilder, Status, Summary, ValidationIssue, ValidationReport};
