//! Renderers for [`ValidationReport`]. Formatting never alters the report.

mod json;
mod markdown;
mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

use sap_config::ReportFormat;

use crate::report::ValidationReport;

pub trait ReportFormatter {
    fn format(&self, report: &ValidationReport) -> anyhow::Result<String>;
}

pub fn formatter_for(format: ReportFormat) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Text => Box::new(TextFormatter),
        ReportFormat::Json => Box::new(JsonFormatter),
        ReportFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// `SDTM 3.4, ADaM 1.2` style listing; `None` when nothing was resolved.
fn standards(report: &ValidationReport) -> Option<String> {
    if report.standards.is_empty() {
        return None;
    }
    let pairs: Vec<String> = report
        .standards
        .iter()
        .map(|(standard, version)| format!("{} {}", standard, version))
        .collect();
    Some(pairs.join(", "))
}

fn timestamp(report: &ValidationReport) -> String {
    report
        .timestamp
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests;
