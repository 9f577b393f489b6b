use super::ReportFormatter;
use crate::report::ValidationReport;

/// Pretty-printed JSON, one object per report.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
