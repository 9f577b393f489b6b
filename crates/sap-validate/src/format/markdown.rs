use std::fmt::Write as _;

use super::{ReportFormatter, standards, timestamp};
use crate::report::ValidationReport;

/// Documentation-style report: summary table, then one table per source.
pub struct MarkdownFormatter;

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &ValidationReport) -> anyhow::Result<String> {
        let mut out = String::new();
        let s = &report.summary;
        writeln!(out, "# Validation Report: {}", cell(&report.target))?;
        writeln!(out)?;
        writeln!(out, "Generated {} in {} ms.", timestamp(report), report.duration_ms)?;
        writeln!(out)?;
        if let Some(standards) = standards(report) {
            writeln!(out, "Standards: {}.", cell(&standards))?;
            writeln!(out)?;
        }
        writeln!(out, "| Status | Errors | Warnings | Hints |")?;
        writeln!(out, "|---|---|---|---|")?;
        writeln!(
            out,
            "| **{}** | {} | {} | {} |",
            report.status, s.errors, s.warnings, s.hints
        )?;

        for (source, issues) in report.by_source() {
            writeln!(out)?;
            writeln!(out, "## {}", source)?;
            writeln!(out)?;
            writeln!(out, "| Severity | Code | Element | Message | Suggestion |")?;
            writeln!(out, "|---|---|---|---|---|")?;
            for issue in issues {
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    issue.severity.label(),
                    issue.code.as_deref().map(cell).unwrap_or_default(),
                    issue.element.as_deref().map(cell).unwrap_or_default(),
                    cell(&issue.message),
                    issue.suggestion.as_deref().map(cell).unwrap_or_default(),
                )?;
            }
        }

        if s.truncated > 0 {
            writeln!(out)?;
            writeln!(out, "_{} further issues not shown._", s.truncated)?;
        }
        if !report.failed_rules.is_empty() {
            writeln!(out)?;
            writeln!(out, "Skipped rules: {}", report.failed_rules.join(", "))?;
        }
        Ok(out)
    }
}

/// Table cells cannot hold raw pipes or newlines.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
