use std::fmt::Write as _;

use super::{ReportFormatter, plural, standards, timestamp};
use crate::report::{ValidationIssue, ValidationReport};

/// Terminal output, compiler style.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &ValidationReport) -> anyhow::Result<String> {
        let mut out = String::new();
        let s = &report.summary;
        writeln!(out, "SAP validation report: {}", report.target)?;
        writeln!(
            out,
            "status: {} ({}, {}, {})",
            report.status,
            plural(s.errors, "error"),
            plural(s.warnings, "warning"),
            plural(s.hints, "hint"),
        )?;
        writeln!(out, "checked: {} in {} ms", timestamp(report), report.duration_ms)?;
        if let Some(standards) = standards(report) {
            writeln!(out, "standards: {}", standards)?;
        }

        if !report.issues.is_empty() {
            writeln!(out)?;
        }
        for issue in &report.issues {
            write_issue(&mut out, issue)?;
        }
        if s.truncated > 0 {
            writeln!(out, "... {} not shown", plural(s.truncated, "more issue"))?;
        }
        if !report.failed_rules.is_empty() {
            writeln!(out, "skipped rules: {}", report.failed_rules.join(", "))?;
        }
        Ok(out)
    }
}

fn write_issue(out: &mut String, issue: &ValidationIssue) -> std::fmt::Result {
    write!(out, "{}", issue.severity.label())?;
    if let Some(code) = &issue.code {
        write!(out, "[{}]", code)?;
    }
    write!(out, " {}: {}", issue.source, issue.message)?;
    if let Some(element) = &issue.element {
        write!(out, " (in {})", element)?;
    }
    writeln!(out)?;
    if let Some(suggestion) = &issue.suggestion {
        writeln!(out, "  = help: {}", suggestion)?;
    }
    Ok(())
}
