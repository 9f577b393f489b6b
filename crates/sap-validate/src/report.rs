use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sap_conform::EngineRun;
use sap_lang::{Diagnostic, DiagnosticSource, Severity};
use serde::Serialize;

/// Overall verdict. Consumers key pass/fail off this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pass,
    PassWithWarnings,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::PassWithWarnings => "pass-with-warnings",
            Status::Fail => "fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported finding. `line`/`column` are left empty here and filled by
/// layers that can map `element` back to source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub source: DiagnosticSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl From<Diagnostic> for ValidationIssue {
    fn from(d: Diagnostic) -> Self {
        Self {
            severity: d.severity,
            source: d.source,
            code: d.code,
            message: d.message,
            element: d.element,
            suggestion: d.suggestion,
            line: None,
            column: None,
        }
    }
}

/// Counts are taken before the issue list is capped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub hints: usize,
    /// Issues dropped by the cap.
    pub truncated: usize,
    /// Issue count per rule system.
    pub by_source: BTreeMap<DiagnosticSource, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// What was validated, usually the program file name.
    pub target: String,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    /// Effective version of every known standard, declared or defaulted.
    pub standards: BTreeMap<String, String>,
    pub summary: Summary,
    pub issues: Vec<ValidationIssue>,
    /// Rules that faulted and were skipped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_rules: Vec<String>,
}

impl ValidationReport {
    pub fn is_fail(&self) -> bool {
        self.status == Status::Fail
    }

    /// Listed issues grouped by source category.
    pub fn by_source(&self) -> BTreeMap<DiagnosticSource, Vec<&ValidationIssue>> {
        let mut groups: BTreeMap<DiagnosticSource, Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.source).or_default().push(issue);
        }
        groups
    }

    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Accumulates diagnostics from every validator and produces the report.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    target: String,
    diagnostics: Vec<Diagnostic>,
    failed_rules: Vec<String>,
    standards: BTreeMap<String, String>,
    timestamp: Option<DateTime<Utc>>,
    duration: Duration,
    sort: bool,
    max_issues: Option<usize>,
}

impl ReportBuilder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            diagnostics: Vec::new(),
            failed_rules: Vec::new(),
            standards: BTreeMap::new(),
            timestamp: None,
            duration: Duration::ZERO,
            sort: false,
            max_issues: None,
        }
    }

    /// Fixed timestamp for reproducible output; defaults to build time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_standards(mut self, standards: BTreeMap<String, String>) -> Self {
        self.standards = standards;
        self
    }

    pub fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn max_issues(mut self, cap: Option<usize>) -> Self {
        self.max_issues = cap;
        self
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Merge an engine run, keeping the ids of faulted rules.
    pub fn add_run(&mut self, run: EngineRun) {
        self.diagnostics.extend(run.diagnostics);
        self.failed_rules.extend(run.failed);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn build(self) -> ValidationReport {
        let mut summary = Summary {
            total: self.diagnostics.len(),
            ..Summary::default()
        };
        for d in &self.diagnostics {
            match d.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Hint => summary.hints += 1,
            }
            *summary.by_source.entry(d.source).or_default() += 1;
        }
        let status = if summary.errors > 0 {
            Status::Fail
        } else if summary.warnings > 0 {
            Status::PassWithWarnings
        } else {
            Status::Pass
        };

        let mut issues: Vec<ValidationIssue> =
            self.diagnostics.into_iter().map(ValidationIssue::from).collect();
        if self.sort {
            // Stable: equal keys keep validator order.
            issues.sort_by(|a, b| {
                (a.severity, a.source, &a.code).cmp(&(b.severity, b.source, &b.code))
            });
        }
        if let Some(cap) = self.max_issues
            && issues.len() > cap
        {
            summary.truncated = issues.len() - cap;
            issues.truncate(cap);
        }

        ValidationReport {
            target: self.target,
            status,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            duration_ms: u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
            standards: self.standards,
            summary,
            issues,
            failed_rules: self.failed_rules,
        }
    }
}
