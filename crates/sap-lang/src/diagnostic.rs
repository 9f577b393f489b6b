use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
        }
    }
}

/// The rule system that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticSource {
    Type,
    W3c,
    Sdtm,
    Adam,
    Core,
    Version,
    Semantic,
}

impl DiagnosticSource {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticSource::Type => "Type",
            DiagnosticSource::W3c => "W3C",
            DiagnosticSource::Sdtm => "SDTM",
            DiagnosticSource::Adam => "ADaM",
            DiagnosticSource::Core => "CORE",
            DiagnosticSource::Version => "Version",
            DiagnosticSource::Semantic => "Semantic",
        }
    }
}

impl fmt::Display for DiagnosticSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single finding. Immutable once built; the `with_*` methods consume
/// and return the value while it is being constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub source: DiagnosticSource,
    pub code: Option<String>,
    pub message: String,
    /// Name of the top-level definition the finding belongs to.
    pub element: Option<String>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self {
            severity,
            source,
            code: None,
            message: message.into(),
            element: None,
            suggestion: None,
        }
    }

    pub fn error(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, source, message)
    }

    pub fn warning(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, source, message)
    }

    pub fn hint(source: DiagnosticSource, message: impl Into<String>) -> Self {
        Self::new(Severity::Hint, source, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    /// Sets the element only if none has been recorded yet.
    pub fn in_element(mut self, element: &str) -> Self {
        if self.element.is_none() {
            self.element = Some(element.to_string());
        }
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_source(mut self, source: DiagnosticSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity.label(), self.source)?;
        if let Some(code) = &self.code {
            write!(f, "[{}]", code)?;
        }
        match &self.element {
            Some(e) => write!(f, ": `{}`: {}", e, self.message)?,
            None => write!(f, ": {}", self.message)?,
        }
        if let Some(s) = &self.suggestion {
            write!(f, " ({})", s)?;
        }
        Ok(())
    }
}
