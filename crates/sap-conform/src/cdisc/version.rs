use std::collections::BTreeMap;

use sap_lang::ast::Program;
use sap_lang::suggest::did_you_mean;
use sap_lang::{Diagnostic, DiagnosticSource};
use tracing::debug;

/// Versions assumed when a program does not declare one.
pub const DEFAULT_VERSIONS: &[(&str, &str)] = &[
    ("SDTM", "3.4"),
    ("ADaM", "1.2"),
    ("CDISC_CT", "2024-03-29"),
    ("W3C_Cube", "2014-01-16"),
];

pub const KNOWN_STANDARDS: &[&str] = &["SDTM", "ADaM", "CDISC_CT", "W3C_Cube"];

pub const SUPPORTED_VERSIONS: &[(&str, &[&str])] = &[
    ("SDTM", &["3.2", "3.3", "3.4"]),
    ("ADaM", &["1.1", "1.2", "1.3"]),
    ("CDISC_CT", &["2023-12-15", "2024-03-29", "2024-09-27"]),
    ("W3C_Cube", &["2014-01-16"]),
];

/// Known-good (SDTM, ADaM) version pairs.
pub const COMPATIBLE_VERSIONS: &[(&str, &str)] = &[
    ("3.2", "1.1"),
    ("3.3", "1.1"),
    ("3.3", "1.2"),
    ("3.4", "1.2"),
    ("3.4", "1.3"),
];

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Standards versions in effect for one program: explicit declarations
/// layered over [`DEFAULT_VERSIONS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionManager {
    declared: BTreeMap<String, String>,
}

impl VersionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `standards` declaration of `program`. A standard
    /// declared twice keeps the last version.
    pub fn from_program(program: &Program) -> Self {
        let mut manager = Self::new();
        for decl in program.standards() {
            for entry in &decl.entries {
                manager.declare(&entry.standard, &entry.version);
            }
        }
        debug!(domain = "conf", declared = manager.declared.len(), "standards versions loaded");
        manager
    }

    pub fn declare(&mut self, standard: &str, version: &str) {
        self.declared
            .insert(standard.to_string(), version.to_string());
    }

    /// Explicitly declared version.
    pub fn version(&self, standard: &str) -> Option<&str> {
        self.declared.get(standard).map(String::as_str)
    }

    /// Declared version, else the default.
    pub fn effective(&self, standard: &str) -> Option<&str> {
        self.version(standard)
            .or_else(|| lookup(DEFAULT_VERSIONS, standard))
    }

    /// Effective version of every known standard.
    pub fn effective_versions(&self) -> BTreeMap<String, String> {
        KNOWN_STANDARDS
            .iter()
            .filter_map(|s| self.effective(s).map(|v| (s.to_string(), v.to_string())))
            .collect()
    }

    pub fn declared(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declared.iter().map(|(s, v)| (s.as_str(), v.as_str()))
    }

    /// Unknown standards are errors; unsupported versions and unproven
    /// SDTM/ADaM pairings are warnings.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diags = Vec::new();
        for (standard, version) in self.declared() {
            let Some(supported) = lookup(SUPPORTED_VERSIONS, standard) else {
                let mut diag = Diagnostic::error(
                    DiagnosticSource::Version,
                    format!(
                        "Unknown standard '{}'. Known standards: {}",
                        standard,
                        KNOWN_STANDARDS.join(", ")
                    ),
                )
                .with_code("unknown-standard");
                if let Some(hint) = did_you_mean(standard, KNOWN_STANDARDS.iter().copied()) {
                    diag = diag.with_suggestion(hint);
                }
                diags.push(diag);
                continue;
            };
            if !supported.contains(&version) {
                diags.push(
                    Diagnostic::warning(
                        DiagnosticSource::Version,
                        format!("{} version '{}' is not supported", standard, version),
                    )
                    .with_code("unsupported-version")
                    .with_suggestion(format!("Supported versions: {}", supported.join(", "))),
                );
            }
        }

        if let (Some(sdtm), Some(adam)) = (self.version("SDTM"), self.version("ADaM"))
            && !COMPATIBLE_VERSIONS.contains(&(sdtm, adam))
        {
            diags.push(
                Diagnostic::warning(
                    DiagnosticSource::Version,
                    format!(
                        "SDTM {} and ADaM {} are not a known compatible combination",
                        sdtm, adam
                    ),
                )
                .with_code("incompatible-versions"),
            );
        }
        diags
    }
}
