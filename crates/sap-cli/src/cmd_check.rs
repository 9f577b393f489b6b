use std::path::Path;

use anyhow::Result;
use sap_config::{ReportFormat, SapConfig};
use sap_validate::{ValidationReport, formatter_for, validate_program};

use crate::load::load_program;

/// Validate `file` and render the report in the configured format.
pub fn check(file: &Path, config: &SapConfig) -> Result<(ValidationReport, String)> {
    let program = load_program(file)?;
    let target = file.display().to_string();
    let report = validate_program(&program, config, &target);
    let rendered = formatter_for(config.report.format).format(&report)?;
    Ok((report, rendered))
}

/// Entry point for `sapc check`. Command-line flags override the file config.
/// Returns whether the report passed.
pub fn run(
    file: &Path,
    mut config: SapConfig,
    format: Option<ReportFormat>,
    max_issues: Option<usize>,
) -> Result<bool> {
    if let Some(format) = format {
        config.report.format = format;
    }
    if max_issues.is_some() {
        config.report.max_issues = max_issues;
    }
    let (report, rendered) = check(file, &config)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(!report.is_fail())
}
