mod constructs;
mod pipeline;
mod program;

use crate::diagnostic::{Diagnostic, Severity};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn errors(diags: &[Diagnostic]) -> Vec<&Diagnostic> {
    diags.iter().filter(|d| d.severity == Severity::Error).collect()
}

fn warnings(diags: &[Diagnostic]) -> Vec<&Diagnostic> {
    diags.iter().filter(|d| d.severity == Severity::Warning).collect()
}

/// Assert that at least one error message contains `needle`.
fn assert_has_error(diags: &[Diagnostic], needle: &str) {
    assert!(
        errors(diags).iter().any(|d| d.message.contains(needle)),
        "expected an error containing {needle:?}, got: {:#?}",
        diags
    );
}

fn assert_has_warning(diags: &[Diagnostic], needle: &str) {
    assert!(
        warnings(diags).iter().any(|d| d.message.contains(needle)),
        "expected a warning containing {needle:?}, got: {:#?}",
        diags
    );
}

fn assert_no_errors(diags: &[Diagnostic]) {
    let errs = errors(diags);
    assert!(errs.is_empty(), "expected no errors, got: {:#?}", errs);
}

fn codes(diags: &[Diagnostic]) -> Vec<&str> {
    diags.iter().filter_map(|d| d.code.as_deref()).collect()
}
