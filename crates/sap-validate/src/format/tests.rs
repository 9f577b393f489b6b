use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use sap_config::ReportFormat;
use sap_lang::{Diagnostic, DiagnosticSource};

use super::*;
use crate::report::ReportBuilder;

fn sample() -> ValidationReport {
    let mut b = ReportBuilder::new("advs.sap")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 3, 29, 12, 0, 0).unwrap())
        .with_standards(BTreeMap::from([
            ("ADaM".to_string(), "1.2".to_string()),
            ("SDTM".to_string(), "3.3".to_string()),
        ]))
        .sorted(true);
    b.add(
        Diagnostic::error(DiagnosticSource::Type, "Undefined variable 'AVALX'")
            .with_code("undefined-variable")
            .with_element("ADVS_CHG")
            .with_suggestion("Did you mean 'AVAL'?"),
    );
    b.add(
        Diagnostic::warning(DiagnosticSource::W3c, "Slice 'S' groups by a | b")
            .with_code("IC-12"),
    );
    b.build()
}

#[test]
fn text_lists_issues_with_help() {
    let out = TextFormatter.format(&sample()).unwrap();
    assert!(out.starts_with("SAP validation report: advs.sap\n"));
    assert!(out.contains("status: fail (1 error, 1 warning, 0 hints)"));
    assert!(out.contains("checked: 2024-03-29T12:00:00Z in 0 ms"));
    assert!(out.contains("standards: ADaM 1.2, SDTM 3.3\n"));
    assert!(out.contains(
        "error[undefined-variable] Type: Undefined variable 'AVALX' (in ADVS_CHG)\n  = help: Did you mean 'AVAL'?"
    ));
    assert!(out.contains("warning[IC-12] W3C:"));
}

#[test]
fn json_is_machine_readable() {
    let out = JsonFormatter.format(&sample()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["status"], "fail");
    assert_eq!(value["summary"]["errors"], 1);
    assert_eq!(value["issues"][0]["severity"], "error");
    assert_eq!(value["issues"][0]["code"], "undefined-variable");
    assert!(value["issues"][1].get("element").is_none());
    assert!(value.get("failed_rules").is_none());
    assert_eq!(value["standards"]["SDTM"], "3.3");
    assert_eq!(value["summary"]["by_source"]["Type"], 1);
    assert_eq!(value["summary"]["by_source"]["W3c"], 1);
}

#[test]
fn markdown_groups_by_source_and_escapes_pipes() {
    let out = MarkdownFormatter.format(&sample()).unwrap();
    assert!(out.starts_with("# Validation Report: advs.sap\n"));
    assert!(out.contains("| **fail** | 1 | 1 | 0 |"));
    assert!(out.contains("Standards: ADaM 1.2, SDTM 3.3."));
    assert!(out.contains("## Type\n"));
    assert!(out.contains("## W3C\n"));
    assert!(out.contains("groups by a \\| b"));
}

#[test]
fn formatting_is_idempotent() {
    let report = sample();
    for format in [ReportFormat::Text, ReportFormat::Json, ReportFormat::Markdown] {
        let f = formatter_for(format);
        assert_eq!(f.format(&report).unwrap(), f.format(&report).unwrap());
    }
}

#[test]
fn truncation_and_skipped_rules_are_mentioned() {
    let mut b = ReportBuilder::new("p")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .max_issues(Some(1));
    b.add(Diagnostic::error(DiagnosticSource::Semantic, "one"));
    b.add(Diagnostic::error(DiagnosticSource::Semantic, "two"));
    b.add_run(sap_conform::EngineRun {
        diagnostics: Vec::new(),
        failed: vec!["IC-19".into()],
    });
    let report = b.build();
    let text = TextFormatter.format(&report).unwrap();
    assert!(text.contains("... 1 more issue not shown"));
    assert!(text.contains("skipped rules: IC-19"));
    assert!(!text.contains("standards:"));
    let md = MarkdownFormatter.format(&report).unwrap();
    assert!(md.contains("_1 further issues not shown._"));
}
