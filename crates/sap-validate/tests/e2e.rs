use sap_config::SapConfig;
use sap_lang::DiagnosticSource;
use sap_lang::ast::*;
use sap_validate::{Status, ValidationReport, validate_program};

fn num() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Numeric)
}

fn text() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Text)
}

/// ADVS cube shaped like an ADaM BDS dataset.
fn advs() -> CubeDef {
    CubeDef::new("ADVS")
        .dimension("STUDYID", text())
        .dimension("USUBJID", TypeRef::Identifier)
        .dimension("PARAMCD", TypeRef::coded("CDISC.CT.VSTESTCD"))
        .dimension("AVISIT", text())
        .measure("AVAL", num())
        .measure("BASE", num())
        .measure("CHG", num())
        .attribute("PARAM", text())
        .attribute("AVISITN", num())
        .attribute("TRTP", text())
        .attribute("ABLFL", TypeRef::primitive(PrimitiveKind::Flag))
}

fn sysbp_slice() -> SliceDef {
    let mut slice = SliceDef::new("SYSBP", "ADVS");
    slice.fix.push(FixedDimension::new("PARAMCD", Expr::text("SYSBP")));
    slice.vary = vec!["STUDYID".into(), "USUBJID".into(), "AVISIT".into()];
    slice.measures = vec!["CHG".into(), "BASE".into()];
    slice
}

fn ancova(link: LinkFunction) -> ModelDef {
    let mut model = ModelDef::new(
        "ANCOVA",
        "SYSBP",
        Formula::new(Term::var("CHG"), Term::var("BASE")),
    );
    model.family = Some(Family::Gaussian);
    model.link = Some(link);
    model
}

fn clean_program() -> Program {
    Program::new(vec![
        Element::Standards(StandardsDecl {
            entries: vec![
                StandardVersion::new("SDTM", "3.4"),
                StandardVersion::new("ADaM", "1.2"),
            ],
        }),
        Element::Cube(advs()),
        Element::Slice(sysbp_slice()),
        Element::Model(ancova(LinkFunction::Identity)),
    ])
}

fn config(toml: &str) -> SapConfig {
    toml.parse().expect("valid config")
}

const BDS_TARGET: &str = r#"
[[cdisc.targets]]
cube = "ADVS"
standard = "ADaM"
dataset = "BDS"
"#;

fn sources(report: &ValidationReport) -> Vec<DiagnosticSource> {
    report.by_source().into_keys().collect()
}

#[test]
fn conforming_program_passes() {
    let report = validate_program(&clean_program(), &config(BDS_TARGET), "advs.sap");
    assert_eq!(report.issues, vec![], "unexpected issues");
    assert_eq!(report.status, Status::Pass);
    assert_eq!(report.target, "advs.sap");
}

#[test]
fn findings_from_every_rule_system_are_merged() {
    let mut program = clean_program();
    // Incompatible link.
    program.elements[3] = Element::Model(ancova(LinkFunction::Logit));
    // Slice missing AVISIT and STUDYID.
    let mut partial = SliceDef::new("PARTIAL", "ADVS");
    partial.vary = vec!["USUBJID".into(), "PARAMCD".into()];
    program.elements.push(Element::Slice(partial));
    // Undeclared standard.
    program.elements.push(Element::Standards(StandardsDecl {
        entries: vec![StandardVersion::new("SEND", "3.1")],
    }));

    let report = validate_program(&program, &config(BDS_TARGET), "advs.sap");
    assert_eq!(report.status, Status::Fail);
    let found = sources(&report);
    assert!(found.contains(&DiagnosticSource::Type));
    assert!(found.contains(&DiagnosticSource::W3c));
    assert!(found.contains(&DiagnosticSource::Version));

    let family = report
        .issues
        .iter()
        .find(|i| i.code.as_deref() == Some("family-link"))
        .expect("family/link error");
    assert!(family.message.contains("Logit") && family.message.contains("Gaussian"));

    let ic11 = report
        .issues
        .iter()
        .find(|i| i.code.as_deref() == Some("IC-11"))
        .expect("IC-11 error");
    assert!(ic11.message.contains("AVISIT"));
}

#[test]
fn report_records_effective_standards_versions() {
    let program = Program::new(vec![
        Element::Standards(StandardsDecl {
            entries: vec![StandardVersion::new("SDTM", "3.3")],
        }),
        Element::Cube(advs()),
    ]);
    let report = validate_program(&program, &SapConfig::default(), "advs.sap");
    assert_eq!(report.standards["SDTM"], "3.3");
    assert_eq!(report.standards["ADaM"], "1.2");
    assert_eq!(report.standards["CDISC_CT"], "2024-03-29");

    let json = serde_json::to_value(&report).expect("serializable report");
    assert_eq!(json["standards"]["SDTM"], "3.3");
    assert_eq!(json["standards"]["ADaM"], "1.2");
}

#[test]
fn disabled_families_do_not_run() {
    let mut program = clean_program();
    program.elements[3] = Element::Model(ancova(LinkFunction::Logit));
    let mut partial = SliceDef::new("PARTIAL", "ADVS");
    partial.vary = vec!["USUBJID".into()];
    program.elements.push(Element::Slice(partial));

    let cfg = config("[checks]\nlanguage = false\nw3c = false\n");
    let report = validate_program(&program, &cfg, "advs.sap");
    assert_eq!(report.status, Status::Pass);
}

#[test]
fn missing_target_cube_is_reported_with_suggestion() {
    let cfg = config(
        r#"
[[cdisc.targets]]
cube = "ADVSX"
standard = "ADaM"
dataset = "BDS"
"#,
    );
    let report = validate_program(&clean_program(), &cfg, "advs.sap");
    assert_eq!(report.status, Status::Fail);
    let issue = &report.issues[0];
    assert_eq!(issue.code.as_deref(), Some("unknown-target"));
    assert_eq!(issue.source, DiagnosticSource::Adam);
    assert_eq!(issue.suggestion.as_deref(), Some("Did you mean 'ADVS'?"));
}

#[test]
fn structural_gaps_against_target_are_tagged_with_the_cube() {
    let mut program = clean_program();
    let Element::Cube(cube) = &mut program.elements[1] else {
        unreachable!()
    };
    cube.structure.attributes.retain(|c| c.name != "PARAM" && c.name != "TRTP");

    let report = validate_program(&program, &config(BDS_TARGET), "advs.sap");
    assert_eq!(report.status, Status::Fail);
    let required = report
        .issues
        .iter()
        .find(|i| i.code.as_deref() == Some("missing-required"))
        .expect("PARAM is required");
    assert!(required.message.contains("'PARAM'"));
    assert_eq!(required.element.as_deref(), Some("ADVS"));
    assert!(
        report
            .issues
            .iter()
            .any(|i| i.code.as_deref() == Some("missing-expected") && i.message.contains("'TRTP'"))
    );
}

#[test]
fn configured_core_rules_run_against_targets() {
    let cfg = config(&format!(
        r#"{BDS_TARGET}
[[cdisc.core_rules]]
rule = "no_duplicate_key"
id = "CORE-000001"
keys = ["USUBJID", "PARAMCD", "AVISIT", "ASEQ"]

[[cdisc.core_rules]]
rule = "iso8601_date"
id = "CORE-000002"
variables = ["AVISIT"]
"#
    ));
    let report = validate_program(&clean_program(), &cfg, "advs.sap");
    let core: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.source == DiagnosticSource::Core)
        .collect();
    assert_eq!(core.len(), 2);
    assert!(core.iter().all(|i| i.element.as_deref() == Some("ADVS")));
    let codes: Vec<_> = core.iter().filter_map(|i| i.code.as_deref()).collect();
    assert!(codes.contains(&"CORE-000001"));
    assert!(codes.contains(&"CORE-000002"));
}

#[test]
fn issue_cap_comes_from_config() {
    let mut program = clean_program();
    for i in 0..4 {
        program.elements.push(Element::Slice(SliceDef::new(format!("S{i}"), "NOPE")));
    }
    let cfg = config("[report]\nmax_issues = 2\n");
    let report = validate_program(&program, &cfg, "advs.sap");
    assert_eq!(report.issues.len(), 2);
    assert!(report.summary.total > 2);
    assert_eq!(report.summary.truncated, report.summary.total - 2);
}
