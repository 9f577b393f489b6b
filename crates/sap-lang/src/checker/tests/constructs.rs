use crate::ast::{BinOp, Derivation, DisplayDef, Element, Expr, PipelineDef, Statistic};
use crate::checker::{validate_aggregate, validate_derive, validate_display, validate_references};
use crate::fixtures::{advs, aggregate, build, derive, program};
use crate::symbols::SymbolTable;

use super::{assert_has_error, assert_has_warning, assert_no_errors, codes};

// ---------------------------------------------------------------------------
// Derive
// ---------------------------------------------------------------------------

#[test]
fn derivations_see_earlier_derivations() {
    let mut d = derive("ADVS2", "ADVS");
    d.derivations.push(Derivation::new(
        "PCHG",
        Expr::binary(BinOp::Div, Expr::var("CHG"), Expr::var("BASE")),
    ));
    d.derivations.push(Derivation::new(
        "RESP",
        Expr::binary(BinOp::Gt, Expr::var("PCHG"), Expr::num(0.2)),
    ));
    let (_, table) = build(vec![Element::Cube(advs()), Element::Derive(d.clone())]);
    assert!(validate_derive(&d, &table).is_empty());
}

#[test]
fn duplicate_and_shadowing_derivations() {
    let mut d = derive("ADVS2", "ADVS");
    d.derivations.push(Derivation::new("CHG", Expr::num(0.0)));
    d.derivations.push(Derivation::new("X", Expr::num(1.0)));
    d.derivations.push(Derivation::new("X", Expr::num(2.0)));
    let (_, table) = build(vec![Element::Cube(advs()), Element::Derive(d.clone())]);
    let diags = validate_derive(&d, &table);
    assert_has_warning(&diags, "Derivation 'CHG' redefines a component of input 'ADVS'");
    assert_has_error(&diags, "Duplicate derivation 'X'");
}

#[test]
fn derivation_type_errors_are_reported() {
    let mut d = derive("ADVS2", "ADVS");
    d.derivations.push(Derivation::new(
        "BAD",
        Expr::binary(BinOp::Mul, Expr::var("AVISIT"), Expr::num(2.0)),
    ));
    let (_, table) = build(vec![Element::Cube(advs()), Element::Derive(d.clone())]);
    let diags = validate_derive(&d, &table);
    assert_eq!(codes(&diags), vec!["type-mismatch"]);
    assert_eq!(diags[0].element.as_deref(), Some("ADVS2"));
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

#[test]
fn well_formed_aggregate_is_clean() {
    let mut a = aggregate("SUMM", "ADVS", &["TRT01A", "AVISIT"]);
    a.statistics.push(Statistic::new("n", "count", None));
    a.statistics.push(Statistic::new("mean_chg", "mean", Some("CHG")));
    let (_, table) = build(vec![Element::Cube(advs()), Element::Aggregate(a.clone())]);
    assert!(validate_aggregate(&a, &table).is_empty());
}

#[test]
fn aggregate_roles_and_functions() {
    let mut a = aggregate("SUMM", "ADVS", &["AVAL", "AVALU"]);
    a.statistics.push(Statistic::new("m", "meen", Some("CHG")));
    a.statistics.push(Statistic::new("s", "sd", None));
    a.statistics.push(Statistic::new("d", "mean", Some("USUBJID")));
    let (_, table) = build(vec![Element::Cube(advs()), Element::Aggregate(a.clone())]);
    let diags = validate_aggregate(&a, &table);

    assert_has_error(&diags, "Group-by variable 'AVAL' must be a dimension of 'ADVS', but it is a measure");
    assert_has_error(&diags, "but it is an attribute");
    assert_has_error(&diags, "Unknown aggregate function 'meen'");
    assert_has_error(&diags, "Statistic 's' requires a measure for 'sd'");
    assert_has_error(&diags, "must summarise a measure, but 'USUBJID' is a dimension");

    let unknown = diags
        .iter()
        .find(|d| d.code.as_deref() == Some("unknown-function"))
        .expect("unknown function");
    assert_eq!(unknown.suggestion.as_deref(), Some("Did you mean 'mean'?"));
}

// ---------------------------------------------------------------------------
// Display and references
// ---------------------------------------------------------------------------

#[test]
fn display_source_must_be_displayable() {
    let pipeline = PipelineDef {
        name: "MAIN".into(),
        stages: Vec::new(),
    };
    let ok = DisplayDef {
        name: "T1".into(),
        source: "ADVS".into(),
        title: Some("Vital signs".into()),
    };
    let bad = DisplayDef {
        name: "T2".into(),
        source: "MAIN".into(),
        title: None,
    };
    let (_, table) = build(vec![
        Element::Cube(advs()),
        Element::Pipeline(pipeline),
        Element::Display(ok.clone()),
        Element::Display(bad.clone()),
    ]);
    assert_no_errors(&validate_display(&ok, &table));
    let diags = validate_display(&bad, &table);
    assert_eq!(codes(&diags), vec!["invalid-display-source"]);
    assert!(diags[0].message.contains("but it is a pipeline"));
}

#[test]
fn dangling_inputs_are_reported_by_reference_check() {
    let elements = vec![
        Element::Cube(advs()),
        Element::Derive(derive("D", "ADVZ")),
        Element::Aggregate(aggregate("A", "NOPE", &[])),
        Element::Display(DisplayDef {
            name: "T".into(),
            source: "GONE".into(),
            title: None,
        }),
    ];
    let program = program(elements);
    let table = SymbolTable::build(&program);
    let diags = validate_references(&program, &table);

    assert_eq!(diags.len(), 3);
    assert_has_error(&diags, "Derive input 'ADVZ' is not defined");
    assert_has_error(&diags, "Aggregate input 'NOPE' is not defined");
    assert_has_error(&diags, "Display source 'GONE' is not defined");
    assert_eq!(diags[0].suggestion.as_deref(), Some("Did you mean 'ADVS'?"));
    assert_eq!(diags[0].element.as_deref(), Some("D"));

    // The construct validators stay quiet about the same problem.
    if let Element::Derive(d) = &program.elements[1] {
        assert!(validate_derive(d, &table).is_empty());
    }
}
