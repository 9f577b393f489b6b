use crate::ast::{Element, PipelineDef, Stage};
use crate::checker::pipeline::{DependencyGraph, find_cycle, topological_sort, validate_pipeline};
use crate::fixtures::{advs, aggregate, build, slice};

use super::{assert_has_error, assert_no_errors, codes};

fn pipeline(stages: Vec<Stage>) -> PipelineDef {
    PipelineDef {
        name: "P".into(),
        stages,
    }
}

#[test]
fn two_stage_cycle_is_found_with_full_path() {
    let p = pipeline(vec![
        Stage::new("S1", "WEEK4", &["S2"]),
        Stage::new("S2", "WEEK4", &["S1"]),
    ]);
    let graph = DependencyGraph::from_pipeline(&p);
    assert_eq!(
        find_cycle(&graph),
        Some(vec!["S1".to_string(), "S2".to_string(), "S1".to_string()])
    );
    assert_eq!(topological_sort(&graph), None);
}

#[test]
fn self_dependency_is_a_cycle() {
    let p = pipeline(vec![Stage::new("S1", "WEEK4", &["S1"])]);
    let graph = DependencyGraph::from_pipeline(&p);
    assert_eq!(find_cycle(&graph), Some(vec!["S1".to_string(), "S1".to_string()]));
}

#[test]
fn topological_order_puts_dependencies_first() {
    let p = pipeline(vec![
        Stage::new("report", "T_VS", &["summary", "fit"]),
        Stage::new("fit", "ANCOVA", &["select"]),
        Stage::new("summary", "SUMM", &["select"]),
        Stage::new("select", "WEEK4", &[]),
    ]);
    let graph = DependencyGraph::from_pipeline(&p);
    assert_eq!(find_cycle(&graph), None);
    assert_eq!(
        topological_sort(&graph),
        Some(vec![
            "select".to_string(),
            "fit".to_string(),
            "summary".to_string(),
            "report".to_string()
        ])
    );
}

#[test]
fn validation_reports_structure_problems() {
    let (_, table) = build(vec![
        Element::Cube(advs()),
        Element::Slice(slice("WEEK4", "ADVS")),
        Element::Aggregate(aggregate("SUMM", "WEEK4", &["TRT01A"])),
    ]);

    let p = pipeline(vec![
        Stage::new("select", "WEEK4", &[]),
        Stage::new("select", "WEEK4", &[]),
        Stage::new("summary", "SUMM", &["selct"]),
        Stage::new("raw", "ADVS", &[]),
        Stage::new("ghost", "NOTHING", &[]),
    ]);
    let diags = validate_pipeline(&p, &table);
    assert_has_error(&diags, "Duplicate stage 'select'");
    assert_has_error(&diags, "depends on undefined stage 'selct'");
    assert_has_error(&diags, "operation 'ADVS' is a cube");
    assert_has_error(&diags, "Stage 'ghost' operation 'NOTHING' is not defined");
    let undefined = diags
        .iter()
        .find(|d| d.code.as_deref() == Some("undefined-stage"))
        .expect("undefined stage");
    assert_eq!(undefined.suggestion.as_deref(), Some("Did you mean 'select'?"));
    assert!(diags.iter().all(|d| d.element.as_deref() == Some("P")));
}

#[test]
fn cyclic_pipeline_is_reported_once() {
    let (_, table) = build(vec![
        Element::Cube(advs()),
        Element::Slice(slice("WEEK4", "ADVS")),
    ]);
    let p = pipeline(vec![
        Stage::new("S1", "WEEK4", &["S2"]),
        Stage::new("S2", "WEEK4", &["S1"]),
    ]);
    let diags = validate_pipeline(&p, &table);
    assert_eq!(codes(&diags), vec!["pipeline-cycle"]);
    assert!(diags[0].message.contains("S1 -> S2 -> S1"));
}

#[test]
fn acyclic_pipeline_is_clean() {
    let (_, table) = build(vec![
        Element::Cube(advs()),
        Element::Slice(slice("WEEK4", "ADVS")),
    ]);
    let p = pipeline(vec![
        Stage::new("a", "WEEK4", &[]),
        Stage::new("b", "WEEK4", &["a"]),
    ]);
    assert_no_errors(&validate_pipeline(&p, &table));
}
