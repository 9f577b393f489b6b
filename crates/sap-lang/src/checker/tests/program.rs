use crate::ast::{
    ConceptDef, CubeDef, Element, Family, FixedDimension, Formula, LinkFunction, ModelDef, PipelineDef,
    Stage, Term, Expr,
};
use crate::checker::check_program;
use crate::diagnostic::DiagnosticSource;
use crate::fixtures::{advs, build, chg_cube, ident, slice};

use super::codes;

#[test]
fn clean_program_has_no_diagnostics() {
    let mut week4 = slice("WEEK4", "ADEFF");
    week4.vary = vec!["USUBJID".into(), "TRT01A".into()];
    let mut model = ModelDef::new(
        "ANCOVA",
        "WEEK4",
        Formula::new(
            Term::var("CHG"),
            Term::sum(["TRT01A", "BASE"]).expect("non-empty"),
        ),
    );
    model.family = Some(Family::Gaussian);
    model.link = Some(LinkFunction::Identity);
    let pipeline = PipelineDef {
        name: "MAIN".into(),
        stages: vec![
            Stage::new("select", "WEEK4", &[]),
            Stage::new("fit", "ANCOVA", &["select"]),
        ],
    };
    let (program, table) = build(vec![
        Element::Cube(chg_cube()),
        Element::Slice(week4),
        Element::Model(model),
        Element::Pipeline(pipeline),
    ]);
    assert!(check_program(&program, &table).is_empty());
}

#[test]
fn duplicate_globals_surface_as_semantic_errors() {
    let (program, table) = build(vec![
        Element::Cube(CubeDef::new("DM").dimension("USUBJID", ident())),
        Element::Cube(CubeDef::new("DM").dimension("USUBJID", ident())),
    ]);
    let diags = check_program(&program, &table);
    assert_eq!(codes(&diags), vec!["duplicate-definition"]);
    assert_eq!(diags[0].source, DiagnosticSource::Semantic);
    assert_eq!(diags[0].element.as_deref(), Some("DM"));
}

#[test]
fn concept_sharing_a_name_with_a_cube_is_a_duplicate() {
    for elements in [
        vec![Element::Cube(advs()), Element::Concept(ConceptDef::new("ADVS"))],
        vec![Element::Concept(ConceptDef::new("ADVS")), Element::Cube(advs())],
    ] {
        let (program, table) = build(elements);
        let diags = check_program(&program, &table);
        assert_eq!(codes(&diags), vec!["duplicate-definition"]);
        assert_eq!(diags[0].element.as_deref(), Some("ADVS"));
    }
}

#[test]
fn concept_only_collisions_are_left_to_the_concept_validator() {
    let (program, table) = build(vec![
        Element::Concept(ConceptDef::new("Weight")),
        Element::Concept(ConceptDef::new("Weight")),
    ]);
    assert!(codes(&check_program(&program, &table)).is_empty());
}

#[test]
fn every_construct_is_visited() {
    let mut bad_slice = slice("S", "ADVS");
    bad_slice.fix.push(FixedDimension::new("CHG", Expr::num(0.0)));
    let mut bad_model = ModelDef::new("M", "ADVS", Formula::new(Term::var("AVISIT"), Term::var("TRT01A")));
    bad_model.family = Some(Family::Poisson);
    bad_model.link = Some(LinkFunction::Logit);
    let (program, table) = build(vec![
        Element::Cube(advs()),
        Element::Slice(bad_slice),
        Element::Model(bad_model),
        Element::Pipeline(PipelineDef {
            name: "P".into(),
            stages: vec![Stage::new("x", "S", &["x"])],
        }),
    ]);
    let diags = check_program(&program, &table);
    assert_eq!(
        codes(&diags),
        vec!["role-mismatch", "family-link", "role-mismatch", "pipeline-cycle"]
    );
    let elements: Vec<_> = diags.iter().filter_map(|d| d.element.as_deref()).collect();
    assert_eq!(elements, vec!["S", "M", "M", "P"]);
}
