use crate::ast::{Formula, Term};
use crate::diagnostic::Diagnostic;
use crate::types::{ComponentRole, CubeType};

use super::{role_mismatch, undefined_component};

/// Check every variable of a Wilkinson formula against `cube`.
///
/// Response variables must be measures. Predictors may be dimensions or
/// measures but never attributes.
pub fn validate_formula(formula: &Formula, cube: &CubeType) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for name in collect_variables(&formula.response) {
        match cube.role_of(&name) {
            Some((ComponentRole::Measure, _)) => {}
            Some((role, _)) => diags.push(role_mismatch(format!(
                "Response variable '{}' must be a measure in cube '{}', but it is {}",
                name, cube.name, role.with_article()
            ))),
            None => diags.push(undefined_component("Response variable", &name, cube)),
        }
    }

    for name in collect_variables(&formula.predictors) {
        match cube.role_of(&name) {
            Some((ComponentRole::Attribute, _)) => diags.push(role_mismatch(format!(
                "Predictor variable '{}' cannot be an attribute of cube '{}'; attributes never appear in a statistical formula",
                name, cube.name
            ))),
            Some(_) => {}
            None => diags.push(undefined_component("Predictor variable", &name, cube)),
        }
    }

    diags
}

/// Variable names referenced by `term`, first occurrence order, no repeats.
pub fn collect_variables(term: &Term) -> Vec<String> {
    let mut out = Vec::new();
    walk(term, &mut out);
    out
}

fn walk(term: &Term, out: &mut Vec<String>) {
    match term {
        Term::Var(name) => {
            if !out.iter().any(|n| n == name) {
                out.push(name.clone());
            }
        }
        Term::Intercept(_) => {}
        Term::Add(l, r)
        | Term::Remove(l, r)
        | Term::Interaction(l, r)
        | Term::Crossing(l, r)
        | Term::Nesting(l, r) => {
            walk(l, out);
            walk(r, out);
        }
        Term::Power(inner, _) => walk(inner, out),
        Term::Call { args, .. } => {
            for arg in args {
                walk(arg, out);
            }
        }
        Term::Condition { term, group } => {
            walk(term, out);
            walk(group, out);
        }
    }
}
