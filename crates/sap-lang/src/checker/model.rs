use crate::ast::{Family, LinkFunction, ModelDef};
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::symbols::SymbolTable;
use crate::types::ComponentRole;

use super::{
    Input, not_a_cube, resolve_input, role_mismatch, tagged, undefined_component,
    undefined_reference, validate_formula,
};

/// Link functions allowed per distribution family.
const FAMILY_LINKS: &[(Family, &[LinkFunction])] = &[
    (
        Family::Gaussian,
        &[LinkFunction::Identity, LinkFunction::Log, LinkFunction::Inverse],
    ),
    (
        Family::Binomial,
        &[LinkFunction::Logit, LinkFunction::Probit, LinkFunction::Log],
    ),
    (
        Family::Poisson,
        &[LinkFunction::Log, LinkFunction::Identity, LinkFunction::Sqrt],
    ),
    (
        Family::Gamma,
        &[LinkFunction::Inverse, LinkFunction::Identity, LinkFunction::Log],
    ),
    (
        Family::InverseGaussian,
        &[LinkFunction::Inverse, LinkFunction::Identity, LinkFunction::Log],
    ),
];

pub fn compatible_links(family: Family) -> &'static [LinkFunction] {
    FAMILY_LINKS
        .iter()
        .find(|(f, _)| *f == family)
        .map(|(_, links)| *links)
        .unwrap_or(&[])
}

pub fn validate_model(model: &ModelDef, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    if let (Some(family), Some(link)) = (model.family, model.link) {
        let allowed = compatible_links(family);
        if !allowed.contains(&link) {
            let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Link function '{}' is not compatible with family '{}'. Compatible links: {}",
                        link,
                        family,
                        names.join(", ")
                    ),
                )
                .with_code("family-link"),
            );
        }
    }

    let cube = match resolve_input(table, &model.input) {
        Input::Cube(cube) => cube,
        Input::Missing => {
            diags.push(undefined_reference("Model input", &model.input, table));
            return tagged(diags, &model.name);
        }
        Input::NotCube(kind) => {
            diags.push(not_a_cube("Model input", &model.input, kind));
            return tagged(diags, &model.name);
        }
        Input::Unresolved => return tagged(diags, &model.name),
    };

    diags.extend(validate_formula(&model.formula, cube));

    if let Some(random) = &model.random_effects {
        match cube.role_of(&random.subject) {
            Some((ComponentRole::Dimension, _)) => {}
            Some((role, _)) => diags.push(role_mismatch(format!(
                "Random effects subject '{}' must be a dimension in cube '{}', but it is {}",
                random.subject, cube.name, role.with_article()
            ))),
            None => diags.push(undefined_component(
                "Random effects subject",
                &random.subject,
                cube,
            )),
        }
    }

    tagged(diags, &model.name)
}
