use std::collections::BTreeSet;

use crate::ast::AggregateDef;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::suggest::did_you_mean;
use crate::symbols::SymbolTable;
use crate::types::{ComponentRole, aggregate_function_names, is_aggregate_function};

use super::{Input, input_cycle, not_a_cube, resolve_input, role_mismatch, tagged, undefined_component};

/// Functions that count rows and take no measure.
const COUNTING: &[&str] = &["count", "n"];

pub fn validate_aggregate(aggregate: &AggregateDef, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    let cube = match resolve_input(table, &aggregate.input) {
        Input::Cube(cube) => cube,
        Input::Missing => return diags,
        Input::NotCube(kind) => {
            diags.push(not_a_cube("Aggregate input", &aggregate.input, kind));
            return tagged(diags, &aggregate.name);
        }
        Input::Unresolved => {
            diags.extend(input_cycle(&aggregate.name, table));
            return tagged(diags, &aggregate.name);
        }
    };

    for name in &aggregate.group_by {
        match cube.role_of(name) {
            Some((ComponentRole::Dimension, _)) => {}
            Some((role, _)) => diags.push(role_mismatch(format!(
                "Group-by variable '{}' must be a dimension of '{}', but it is {}",
                name, cube.name, role.with_article()
            ))),
            None => diags.push(undefined_component("Group-by variable", name, cube)),
        }
    }

    let mut seen = BTreeSet::new();
    for stat in &aggregate.statistics {
        if !seen.insert(stat.name.as_str()) {
            diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Duplicate statistic '{}' in aggregate '{}'",
                        stat.name, aggregate.name
                    ),
                )
                .with_code("duplicate-statistic"),
            );
        }

        if !is_aggregate_function(&stat.function) {
            let mut diag = Diagnostic::error(
                DiagnosticSource::Semantic,
                format!(
                    "Unknown aggregate function '{}' in statistic '{}'",
                    stat.function, stat.name
                ),
            )
            .with_code("unknown-function");
            if let Some(hint) = did_you_mean(&stat.function, aggregate_function_names()) {
                diag = diag.with_suggestion(hint);
            }
            diags.push(diag);
        }

        match &stat.measure {
            None if COUNTING.contains(&stat.function.as_str()) => {}
            None => diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Statistic '{}' requires a measure for '{}'",
                        stat.name, stat.function
                    ),
                )
                .with_code("missing-measure"),
            ),
            Some(measure) => match cube.role_of(measure) {
                Some((ComponentRole::Measure, _)) => {}
                Some((role, _)) => diags.push(role_mismatch(format!(
                    "Statistic '{}' must summarise a measure, but '{}' is {}",
                    stat.name, measure, role.with_article()
                ))),
                None => diags.push(undefined_component("Measure", measure, cube)),
            },
        }
    }

    tagged(diags, &aggregate.name)
}
