use std::collections::BTreeSet;

use crate::ast::SliceDef;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::symbols::SymbolTable;
use crate::types::ComponentRole;

use super::{
    Input, check_where_clause, input_cycle, not_a_cube, resolve_input, role_mismatch, tagged,
    undefined_component, undefined_reference,
};

pub fn validate_slice(slice: &SliceDef, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    let cube = match resolve_input(table, &slice.source) {
        Input::Cube(cube) => cube,
        Input::Missing => {
            diags.push(undefined_reference("Slice source", &slice.source, table));
            return tagged(diags, &slice.name);
        }
        Input::NotCube(kind) => {
            diags.push(not_a_cube("Slice source", &slice.source, kind));
            return tagged(diags, &slice.name);
        }
        Input::Unresolved => {
            diags.extend(input_cycle(&slice.name, table));
            return tagged(diags, &slice.name);
        }
    };

    for fixed in &slice.fix {
        match cube.role_of(&fixed.dimension) {
            Some((ComponentRole::Dimension | ComponentRole::Attribute, _)) => {}
            Some((role, _)) => diags.push(role_mismatch(format!(
                "Fixed dimension '{}' must be a dimension or attribute of '{}', but it is {}",
                fixed.dimension, cube.name, role.with_article()
            ))),
            None => diags.push(undefined_component("Fixed dimension", &fixed.dimension, cube)),
        }
    }

    for name in &slice.vary {
        match cube.role_of(name) {
            Some((ComponentRole::Dimension, _)) => {}
            Some((ComponentRole::Attribute, _)) => diags.push(role_mismatch(format!(
                "Cannot vary attribute '{}': only dimensions of '{}' can vary",
                name, cube.name
            ))),
            Some((role, _)) => diags.push(role_mismatch(format!(
                "Varying dimension '{}' must be a dimension of '{}', but it is {}",
                name, cube.name, role.with_article()
            ))),
            None => diags.push(undefined_component("Varying dimension", name, cube)),
        }
    }

    for name in &slice.measures {
        match cube.role_of(name) {
            Some((ComponentRole::Measure, _)) => {}
            Some((role, _)) => diags.push(role_mismatch(format!(
                "Measure '{}' must be a measure of '{}', but it is {}",
                name, cube.name, role.with_article()
            ))),
            None => diags.push(undefined_component("Measure", name, cube)),
        }
    }

    let fixed: BTreeSet<&str> = slice.fix.iter().map(|f| f.dimension.as_str()).collect();
    for name in &slice.vary {
        if fixed.contains(name.as_str()) {
            diags.push(
                Diagnostic::warning(
                    DiagnosticSource::Semantic,
                    format!("'{}' appears in both fix and vary clauses", name),
                )
                .with_code("fix-vary-overlap"),
            );
        }
    }

    if let Some(expr) = &slice.where_clause {
        diags.extend(check_where_clause(expr, cube, table));
    }

    tagged(diags, &slice.name)
}
