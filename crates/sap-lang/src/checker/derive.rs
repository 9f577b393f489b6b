use std::collections::BTreeSet;

use crate::ast::DeriveDef;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::symbols::SymbolTable;
use crate::types::ComponentRole;

use super::{Input, TypeChecker, input_cycle, not_a_cube, resolve_input, tagged};

/// Each derivation is checked against the input cube extended with the
/// derivations declared before it.
pub fn validate_derive(derive: &DeriveDef, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    let input = match resolve_input(table, &derive.input) {
        Input::Cube(cube) => cube,
        // Reported by the reference checks.
        Input::Missing => return diags,
        Input::NotCube(kind) => {
            diags.push(not_a_cube("Derive input", &derive.input, kind));
            return tagged(diags, &derive.name);
        }
        Input::Unresolved => {
            diags.extend(input_cycle(&derive.name, table));
            return tagged(diags, &derive.name);
        }
    };

    let checker = TypeChecker::new(table);
    let mut ctx = input.clone();
    let mut seen = BTreeSet::new();
    for derivation in &derive.derivations {
        if !seen.insert(derivation.name.as_str()) {
            diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Duplicate derivation '{}' in derive '{}'",
                        derivation.name, derive.name
                    ),
                )
                .with_code("duplicate-derivation"),
            );
            continue;
        }
        if input.has_component(&derivation.name) {
            diags.push(
                Diagnostic::warning(
                    DiagnosticSource::Semantic,
                    format!(
                        "Derivation '{}' redefines a component of input '{}'",
                        derivation.name, derive.input
                    ),
                )
                .with_code("shadowed-component"),
            );
        }
        let ty = checker.check_into(&derivation.expr, Some(&ctx), &mut diags);
        ctx.insert(ComponentRole::Measure, derivation.name.clone(), ty);
    }

    tagged(diags, &derive.name)
}
