//! Language-level validation: the expression type checker plus one
//! validator per program construct.

mod aggregate;
mod derive;
mod display;
mod expr;
mod formula;
mod model;
pub mod pipeline;
mod references;
mod slice;
mod where_clause;

pub use aggregate::validate_aggregate;
pub use derive::validate_derive;
pub use display::validate_display;
pub use expr::{CheckResult, TypeChecker};
pub use formula::{collect_variables, validate_formula};
pub use model::{compatible_links, validate_model};
pub use pipeline::validate_pipeline;
pub use references::validate_references;
pub use slice::validate_slice;
pub use where_clause::check_where_clause;

use tracing::debug;

use crate::ast::{Element, Program};
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::suggest::did_you_mean;
use crate::symbols::{GLOBAL_SCOPE, SymbolKind, SymbolTable};
use crate::types::{CubeType, Type};

/// Run every language-level validator over `program`, in element order.
pub fn check_program(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    // Collisions among concepts alone are reported by the concept validator.
    let concept_clash = |name: &str| {
        program
            .elements
            .iter()
            .filter(|e| e.defined_name().as_deref() == Some(name))
            .all(|e| matches!(e, Element::Concept(_)))
    };
    let mut out: Vec<Diagnostic> = table
        .errors()
        .iter()
        .filter(|err| err.scope == GLOBAL_SCOPE && !concept_clash(&err.name))
        .map(|err| {
            Diagnostic::error(DiagnosticSource::Semantic, err.message.clone())
                .with_code("duplicate-definition")
                .with_element(err.name.clone())
        })
        .collect();

    out.extend(validate_references(program, table));

    for element in &program.elements {
        match element {
            Element::Import(_) | Element::Standards(_) | Element::Cube(_) | Element::Concept(_) => {}
            Element::Slice(s) => out.extend(validate_slice(s, table)),
            Element::Derive(d) => out.extend(validate_derive(d, table)),
            Element::Model(m) => out.extend(validate_model(m, table)),
            Element::Aggregate(a) => out.extend(validate_aggregate(a, table)),
            Element::Display(d) => out.extend(validate_display(d, table)),
            Element::Pipeline(p) => out.extend(validate_pipeline(p, table)),
        }
    }

    debug!(
        domain = "check",
        elements = program.elements.len(),
        diagnostics = out.len(),
        "language checks complete"
    );
    out
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Outcome of resolving a construct's data input.
pub(crate) enum Input<'t> {
    Cube(&'t CubeType),
    /// No global symbol of that name.
    Missing,
    /// Declared, but its type never resolved (dangling or cyclic chain).
    Unresolved,
    /// Declared as something that carries no cube structure.
    NotCube(SymbolKind),
}

pub(crate) fn resolve_input<'t>(table: &'t SymbolTable, name: &str) -> Input<'t> {
    match table.resolve_global(name) {
        None => Input::Missing,
        Some(sym) => match &sym.ty {
            Type::Cube(cube) => Input::Cube(cube),
            Type::Error(_) => Input::Unresolved,
            _ => Input::NotCube(sym.kind),
        },
    }
}

pub(crate) fn undefined_reference(what: &str, name: &str, table: &SymbolTable) -> Diagnostic {
    let diag = Diagnostic::error(
        DiagnosticSource::Semantic,
        format!("{} '{}' is not defined", what, name),
    )
    .with_code("undefined-reference");
    match did_you_mean(name, table.global_names()) {
        Some(hint) => diag.with_suggestion(hint),
        None => diag,
    }
}

pub(crate) fn undefined_component(what: &str, name: &str, cube: &CubeType) -> Diagnostic {
    let diag = Diagnostic::error(
        DiagnosticSource::Semantic,
        format!("{} '{}' is not defined in cube '{}'", what, name, cube.name),
    )
    .with_code("undefined-component");
    match did_you_mean(name, cube.component_names()) {
        Some(hint) => diag.with_suggestion(hint),
        None => diag,
    }
}

pub(crate) fn not_a_cube(what: &str, name: &str, kind: SymbolKind) -> Diagnostic {
    Diagnostic::error(
        DiagnosticSource::Semantic,
        format!(
            "{} '{}' must be a cube, but it is {}",
            what,
            name,
            kind.with_article()
        ),
    )
    .with_code("not-a-cube")
}

pub(crate) fn role_mismatch(message: String) -> Diagnostic {
    Diagnostic::error(DiagnosticSource::Semantic, message).with_code("role-mismatch")
}

/// Cycle diagnostic for a construct whose input chain loops back onto it.
pub(crate) fn input_cycle(name: &str, table: &SymbolTable) -> Option<Diagnostic> {
    let path = table.input_cycle(name)?;
    Some(
        Diagnostic::error(
            DiagnosticSource::Semantic,
            format!("Circular input reference: {}", path.join(" -> ")),
        )
        .with_code("input-cycle"),
    )
}

/// Attach `element` to every diagnostic that has no element yet.
pub(crate) fn tagged(diags: Vec<Diagnostic>, element: &str) -> Vec<Diagnostic> {
    diags.into_iter().map(|d| d.in_element(element)).collect()
}

#[cfg(test)]
mod tests;
