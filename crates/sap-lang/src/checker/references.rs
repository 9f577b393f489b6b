use crate::ast::{Element, Program};
use crate::diagnostic::Diagnostic;
use crate::symbols::SymbolTable;

use super::undefined_reference;

/// Every derive/aggregate input and display source must name a global
/// definition. Slice sources and model inputs are checked by their own
/// validators.
pub fn validate_references(program: &Program, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for element in &program.elements {
        let (owner, what, target) = match element {
            Element::Derive(d) => (&d.name, "Derive input", &d.input),
            Element::Aggregate(a) => (&a.name, "Aggregate input", &a.input),
            Element::Display(d) => (&d.name, "Display source", &d.source),
            _ => continue,
        };
        if table.resolve_global(target).is_none() {
            diags.push(undefined_reference(what, target, table).with_element(owner.clone()));
        }
    }
    diags
}
