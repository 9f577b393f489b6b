pub mod ast;
mod checker;
pub mod concepts;
mod diagnostic;
#[cfg(test)]
mod fixtures;
pub mod suggest;
pub mod symbols;
pub mod types;

pub use checker::{
    CheckResult, TypeChecker, check_program, check_where_clause, collect_variables,
    compatible_links, validate_aggregate, validate_derive, validate_display, validate_formula,
    validate_model, validate_pipeline, validate_references, validate_slice,
};
pub use checker::pipeline::{DependencyGraph, find_cycle, topological_sort};
pub use concepts::validate_concepts;
pub use diagnostic::{Diagnostic, DiagnosticSource, Severity};
pub use symbols::{Symbol, SymbolKind, SymbolTable};
pub use types::{ComponentRole, CubeType, Type};
