//! Validation of the concept hierarchy sublanguage (`type_of` trees).

mod hierarchy;
mod namespace;

pub use hierarchy::{ConceptIndex, PRIMITIVE_TYPE_NAMES};
pub use namespace::{DEFAULT_NAMESPACE, RESERVED_PREFIXES, STANDARD_NAMESPACES, check_namespace};

use tracing::debug;

use crate::ast::Program;
use crate::diagnostic::Diagnostic;

/// Run every concept check over the concepts of `program`.
pub fn validate_concepts(program: &Program) -> Vec<Diagnostic> {
    let index = ConceptIndex::new(program);
    let mut diags = Vec::new();

    diags.extend(namespace::check_collisions(&index));
    for concept in index.concepts() {
        if let Some(ns) = &concept.namespace {
            diags.extend(
                check_namespace(ns)
                    .into_iter()
                    .map(|d| d.in_element(&concept.qualified_name())),
            );
        }
    }
    diags.extend(hierarchy::check_cycles(&index));
    diags.extend(hierarchy::check_property_types(&index));
    diags.extend(hierarchy::check_inheritance(&index));

    debug!(
        domain = "check",
        concepts = index.concepts().len(),
        diagnostics = diags.len(),
        "concept checks complete"
    );
    diags
}
