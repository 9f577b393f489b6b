use std::collections::BTreeMap;

use crate::ast::{ConceptDef, Element, Program};
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::suggest::did_you_mean;

/// Primitive type names a concept property may use instead of a concept.
pub const PRIMITIVE_TYPE_NAMES: &[&str] = &[
    "Numeric",
    "Integer",
    "Text",
    "DateTime",
    "Date",
    "Flag",
    "Identifier",
    "CodedValue",
];

/// Concepts of one program, in declaration order, addressable by
/// qualified name. The first declaration of a qualified name wins.
#[derive(Debug)]
pub struct ConceptIndex<'p> {
    concepts: Vec<&'p ConceptDef>,
    by_name: BTreeMap<String, usize>,
}

impl<'p> ConceptIndex<'p> {
    pub fn new(program: &'p Program) -> Self {
        let mut index = ConceptIndex {
            concepts: Vec::new(),
            by_name: BTreeMap::new(),
        };
        for element in &program.elements {
            if let Element::Concept(concept) = element {
                let pos = index.concepts.len();
                index.concepts.push(concept);
                index.by_name.entry(concept.qualified_name()).or_insert(pos);
            }
        }
        index
    }

    pub fn concepts(&self) -> &[&'p ConceptDef] {
        &self.concepts
    }

    pub fn get(&self, qualified: &str) -> Option<&'p ConceptDef> {
        self.by_name.get(qualified).map(|&i| self.concepts[i])
    }

    /// Resolve a concept reference made from inside `from_namespace`:
    /// exact qualified name first, then the same namespace, then any
    /// concept with that bare name.
    pub fn resolve(&self, reference: &str, from_namespace: Option<&str>) -> Option<&'p ConceptDef> {
        if let Some(found) = self.get(reference) {
            return Some(found);
        }
        if let Some(ns) = from_namespace
            && let Some(found) = self.get(&format!("{}.{}", ns, reference))
        {
            return Some(found);
        }
        self.concepts.iter().copied().find(|c| c.name == reference)
    }

    pub fn parent_of(&self, concept: &ConceptDef) -> Option<&'p ConceptDef> {
        let parent = concept.parent.as_deref()?;
        self.resolve(parent, concept.namespace.as_deref())
    }

    /// Ancestors from the direct parent upwards, stopping before any
    /// repeat so cyclic hierarchies terminate.
    pub fn ancestors(&self, concept: &ConceptDef) -> Vec<&'p ConceptDef> {
        let mut seen = vec![concept.qualified_name()];
        let mut out = Vec::new();
        let mut current = self.parent_of(concept);
        while let Some(parent) = current {
            let name = parent.qualified_name();
            if seen.contains(&name) {
                break;
            }
            seen.push(name);
            out.push(parent);
            current = self.parent_of(parent);
        }
        out
    }

    /// Properties inherited by `concept` (its own excluded), accumulated
    /// from the root down; nearer ancestors override farther ones.
    pub fn inherited_properties(&self, concept: &ConceptDef) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        for ancestor in self.ancestors(concept).into_iter().rev() {
            for p in &ancestor.properties {
                props.insert(p.name.clone(), p.ty.clone());
            }
        }
        props
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// One error per concept that can reach itself through `type_of`.
pub(super) fn check_cycles(index: &ConceptIndex<'_>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for concept in index.concepts() {
        let start = concept.qualified_name();
        let mut stack = vec![start.clone()];
        let mut current = index.parent_of(concept);
        while let Some(parent) = current {
            let name = parent.qualified_name();
            if name == start {
                stack.push(name);
                diags.push(
                    Diagnostic::error(
                        DiagnosticSource::Semantic,
                        format!(
                            "Circular concept hierarchy for '{}': {}",
                            start,
                            stack.join(" -> ")
                        ),
                    )
                    .with_code("concept-cycle")
                    .with_element(start.clone()),
                );
                break;
            }
            if stack.contains(&name) {
                break;
            }
            stack.push(name);
            current = index.parent_of(parent);
        }
    }
    diags
}

pub(super) fn check_property_types(index: &ConceptIndex<'_>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for concept in index.concepts() {
        for prop in &concept.properties {
            if PRIMITIVE_TYPE_NAMES.contains(&prop.ty.as_str())
                || index.resolve(&prop.ty, concept.namespace.as_deref()).is_some()
            {
                continue;
            }
            let mut diag = Diagnostic::error(
                DiagnosticSource::Semantic,
                format!(
                    "Property '{}' of concept '{}' has unknown type '{}'",
                    prop.name,
                    concept.qualified_name(),
                    prop.ty
                ),
            )
            .with_code("unknown-property-type")
            .with_element(concept.qualified_name());
            let candidates = index.names().chain(PRIMITIVE_TYPE_NAMES.iter().copied());
            if let Some(hint) = did_you_mean(&prop.ty, candidates) {
                diag = diag.with_suggestion(hint);
            }
            diags.push(diag);
        }
    }
    diags
}

/// Warn when a concept redeclares an inherited property with another type.
pub(super) fn check_inheritance(index: &ConceptIndex<'_>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for concept in index.concepts() {
        let inherited = index.inherited_properties(concept);
        for prop in &concept.properties {
            if let Some(old) = inherited.get(&prop.name)
                && *old != prop.ty
            {
                diags.push(
                    Diagnostic::warning(
                        DiagnosticSource::Semantic,
                        format!(
                            "Property '{}' of concept '{}' redefines inherited type '{}' as '{}'",
                            prop.name,
                            concept.qualified_name(),
                            old,
                            prop.ty
                        ),
                    )
                    .with_code("inheritance-conflict")
                    .with_element(concept.qualified_name()),
                );
            }
        }
    }
    diags
}
