use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostic::{Diagnostic, DiagnosticSource};

use super::ConceptIndex;

/// Namespace of concepts declared without one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// First segments reserved for standards bodies.
pub const RESERVED_PREFIXES: &[&str] = &["CDISC", "USDM", "STATO", "NCI"];

/// The only namespaces allowed under a reserved prefix.
pub const STANDARD_NAMESPACES: &[&str] = &[
    "CDISC.SDTM",
    "CDISC.ADaM",
    "CDISC.CT",
    "USDM",
    "STATO",
    "NCI.EVS",
];

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid segment regex"));

/// Segment syntax and reserved-prefix rules for one namespace.
pub fn check_namespace(namespace: &str) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for segment in namespace.split('.') {
        if !SEGMENT.is_match(segment) {
            diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Invalid namespace '{}': segment '{}' must start with a letter and contain only letters, digits or '_'",
                        namespace, segment
                    ),
                )
                .with_code("invalid-namespace"),
            );
        }
    }

    let prefix = namespace.split('.').next().unwrap_or(namespace);
    if RESERVED_PREFIXES.contains(&prefix) && !STANDARD_NAMESPACES.contains(&namespace) {
        let allowed: Vec<&str> = STANDARD_NAMESPACES
            .iter()
            .copied()
            .filter(|ns| ns.split('.').next() == Some(prefix))
            .collect();
        diags.push(
            Diagnostic::error(
                DiagnosticSource::Semantic,
                format!("Namespace '{}' uses reserved prefix '{}'", namespace, prefix),
            )
            .with_code("reserved-namespace")
            .with_suggestion(format!("Use one of: {}", allowed.join(", "))),
        );
    }

    diags
}

/// Two distinct concepts with one name in one namespace.
pub(super) fn check_collisions(index: &ConceptIndex<'_>) -> Vec<Diagnostic> {
    let mut seen: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut diags = Vec::new();
    for concept in index.concepts() {
        let ns = concept.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
        let count = seen.entry((ns, concept.name.as_str())).or_default();
        *count += 1;
        if *count > 1 {
            diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Concept '{}' is defined more than once in namespace '{}'",
                        concept.name, ns
                    ),
                )
                .with_code("namespace-collision")
                .with_element(concept.qualified_name()),
            );
        }
    }
    diags
}
