use crate::ast::DisplayDef;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::symbols::{SymbolKind, SymbolTable};

use super::tagged;

const DISPLAY_SOURCES: &[SymbolKind] = &[
    SymbolKind::Slice,
    SymbolKind::Aggregate,
    SymbolKind::Model,
    SymbolKind::Derive,
    SymbolKind::Cube,
];

pub fn validate_display(display: &DisplayDef, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    // A missing source is reported by the reference checks.
    if let Some(sym) = table.resolve_global(&display.source)
        && !DISPLAY_SOURCES.contains(&sym.kind)
    {
        diags.push(
            Diagnostic::error(
                DiagnosticSource::Semantic,
                format!(
                    "Display source '{}' must be a slice, aggregate, model, derive or cube, but it is {}",
                    display.source,
                    sym.kind.with_article()
                ),
            )
            .with_code("invalid-display-source"),
        );
    }
    tagged(diags, &display.name)
}
