use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::symbols::SymbolTable;
use crate::types::{CubeType, Type};

use super::TypeChecker;

/// A where clause is checked in the context of its source cube and must
/// evaluate to `Flag`.
pub fn check_where_clause(expr: &Expr, ctx: &CubeType, table: &SymbolTable) -> Vec<Diagnostic> {
    let result = TypeChecker::new(table).check(expr, Some(ctx));
    let mut diags = result.diagnostics;
    if !result.ty.is_permissive() && result.ty != Type::Flag {
        diags.push(
            Diagnostic::error(
                DiagnosticSource::Type,
                format!("where clause must evaluate to Flag, but found {}", result.ty),
            )
            .with_code("where-not-flag"),
        );
    }
    diags
}
