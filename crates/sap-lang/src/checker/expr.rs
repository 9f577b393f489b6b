use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::suggest::did_you_mean;
use crate::symbols::SymbolTable;
use crate::types::{CubeType, Type, infer_binary, infer_function_call, infer_literal, infer_unary};

/// Type of an expression together with the diagnostics raised while
/// computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub ty: Type,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Expression type checker over a fully built [`SymbolTable`].
///
/// Bare names resolve against the optional cube context first, then the
/// global scope. An operand that is already `Error` makes its parent
/// `Error` without a new diagnostic, so one root cause is reported once.
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker<'a> {
    table: &'a SymbolTable,
}

impl<'a> TypeChecker<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    pub fn check(&self, expr: &Expr, ctx: Option<&CubeType>) -> CheckResult {
        let mut diagnostics = Vec::new();
        let ty = self.check_into(expr, ctx, &mut diagnostics);
        CheckResult { ty, diagnostics }
    }

    /// Type-check `expr`, emitting diagnostics into `out`.
    pub fn check_into(&self, expr: &Expr, ctx: Option<&CubeType>, out: &mut Vec<Diagnostic>) -> Type {
        match expr {
            Expr::Number(_) | Expr::Text(_) | Expr::Bool(_) => {
                infer_literal(expr).unwrap_or(Type::Unknown)
            }
            Expr::Var(name) => self.lookup(name, ctx, out),
            // Component access is not validated structurally.
            Expr::Member { .. } => Type::Unknown,
            Expr::Unary { op, operand } => {
                let inner = self.check_into(operand, ctx, out);
                if inner.is_error() {
                    return Type::Error(None);
                }
                surface(infer_unary(*op, &inner), out)
            }
            Expr::Binary { op, left, right } => {
                let lt = self.check_into(left, ctx, out);
                let rt = self.check_into(right, ctx, out);
                if lt.is_error() || rt.is_error() {
                    return Type::Error(None);
                }
                surface(infer_binary(*op, &lt, &rt), out)
            }
            Expr::Call { name, args } => {
                let arg_types: Vec<Type> = args
                    .iter()
                    .map(|arg| self.check_into(arg, ctx, out))
                    .collect();
                if arg_types.iter().any(Type::is_error) {
                    return Type::Error(None);
                }
                surface(infer_function_call(name, &arg_types), out)
            }
        }
    }

    fn lookup(&self, name: &str, ctx: Option<&CubeType>, out: &mut Vec<Diagnostic>) -> Type {
        if let Some(ty) = ctx.and_then(|cube| cube.component_type(name)) {
            return ty.clone();
        }
        if let Some(symbol) = self.table.resolve_global(name) {
            // Unresolved globals are reported by the reference checks.
            return match &symbol.ty {
                Type::Error(_) => Type::Error(None),
                ty => ty.clone(),
            };
        }

        let candidates = ctx
            .into_iter()
            .flat_map(|cube| cube.component_names())
            .chain(self.table.global_names());
        let mut diag = Diagnostic::error(
            DiagnosticSource::Type,
            format!("Undefined variable '{}'", name),
        )
        .with_code("undefined-variable");
        if let Some(hint) = did_you_mean(name, candidates) {
            diag = diag.with_suggestion(hint);
        }
        out.push(diag);
        Type::Error(None)
    }
}

/// Turn an inference error into a diagnostic; the returned type no longer
/// carries the message.
fn surface(ty: Type, out: &mut Vec<Diagnostic>) -> Type {
    match ty {
        Type::Error(Some(message)) => {
            out.push(Diagnostic::error(DiagnosticSource::Type, message).with_code("type-mismatch"));
            Type::Error(None)
        }
        other => other,
    }
}
