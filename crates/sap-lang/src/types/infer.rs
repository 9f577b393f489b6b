use crate::ast::{BinOp, Expr, UnaryOp};

use super::Type;
use super::functions::{FunctionRule, function_rule};

/// Type of a literal expression; `None` when `expr` is not a literal.
pub fn infer_literal(expr: &Expr) -> Option<Type> {
    match expr {
        Expr::Number(n) => {
            if n.fract() == 0.0 && n.is_finite() {
                Some(Type::Integer)
            } else {
                Some(Type::numeric())
            }
        }
        Expr::Text(_) => Some(Type::Text),
        Expr::Bool(_) => Some(Type::Flag),
        _ => None,
    }
}

/// Result type of `left op right`. Error operands propagate unchanged.
pub fn infer_binary(op: BinOp, left: &Type, right: &Type) -> Type {
    if left.is_error() {
        return left.clone();
    }
    if right.is_error() {
        return right.clone();
    }
    if op.is_logical() {
        infer_logical(op, left, right)
    } else if op.is_comparison() {
        infer_comparison(op, left, right)
    } else {
        infer_arithmetic(op, left, right)
    }
}

fn infer_logical(op: BinOp, left: &Type, right: &Type) -> Type {
    let ok = |t: &Type| matches!(t, Type::Flag | Type::Unknown);
    if ok(left) && ok(right) {
        Type::Flag
    } else {
        Type::error(format!(
            "Logical operator '{}' requires Flag operands, found {} and {}",
            op.symbol(),
            left,
            right
        ))
    }
}

fn infer_arithmetic(op: BinOp, left: &Type, right: &Type) -> Type {
    let numeric_or_unknown = |t: &Type| t.is_numeric() || t.is_unknown();
    if !numeric_or_unknown(left) || !numeric_or_unknown(right) {
        return Type::error(format!(
            "Arithmetic operator '{}' requires numeric operands, found {} and {}",
            op.symbol(),
            left,
            right
        ));
    }
    if left.is_unknown() || right.is_unknown() {
        return Type::Unknown;
    }
    if let Some(err) = unit_mismatch(op, left, right) {
        return err;
    }
    match (left, right) {
        (Type::Integer, Type::Integer)
            if matches!(op, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Mod) =>
        {
            Type::Integer
        }
        _ => Type::Numeric {
            unit: left.unit().or(right.unit()).map(String::from),
        },
    }
}

fn infer_comparison(op: BinOp, left: &Type, right: &Type) -> Type {
    if left.is_unknown() || right.is_unknown() {
        return Type::Flag;
    }
    let textual = |t: &Type| matches!(t, Type::Text | Type::Identifier | Type::CodedValue { .. });
    let comparable = if left.is_numeric() && right.is_numeric() {
        if let Some(err) = unit_mismatch(op, left, right) {
            return err;
        }
        true
    } else if left.is_temporal() && right.is_temporal() {
        true
    } else if textual(left) && textual(right) {
        true
    } else {
        *left == Type::Flag && *right == Type::Flag && matches!(op, BinOp::Eq | BinOp::Ne)
    };
    if comparable {
        Type::Flag
    } else {
        Type::error(format!(
            "Cannot compare {} with {} using '{}'",
            left,
            right,
            op.symbol()
        ))
    }
}

/// Two `Numeric` operands must carry the same unit, where unitless is its
/// own unit. `Integer` is a bare scalar and combines with any unit.
fn unit_mismatch(op: BinOp, left: &Type, right: &Type) -> Option<Type> {
    let (Type::Numeric { unit: a }, Type::Numeric { unit: b }) = (left, right) else {
        return None;
    };
    if a == b {
        return None;
    }
    let show = |u: &Option<String>| u.clone().unwrap_or_else(|| "unitless".to_string());
    Some(Type::error(format!(
        "Incompatible units in '{}': '{}' and '{}'",
        op.symbol(),
        show(a),
        show(b)
    )))
}

/// Result type of `op operand`.
pub fn infer_unary(op: UnaryOp, operand: &Type) -> Type {
    if operand.is_error() {
        return operand.clone();
    }
    match op {
        UnaryOp::Neg => {
            if operand.is_numeric() || operand.is_unknown() {
                operand.clone()
            } else {
                Type::error(format!("Negation requires a numeric operand, found {}", operand))
            }
        }
        UnaryOp::Not => {
            if matches!(operand, Type::Flag | Type::Unknown) {
                Type::Flag
            } else {
                Type::error(format!("'not' requires a Flag operand, found {}", operand))
            }
        }
    }
}

/// Result type of `name(args...)`. Unknown functions yield `Unknown`.
pub fn infer_function_call(name: &str, args: &[Type]) -> Type {
    if let Some(err) = args.iter().find(|t| t.is_error()) {
        return err.clone();
    }
    match function_rule(name) {
        Some(FunctionRule::Numeric) => Type::numeric(),
        Some(FunctionRule::Integer) => Type::Integer,
        Some(FunctionRule::FirstArg) => args.first().cloned().unwrap_or(Type::Unknown),
        None => Type::Unknown,
    }
}
