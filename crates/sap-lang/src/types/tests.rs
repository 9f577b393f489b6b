use super::*;
use crate::ast::{BinOp, Expr, UnaryOp};

// ---------------------------------------------------------------------------
// Assignability
// ---------------------------------------------------------------------------

#[test]
fn numeric_units_must_match_exactly() {
    assert!(Type::numeric_in("kg").is_assignable_to(&Type::numeric_in("kg")));
    assert!(!Type::numeric_in("kg").is_assignable_to(&Type::numeric_in("lb")));
    assert!(!Type::numeric().is_assignable_to(&Type::numeric_in("kg")));
    assert!(!Type::numeric_in("kg").is_assignable_to(&Type::numeric()));
    assert!(Type::numeric().is_assignable_to(&Type::numeric()));
}

#[test]
fn integer_widens_to_unitless_numeric_only() {
    assert!(Type::Integer.is_assignable_to(&Type::numeric()));
    assert!(!Type::Integer.is_assignable_to(&Type::numeric_in("mmHg")));
    assert!(!Type::numeric().is_assignable_to(&Type::Integer));
}

#[test]
fn date_is_a_datetime() {
    assert!(Type::Date.is_assignable_to(&Type::DateTime));
    assert!(!Type::DateTime.is_assignable_to(&Type::Date));
}

#[test]
fn coded_value_constraints_are_one_directional() {
    let sex = Type::coded("CDISC.CT.SEX");
    let race = Type::coded("CDISC.CT.RACE");
    let any = Type::CodedValue { code_list: None };
    assert!(sex.is_assignable_to(&any));
    assert!(!any.is_assignable_to(&sex));
    assert!(!sex.is_assignable_to(&race));
    assert!(!race.is_assignable_to(&sex));
    assert!(sex.is_assignable_to(&sex));
}

#[test]
fn error_and_unknown_are_compatible_both_ways() {
    for t in [Type::Text, Type::numeric_in("kg"), Type::Flag] {
        assert!(Type::Unknown.is_assignable_to(&t));
        assert!(t.is_assignable_to(&Type::Unknown));
        assert!(Type::Error(None).is_assignable_to(&t));
        assert!(t.is_assignable_to(&Type::error("boom")));
    }
}

#[test]
fn cube_assignability_is_nominal() {
    let mut a = CubeType::new("ADVS");
    a.insert(ComponentRole::Dimension, "USUBJID", Type::Identifier);
    let b = CubeType::new("ADVS");
    let c = CubeType::new("ADSL");
    assert!(Type::Cube(a.clone()).is_assignable_to(&Type::Cube(b.clone())));
    assert!(!Type::Cube(a.clone()).is_assignable_to(&Type::Cube(c)));
    // structural equality still distinguishes them
    assert_ne!(Type::Cube(a), Type::Cube(b));
}

#[test]
fn display_renders_parameters() {
    assert_eq!(Type::numeric_in("kg").to_string(), "Numeric(kg)");
    assert_eq!(Type::coded("CDISC.CT.SEX").to_string(), "CodedValue<CDISC.CT.SEX>");
    assert_eq!(Type::Integer.to_string(), "Integer");
}

#[test]
fn role_lookup_prefers_declared_role() {
    let mut cube = CubeType::new("C");
    cube.insert(ComponentRole::Dimension, "A", Type::Identifier);
    cube.insert(ComponentRole::Measure, "M", Type::numeric());
    cube.insert(ComponentRole::Attribute, "X", Type::Text);
    assert_eq!(cube.role_of("A").map(|r| r.0), Some(ComponentRole::Dimension));
    assert_eq!(cube.role_of("M").map(|r| r.0), Some(ComponentRole::Measure));
    assert_eq!(cube.role_of("X").map(|r| r.0), Some(ComponentRole::Attribute));
    assert!(cube.role_of("nope").is_none());
    assert_eq!(cube.component_names().count(), 3);
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

#[test]
fn literals() {
    assert_eq!(infer_literal(&Expr::num(3.0)), Some(Type::Integer));
    assert_eq!(infer_literal(&Expr::num(3.5)), Some(Type::numeric()));
    assert_eq!(infer_literal(&Expr::text("M")), Some(Type::Text));
    assert_eq!(infer_literal(&Expr::Bool(true)), Some(Type::Flag));
    assert_eq!(infer_literal(&Expr::var("X")), None);
}

#[test]
fn integer_arithmetic_stays_integer() {
    assert_eq!(infer_binary(BinOp::Add, &Type::Integer, &Type::Integer), Type::Integer);
    assert_eq!(infer_binary(BinOp::Mul, &Type::Integer, &Type::Integer), Type::Integer);
    assert_eq!(infer_binary(BinOp::Div, &Type::Integer, &Type::Integer), Type::numeric());
    assert_eq!(infer_binary(BinOp::Add, &Type::Integer, &Type::numeric()), Type::numeric());
}

#[test]
fn arithmetic_keeps_unit() {
    let kg = Type::numeric_in("kg");
    assert_eq!(infer_binary(BinOp::Sub, &kg, &kg), kg);
    assert_eq!(infer_binary(BinOp::Mul, &kg, &Type::Integer), kg);
}

#[test]
fn arithmetic_unit_mismatch_is_error() {
    let t = infer_binary(BinOp::Add, &Type::numeric_in("kg"), &Type::numeric_in("lb"));
    match t {
        Type::Error(Some(msg)) => {
            assert!(msg.contains("kg") && msg.contains("lb"), "{msg}");
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn unitless_and_unit_bearing_numerics_do_not_mix() {
    let kg = Type::numeric_in("kg");
    let t = infer_binary(BinOp::Add, &Type::numeric(), &kg);
    match t {
        Type::Error(Some(msg)) => assert!(msg.contains("unitless") && msg.contains("kg"), "{msg}"),
        other => panic!("expected error, got {other:?}"),
    }
    assert!(infer_binary(BinOp::Mul, &kg, &Type::numeric()).is_error());
    assert!(infer_binary(BinOp::Lt, &Type::numeric(), &kg).is_error());
    assert_eq!(infer_binary(BinOp::Lt, &Type::Integer, &kg), Type::Flag);
}

#[test]
fn arithmetic_on_text_is_error() {
    assert!(infer_binary(BinOp::Add, &Type::Text, &Type::Integer).is_error());
}

#[test]
fn comparisons_yield_flag() {
    assert_eq!(infer_binary(BinOp::Lt, &Type::Integer, &Type::numeric()), Type::Flag);
    assert_eq!(infer_binary(BinOp::Eq, &Type::Text, &Type::coded("X")), Type::Flag);
    assert_eq!(infer_binary(BinOp::Ge, &Type::Date, &Type::DateTime), Type::Flag);
    assert!(infer_binary(BinOp::Lt, &Type::Text, &Type::Integer).is_error());
    assert!(infer_binary(BinOp::Lt, &Type::Flag, &Type::Flag).is_error());
    assert_eq!(infer_binary(BinOp::Eq, &Type::Flag, &Type::Flag), Type::Flag);
}

#[test]
fn logical_requires_flags() {
    assert_eq!(infer_binary(BinOp::And, &Type::Flag, &Type::Flag), Type::Flag);
    assert!(infer_binary(BinOp::Or, &Type::Flag, &Type::Integer).is_error());
}

#[test]
fn error_operand_propagates_unchanged() {
    let err = Type::error("root cause");
    assert_eq!(infer_binary(BinOp::Add, &err, &Type::Text), err);
    assert_eq!(infer_binary(BinOp::And, &Type::Integer, &err), err);
    assert_eq!(infer_unary(UnaryOp::Neg, &err), err);
    assert_eq!(infer_function_call("mean", &[err.clone()]), err);
}

#[test]
fn unary_rules() {
    let kg = Type::numeric_in("kg");
    assert_eq!(infer_unary(UnaryOp::Neg, &kg), kg);
    assert!(infer_unary(UnaryOp::Neg, &Type::Text).is_error());
    assert_eq!(infer_unary(UnaryOp::Not, &Type::Flag), Type::Flag);
    assert!(infer_unary(UnaryOp::Not, &Type::Integer).is_error());
}

#[test]
fn function_table() {
    assert_eq!(infer_function_call("mean", &[Type::Integer]), Type::numeric());
    assert_eq!(infer_function_call("count", &[]), Type::Integer);
    assert_eq!(infer_function_call("max", &[Type::Date]), Type::Date);
    assert_eq!(infer_function_call("frobnicate", &[Type::Text]), Type::Unknown);
    assert!(is_aggregate_function("median"));
    assert!(!is_aggregate_function("sqrt"));
}
