//! Shared builders for unit tests.

use crate::ast::{
    AggregateDef, CubeDef, DeriveDef, Element, PrimitiveKind, Program, SliceDef, TypeRef,
};
use crate::symbols::SymbolTable;

pub fn ident() -> TypeRef {
    TypeRef::Identifier
}

pub fn text() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Text)
}

pub fn numeric() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Numeric)
}

pub fn flag() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::Flag)
}

/// ADaM BDS-shaped vital signs cube.
pub fn advs() -> CubeDef {
    CubeDef::new("ADVS")
        .dimension("USUBJID", ident())
        .dimension("PARAMCD", TypeRef::coded("CDISC.CT.VSTESTCD"))
        .dimension("AVISIT", text())
        .dimension("TRT01A", text())
        .measure("AVAL", numeric())
        .measure("BASE", numeric())
        .measure("CHG", numeric())
        .attribute("AVALU", text())
        .attribute("ANL01FL", flag())
}

/// `CHG ~ TRT01A + BASE` cube from the model round-trip scenario.
pub fn chg_cube() -> CubeDef {
    CubeDef::new("ADEFF")
        .dimension("USUBJID", ident())
        .dimension("TRT01A", text())
        .measure("CHG", numeric())
        .measure("BASE", numeric())
}

pub fn program(elements: Vec<Element>) -> Program {
    Program::new(elements)
}

pub fn slice(name: &str, source: &str) -> SliceDef {
    SliceDef::new(name, source)
}

pub fn derive(name: &str, input: &str) -> DeriveDef {
    DeriveDef {
        name: name.to_string(),
        input: input.to_string(),
        derivations: Vec::new(),
    }
}

pub fn aggregate(name: &str, input: &str, group_by: &[&str]) -> AggregateDef {
    AggregateDef {
        name: name.to_string(),
        input: input.to_string(),
        group_by: group_by.iter().map(|s| s.to_string()).collect(),
        statistics: Vec::new(),
    }
}

/// Program plus its built symbol table.
pub fn build(elements: Vec<Element>) -> (Program, SymbolTable) {
    let program = program(elements);
    let table = SymbolTable::build(&program);
    (program, table)
}
