//! Standards conformance for resolved SAP programs: W3C Data Cube integrity
//! constraints, CDISC SDTM/ADaM structure checks, CORE rules and standards
//! version management.

pub mod cdisc;
pub mod error;
pub mod w3c;

use sap_lang::SymbolTable;
use sap_lang::ast::Program;

pub use cdisc::{
    CoreEngine, CoreRule, Standard, StandardsMetadata, VersionManager, validate_adam,
    validate_sdtm,
};
pub use error::{ConformError, ConformReason, ConformResult};
pub use w3c::{EngineRun, IntegrityConstraint, Priority, W3cEngine};

/// Read-only view of a validation run shared by every pluggable rule.
#[derive(Debug, Clone, Copy)]
pub struct ConformContext<'a> {
    pub program: &'a Program,
    pub table: &'a SymbolTable,
}

impl<'a> ConformContext<'a> {
    pub fn new(program: &'a Program, table: &'a SymbolTable) -> Self {
        Self { program, table }
    }
}
