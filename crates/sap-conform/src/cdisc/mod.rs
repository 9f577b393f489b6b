//! CDISC standards: metadata registry, SDTM/ADaM structure validation,
//! CORE conformance rules and standards version management.

mod conformance;
mod core_rules;
mod metadata;
mod version;

pub use conformance::{types_compatible, validate_adam, validate_sdtm};
pub use core_rules::{
    CoreEngine, CoreRule, DateTimeOrder, Iso8601Date, NoDuplicateKey, RequiredIf, ValueInCodeList,
};
pub use metadata::{
    CodeList, CoreDesignation, DomainDef, Standard, StandardsMetadata, Term, VariableDef,
    VariableRole,
};
pub use version::{
    COMPATIBLE_VERSIONS, DEFAULT_VERSIONS, KNOWN_STANDARDS, SUPPORTED_VERSIONS, VersionManager,
};
