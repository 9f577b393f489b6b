use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

/// Faults inside a rule implementation. Validation findings are never
/// errors; these mean a rule could not run at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum ConformReason {
    #[error("invalid rule configuration")]
    RuleConfig,
    #[error("symbol table invariant violated")]
    TableInvariant,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for ConformReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::RuleConfig => 3001,
            Self::TableInvariant => 3002,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type ConformError = StructError<ConformReason>;
pub type ConformResult<T> = Result<T, ConformError>;
