//! W3C Data Cube integrity constraints as a pluggable registry.

mod constraints;

pub use constraints::{
    AllDimensionsRequired, CodesFromCodeList, NoDuplicateObservations, UniqueComponents,
    UniqueDataset,
};

use std::fmt;

use sap_lang::{Diagnostic, DiagnosticSource};
use serde::Serialize;
use tracing::{debug, warn};

use crate::ConformContext;
use crate::error::ConformResult;

/// Execution tier. Constraints run critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    Optional,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::Important => "important",
            Priority::Optional => "optional",
        };
        f.write_str(s)
    }
}

/// One integrity constraint. Findings are returned as diagnostics; `Err`
/// means the constraint itself could not run.
pub trait IntegrityConstraint {
    /// Identifier such as `IC-11`, also used as the diagnostic code.
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn priority(&self) -> Priority;
    fn check(&self, ctx: &ConformContext<'_>) -> ConformResult<Vec<Diagnostic>>;
}

/// Diagnostics from one engine run plus the ids of rules that faulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineRun {
    pub diagnostics: Vec<Diagnostic>,
    pub failed: Vec<String>,
}

impl EngineRun {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failed.is_empty()
    }
}

#[derive(Default)]
pub struct W3cEngine {
    constraints: Vec<Box<dyn IntegrityConstraint>>,
}

impl W3cEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with every built-in constraint registered.
    pub fn standard() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(UniqueDataset));
        engine.register(Box::new(UniqueComponents));
        engine.register(Box::new(AllDimensionsRequired));
        engine.register(Box::new(NoDuplicateObservations));
        engine.register(Box::new(CodesFromCodeList::default()));
        engine
    }

    pub fn register(&mut self, constraint: Box<dyn IntegrityConstraint>) {
        self.constraints.push(constraint);
    }

    /// Constraint ids in execution order.
    pub fn ids(&self) -> Vec<&str> {
        self.ordered().map(|c| c.id()).collect()
    }

    /// Run every constraint in priority order. A constraint that returns
    /// `Err` is logged and skipped; the rest still run.
    pub fn run(&self, ctx: &ConformContext<'_>) -> EngineRun {
        let mut run = EngineRun::default();
        for constraint in self.ordered() {
            match constraint.check(ctx) {
                Ok(diags) => {
                    debug!(
                        domain = "conf",
                        constraint = constraint.id(),
                        priority = %constraint.priority(),
                        findings = diags.len(),
                        "integrity constraint checked"
                    );
                    run.diagnostics.extend(diags.into_iter().map(|d| {
                        let d = d.with_source(DiagnosticSource::W3c);
                        if d.code.is_none() {
                            d.with_code(constraint.id())
                        } else {
                            d
                        }
                    }));
                }
                Err(e) => {
                    warn!(
                        domain = "conf",
                        constraint = constraint.id(),
                        error = %e,
                        "integrity constraint failed; skipped"
                    );
                    run.failed.push(constraint.id().to_string());
                }
            }
        }
        run
    }

    fn ordered(&self) -> impl Iterator<Item = &dyn IntegrityConstraint> {
        let mut refs: Vec<&dyn IntegrityConstraint> =
            self.constraints.iter().map(|c| c.as_ref()).collect();
        refs.sort_by_key(|c| c.priority());
        refs.into_iter()
    }
}
