//! CORE conformance rules. Each rule inspects the structure of one resolved
//! cube; checks that need record values are outside this engine.

use orion_error::prelude::*;
use sap_lang::{ComponentRole, CubeType, Diagnostic, DiagnosticSource, Type};
use tracing::{debug, warn};

use crate::error::{ConformReason, ConformResult};
use crate::w3c::EngineRun;

/// One pluggable CORE rule. `Err` means the rule is misconfigured or could
/// not run; findings are diagnostics.
pub trait CoreRule {
    /// Rule id such as `CORE-000001`, used as the diagnostic code.
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, cube: &CubeType) -> ConformResult<Vec<Diagnostic>>;
}

fn core_error(message: String) -> Diagnostic {
    Diagnostic::error(DiagnosticSource::Core, message)
}

fn core_warning(message: String) -> Diagnostic {
    Diagnostic::warning(DiagnosticSource::Core, message)
}

fn misconfigured(id: &str, what: &str) -> ConformResult<Vec<Diagnostic>> {
    StructError::from(ConformReason::RuleConfig)
        .with_detail(format!("rule {}: {}", id, what))
        .err()
}

// ---------------------------------------------------------------------------
// NoDuplicateKey
// ---------------------------------------------------------------------------

/// The key variables that make a record unique must all be present, and
/// should be dimensions of the cube.
#[derive(Debug, Clone)]
pub struct NoDuplicateKey {
    pub id: String,
    pub keys: Vec<String>,
}

impl CoreRule for NoDuplicateKey {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "key variables must be present so records are unique"
    }

    fn check(&self, cube: &CubeType) -> ConformResult<Vec<Diagnostic>> {
        if self.keys.is_empty() {
            return misconfigured(&self.id, "no key variables configured");
        }
        let mut diags = Vec::new();
        for key in &self.keys {
            match cube.role_of(key) {
                None => diags.push(core_error(format!(
                    "Key variable '{}' is missing from cube '{}'; duplicate records cannot be ruled out",
                    key, cube.name
                ))),
                Some((ComponentRole::Dimension, _)) => {}
                Some((role, _)) => diags.push(core_warning(format!(
                    "Key variable '{}' of cube '{}' should be a dimension, but it is {}",
                    key,
                    cube.name,
                    role.with_article()
                ))),
            }
        }
        Ok(diags)
    }
}

// ---------------------------------------------------------------------------
// Iso8601Date
// ---------------------------------------------------------------------------

/// Variables carrying ISO 8601 dates must be Date or DateTime typed.
/// Variables absent from the cube are not this rule's concern.
#[derive(Debug, Clone)]
pub struct Iso8601Date {
    pub id: String,
    pub variables: Vec<String>,
}

impl CoreRule for Iso8601Date {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "date variables must use a Date or DateTime type"
    }

    fn check(&self, cube: &CubeType) -> ConformResult<Vec<Diagnostic>> {
        if self.variables.is_empty() {
            return misconfigured(&self.id, "no date variables configured");
        }
        let diags = self
            .variables
            .iter()
            .filter_map(|name| {
                let ty = cube.component_type(name)?;
                (!is_date_like(ty)).then(|| {
                    core_error(format!(
                        "Variable '{}' holds ISO 8601 values and must be Date or DateTime, but it is {}",
                        name, ty
                    ))
                })
            })
            .collect();
        Ok(diags)
    }
}

fn is_date_like(ty: &Type) -> bool {
    ty.is_temporal() || ty.is_permissive()
}

// ---------------------------------------------------------------------------
// DateTimeOrder
// ---------------------------------------------------------------------------

/// Precondition for start <= end ordering: both variables exist and are
/// date typed. The ordering itself needs record values.
#[derive(Debug, Clone)]
pub struct DateTimeOrder {
    pub id: String,
    pub start: String,
    pub end: String,
}

impl CoreRule for DateTimeOrder {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "start and end date variables must both exist and be date typed"
    }

    fn check(&self, cube: &CubeType) -> ConformResult<Vec<Diagnostic>> {
        if self.start == self.end {
            return misconfigured(&self.id, "start and end name the same variable");
        }
        let mut diags = Vec::new();
        for (label, name) in [("start", &self.start), ("end", &self.end)] {
            match cube.component_type(name) {
                None => diags.push(core_error(format!(
                    "Cannot order '{}' before '{}': {} variable '{}' is missing from cube '{}'",
                    self.start, self.end, label, name, cube.name
                ))),
                Some(ty) if !is_date_like(ty) => diags.push(core_error(format!(
                    "Cannot order '{}' before '{}': '{}' must be Date or DateTime, but it is {}",
                    self.start, self.end, name, ty
                ))),
                Some(_) => {}
            }
        }
        Ok(diags)
    }
}

// ---------------------------------------------------------------------------
// RequiredIf
// ---------------------------------------------------------------------------

/// Presence of one variable requires presence of another.
#[derive(Debug, Clone)]
pub struct RequiredIf {
    pub id: String,
    pub if_present: String,
    pub then_required: String,
}

impl CoreRule for RequiredIf {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "conditionally required variable"
    }

    fn check(&self, cube: &CubeType) -> ConformResult<Vec<Diagnostic>> {
        if cube.has_component(&self.if_present) && !cube.has_component(&self.then_required) {
            return Ok(vec![core_error(format!(
                "Variable '{}' is required in cube '{}' because '{}' is present",
                self.then_required, cube.name, self.if_present
            ))]);
        }
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// ValueInCodeList
// ---------------------------------------------------------------------------

/// A coded variable must draw its values from the expected code list.
#[derive(Debug, Clone)]
pub struct ValueInCodeList {
    pub id: String,
    pub variable: String,
    /// Dotted code-list name, e.g. `CDISC.CT.SEX`.
    pub code_list: String,
}

impl CoreRule for ValueInCodeList {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "coded variable must use the expected code list"
    }

    fn check(&self, cube: &CubeType) -> ConformResult<Vec<Diagnostic>> {
        if self.code_list.is_empty() {
            return misconfigured(&self.id, "empty code list name");
        }
        let Some(ty) = cube.component_type(&self.variable) else {
            return Ok(Vec::new());
        };
        let diag = match ty {
            Type::CodedValue {
                code_list: Some(declared),
            } if *declared == self.code_list => return Ok(Vec::new()),
            Type::CodedValue {
                code_list: Some(declared),
            } => core_error(format!(
                "Variable '{}' uses code list '{}', expected '{}'",
                self.variable, declared, self.code_list
            )),
            Type::CodedValue { code_list: None } => core_warning(format!(
                "Variable '{}' declares no code list; expected '{}'",
                self.variable, self.code_list
            )),
            other if other.is_permissive() => return Ok(Vec::new()),
            other => core_error(format!(
                "Variable '{}' must be CodedValue<{}>, but it is {}",
                self.variable, self.code_list, other
            )),
        };
        Ok(vec![diag])
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CoreEngine {
    rules: Vec<Box<dyn CoreRule>>,
}

impl CoreEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Box<dyn CoreRule>) {
        self.rules.push(rule);
    }

    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against `cube` in registration order. Faulting rules
    /// are logged, recorded in [`EngineRun::failed`] and skipped.
    pub fn run(&self, cube: &CubeType) -> EngineRun {
        let mut run = EngineRun::default();
        for rule in &self.rules {
            match rule.check(cube) {
                Ok(diags) => {
                    debug!(
                        domain = "conf",
                        rule = rule.id(),
                        cube = %cube.name,
                        findings = diags.len(),
                        "core rule checked"
                    );
                    run.diagnostics.extend(diags.into_iter().map(|d| {
                        d.with_source(DiagnosticSource::Core)
                            .with_code(rule.id())
                            .in_element(&cube.name)
                    }));
                }
                Err(e) => {
                    warn!(
                        domain = "conf",
                        rule = rule.id(),
                        cube = %cube.name,
                        error = %e,
                        "core rule failed; skipped"
                    );
                    run.failed.push(rule.id().to_string());
                }
            }
        }
        run
    }
}
