use std::collections::{BTreeMap, BTreeSet};

use orion_error::prelude::*;
use sap_lang::ast::{Expr, TypeRef};
use sap_lang::{Diagnostic, DiagnosticSource, Type};

use super::{IntegrityConstraint, Priority};
use crate::ConformContext;
use crate::cdisc::StandardsMetadata;
use crate::error::{ConformReason, ConformResult};

fn finding(id: &str, element: &str, message: String) -> Diagnostic {
    Diagnostic::error(DiagnosticSource::W3c, message)
        .with_code(id)
        .with_element(element)
}

// ---------------------------------------------------------------------------
// IC-1
// ---------------------------------------------------------------------------

/// No two cube definitions share a name.
pub struct UniqueDataset;

impl IntegrityConstraint for UniqueDataset {
    fn id(&self) -> &str {
        "IC-1"
    }

    fn description(&self) -> &str {
        "Unique DataSet: every cube name is defined once"
    }

    fn priority(&self) -> Priority {
        Priority::Critical
    }

    fn check(&self, ctx: &ConformContext<'_>) -> ConformResult<Vec<Diagnostic>> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut diags = Vec::new();
        for cube in ctx.program.cubes() {
            let count = counts.entry(cube.name.as_str()).or_default();
            *count += 1;
            if *count > 1 {
                diags.push(finding(
                    self.id(),
                    &cube.name,
                    format!("Dataset '{}' is defined more than once", cube.name),
                ));
            }
        }
        Ok(diags)
    }
}

// ---------------------------------------------------------------------------
// IC-2
// ---------------------------------------------------------------------------

/// Component names are unique within a cube across all three roles.
pub struct UniqueComponents;

impl IntegrityConstraint for UniqueComponents {
    fn id(&self) -> &str {
        "IC-2"
    }

    fn description(&self) -> &str {
        "Unique DSD: component names are unique within a cube"
    }

    fn priority(&self) -> Priority {
        Priority::Critical
    }

    fn check(&self, ctx: &ConformContext<'_>) -> ConformResult<Vec<Diagnostic>> {
        let mut diags = Vec::new();
        for cube in ctx.program.cubes() {
            let s = &cube.structure;
            let mut seen = BTreeSet::new();
            let mut reported = BTreeSet::new();
            for component in s.dimensions.iter().chain(&s.measures).chain(&s.attributes) {
                let name = component.name.as_str();
                if !seen.insert(name) && reported.insert(name) {
                    diags.push(finding(
                        self.id(),
                        &cube.name,
                        format!(
                            "Component '{}' is declared more than once in cube '{}'",
                            name, cube.name
                        ),
                    ));
                }
            }
        }
        Ok(diags)
    }
}

// ---------------------------------------------------------------------------
// IC-11
// ---------------------------------------------------------------------------

/// Every slice fixes or varies every dimension of its source.
pub struct AllDimensionsRequired;

impl IntegrityConstraint for AllDimensionsRequired {
    fn id(&self) -> &str {
        "IC-11"
    }

    fn description(&self) -> &str {
        "All dimensions required: a slice accounts for every source dimension"
    }

    fn priority(&self) -> Priority {
        Priority::Important
    }

    fn check(&self, ctx: &ConformContext<'_>) -> ConformResult<Vec<Diagnostic>> {
        let mut diags = Vec::new();
        for slice in ctx.program.slices() {
            if ctx.table.resolve_global(&slice.name).is_none() {
                return StructError::from(ConformReason::TableInvariant)
                    .with_detail(format!("slice '{}' missing from symbol table", slice.name))
                    .err();
            }
            // Unresolved sources are reported by the language checks.
            let Some(cube) = ctx.table.cube_type(&slice.source) else {
                continue;
            };
            let covered: BTreeSet<&str> = slice
                .fix
                .iter()
                .map(|f| f.dimension.as_str())
                .chain(slice.vary.iter().map(String::as_str))
                .collect();
            let missing: Vec<&str> = cube
                .dimension_names()
                .filter(|d| !covered.contains(d))
                .collect();
            if !missing.is_empty() {
                diags.push(finding(
                    self.id(),
                    &slice.name,
                    format!(
                        "Slice '{}' does not account for dimension(s) {} of '{}'; every dimension must be fixed or varying",
                        slice.name,
                        missing.join(", "),
                        slice.source
                    ),
                ));
            }
        }
        Ok(diags)
    }
}

// ---------------------------------------------------------------------------
// IC-12
// ---------------------------------------------------------------------------

/// Static approximation of "no duplicate observations". Without data only
/// two structural smells can be detected, both reported as warnings.
pub struct NoDuplicateObservations;

impl IntegrityConstraint for NoDuplicateObservations {
    fn id(&self) -> &str {
        "IC-12"
    }

    fn description(&self) -> &str {
        "No duplicate observations (structural heuristic)"
    }

    fn priority(&self) -> Priority {
        Priority::Optional
    }

    fn check(&self, ctx: &ConformContext<'_>) -> ConformResult<Vec<Diagnostic>> {
        let mut diags = Vec::new();

        for slice in ctx.program.slices() {
            if slice.fix.is_empty() && slice.vary.is_empty() {
                diags.push(
                    Diagnostic::warning(
                        DiagnosticSource::W3c,
                        format!(
                            "Slice '{}' neither fixes nor varies any dimension; its cardinality is ambiguous",
                            slice.name
                        ),
                    )
                    .with_code(self.id())
                    .with_element(slice.name.clone()),
                );
            }
        }

        for aggregate in ctx.program.aggregates() {
            let Some(cube) = ctx.table.cube_type(&aggregate.input) else {
                continue;
            };
            let grouped: BTreeSet<&str> = aggregate.group_by.iter().map(String::as_str).collect();
            let dims: BTreeSet<&str> = cube.dimension_names().collect();
            if !dims.is_empty() && grouped == dims {
                diags.push(
                    Diagnostic::warning(
                        DiagnosticSource::W3c,
                        format!(
                            "Aggregate '{}' groups by every dimension of '{}'; no aggregation occurs",
                            aggregate.name, aggregate.input
                        ),
                    )
                    .with_code(self.id())
                    .with_element(aggregate.name.clone()),
                );
            }
        }

        Ok(diags)
    }
}

// ---------------------------------------------------------------------------
// IC-19
// ---------------------------------------------------------------------------

/// Coded values come from a declared code list.
/// Literal codes fixed on a dimension whose code list is registered in
/// `metadata` must be terms of that list. Unknown values are errors for
/// closed lists and warnings for extensible ones.
pub struct CodesFromCodeList {
    metadata: StandardsMetadata,
}

impl CodesFromCodeList {
    pub fn new(metadata: StandardsMetadata) -> Self {
        Self { metadata }
    }
}

impl Default for CodesFromCodeList {
    fn default() -> Self {
        Self::new(StandardsMetadata::builtin())
    }
}

impl IntegrityConstraint for CodesFromCodeList {
    fn id(&self) -> &str {
        "IC-19"
    }

    fn description(&self) -> &str {
        "Codes from code list: coded components declare their code list"
    }

    fn priority(&self) -> Priority {
        Priority::Important
    }

    fn check(&self, ctx: &ConformContext<'_>) -> ConformResult<Vec<Diagnostic>> {
        let mut diags = Vec::new();

        for cube in ctx.program.cubes() {
            let s = &cube.structure;
            for component in s.dimensions.iter().chain(&s.measures).chain(&s.attributes) {
                if matches!(component.ty, TypeRef::CodedValue { code_list: None }) {
                    diags.push(
                        Diagnostic::warning(
                            DiagnosticSource::W3c,
                            format!(
                                "Coded component '{}' of cube '{}' does not declare a code list",
                                component.name, cube.name
                            ),
                        )
                        .with_code(self.id())
                        .with_element(cube.name.clone()),
                    );
                }
            }
        }

        for slice in ctx.program.slices() {
            let Some(cube) = ctx.table.cube_type(&slice.source) else {
                continue;
            };
            for fixed in &slice.fix {
                let Some(Type::CodedValue { code_list }) = cube.dimensions.get(&fixed.dimension)
                else {
                    continue;
                };
                let Expr::Text(value) = &fixed.value else {
                    diags.push(finding(
                        self.id(),
                        &slice.name,
                        format!(
                            "Fixed value for coded dimension '{}' in slice '{}' must be a literal code, found {}",
                            fixed.dimension, slice.name, fixed.value
                        ),
                    ));
                    continue;
                };
                let Some(list) = code_list.as_deref().and_then(|n| self.metadata.code_list(n))
                else {
                    continue;
                };
                if list.contains(value) {
                    continue;
                }
                let message = format!(
                    "Code '{}' fixed on '{}' in slice '{}' is not a term of code list '{}'",
                    value, fixed.dimension, slice.name, list.name
                );
                let diag = if list.extensible {
                    Diagnostic::warning(DiagnosticSource::W3c, message)
                        .with_code(self.id())
                        .with_element(slice.name.clone())
                } else {
                    finding(self.id(), &slice.name, message)
                };
                diags.push(diag);
            }
        }

        Ok(diags)
    }
}
