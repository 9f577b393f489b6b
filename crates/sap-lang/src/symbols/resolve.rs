use tracing::debug;

use crate::ast::{AggregateDef, ComponentDef, DeriveDef, Element, PrimitiveKind, Program, TypeRef};
use crate::checker::TypeChecker;
use crate::types::{ComponentRole, CubeType, Type, infer_function_call};

use super::{
    DeclRef, GLOBAL_SCOPE, MAX_RESOLUTION_PASSES, Symbol, SymbolKind, SymbolTable, UNRESOLVED,
};

/// Convert a syntactic type reference into a semantic type.
pub fn resolve_type_ref(ty: &TypeRef) -> Type {
    match ty {
        TypeRef::Primitive { kind, unit } => match kind {
            PrimitiveKind::Numeric => Type::Numeric { unit: unit.clone() },
            PrimitiveKind::Integer => Type::Integer,
            PrimitiveKind::Text => Type::Text,
            PrimitiveKind::DateTime => Type::DateTime,
            PrimitiveKind::Date => Type::Date,
            PrimitiveKind::Flag => Type::Flag,
        },
        TypeRef::Identifier => Type::Identifier,
        TypeRef::CodedValue { code_list } => Type::CodedValue {
            code_list: code_list.as_ref().map(|parts| parts.join(".")),
        },
    }
}

impl SymbolTable {
    // -----------------------------------------------------------------------
    // Pass 1: collection
    // -----------------------------------------------------------------------

    pub(super) fn collect(&mut self, program: &Program) {
        for (index, element) in program.elements.iter().enumerate() {
            let (Some(name), Some(kind)) = (element.defined_name(), SymbolKind::of_element(element))
            else {
                continue;
            };
            let placeholder = Symbol {
                name,
                ty: Type::error(UNRESOLVED),
                kind,
                decl: DeclRef::Element(index),
                scope: GLOBAL_SCOPE,
            };
            let input = match element {
                Element::Slice(s) => Some(&s.source),
                Element::Derive(d) => Some(&d.input),
                Element::Aggregate(a) => Some(&a.input),
                _ => None,
            };
            let name = placeholder.name.clone();
            // Rejections are recorded in `self.errors`.
            if self.define(GLOBAL_SCOPE, placeholder).is_ok()
                && let Some(input) = input
            {
                self.inputs.insert(name, input.clone());
            }
        }
        debug!(
            domain = "sym",
            symbols = self.global().symbols().count(),
            collisions = self.errors.len(),
            "collection pass complete"
        );
    }

    // -----------------------------------------------------------------------
    // Pass 2: cubes
    // -----------------------------------------------------------------------

    pub(super) fn resolve_cubes(&mut self, program: &Program) {
        for (index, element) in program.elements.iter().enumerate() {
            match element {
                Element::Cube(cube) if self.owns(&cube.name, index) => {
                    let scope = self.push_scope(&cube.name, GLOBAL_SCOPE);
                    self.cube_scopes.insert(cube.name.clone(), scope);

                    let mut cube_type = CubeType::new(&cube.name);
                    let groups: [(&[ComponentDef], ComponentRole, SymbolKind); 3] = [
                        (
                            &cube.structure.dimensions,
                            ComponentRole::Dimension,
                            SymbolKind::Dimension,
                        ),
                        (
                            &cube.structure.measures,
                            ComponentRole::Measure,
                            SymbolKind::Measure,
                        ),
                        (
                            &cube.structure.attributes,
                            ComponentRole::Attribute,
                            SymbolKind::Attribute,
                        ),
                    ];
                    let mut position = 0;
                    for (components, role, kind) in groups {
                        for component in components {
                            let ty = resolve_type_ref(&component.ty);
                            let symbol = Symbol {
                                name: component.name.clone(),
                                ty: ty.clone(),
                                kind,
                                decl: DeclRef::Component {
                                    element: index,
                                    index: position,
                                },
                                scope,
                            };
                            position += 1;
                            if self.define(scope, symbol).is_ok() {
                                cube_type.insert(role, component.name.clone(), ty);
                            }
                        }
                    }
                    self.set_global_type(&cube.name, Type::Cube(cube_type));
                }
                Element::Concept(concept) => {
                    let name = concept.qualified_name();
                    if self.owns(&name, index) {
                        self.set_global_type(&name, Type::Unknown);
                    }
                }
                Element::Model(m) if self.owns(&m.name, index) => {
                    self.set_global_type(&m.name, Type::Unknown);
                }
                Element::Display(d) if self.owns(&d.name, index) => {
                    self.set_global_type(&d.name, Type::Unknown);
                }
                Element::Pipeline(p) if self.owns(&p.name, index) => {
                    self.set_global_type(&p.name, Type::Unknown);
                }
                _ => {}
            }
        }
        debug!(domain = "sym", cubes = self.cube_scopes.len(), "cube resolution pass complete");
    }

    // -----------------------------------------------------------------------
    // Pass 3: slices, derives, aggregates (bounded fixpoint)
    // -----------------------------------------------------------------------

    pub(super) fn resolve_dependents(&mut self, program: &Program) {
        for iteration in 1..=MAX_RESOLUTION_PASSES {
            let mut progressed = false;
            let mut pending = false;

            for (index, element) in program.elements.iter().enumerate() {
                let name = match element {
                    Element::Slice(s) => &s.name,
                    Element::Derive(d) => &d.name,
                    Element::Aggregate(a) => &a.name,
                    _ => continue,
                };
                if !self.owns(name, index) || !self.is_unresolved(name) {
                    continue;
                }
                let resolved = match element {
                    Element::Slice(s) => self.cube_type(&s.source).cloned(),
                    Element::Derive(d) => self.derive_type(d),
                    Element::Aggregate(a) => self.aggregate_type(a),
                    _ => None,
                };
                match resolved {
                    Some(cube) => {
                        self.set_global_type(name, Type::Cube(cube));
                        progressed = true;
                    }
                    None => pending = true,
                }
            }

            debug!(domain = "sym", iteration, progressed, pending, "dependent resolution pass");
            if !pending || !progressed {
                break;
            }
        }

        let unresolved: Vec<&str> = self.unresolved().map(|s| s.name.as_str()).collect();
        if !unresolved.is_empty() {
            debug!(domain = "sym", ?unresolved, "symbols left unresolved");
        }
    }

    fn is_unresolved(&self, name: &str) -> bool {
        self.resolve_global(name).is_some_and(|s| s.ty.is_error())
    }

    /// Input cube extended with one measure per derivation. Each derivation
    /// may reference the ones before it.
    fn derive_type(&self, derive: &DeriveDef) -> Option<CubeType> {
        let input = self.cube_type(&derive.input)?;
        let mut cube = input.clone();
        cube.name = derive.name.clone();
        let checker = TypeChecker::new(self);
        for derivation in &derive.derivations {
            let ty = checker.check(&derivation.expr, Some(&cube)).ty;
            cube.insert(ComponentRole::Measure, derivation.name.clone(), ty);
        }
        Some(cube)
    }

    /// Group-by dimensions plus one measure per statistic.
    fn aggregate_type(&self, aggregate: &AggregateDef) -> Option<CubeType> {
        let input = self.cube_type(&aggregate.input)?;
        let mut cube = CubeType::new(&aggregate.name);
        for dim in &aggregate.group_by {
            if let Some(ty) = input.dimensions.get(dim) {
                cube.insert(ComponentRole::Dimension, dim.clone(), ty.clone());
            }
        }
        for stat in &aggregate.statistics {
            let args: Vec<Type> = stat
                .measure
                .iter()
                .map(|m| input.component_type(m).cloned().unwrap_or(Type::Unknown))
                .collect();
            let ty = infer_function_call(&stat.function, &args);
            cube.insert(ComponentRole::Measure, stat.name.clone(), ty);
        }
        Some(cube)
    }
}
