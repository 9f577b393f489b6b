//! Global and per-cube symbol scopes, built in three passes:
//!
//! 1. collection: one placeholder symbol per top-level definition;
//! 2. cube resolution: component scopes and `CubeType`s for every cube;
//! 3. dependent resolution: slices, derives and aggregates take their type
//!    from their (possibly chained) input, iterated to a fixpoint capped at
//!    [`MAX_RESOLUTION_PASSES`].
//!
//! The table is complete when [`SymbolTable::build`] returns; validators
//! only ever see it through `&SymbolTable`.

mod resolve;

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{Element, Program};
use crate::types::{CubeType, Type};

pub use resolve::resolve_type_ref;

/// Hard cap on pass-3 iterations. Guarantees termination on cyclic or
/// dangling slice chains; anything still unresolved keeps its placeholder.
pub const MAX_RESOLUTION_PASSES: usize = 10;

/// Message carried by the placeholder type of a not-yet-resolved symbol.
pub const UNRESOLVED: &str = "not yet resolved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Cube,
    Concept,
    Slice,
    Model,
    Derive,
    Aggregate,
    Display,
    Pipeline,
    Dimension,
    Measure,
    Attribute,
}

impl SymbolKind {
    pub fn of_element(element: &Element) -> Option<SymbolKind> {
        match element {
            Element::Import(_) | Element::Standards(_) => None,
            Element::Cube(_) => Some(SymbolKind::Cube),
            Element::Concept(_) => Some(SymbolKind::Concept),
            Element::Slice(_) => Some(SymbolKind::Slice),
            Element::Derive(_) => Some(SymbolKind::Derive),
            Element::Model(_) => Some(SymbolKind::Model),
            Element::Aggregate(_) => Some(SymbolKind::Aggregate),
            Element::Display(_) => Some(SymbolKind::Display),
            Element::Pipeline(_) => Some(SymbolKind::Pipeline),
        }
    }
}

impl SymbolKind {
    /// Kind name with its indefinite article, for messages.
    pub fn with_article(self) -> String {
        let name = self.to_string();
        let article = if name.starts_with(['a', 'e', 'i', 'o', 'u']) {
            "an"
        } else {
            "a"
        };
        format!("{} {}", article, name)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Cube => "cube",
            SymbolKind::Concept => "concept",
            SymbolKind::Slice => "slice",
            SymbolKind::Model => "model",
            SymbolKind::Derive => "derive",
            SymbolKind::Aggregate => "aggregate",
            SymbolKind::Display => "display",
            SymbolKind::Pipeline => "pipeline",
            SymbolKind::Dimension => "dimension",
            SymbolKind::Measure => "measure",
            SymbolKind::Attribute => "attribute",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

pub const GLOBAL_SCOPE: ScopeId = ScopeId(0);

/// Where a symbol was declared in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclRef {
    /// Index into `Program::elements`.
    Element(usize),
    /// Component `index` of the given role list of cube element `element`.
    Component { element: usize, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub kind: SymbolKind,
    pub decl: DeclRef,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub parent: Option<ScopeId>,
    symbols: BTreeMap<String, Symbol>,
}

impl Scope {
    fn new(name: impl Into<String>, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            symbols: BTreeMap::new(),
        }
    }

    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

/// A rejected redefinition within one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableError {
    pub scope: ScopeId,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    cube_scopes: BTreeMap<String, ScopeId>,
    /// Data input of each slice, derive and aggregate.
    inputs: BTreeMap<String, String>,
    errors: Vec<TableError>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            scopes: vec![Scope::new("global", None)],
            cube_scopes: BTreeMap::new(),
            inputs: BTreeMap::new(),
            errors: Vec::new(),
        }
    }
}

impl SymbolTable {
    /// Build and fully resolve the table for `program`.
    pub fn build(program: &Program) -> Self {
        let mut table = SymbolTable::default();
        table.collect(program);
        table.resolve_cubes(program);
        table.resolve_dependents(program);
        table
    }

    /// Define `symbol` in `scope`. The first definition of a name wins;
    /// later ones are rejected and recorded in [`SymbolTable::errors`].
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) -> Result<(), String> {
        let target = &mut self.scopes[scope.0];
        if target.symbols.contains_key(&symbol.name) {
            let message = if scope == GLOBAL_SCOPE {
                format!("Duplicate definition of '{}'", symbol.name)
            } else {
                format!(
                    "Duplicate component '{}' in cube '{}'",
                    symbol.name, target.name
                )
            };
            self.errors.push(TableError {
                scope,
                name: symbol.name,
                message: message.clone(),
            });
            return Err(message);
        }
        target.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[GLOBAL_SCOPE.0]
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    pub fn resolve_global(&self, name: &str) -> Option<&Symbol> {
        self.global().lookup_local(name)
    }

    /// Resolve `name` starting at `from` and walking up the parent chain.
    pub fn resolve(&self, name: &str, from: ScopeId) -> Option<&Symbol> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.scopes.get(id.0)?;
            if let Some(sym) = scope.lookup_local(name) {
                return Some(sym);
            }
            current = scope.parent;
        }
        None
    }

    pub fn cube_scope(&self, cube: &str) -> Option<ScopeId> {
        self.cube_scopes.get(cube).copied()
    }

    /// The resolved cube structure behind a global name (cube, slice,
    /// derive or aggregate), if it has one.
    pub fn cube_type(&self, name: &str) -> Option<&CubeType> {
        self.resolve_global(name).and_then(|s| s.ty.as_cube())
    }

    /// The declared source of a slice, or input of a derive or aggregate.
    pub fn input_of(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).map(String::as_str)
    }

    /// Follow declared inputs from `start`. Returns the path back to
    /// `start` when the chain loops onto it, e.g. `[A, B, A]`.
    pub fn input_cycle(&self, start: &str) -> Option<Vec<String>> {
        let mut path = vec![start.to_string()];
        let mut current = start;
        loop {
            let next = self.input_of(current)?;
            path.push(next.to_string());
            if next == start {
                return Some(path);
            }
            if path[..path.len() - 1].iter().any(|p| p == next) {
                return None;
            }
            current = next;
        }
    }

    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.global().names()
    }

    pub fn errors(&self) -> &[TableError] {
        &self.errors
    }

    /// Global symbols whose type is still the unresolved placeholder.
    pub fn unresolved(&self) -> impl Iterator<Item = &Symbol> {
        self.global().symbols().filter(|s| s.ty.is_error())
    }

    /// Whether the global symbol `name` was declared by element `index`
    /// (false for rejected duplicates).
    fn owns(&self, name: &str, index: usize) -> bool {
        self.resolve_global(name)
            .is_some_and(|s| s.decl == DeclRef::Element(index))
    }

    fn set_global_type(&mut self, name: &str, ty: Type) {
        if let Some(sym) = self.scopes[GLOBAL_SCOPE.0].symbols.get_mut(name) {
            sym.ty = ty;
        }
    }

    fn push_scope(&mut self, name: &str, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::new(name, Some(parent)));
        ScopeId(self.scopes.len() - 1)
    }
}
