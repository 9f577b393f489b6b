use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Expr, Formula};

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

/// A parsed SAP program: the ordered top-level elements of one source unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub elements: Vec<Element>,
}

impl Program {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn cubes(&self) -> impl Iterator<Item = &CubeDef> {
        self.elements.iter().filter_map(|e| match e {
            Element::Cube(c) => Some(c),
            _ => None,
        })
    }

    pub fn concepts(&self) -> impl Iterator<Item = &ConceptDef> {
        self.elements.iter().filter_map(|e| match e {
            Element::Concept(c) => Some(c),
            _ => None,
        })
    }

    pub fn slices(&self) -> impl Iterator<Item = &SliceDef> {
        self.elements.iter().filter_map(|e| match e {
            Element::Slice(s) => Some(s),
            _ => None,
        })
    }

    pub fn aggregates(&self) -> impl Iterator<Item = &AggregateDef> {
        self.elements.iter().filter_map(|e| match e {
            Element::Aggregate(a) => Some(a),
            _ => None,
        })
    }

    pub fn standards(&self) -> impl Iterator<Item = &StandardsDecl> {
        self.elements.iter().filter_map(|e| match e {
            Element::Standards(s) => Some(s),
            _ => None,
        })
    }
}

/// A top-level program element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Import(Import),
    Standards(StandardsDecl),
    Cube(CubeDef),
    Concept(ConceptDef),
    Slice(SliceDef),
    Derive(DeriveDef),
    Model(ModelDef),
    Aggregate(AggregateDef),
    Display(DisplayDef),
    Pipeline(PipelineDef),
}

impl Element {
    /// The name this element defines in the global scope, if any.
    /// Concepts inside a namespace are defined under their qualified name.
    pub fn defined_name(&self) -> Option<String> {
        match self {
            Element::Import(_) | Element::Standards(_) => None,
            Element::Cube(c) => Some(c.name.clone()),
            Element::Concept(c) => Some(c.qualified_name()),
            Element::Slice(s) => Some(s.name.clone()),
            Element::Derive(d) => Some(d.name.clone()),
            Element::Model(m) => Some(m.name.clone()),
            Element::Aggregate(a) => Some(a.name.clone()),
            Element::Display(d) => Some(d.name.clone()),
            Element::Pipeline(p) => Some(p.name.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Imports and standards declarations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub path: String,
}

/// `standards { SDTM: "3.4", ADaM: "1.2" }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardsDecl {
    pub entries: Vec<StandardVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardVersion {
    pub standard: String,
    pub version: String,
}

impl StandardVersion {
    pub fn new(standard: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            standard: standard.into(),
            version: version.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Syntactic type references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Numeric,
    Integer,
    Text,
    DateTime,
    Date,
    Flag,
}

/// A component's declared type as written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeRef {
    /// Primitive type; only `Numeric` honours `unit`.
    Primitive {
        kind: PrimitiveKind,
        unit: Option<String>,
    },
    Identifier,
    /// `CodedValue<CDISC.CT.SEX>`; the code list is a dotted reference.
    CodedValue { code_list: Option<Vec<String>> },
}

impl TypeRef {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive { kind, unit: None }
    }

    pub fn numeric_with_unit(unit: impl Into<String>) -> Self {
        TypeRef::Primitive {
            kind: PrimitiveKind::Numeric,
            unit: Some(unit.into()),
        }
    }

    pub fn coded(code_list: &str) -> Self {
        TypeRef::CodedValue {
            code_list: Some(code_list.split('.').map(String::from).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Cubes
// ---------------------------------------------------------------------------

/// A data cube: the structure of one analysis dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeDef {
    pub name: String,
    pub namespace: Option<String>,
    pub structure: CubeStructure,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeStructure {
    pub dimensions: Vec<ComponentDef>,
    pub measures: Vec<ComponentDef>,
    pub attributes: Vec<ComponentDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub name: String,
    pub ty: TypeRef,
}

impl ComponentDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl CubeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            structure: CubeStructure::default(),
        }
    }

    pub fn dimension(mut self, name: &str, ty: TypeRef) -> Self {
        self.structure.dimensions.push(ComponentDef::new(name, ty));
        self
    }

    pub fn measure(mut self, name: &str, ty: TypeRef) -> Self {
        self.structure.measures.push(ComponentDef::new(name, ty));
        self
    }

    pub fn attribute(mut self, name: &str, ty: TypeRef) -> Self {
        self.structure.attributes.push(ComponentDef::new(name, ty));
        self
    }
}

// ---------------------------------------------------------------------------
// Concepts
// ---------------------------------------------------------------------------

/// A concept in the is-a / type-of hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDef {
    pub name: String,
    /// Parent concept (`type_of`), plain or dotted-qualified.
    pub parent: Option<String>,
    pub namespace: Option<String>,
    pub properties: Vec<PropertyDef>,
    pub code_lists: Vec<CodeListMapping>,
}

impl ConceptDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            namespace: None,
            properties: Vec::new(),
            code_lists: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    /// Declared type: a concept name or a primitive type name.
    pub ty: String,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeListMapping {
    pub system: String,
    pub code: String,
}

// ---------------------------------------------------------------------------
// Slices, derivations, aggregates, displays
// ---------------------------------------------------------------------------

/// A sub-cube selected from a cube or another slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceDef {
    pub name: String,
    pub source: String,
    pub fix: Vec<FixedDimension>,
    pub vary: Vec<String>,
    pub measures: Vec<String>,
    pub where_clause: Option<Expr>,
}

impl SliceDef {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            fix: Vec::new(),
            vary: Vec::new(),
            measures: Vec::new(),
            where_clause: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedDimension {
    pub dimension: String,
    pub value: Expr,
}

impl FixedDimension {
    pub fn new(dimension: impl Into<String>, value: Expr) -> Self {
        Self {
            dimension: dimension.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeriveDef {
    pub name: String,
    pub input: String,
    pub derivations: Vec<Derivation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    pub name: String,
    pub expr: Expr,
}

impl Derivation {
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateDef {
    pub name: String,
    pub input: String,
    pub group_by: Vec<String>,
    pub statistics: Vec<Statistic>,
}

/// `n_subj = count()` or `mean_chg = mean(CHG)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub name: String,
    pub function: String,
    pub measure: Option<String>,
}

impl Statistic {
    pub fn new(name: impl Into<String>, function: impl Into<String>, measure: Option<&str>) -> Self {
        Self {
            name: name.into(),
            function: function.into(),
            measure: measure.map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayDef {
    pub name: String,
    pub source: String,
    pub title: Option<String>,
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Gaussian,
    Binomial,
    Poisson,
    Gamma,
    InverseGaussian,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Family::Gaussian => "Gaussian",
            Family::Binomial => "Binomial",
            Family::Poisson => "Poisson",
            Family::Gamma => "Gamma",
            Family::InverseGaussian => "InverseGaussian",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkFunction {
    Identity,
    Log,
    Inverse,
    Logit,
    Probit,
    Sqrt,
}

impl fmt::Display for LinkFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkFunction::Identity => "Identity",
            LinkFunction::Log => "Log",
            LinkFunction::Inverse => "Inverse",
            LinkFunction::Logit => "Logit",
            LinkFunction::Probit => "Probit",
            LinkFunction::Sqrt => "Sqrt",
        };
        f.write_str(s)
    }
}

/// Statistical model specification (ANCOVA, GLM, MMRM...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    pub name: String,
    pub input: String,
    pub formula: Formula,
    pub family: Option<Family>,
    pub link: Option<LinkFunction>,
    pub random_effects: Option<RandomEffects>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>, input: impl Into<String>, formula: Formula) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            formula,
            family: None,
            link: None,
            random_effects: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEffects {
    /// Grouping factor; must be a dimension of the input cube.
    pub subject: String,
    /// Covariance structure name, e.g. `unstructured`.
    pub structure: Option<String>,
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDef {
    pub name: String,
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    /// Name of the slice/model/aggregate/display/derive this stage runs.
    pub operation: String,
    pub depends_on: Vec<String>,
}

impl Stage {
    pub fn new(name: impl Into<String>, operation: impl Into<String>, depends_on: &[&str]) -> Self {
        Self {
            name: name.into(),
            operation: operation.into(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        }
    }
}
