mod functions;
mod infer;

pub use functions::{FunctionRule, aggregate_function_names, function_rule, is_aggregate_function};
pub use infer::{infer_binary, infer_function_call, infer_literal, infer_unary};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Type: semantic value types
// ---------------------------------------------------------------------------

/// Semantic type of an expression or cube component.
///
/// Equality is structural. Assignability is one-directional: see
/// [`Type::is_assignable_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Real-valued quantity with an optional unit of measure.
    Numeric { unit: Option<String> },
    Integer,
    Text,
    DateTime,
    Date,
    Flag,
    Identifier,
    /// Coded value, optionally constrained to a dotted code-list name.
    CodedValue { code_list: Option<String> },
    Cube(CubeType),
    /// Type that cannot be determined statically. Never reported.
    Unknown,
    /// Erroneous type. Carries the reason when it originates a diagnostic.
    Error(Option<String>),
}

impl Type {
    pub fn numeric() -> Self {
        Type::Numeric { unit: None }
    }

    pub fn numeric_in(unit: impl Into<String>) -> Self {
        Type::Numeric {
            unit: Some(unit.into()),
        }
    }

    pub fn coded(code_list: impl Into<String>) -> Self {
        Type::CodedValue {
            code_list: Some(code_list.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Type::Error(Some(message.into()))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    /// Error or Unknown: compatible with everything.
    pub fn is_permissive(&self) -> bool {
        self.is_error() || self.is_unknown()
    }

    /// Numeric or Integer.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Numeric { .. } | Type::Integer)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Type::Date | Type::DateTime)
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            Type::Numeric { unit } => unit.as_deref(),
            _ => None,
        }
    }

    pub fn as_cube(&self) -> Option<&CubeType> {
        match self {
            Type::Cube(c) => Some(c),
            _ => None,
        }
    }

    /// Whether a value of `self` may be used where `target` is expected.
    ///
    /// Rules: Error/Unknown on either side is always compatible;
    /// Integer ⊆ Numeric (no unit); Date ⊆ DateTime; a constrained
    /// CodedValue ⊆ the unconstrained CodedValue. Numeric units must
    /// match exactly.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        if self.is_permissive() || target.is_permissive() {
            return true;
        }
        match (self, target) {
            (Type::Numeric { unit: a }, Type::Numeric { unit: b }) => a == b,
            (Type::Integer, Type::Integer) => true,
            (Type::Integer, Type::Numeric { unit: None }) => true,
            (Type::Date, Type::Date) | (Type::Date, Type::DateTime) => true,
            (Type::DateTime, Type::DateTime) => true,
            (Type::Text, Type::Text) => true,
            (Type::Flag, Type::Flag) => true,
            (Type::Identifier, Type::Identifier) => true,
            (Type::CodedValue { code_list: a }, Type::CodedValue { code_list: b }) => {
                match (a, b) {
                    (_, None) => true,
                    (Some(a), Some(b)) => a == b,
                    (None, Some(_)) => false,
                }
            }
            (Type::Cube(a), Type::Cube(b)) => a.is_nominally(b),
            _ => false,
        }
    }

    /// Short kind name without parameters, e.g. `Numeric` for `Numeric(kg)`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Numeric { .. } => "Numeric",
            Type::Integer => "Integer",
            Type::Text => "Text",
            Type::DateTime => "DateTime",
            Type::Date => "Date",
            Type::Flag => "Flag",
            Type::Identifier => "Identifier",
            Type::CodedValue { .. } => "CodedValue",
            Type::Cube(_) => "Cube",
            Type::Unknown => "Unknown",
            Type::Error(_) => "Error",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Numeric { unit: Some(u) } => write!(f, "Numeric({})", u),
            Type::CodedValue { code_list: Some(cl) } => write!(f, "CodedValue<{}>", cl),
            Type::Cube(c) => write!(f, "Cube<{}>", c.name),
            Type::Error(Some(msg)) => write!(f, "Error({})", msg),
            other => f.write_str(other.kind_name()),
        }
    }
}

// ---------------------------------------------------------------------------
// CubeType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentRole {
    Dimension,
    Measure,
    Attribute,
}

impl ComponentRole {
    /// `a dimension`, `a measure`, `an attribute`.
    pub fn with_article(self) -> &'static str {
        match self {
            ComponentRole::Dimension => "a dimension",
            ComponentRole::Measure => "a measure",
            ComponentRole::Attribute => "an attribute",
        }
    }
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentRole::Dimension => "dimension",
            ComponentRole::Measure => "measure",
            ComponentRole::Attribute => "attribute",
        };
        f.write_str(s)
    }
}

/// Resolved structure of a cube: component name → type, per role.
///
/// Derived equality is deep (structural); [`CubeType::is_nominally`]
/// compares names only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeType {
    pub name: String,
    pub dimensions: BTreeMap<String, Type>,
    pub measures: BTreeMap<String, Type>,
    pub attributes: BTreeMap<String, Type>,
}

impl CubeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_nominally(&self, other: &CubeType) -> bool {
        self.name == other.name
    }

    /// Role and type of a component, searching dimensions, then measures,
    /// then attributes.
    pub fn role_of(&self, name: &str) -> Option<(ComponentRole, &Type)> {
        if let Some(t) = self.dimensions.get(name) {
            return Some((ComponentRole::Dimension, t));
        }
        if let Some(t) = self.measures.get(name) {
            return Some((ComponentRole::Measure, t));
        }
        self.attributes
            .get(name)
            .map(|t| (ComponentRole::Attribute, t))
    }

    pub fn component_type(&self, name: &str) -> Option<&Type> {
        self.role_of(name).map(|(_, t)| t)
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.role_of(name).is_some()
    }

    /// All component names (dimensions, measures, attributes).
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions
            .keys()
            .chain(self.measures.keys())
            .chain(self.attributes.keys())
            .map(String::as_str)
    }

    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(String::as_str)
    }

    pub fn insert(&mut self, role: ComponentRole, name: impl Into<String>, ty: Type) {
        let map = match role {
            ComponentRole::Dimension => &mut self.dimensions,
            ComponentRole::Measure => &mut self.measures,
            ComponentRole::Attribute => &mut self.attributes,
        };
        map.insert(name.into(), ty);
    }
}

#[cfg(test)]
mod tests;
