/// Result-type rule for a known function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRule {
    /// Always `Numeric` (no unit).
    Numeric,
    /// Always `Integer`.
    Integer,
    /// Same type as the first argument.
    FirstArg,
}

/// Known math and statistical functions. Read-only for the process lifetime.
const FUNCTIONS: &[(&str, FunctionRule, bool)] = &[
    // (name, rule, is_aggregate)
    ("abs", FunctionRule::Numeric, false),
    ("sqrt", FunctionRule::Numeric, false),
    ("exp", FunctionRule::Numeric, false),
    ("log", FunctionRule::Numeric, false),
    ("ln", FunctionRule::Numeric, false),
    ("log10", FunctionRule::Numeric, false),
    ("log2", FunctionRule::Numeric, false),
    ("pow", FunctionRule::Numeric, false),
    ("round", FunctionRule::Numeric, false),
    ("floor", FunctionRule::Numeric, false),
    ("ceil", FunctionRule::Numeric, false),
    ("mean", FunctionRule::Numeric, true),
    ("avg", FunctionRule::Numeric, true),
    ("median", FunctionRule::Numeric, true),
    ("sum", FunctionRule::Numeric, true),
    ("sd", FunctionRule::Numeric, true),
    ("stddev", FunctionRule::Numeric, true),
    ("var", FunctionRule::Numeric, true),
    ("variance", FunctionRule::Numeric, true),
    ("se", FunctionRule::Numeric, true),
    ("quantile", FunctionRule::Numeric, true),
    ("percentile", FunctionRule::Numeric, true),
    ("geomean", FunctionRule::Numeric, true),
    ("count", FunctionRule::Integer, true),
    ("n", FunctionRule::Integer, true),
    ("min", FunctionRule::FirstArg, true),
    ("max", FunctionRule::FirstArg, true),
];

pub fn function_rule(name: &str) -> Option<FunctionRule> {
    FUNCTIONS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, rule, _)| *rule)
}

/// Whether `name` summarises many observations into one value.
pub fn is_aggregate_function(name: &str) -> bool {
    FUNCTIONS.iter().any(|(n, _, agg)| *n == name && *agg)
}

/// Names of all aggregate functions, for suggestions.
pub fn aggregate_function_names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS
        .iter()
        .filter(|(_, _, agg)| *agg)
        .map(|(n, _, _)| *n)
}
