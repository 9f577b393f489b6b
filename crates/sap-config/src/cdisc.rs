use sap_conform::Standard;
use serde::Deserialize;

/// `[cdisc]` section: cubes to hold against a standard dataset structure,
/// plus the CORE rules applied to every target cube.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CdiscConfig {
    pub targets: Vec<TargetConfig>,
    pub core_rules: Vec<CoreRuleConfig>,
}

/// `[[cdisc.targets]]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetConfig {
    pub cube: String,
    pub standard: Standard,
    /// Domain or dataset structure code, e.g. `DM`, `ADSL`, `BDS`.
    pub dataset: String,
}

/// `[[cdisc.core_rules]]`, tagged by `rule`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CoreRuleConfig {
    NoDuplicateKey {
        id: String,
        keys: Vec<String>,
    },
    Iso8601Date {
        id: String,
        variables: Vec<String>,
    },
    DatetimeOrder {
        id: String,
        start: String,
        end: String,
    },
    RequiredIf {
        id: String,
        if_present: String,
        then_required: String,
    },
    ValueInCodeList {
        id: String,
        variable: String,
        code_list: String,
    },
}

impl CoreRuleConfig {
    pub fn id(&self) -> &str {
        match self {
            Self::NoDuplicateKey { id, .. }
            | Self::Iso8601Date { id, .. }
            | Self::DatetimeOrder { id, .. }
            | Self::RequiredIf { id, .. }
            | Self::ValueInCodeList { id, .. } => id,
        }
    }

    /// Variable names the rule refers to.
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Self::NoDuplicateKey { keys, .. } => keys.iter().map(String::as_str).collect(),
            Self::Iso8601Date { variables, .. } => variables.iter().map(String::as_str).collect(),
            Self::DatetimeOrder { start, end, .. } => vec![start.as_str(), end.as_str()],
            Self::RequiredIf {
                if_present,
                then_required,
                ..
            } => vec![if_present.as_str(), then_required.as_str()],
            Self::ValueInCodeList { variable, .. } => vec![variable.as_str()],
        }
    }
}
