use serde::Deserialize;

/// `[checks]`: which validator families run. All enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Symbol table, type checker and construct validators.
    pub language: bool,
    pub concepts: bool,
    pub w3c: bool,
    /// Standards versions, SDTM/ADaM targets and CORE rules.
    pub cdisc: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            language: true,
            concepts: true,
            w3c: true,
            cdisc: true,
        }
    }
}
