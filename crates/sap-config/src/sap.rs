use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::cdisc::CdiscConfig;
use crate::checks::ChecksConfig;
use crate::logging::LoggingConfig;
use crate::report::ReportConfig;
use crate::validate;

/// Resolved, validated `sap.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SapConfig {
    pub logging: LoggingConfig,
    pub checks: ChecksConfig,
    pub report: ReportConfig,
    pub cdisc: CdiscConfig,
}

impl SapConfig {
    /// Read and parse a `sap.toml` file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.as_ref().display()))?;
        content.parse()
    }
}

impl FromStr for SapConfig {
    type Err = anyhow::Error;

    fn from_str(toml_str: &str) -> anyhow::Result<Self> {
        let config: SapConfig = toml::from_str(toml_str)?;
        validate::validate(&config)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
