use std::path::Path;

use anyhow::Result;
use sap_config::SapConfig;
use sap_lang::ast::Program;

/// Read a parsed program handed over by the front end as JSON.
pub fn load_program(path: &Path) -> Result<Program> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{}: not a valid program document: {e}", path.display()))
}

/// Explicit config file, else `sap.toml` in the working directory if
/// present, else defaults.
pub fn load_config(path: Option<&Path>) -> Result<SapConfig> {
    match path {
        Some(p) => SapConfig::load(p),
        None => {
            let local = Path::new("sap.toml");
            if local.is_file() {
                SapConfig::load(local)
            } else {
                Ok(SapConfig::default())
            }
        }
    }
}
