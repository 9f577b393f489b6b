use std::collections::HashSet;

use crate::cdisc::CoreRuleConfig;
use crate::sap::SapConfig;

/// Internal validation, called automatically by `SapConfig::from_str` / `load`.
pub(crate) fn validate(config: &SapConfig) -> anyhow::Result<()> {
    if config.logging.level.trim().is_empty() {
        anyhow::bail!("logging.level must not be empty");
    }

    if config.report.max_issues == Some(0) {
        anyhow::bail!("report.max_issues must be > 0");
    }

    for (i, target) in config.cdisc.targets.iter().enumerate() {
        if target.cube.trim().is_empty() {
            anyhow::bail!("cdisc.targets[{}]: cube must not be empty", i);
        }
        if target.dataset.trim().is_empty() {
            anyhow::bail!("cdisc.targets[{}]: dataset must not be empty", i);
        }
    }

    let mut seen = HashSet::new();
    for (i, rule) in config.cdisc.core_rules.iter().enumerate() {
        validate_rule(rule).map_err(|e| anyhow::anyhow!("cdisc.core_rules[{}]: {}", i, e))?;
        if !seen.insert(rule.id()) {
            anyhow::bail!("cdisc.core_rules[{}]: duplicate rule id {:?}", i, rule.id());
        }
    }

    Ok(())
}

fn validate_rule(rule: &CoreRuleConfig) -> anyhow::Result<()> {
    if rule.id().trim().is_empty() {
        anyhow::bail!("rule id must not be empty");
    }
    let variables = rule.variables();
    if variables.is_empty() {
        anyhow::bail!("rule {} names no variables", rule.id());
    }
    if variables.iter().any(|v| v.trim().is_empty()) {
        anyhow::bail!("rule {} has an empty variable name", rule.id());
    }
    if let CoreRuleConfig::ValueInCodeList { code_list, .. } = rule
        && code_list.trim().is_empty()
    {
        anyhow::bail!("rule {} has an empty code_list", rule.id());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::SapConfig;

    fn parse_err(toml: &str) -> String {
        toml.parse::<SapConfig>().unwrap_err().to_string()
    }

    #[test]
    fn rejects_empty_level() {
        assert!(parse_err("[logging]\nlevel = \" \"\n").contains("logging.level"));
    }

    #[test]
    fn rejects_zero_issue_cap() {
        assert!(parse_err("[report]\nmax_issues = 0\n").contains("max_issues"));
    }

    #[test]
    fn rejects_blank_target_names() {
        let toml = r#"
[[cdisc.targets]]
cube = ""
standard = "SDTM"
dataset = "DM"
"#;
        assert!(parse_err(toml).contains("cdisc.targets[0]: cube"));
    }

    #[test]
    fn rejects_duplicate_rule_ids() {
        let toml = r#"
[[cdisc.core_rules]]
rule = "no_duplicate_key"
id = "CORE-000001"
keys = ["USUBJID"]

[[cdisc.core_rules]]
rule = "iso8601_date"
id = "CORE-000001"
variables = ["ADT"]
"#;
        assert!(parse_err(toml).contains("duplicate rule id"));
    }

    #[test]
    fn rejects_rule_without_variables() {
        let toml = r#"
[[cdisc.core_rules]]
rule = "no_duplicate_key"
id = "CORE-000001"
keys = []
"#;
        assert!(parse_err(toml).contains("names no variables"));
    }

    #[test]
    fn rejects_blank_code_list() {
        let toml = r#"
[[cdisc.core_rules]]
rule = "value_in_code_list"
id = "CORE-000009"
variable = "SEX"
code_list = ""
"#;
        assert!(parse_err(toml).contains("empty code_list"));
    }
}
