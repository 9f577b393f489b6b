use std::collections::BTreeMap;
use std::fmt;

use sap_lang::Type;
use serde::{Deserialize, Serialize};

/// Standard a dataset definition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Standard {
    #[serde(rename = "SDTM")]
    Sdtm,
    #[serde(rename = "ADaM")]
    Adam,
}

impl Standard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::Sdtm => "SDTM",
            Standard::Adam => "ADaM",
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableRole {
    Identifier,
    Topic,
    GroupingQualifier,
    ResultQualifier,
    RecordQualifier,
    Timing,
    /// ADaM analysis variables (AVAL, CHG, flags...).
    Analysis,
}

/// Req / Exp / Perm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreDesignation {
    Required,
    Expected,
    Permissible,
}

impl CoreDesignation {
    pub fn as_code(&self) -> &'static str {
        match self {
            CoreDesignation::Required => "Req",
            CoreDesignation::Expected => "Exp",
            CoreDesignation::Permissible => "Perm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDef {
    pub name: String,
    pub ty: Type,
    pub role: VariableRole,
    pub core: CoreDesignation,
}

impl VariableDef {
    pub fn new(name: &str, ty: Type, role: VariableRole, core: CoreDesignation) -> Self {
        Self {
            name: name.to_string(),
            ty,
            role,
            core,
        }
    }
}

/// An SDTM domain or ADaM dataset structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainDef {
    pub standard: Standard,
    /// `DM`, `AE`, `ADSL`, `BDS`...
    pub code: String,
    pub label: String,
    pub variables: Vec<VariableDef>,
    /// Variables that together identify one record.
    pub keys: Vec<String>,
}

impl DomainDef {
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &VariableDef> {
        self.variables
            .iter()
            .filter(|v| v.core == CoreDesignation::Required)
    }
}

/// One permissible value of a code list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    /// NCI concept code, e.g. `C20197`.
    pub code: String,
    pub submission_value: String,
    pub decode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeList {
    /// Dotted name used by cube types, e.g. `CDISC.CT.SEX`.
    pub name: String,
    pub code: String,
    pub extensible: bool,
    terms: BTreeMap<String, Term>,
}

impl CodeList {
    pub fn new(name: &str, code: &str, extensible: bool) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            extensible,
            terms: BTreeMap::new(),
        }
    }

    pub fn with_term(mut self, code: &str, submission_value: &str, decode: &str) -> Self {
        self.terms.insert(
            submission_value.to_string(),
            Term {
                code: code.to_string(),
                submission_value: submission_value.to_string(),
                decode: decode.to_string(),
            },
        );
        self
    }

    pub fn contains(&self, submission_value: &str) -> bool {
        self.terms.contains_key(submission_value)
    }

    pub fn decode(&self, submission_value: &str) -> Option<&str> {
        self.terms.get(submission_value).map(|t| t.decode.as_str())
    }

    /// Submission value for an NCI code.
    pub fn value_for_code(&self, code: &str) -> Option<&str> {
        self.terms
            .values()
            .find(|t| t.code == code)
            .map(|t| t.submission_value.as_str())
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }
}

/// Registry of dataset structures and controlled terminology.
#[derive(Debug, Clone, Default)]
pub struct StandardsMetadata {
    domains: BTreeMap<(Standard, String), DomainDef>,
    code_lists: BTreeMap<String, CodeList>,
}

impl StandardsMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_domain(&mut self, domain: DomainDef) {
        self.domains
            .insert((domain.standard, domain.code.clone()), domain);
    }

    pub fn register_code_list(&mut self, list: CodeList) {
        self.code_lists.insert(list.name.clone(), list);
    }

    pub fn domain(&self, standard: Standard, code: &str) -> Option<&DomainDef> {
        self.domains.get(&(standard, code.to_string()))
    }

    pub fn domain_codes(&self, standard: Standard) -> impl Iterator<Item = &str> {
        self.domains
            .keys()
            .filter(move |(s, _)| *s == standard)
            .map(|(_, code)| code.as_str())
    }

    pub fn code_list(&self, name: &str) -> Option<&CodeList> {
        self.code_lists.get(name)
    }

    /// Membership check; `None` when the code list is not registered.
    pub fn is_valid_code(&self, code_list: &str, value: &str) -> Option<bool> {
        self.code_list(code_list).map(|cl| cl.contains(value))
    }

    pub fn decode(&self, code_list: &str, value: &str) -> Option<&str> {
        self.code_list(code_list)?.decode(value)
    }

    /// Registry preloaded with the common SDTM domains, ADaM structures
    /// and the code lists they reference.
    pub fn builtin() -> Self {
        let mut meta = Self::new();
        for domain in builtin_domains() {
            meta.register_domain(domain);
        }
        for list in builtin_code_lists() {
            meta.register_code_list(list);
        }
        meta
    }
}

// ---------------------------------------------------------------------------
// Built-in definitions
// ---------------------------------------------------------------------------

fn var(name: &str, ty: Type, role: VariableRole, core: CoreDesignation) -> VariableDef {
    VariableDef::new(name, ty, role, core)
}

fn domain(
    standard: Standard,
    code: &str,
    label: &str,
    variables: Vec<VariableDef>,
    keys: &[&str],
) -> DomainDef {
    DomainDef {
        standard,
        code: code.to_string(),
        label: label.to_string(),
        variables,
        keys: keys.iter().map(|k| k.to_string()).collect(),
    }
}

fn builtin_domains() -> Vec<DomainDef> {
    use CoreDesignation::{Expected as Exp, Permissible as Perm, Required as Req};
    use VariableRole::{
        Analysis, GroupingQualifier, Identifier, RecordQualifier, ResultQualifier, Timing, Topic,
    };

    let num = Type::numeric;
    vec![
        domain(
            Standard::Sdtm,
            "DM",
            "Demographics",
            vec![
                var("STUDYID", Type::Text, Identifier, Req),
                var("DOMAIN", Type::Text, Identifier, Req),
                var("USUBJID", Type::Text, Identifier, Req),
                var("SUBJID", Type::Text, Topic, Req),
                var("RFSTDTC", Type::DateTime, RecordQualifier, Exp),
                var("SITEID", Type::Text, RecordQualifier, Req),
                var("AGE", num(), RecordQualifier, Exp),
                var("AGEU", Type::coded("CDISC.CT.AGEU"), ResultQualifier, Exp),
                var("SEX", Type::coded("CDISC.CT.SEX"), RecordQualifier, Req),
                var("RACE", Type::CodedValue { code_list: None }, RecordQualifier, Exp),
                var("ARMCD", Type::Text, RecordQualifier, Exp),
                var("ARM", Type::Text, RecordQualifier, Exp),
                var("COUNTRY", Type::Text, RecordQualifier, Req),
            ],
            &["STUDYID", "USUBJID"],
        ),
        domain(
            Standard::Sdtm,
            "AE",
            "Adverse Events",
            vec![
                var("STUDYID", Type::Text, Identifier, Req),
                var("DOMAIN", Type::Text, Identifier, Req),
                var("USUBJID", Type::Text, Identifier, Req),
                var("AESEQ", num(), Identifier, Req),
                var("AETERM", Type::Text, Topic, Req),
                var("AEDECOD", Type::Text, ResultQualifier, Req),
                var("AEBODSYS", Type::Text, GroupingQualifier, Exp),
                var("AESEV", Type::CodedValue { code_list: None }, RecordQualifier, Perm),
                var("AESER", Type::coded("CDISC.CT.NY"), RecordQualifier, Exp),
                var("AESTDTC", Type::DateTime, Timing, Exp),
                var("AEENDTC", Type::DateTime, Timing, Exp),
            ],
            &["STUDYID", "USUBJID", "AEDECOD", "AESTDTC"],
        ),
        domain(
            Standard::Sdtm,
            "VS",
            "Vital Signs",
            vec![
                var("STUDYID", Type::Text, Identifier, Req),
                var("DOMAIN", Type::Text, Identifier, Req),
                var("USUBJID", Type::Text, Identifier, Req),
                var("VSSEQ", num(), Identifier, Req),
                var("VSTESTCD", Type::coded("CDISC.CT.VSTESTCD"), Topic, Req),
                var("VSTEST", Type::Text, ResultQualifier, Req),
                var("VSORRES", Type::Text, ResultQualifier, Exp),
                var("VSORRESU", Type::Text, ResultQualifier, Exp),
                var("VSSTRESN", num(), ResultQualifier, Exp),
                var("VSSTRESU", Type::Text, ResultQualifier, Exp),
                var("VISITNUM", num(), Timing, Exp),
                var("VSDTC", Type::DateTime, Timing, Exp),
            ],
            &["STUDYID", "USUBJID", "VSTESTCD", "VISITNUM"],
        ),
        domain(
            Standard::Adam,
            "ADSL",
            "Subject-Level Analysis Dataset",
            vec![
                var("STUDYID", Type::Text, Identifier, Req),
                var("USUBJID", Type::Text, Identifier, Req),
                var("SUBJID", Type::Text, Identifier, Req),
                var("SITEID", Type::Text, Identifier, Req),
                var("AGE", num(), RecordQualifier, Req),
                var("AGEU", Type::coded("CDISC.CT.AGEU"), RecordQualifier, Req),
                var("SEX", Type::coded("CDISC.CT.SEX"), RecordQualifier, Req),
                var("RACE", Type::CodedValue { code_list: None }, RecordQualifier, Req),
                var("ARM", Type::Text, RecordQualifier, Req),
                var("TRT01P", Type::Text, RecordQualifier, Req),
                var("TRT01A", Type::Text, RecordQualifier, Exp),
                var("SAFFL", Type::Flag, Analysis, Exp),
                var("ITTFL", Type::Flag, Analysis, Exp),
                var("TRTSDT", Type::Date, Timing, Exp),
                var("TRTEDT", Type::Date, Timing, Exp),
            ],
            &["STUDYID", "USUBJID"],
        ),
        domain(
            Standard::Adam,
            "BDS",
            "Basic Data Structure",
            vec![
                var("STUDYID", Type::Text, Identifier, Req),
                var("USUBJID", Type::Text, Identifier, Req),
                var("PARAMCD", Type::CodedValue { code_list: None }, Topic, Req),
                var("PARAM", Type::Text, Topic, Req),
                var("AVAL", num(), Analysis, Exp),
                var("AVALC", Type::Text, Analysis, Perm),
                var("BASE", num(), Analysis, Exp),
                var("CHG", num(), Analysis, Exp),
                var("PCHG", num(), Analysis, Perm),
                var("AVISIT", Type::Text, Timing, Exp),
                var("AVISITN", num(), Timing, Exp),
                var("ADT", Type::Date, Timing, Perm),
                var("TRTP", Type::Text, RecordQualifier, Exp),
                var("TRT01A", Type::Text, RecordQualifier, Perm),
                var("ABLFL", Type::Flag, Analysis, Exp),
                var("ANL01FL", Type::Flag, Analysis, Perm),
            ],
            &["STUDYID", "USUBJID", "PARAMCD", "AVISIT"],
        ),
    ]
}

fn builtin_code_lists() -> Vec<CodeList> {
    vec![
        CodeList::new("CDISC.CT.SEX", "C66731", false)
            .with_term("C20197", "M", "Male")
            .with_term("C16576", "F", "Female")
            .with_term("C17998", "U", "Unknown"),
        CodeList::new("CDISC.CT.NY", "C66742", false)
            .with_term("C49488", "Y", "Yes")
            .with_term("C49487", "N", "No"),
        CodeList::new("CDISC.CT.AGEU", "C66781", false)
            .with_term("C29848", "YEARS", "Years")
            .with_term("C29846", "MONTHS", "Months"),
        CodeList::new("CDISC.CT.VSTESTCD", "C66741", true)
            .with_term("C25298", "SYSBP", "Systolic Blood Pressure")
            .with_term("C25299", "DIABP", "Diastolic Blood Pressure")
            .with_term("C49676", "PULSE", "Pulse Rate")
            .with_term("C25206", "TEMP", "Temperature")
            .with_term("C25347", "HEIGHT", "Height")
            .with_term("C25208", "WEIGHT", "Weight"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_core_domains() {
        let meta = StandardsMetadata::builtin();
        let dm = meta.domain(Standard::Sdtm, "DM").expect("DM");
        assert_eq!(dm.keys, vec!["STUDYID", "USUBJID"]);
        assert!(dm.required().any(|v| v.name == "USUBJID"));
        assert!(meta.domain(Standard::Adam, "DM").is_none());
        let adam: Vec<&str> = meta.domain_codes(Standard::Adam).collect();
        assert_eq!(adam, vec!["ADSL", "BDS"]);
    }

    #[test]
    fn code_list_membership_and_decode() {
        let meta = StandardsMetadata::builtin();
        assert_eq!(meta.is_valid_code("CDISC.CT.SEX", "M"), Some(true));
        assert_eq!(meta.is_valid_code("CDISC.CT.SEX", "MALE"), Some(false));
        assert_eq!(meta.is_valid_code("CDISC.CT.NOPE", "M"), None);
        assert_eq!(meta.decode("CDISC.CT.NY", "Y"), Some("Yes"));
        let sex = meta.code_list("CDISC.CT.SEX").expect("SEX");
        assert_eq!(sex.value_for_code("C16576"), Some("F"));
        assert!(!sex.extensible);
    }
}
