use std::collections::BTreeSet;

use sap_lang::suggest::did_you_mean;
use sap_lang::{CubeType, Diagnostic, DiagnosticSource, Type};

use super::metadata::{CoreDesignation, Standard, StandardsMetadata};

/// Whether a cube component of type `actual` satisfies a standard variable
/// declared as `expected`. Besides same-kind matches the looseness is one
/// way only: Identifier for Text, Integer for Numeric, DateTime for Date.
pub fn types_compatible(actual: &Type, expected: &Type) -> bool {
    if actual.is_permissive() || expected.is_permissive() {
        return true;
    }
    if actual.kind_name() == expected.kind_name() {
        return true;
    }
    matches!(
        (actual, expected),
        (Type::Identifier, Type::Text)
            | (Type::Integer, Type::Numeric { .. })
            | (Type::DateTime, Type::Date)
    )
}

/// Check `cube` against SDTM domain `domain` (e.g. `DM`).
pub fn validate_sdtm(cube: &CubeType, domain: &str, meta: &StandardsMetadata) -> Vec<Diagnostic> {
    validate_structure(Standard::Sdtm, cube, domain, meta)
}

/// Check `cube` against ADaM dataset structure `dataset` (e.g. `ADSL`, `BDS`).
pub fn validate_adam(cube: &CubeType, dataset: &str, meta: &StandardsMetadata) -> Vec<Diagnostic> {
    validate_structure(Standard::Adam, cube, dataset, meta)
}

fn source_of(standard: Standard) -> DiagnosticSource {
    match standard {
        Standard::Sdtm => DiagnosticSource::Sdtm,
        Standard::Adam => DiagnosticSource::Adam,
    }
}

fn validate_structure(
    standard: Standard,
    cube: &CubeType,
    code: &str,
    meta: &StandardsMetadata,
) -> Vec<Diagnostic> {
    let source = source_of(standard);
    let mut diags = Vec::new();

    let Some(def) = meta.domain(standard, code) else {
        let mut diag = Diagnostic::error(
            source,
            format!("Unknown {} dataset '{}'", standard, code),
        )
        .with_code("unknown-dataset");
        if let Some(hint) = did_you_mean(code, meta.domain_codes(standard)) {
            diag = diag.with_suggestion(hint);
        }
        diags.push(diag);
        return diags;
    };

    let mut missing = BTreeSet::new();
    for variable in &def.variables {
        match cube.component_type(&variable.name) {
            Some(actual) => {
                if !types_compatible(actual, &variable.ty) {
                    diags.push(
                        Diagnostic::error(
                            source,
                            format!(
                                "Variable '{}' has type {} but {} {} declares {}",
                                variable.name, actual, standard, def.code, variable.ty
                            ),
                        )
                        .with_code("incompatible-type"),
                    );
                }
            }
            None => match variable.core {
                CoreDesignation::Required => {
                    missing.insert(variable.name.as_str());
                    diags.push(
                        Diagnostic::error(
                            source,
                            format!(
                                "Required {} variable '{}' is missing from cube '{}' ({})",
                                standard, variable.name, cube.name, def.code
                            ),
                        )
                        .with_code("missing-required"),
                    );
                }
                CoreDesignation::Expected => diags.push(
                    Diagnostic::warning(
                        source,
                        format!(
                            "Expected {} variable '{}' is missing from cube '{}' ({})",
                            standard, variable.name, cube.name, def.code
                        ),
                    )
                    .with_code("missing-expected"),
                ),
                CoreDesignation::Permissible => {}
            },
        }
    }

    for key in &def.keys {
        if !cube.has_component(key) && !missing.contains(key.as_str()) {
            diags.push(
                Diagnostic::warning(
                    source,
                    format!(
                        "Key variable '{}' of {} is missing from cube '{}'; records may not be unique",
                        key, def.code, cube.name
                    ),
                )
                .with_code("missing-key"),
            );
        }
    }

    for name in cube.component_names() {
        if def.variable(name).is_none() {
            diags.push(
                Diagnostic::hint(
                    source,
                    format!("Variable '{}' is not defined by {} {}", name, standard, def.code),
                )
                .with_code("non-standard-variable"),
            );
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use sap_lang::{ComponentRole, Severity};

    fn cube(components: &[(ComponentRole, &str, Type)]) -> CubeType {
        let mut c = CubeType::new("X");
        for (role, name, ty) in components {
            c.insert(*role, *name, ty.clone());
        }
        c
    }

    fn codes(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().filter_map(|d| d.code.as_deref()).collect()
    }

    #[test]
    fn compatibility_is_one_directional() {
        assert!(types_compatible(&Type::Identifier, &Type::Text));
        assert!(!types_compatible(&Type::Text, &Type::Identifier));
        assert!(types_compatible(&Type::Integer, &Type::numeric()));
        assert!(!types_compatible(&Type::numeric(), &Type::Integer));
        assert!(types_compatible(&Type::DateTime, &Type::Date));
        assert!(!types_compatible(&Type::Date, &Type::Text));
        assert!(types_compatible(&Type::coded("CDISC.CT.SEX"), &Type::CodedValue { code_list: None }));
    }

    #[test]
    fn adsl_reports_missing_and_mistyped_variables() {
        use ComponentRole::*;
        let meta = StandardsMetadata::builtin();
        let adsl = cube(&[
            (Dimension, "STUDYID", Type::Text),
            (Dimension, "USUBJID", Type::Identifier),
            (Attribute, "SUBJID", Type::Text),
            (Attribute, "SITEID", Type::Text),
            (Measure, "AGE", Type::Integer),
            (Attribute, "AGEU", Type::coded("CDISC.CT.AGEU")),
            (Attribute, "SEX", Type::coded("CDISC.CT.SEX")),
            (Attribute, "RACE", Type::coded("CDISC.CT.RACE")),
            (Attribute, "ARM", Type::Text),
            (Attribute, "TRT01P", Type::Text),
            (Attribute, "TRT01A", Type::Text),
            (Attribute, "SAFFL", Type::Flag),
            (Attribute, "ITTFL", Type::Flag),
            (Attribute, "TRTSDT", Type::DateTime),
            (Attribute, "TRTEDT", Type::Text),
        ]);
        let diags = validate_adam(&adsl, "ADSL", &meta);
        assert_eq!(codes(&diags), vec!["incompatible-type"]);
        assert!(diags[0].message.contains("TRTEDT"));
        assert_eq!(diags[0].source, DiagnosticSource::Adam);
    }

    #[test]
    fn missing_required_key_is_not_reported_twice() {
        use ComponentRole::*;
        let meta = StandardsMetadata::builtin();
        let dm = cube(&[
            (Dimension, "USUBJID", Type::Identifier),
            (Attribute, "FOO", Type::Text),
        ]);
        let diags = validate_sdtm(&dm, "DM", &meta);
        let studyid: Vec<_> = diags
            .iter()
            .filter(|d| d.message.contains("'STUDYID'"))
            .collect();
        assert_eq!(studyid.len(), 1);
        assert_eq!(studyid[0].code.as_deref(), Some("missing-required"));
        assert!(diags.iter().any(|d| d.severity == Severity::Hint && d.message.contains("'FOO'")));
    }

    #[test]
    fn missing_non_required_key_is_a_warning() {
        use ComponentRole::*;
        let meta = StandardsMetadata::builtin();
        let bds = cube(&[
            (Dimension, "STUDYID", Type::Text),
            (Dimension, "USUBJID", Type::Identifier),
            (Dimension, "PARAMCD", Type::coded("CDISC.CT.VSTESTCD")),
            (Attribute, "PARAM", Type::Text),
        ]);
        let diags = validate_adam(&bds, "BDS", &meta);
        let key = diags
            .iter()
            .find(|d| d.code.as_deref() == Some("missing-key"))
            .expect("AVISIT key warning");
        assert_eq!(key.severity, Severity::Warning);
        assert!(key.message.contains("'AVISIT'"));
        assert!(diags.iter().all(|d| d.severity != Severity::Error));
    }

    #[test]
    fn unknown_dataset_suggests_registered_code() {
        let meta = StandardsMetadata::builtin();
        let diags = validate_adam(&CubeType::new("X"), "ADSLL", &meta);
        assert_eq!(codes(&diags), vec!["unknown-dataset"]);
        assert_eq!(diags[0].suggestion.as_deref(), Some("Did you mean 'ADSL'?"));
    }
}
