use std::time::Instant;

use sap_config::{CoreRuleConfig, SapConfig, TargetConfig};
use sap_conform::cdisc::{DateTimeOrder, Iso8601Date, NoDuplicateKey, RequiredIf, ValueInCodeList};
use sap_conform::{
    ConformContext, CoreEngine, Standard, StandardsMetadata, VersionManager, W3cEngine,
    validate_adam, validate_sdtm,
};
use sap_lang::ast::Program;
use sap_lang::suggest::did_you_mean;
use sap_lang::{Diagnostic, DiagnosticSource, SymbolTable, check_program, validate_concepts};

use crate::report::{ReportBuilder, ValidationReport};

/// Validate one parsed program with every check family enabled in
/// `config`. `target` labels the report, usually with the source path.
pub fn validate_program(program: &Program, config: &SapConfig, target: &str) -> ValidationReport {
    let started = Instant::now();
    let checks = &config.checks;
    let versions = VersionManager::from_program(program);
    let mut builder = ReportBuilder::new(target)
        .with_standards(versions.effective_versions())
        .sorted(config.report.sort)
        .max_issues(config.report.max_issues);

    let table = SymbolTable::build(program);
    sap_debug!(
        check,
        program = %target,
        elements = program.elements.len(),
        symbols = table.global_names().count(),
        "symbol table built"
    );

    if checks.language {
        builder.extend(check_program(program, &table));
    }
    if checks.concepts {
        builder.extend(validate_concepts(program));
    }
    if checks.w3c {
        let ctx = ConformContext::new(program, &table);
        builder.add_run(W3cEngine::standard().run(&ctx));
    }
    if checks.cdisc {
        builder.extend(versions.validate());
        let meta = StandardsMetadata::builtin();
        let engine = build_core_engine(&config.cdisc.core_rules);
        for t in &config.cdisc.targets {
            check_target(&mut builder, &table, &meta, &engine, t);
        }
    }

    let report = builder.with_duration(started.elapsed()).build();
    sap_info!(
        report,
        program = %target,
        status = %report.status,
        errors = report.summary.errors,
        warnings = report.summary.warnings,
        failed_rules = report.failed_rules.len(),
        "validation finished"
    );
    report
}

fn check_target(
    builder: &mut ReportBuilder,
    table: &SymbolTable,
    meta: &StandardsMetadata,
    engine: &CoreEngine,
    target: &TargetConfig,
) {
    let source = match target.standard {
        Standard::Sdtm => DiagnosticSource::Sdtm,
        Standard::Adam => DiagnosticSource::Adam,
    };
    let Some(cube) = table.cube_type(&target.cube) else {
        sap_warn!(conf, cube = %target.cube, "configured target has no cube structure");
        let mut diag = Diagnostic::error(
            source,
            format!(
                "Target cube '{}' for {} {} is not defined or has no cube structure",
                target.cube, target.standard, target.dataset
            ),
        )
        .with_code("unknown-target");
        if let Some(hint) = did_you_mean(&target.cube, table.global_names()) {
            diag = diag.with_suggestion(hint);
        }
        builder.add(diag);
        return;
    };

    let findings = match target.standard {
        Standard::Sdtm => validate_sdtm(cube, &target.dataset, meta),
        Standard::Adam => validate_adam(cube, &target.dataset, meta),
    };
    builder.extend(findings.into_iter().map(|d| d.in_element(&target.cube)));
    if !engine.is_empty() {
        builder.add_run(engine.run(cube));
    }
}

/// Instantiate the configured CORE rules in declaration order.
pub fn build_core_engine(rules: &[CoreRuleConfig]) -> CoreEngine {
    let mut engine = CoreEngine::new();
    for rule in rules {
        match rule.clone() {
            CoreRuleConfig::NoDuplicateKey { id, keys } => {
                engine.register(Box::new(NoDuplicateKey { id, keys }))
            }
            CoreRuleConfig::Iso8601Date { id, variables } => {
                engine.register(Box::new(Iso8601Date { id, variables }))
            }
            CoreRuleConfig::DatetimeOrder { id, start, end } => {
                engine.register(Box::new(DateTimeOrder { id, start, end }))
            }
            CoreRuleConfig::RequiredIf {
                id,
                if_present,
                then_required,
            } => engine.register(Box::new(RequiredIf {
                id,
                if_present,
                then_required,
            })),
            CoreRuleConfig::ValueInCodeList {
                id,
                variable,
                code_list,
            } => engine.register(Box::new(ValueInCodeList {
                id,
                variable,
                code_list,
            })),
        }
    }
    engine
}
