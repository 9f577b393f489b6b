use std::path::Path;

use anyhow::Result;
use sap_lang::ast::{Element, PipelineDef, Program};
use sap_lang::suggest::did_you_mean;
use sap_lang::{DependencyGraph, find_cycle, topological_sort};

use crate::load::load_program;

fn find_pipeline<'p>(program: &'p Program, name: &str) -> Result<&'p PipelineDef> {
    let pipelines: Vec<&PipelineDef> = program
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Pipeline(p) => Some(p),
            _ => None,
        })
        .collect();
    if let Some(p) = pipelines.iter().find(|p| p.name == name) {
        return Ok(*p);
    }
    let hint = did_you_mean(name, pipelines.iter().map(|p| p.name.as_str()))
        .map(|h| format!(". {h}"))
        .unwrap_or_default();
    anyhow::bail!("pipeline '{name}' is not defined{hint}")
}

/// Stage execution order for `pipeline`: dependencies first, ties in
/// declaration order.
pub fn pipeline_order(program: &Program, pipeline: &str) -> Result<Vec<String>> {
    let def = find_pipeline(program, pipeline)?;
    let graph = DependencyGraph::from_pipeline(def);
    if let Some(cycle) = find_cycle(&graph) {
        anyhow::bail!(
            "pipeline '{}' has a circular dependency: {}",
            pipeline,
            cycle.join(" -> ")
        );
    }
    topological_sort(&graph)
        .ok_or_else(|| anyhow::anyhow!("pipeline '{pipeline}' cannot be ordered"))
}

/// Entry point for `sapc order`: one stage per line.
pub fn run(file: &Path, pipeline: &str) -> Result<()> {
    let program = load_program(file)?;
    for (i, stage) in pipeline_order(&program, pipeline)?.iter().enumerate() {
        println!("{:>3}. {}", i + 1, stage);
    }
    Ok(())
}
