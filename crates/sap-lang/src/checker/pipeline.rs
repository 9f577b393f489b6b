//! Pipeline stage graphs: cycle detection and execution ordering.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::PipelineDef;
use crate::diagnostic::{Diagnostic, DiagnosticSource};
use crate::suggest::did_you_mean;
use crate::symbols::{SymbolKind, SymbolTable};

use super::{tagged, undefined_reference};

/// Stage dependency graph. Stages keep declaration order; edges point from
/// a stage to the stages it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph for `pipeline`. Duplicate stage names keep their
    /// first declaration; dependencies on unknown stages are dropped.
    pub fn from_pipeline(pipeline: &PipelineDef) -> Self {
        let mut graph = DependencyGraph::default();
        for stage in &pipeline.stages {
            graph.add_node(&stage.name);
        }
        for stage in &pipeline.stages {
            for dep in &stage.depends_on {
                graph.add_edge(&stage.name, dep);
            }
        }
        graph
    }

    pub fn add_node(&mut self, name: &str) {
        if !self.edges.contains_key(name) {
            self.nodes.push(name.to_string());
            self.edges.insert(name.to_string(), Vec::new());
        }
    }

    /// Record that `from` depends on `to`. Ignored unless both are nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if !self.edges.contains_key(to) {
            return;
        }
        if let Some(deps) = self.edges.get_mut(from)
            && !deps.iter().any(|d| d == to)
        {
            deps.push(to.to_string());
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// First cycle found by depth-first search in declaration order, as the
/// full path with the entry stage repeated at the end: `[S1, S2, S1]`.
pub fn find_cycle(graph: &DependencyGraph) -> Option<Vec<String>> {
    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
    let mut stack: Vec<&str> = Vec::new();
    for node in graph.nodes() {
        if !marks.contains_key(node.as_str())
            && let Some(cycle) = visit(graph, node, &mut marks, &mut stack)
        {
            return Some(cycle);
        }
    }
    None
}

fn visit<'g>(
    graph: &'g DependencyGraph,
    node: &'g str,
    marks: &mut BTreeMap<&'g str, Mark>,
    stack: &mut Vec<&'g str>,
) -> Option<Vec<String>> {
    marks.insert(node, Mark::Visiting);
    stack.push(node);
    for dep in graph.dependencies(node) {
        match marks.get(dep.as_str()) {
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|n| *n == dep.as_str()).unwrap_or(0);
                let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(dep.clone());
                return Some(cycle);
            }
            Some(Mark::Done) => {}
            None => {
                if let Some(cycle) = visit(graph, dep, marks, stack) {
                    return Some(cycle);
                }
            }
        }
    }
    stack.pop();
    marks.insert(node, Mark::Done);
    None
}

/// Execution order with every stage after its dependencies, or `None` when
/// the graph has a cycle. Ready stages run in declaration order.
pub fn topological_sort(graph: &DependencyGraph) -> Option<Vec<String>> {
    let position: BTreeMap<&str, usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();

    let mut pending: Vec<usize> = graph
        .nodes()
        .iter()
        .map(|n| graph.dependencies(n).len())
        .collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); graph.nodes().len()];
    for (i, node) in graph.nodes().iter().enumerate() {
        for dep in graph.dependencies(node) {
            if let Some(&d) = position.get(dep.as_str()) {
                dependents[d].push(i);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..pending.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(pending.len());
    while let Some(next) = ready.pop_first() {
        order.push(graph.nodes()[next].clone());
        for &dependent in &dependents[next] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    (order.len() == graph.nodes().len()).then_some(order)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const STAGE_OPERATIONS: &[SymbolKind] = &[
    SymbolKind::Slice,
    SymbolKind::Model,
    SymbolKind::Aggregate,
    SymbolKind::Display,
    SymbolKind::Derive,
];

pub fn validate_pipeline(pipeline: &PipelineDef, table: &SymbolTable) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    let mut seen = BTreeSet::new();
    for stage in &pipeline.stages {
        if !seen.insert(stage.name.as_str()) {
            diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "Duplicate stage '{}' in pipeline '{}'",
                        stage.name, pipeline.name
                    ),
                )
                .with_code("duplicate-stage"),
            );
        }
    }

    for stage in &pipeline.stages {
        for dep in &stage.depends_on {
            if seen.contains(dep.as_str()) {
                continue;
            }
            let mut diag = Diagnostic::error(
                DiagnosticSource::Semantic,
                format!("Stage '{}' depends on undefined stage '{}'", stage.name, dep),
            )
            .with_code("undefined-stage");
            if let Some(hint) = did_you_mean(dep, seen.iter().copied()) {
                diag = diag.with_suggestion(hint);
            }
            diags.push(diag);
        }
    }

    let graph = DependencyGraph::from_pipeline(pipeline);
    if let Some(cycle) = find_cycle(&graph) {
        diags.push(
            Diagnostic::error(
                DiagnosticSource::Semantic,
                format!(
                    "Circular dependency in pipeline '{}': {}",
                    pipeline.name,
                    cycle.join(" -> ")
                ),
            )
            .with_code("pipeline-cycle"),
        );
    }

    for stage in &pipeline.stages {
        let what = format!("Stage '{}' operation", stage.name);
        match table.resolve_global(&stage.operation) {
            None => diags.push(undefined_reference(&what, &stage.operation, table)),
            Some(sym) if STAGE_OPERATIONS.contains(&sym.kind) => {}
            Some(sym) => diags.push(
                Diagnostic::error(
                    DiagnosticSource::Semantic,
                    format!(
                        "{} '{}' is {}; expected a slice, model, aggregate, display or derive",
                        what,
                        stage.operation,
                        sym.kind.with_article()
                    ),
                )
                .with_code("invalid-operation"),
            ),
        }
    }

    tagged(diags, &pipeline.name)
}
