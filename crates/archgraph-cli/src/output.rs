//! Human-readable reports on stdout.

use std::collections::HashMap;
use std::path::Path;

use archgraph_query::{walk, ConsistencyIssue, GraphStats, ViewState};
use archgraph_schema::{AnalysisEnvelope, Graph, Node, ValidationReport};

pub fn print_violations(path: &Path, report: &ValidationReport) {
    println!("=== Validation Failed: {} ===", path.display());
    println!();
    println!("Violations:         {}", report.len());
    println!();
    for line in report.lines() {
        println!("  - {}", line);
    }
    println!();
    println!("Status: INVALID");
}

pub fn print_valid(path: &Path, envelope: &AnalysisEnvelope, stats: &GraphStats) {
    println!("=== Validation Passed: {} ===", path.display());
    println!();
    println!("Architecture:       {} {}", envelope.architecture.name, envelope.architecture.version);
    println!("Nodes:              {} ({} top-level)", stats.node_count, stats.top_level_count);
    println!("Connections:        {}", stats.edge_count);
    println!("Max depth:          {}", stats.max_depth);
    println!();
    println!("Status: VALID");
}

pub fn print_summary(envelope: &AnalysisEnvelope, stats: &GraphStats) {
    let graph = &envelope.architecture;
    println!("=== {} {} ===", graph.name, graph.version);
    println!();
    if let Some(description) = &graph.description {
        println!("{}", description);
        println!();
    }
    if let Some(repo) = &graph.source_repository {
        println!("Repository:         {}", repo);
    }
    if let Some(at) = &graph.generated_at {
        println!("Generated at:       {}", at);
    }
    println!("Nodes:              {} ({} top-level)", stats.node_count, stats.top_level_count);
    println!("Connections:        {}", stats.edge_count);
    println!("Max depth:          {}", stats.max_depth);

    if !stats.nodes_by_kind.is_empty() {
        println!();
        println!("Nodes by kind:");
        for entry in &stats.nodes_by_kind {
            println!("  - {:<14} {}", entry.kind.style().label, entry.count);
        }
    }
    if !stats.edges_by_kind.is_empty() {
        println!();
        println!("Connections by kind:");
        for entry in &stats.edges_by_kind {
            let style = entry.kind.style();
            let line = if style.dashed { "dashed" } else { "solid" };
            println!("  - {:<14} {:<4} {}", style.label, entry.count, line);
        }
    }
    if !stats.hubs.is_empty() {
        println!();
        println!("Most connected:");
        for hub in &stats.hubs {
            println!("  - {} ({}): {} connection(s)", hub.name, hub.id, hub.degree);
        }
    }
    if !stats.import_cycles.is_empty() {
        println!();
        println!("Import cycles:");
        for cycle in &stats.import_cycles {
            println!("  - {}", cycle.join(" -> "));
        }
    }

    if !envelope.summary.is_empty() {
        println!();
        println!("Summary:");
        println!("  {}", envelope.summary);
    }
    print_list("Insights:", &envelope.insights);
    print_list("Warnings:", &envelope.warnings);
}

pub fn print_issues(issues: &[ConsistencyIssue]) {
    if issues.is_empty() {
        return;
    }
    println!();
    println!("Consistency warnings:");
    for issue in issues {
        println!("  - {}", issue);
    }
}

/// Indented listing of the nodes visible under `view`. Nodes with hidden
/// children are marked with `[+N]`.
pub fn print_tree(graph: &Graph, view: &ViewState) {
    let depths: HashMap<*const Node, usize> = walk(graph)
        .map(|(depth, node)| (node as *const Node, depth))
        .collect();
    let visible = view.visible(graph);

    println!(
        "=== {} at {} level ({} of {} nodes) ===",
        graph.name,
        view.detail_level(),
        visible.len(),
        depths.len()
    );
    println!();
    for node in visible {
        let depth = depths.get(&(node as *const Node)).copied().unwrap_or(1);
        println!("{}{}", "  ".repeat(depth - 1), tree_line(node, depth, view));
    }
}

fn tree_line(node: &Node, depth: usize, view: &ViewState) -> String {
    let mut line = format!("{} [{}] {}", node.id, node.kind.style().label, node.name);
    let shown = depth < view.detail_level().depth_ceiling() || view.is_expanded(&node.id);
    if node.has_children() && !shown {
        line.push_str(&format!(" [+{}]", node.children().len()));
    }
    line
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", title);
    for item in items {
        println!("  - {}", item);
    }
}
