//! Default prompts for architecture analysis and correction turns.

use archgraph_schema::{DataFlow, DetailLevel, EdgeKind, LayoutType, NodeKind, ValidationReport};
use archgraph_scan::RepoSnapshot;

use crate::types::ChatMessage;

/// Violations listed in one correction turn before eliding the rest.
pub const MAX_LISTED_VIOLATIONS: usize = 40;

const SYSTEM_PREAMBLE: &str = r#"You are a software architect. Given a repository's file listing, manifests and configuration files, describe its architecture as a graph.

Respond with a single JSON object and nothing else. Shape:

{
  "architecture": {
    "name": string (non-empty),
    "version": string (non-empty),
    "description": string,
    "nodes": [Node, ...] (at least one),
    "connections": [Edge, ...],
    "layout": { "type": LayoutType, "spacing": number },
    "defaultView": { "position": {"x","y","z"}, "target": {"x","y","z"}, "detailLevel": DetailLevel }
  },
  "summary": string,
  "insights": [string, ...],
  "warnings": [string, ...]
}

Node: { "id": string (unique, non-empty), "name": string, "kind": NodeKind, "description": string,
        "filePath": string, "lineStart": positive integer, "lineEnd": positive integer,
        "technology": string, "language": string, "framework": string,
        "children": [Node, ...] }
Edge: { "id": string, "sourceId": node id, "targetId": node id, "kind": EdgeKind,
        "label": string, "bidirectional": boolean, "dataFlow": DataFlow }

Nest modules inside the services that own them, and classes or functions inside modules. Every
sourceId and targetId must be the id of a node somewhere in the tree. Omit optional fields you
cannot support from the repository contents rather than setting them to null."#;

/// System prompt with the closed value sets spelled out.
pub fn system_prompt() -> String {
    format!(
        "{}\n\nNodeKind: {}\nEdgeKind: {}\nDataFlow: {}\nLayoutType: {}\nDetailLevel: {}",
        SYSTEM_PREAMBLE,
        NodeKind::names().join(" | "),
        EdgeKind::names().join(" | "),
        DataFlow::names().join(" | "),
        LayoutType::names().join(" | "),
        DetailLevel::names().join(" | "),
    )
}

/// Opening conversation for one repository.
pub fn build_messages(snapshot: &RepoSnapshot) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt()),
        ChatMessage::user(format!(
            "Analyze this repository and return the architecture JSON.\n\n{}",
            snapshot.render()
        )),
    ]
}

/// Follow-up turn asking the model to fix specific schema violations.
pub fn correction_for_violations(report: &ValidationReport) -> String {
    let mut lines: Vec<String> = report
        .violations
        .iter()
        .take(MAX_LISTED_VIOLATIONS)
        .map(|v| format!("- {}: {}", display_path(&v.path), v.message))
        .collect();
    if report.len() > MAX_LISTED_VIOLATIONS {
        lines.push(format!(
            "- ... and {} more",
            report.len() - MAX_LISTED_VIOLATIONS
        ));
    }
    format!(
        "Your JSON does not match the required schema. Fix these problems and return the complete corrected JSON object only:\n{}",
        lines.join("\n")
    )
}

/// Follow-up turn when the reply held no parseable JSON.
pub fn correction_for_parse_error(detail: &str) -> String {
    format!(
        "Your reply could not be parsed as JSON ({}). Return only the JSON object, with no commentary.",
        detail
    )
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}
