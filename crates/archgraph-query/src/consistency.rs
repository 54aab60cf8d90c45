//! Post-validation referential checks.
//!
//! The schema accepts duplicate node ids and edges pointing at unknown
//! nodes. This pass finds them so callers can surface warnings; it never
//! rejects a graph.

use std::collections::{HashMap, HashSet};
use std::fmt;

use archgraph_schema::Graph;
use serde::Serialize;
use tracing::debug;

use crate::query::walk;

/// Which end of an edge failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeEnd {
    Source,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConsistencyIssue {
    /// A node id used more than once in the forest.
    #[serde(rename_all = "camelCase")]
    DuplicateNodeId { id: String, occurrences: usize },
    /// An edge end that names no node.
    #[serde(rename_all = "camelCase")]
    UnresolvedEdgeEnd {
        edge_id: String,
        end: EdgeEnd,
        node_id: String,
    },
    /// Two edges sharing an id.
    #[serde(rename_all = "camelCase")]
    DuplicateEdgeId { id: String, occurrences: usize },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::DuplicateNodeId { id, occurrences } => {
                write!(f, "node id '{}' appears {} times", id, occurrences)
            }
            ConsistencyIssue::UnresolvedEdgeEnd {
                edge_id,
                end,
                node_id,
            } => {
                let end = match end {
                    EdgeEnd::Source => "source",
                    EdgeEnd::Target => "target",
                };
                write!(
                    f,
                    "edge '{}' {} '{}' does not match any node",
                    edge_id, end, node_id
                )
            }
            ConsistencyIssue::DuplicateEdgeId { id, occurrences } => {
                write!(f, "edge id '{}' appears {} times", id, occurrences)
            }
        }
    }
}

/// Report duplicate ids and unresolved edge ends.
///
/// Duplicates are listed in order of first appearance; unresolved ends in
/// edge-list order, source before target.
pub fn check(graph: &Graph) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    let mut node_ids: HashSet<&str> = HashSet::new();
    issues.extend(
        duplicates(walk(graph).map(|(_, n)| n.id.as_str()), &mut node_ids).map(
            |(id, occurrences)| ConsistencyIssue::DuplicateNodeId {
                id: id.to_string(),
                occurrences,
            },
        ),
    );

    let mut edge_ids = HashSet::new();
    issues.extend(
        duplicates(graph.edges.iter().map(|e| e.id.as_str()), &mut edge_ids).map(
            |(id, occurrences)| ConsistencyIssue::DuplicateEdgeId {
                id: id.to_string(),
                occurrences,
            },
        ),
    );

    for edge in &graph.edges {
        for (end, node_id) in [
            (EdgeEnd::Source, &edge.source_id),
            (EdgeEnd::Target, &edge.target_id),
        ] {
            if !node_ids.contains(node_id.as_str()) {
                issues.push(ConsistencyIssue::UnresolvedEdgeEnd {
                    edge_id: edge.id.clone(),
                    end,
                    node_id: node_id.clone(),
                });
            }
        }
    }

    debug!("Consistency check found {} issue(s)", issues.len());
    issues
}

/// Ids seen more than once, with counts, in order of first appearance.
/// Fills `seen` with every distinct id.
fn duplicates<'a>(
    ids: impl Iterator<Item = &'a str>,
    seen: &mut HashSet<&'a str>,
) -> impl Iterator<Item = (&'a str, usize)> {
    let mut order = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for id in ids {
        if seen.insert(id) {
            order.push(id);
        }
        *counts.entry(id).or_insert(0) += 1;
    }
    order
        .into_iter()
        .filter_map(move |id| counts.get(id).copied().filter(|&n| n > 1).map(|n| (id, n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_schema::{Edge, EdgeKind, Node, NodeKind};

    fn graph(nodes: Vec<Node>, edges: Vec<Edge>) -> Graph {
        Graph {
            name: "g".into(),
            version: "1".into(),
            description: None,
            generated_at: None,
            source_repository: None,
            nodes,
            edges,
            layout: None,
            default_view: None,
        }
    }

    #[test]
    fn test_clean_graph_has_no_issues() {
        let g = graph(
            vec![Node::new("a", "A", NodeKind::Service)
                .with_child(Node::new("b", "B", NodeKind::Module))],
            vec![Edge::new("e", "a", "b", EdgeKind::Import)],
        );
        assert!(check(&g).is_empty());
    }

    #[test]
    fn test_duplicate_ids_across_depths() {
        let g = graph(
            vec![
                Node::new("a", "A", NodeKind::Service)
                    .with_child(Node::new("x", "X1", NodeKind::Module)),
                Node::new("x", "X2", NodeKind::Module),
                Node::new("x", "X3", NodeKind::Module),
            ],
            vec![],
        );
        assert_eq!(
            check(&g),
            vec![ConsistencyIssue::DuplicateNodeId {
                id: "x".into(),
                occurrences: 3
            }]
        );
    }

    #[test]
    fn test_unresolved_edge_ends() {
        let g = graph(
            vec![Node::new("a", "A", NodeKind::Service)],
            vec![
                Edge::new("e1", "a", "ghost", EdgeKind::Http),
                Edge::new("e1", "nobody", "a", EdgeKind::Http),
            ],
        );
        let issues = check(&g);
        assert_eq!(issues.len(), 3);
        assert!(matches!(
            &issues[0],
            ConsistencyIssue::DuplicateEdgeId { id, occurrences: 2 } if id == "e1"
        ));
        assert_eq!(
            issues[1].to_string(),
            "edge 'e1' target 'ghost' does not match any node"
        );
        assert!(matches!(
            &issues[2],
            ConsistencyIssue::UnresolvedEdgeEnd { end: EdgeEnd::Source, .. }
        ));
    }

    #[test]
    fn test_issue_serializes_tagged() {
        let issue = ConsistencyIssue::UnresolvedEdgeEnd {
            edge_id: "e".into(),
            end: EdgeEnd::Target,
            node_id: "n".into(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "unresolvedEdgeEnd");
        assert_eq!(json["edgeId"], "e");
        assert_eq!(json["end"], "target");
    }
}
