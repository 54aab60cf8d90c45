//! Summary statistics for reporting: kind counts, depth, hubs, import cycles.

use std::collections::HashMap;

use archgraph_schema::{EdgeKind, Graph, NodeKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::query::walk;

/// How many of the most-connected nodes to report.
pub const HUB_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCount<K> {
    pub kind: K,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    pub id: String,
    pub name: String,
    pub degree: usize,
}

/// Aggregate counts over one graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub top_level_count: usize,
    pub edge_count: usize,
    pub max_depth: usize,
    /// Non-zero counts, in kind-table order.
    pub nodes_by_kind: Vec<KindCount<NodeKind>>,
    pub edges_by_kind: Vec<KindCount<EdgeKind>>,
    /// Nodes with the most edges, descending; ties broken by document order.
    pub hubs: Vec<Hub>,
    /// Strongly connected groups of node ids over `import` edges.
    pub import_cycles: Vec<Vec<String>>,
}

impl GraphStats {
    pub fn compute(graph: &Graph) -> Self {
        let mut node_count = 0;
        let mut max_depth = 0;
        let mut node_kinds: HashMap<NodeKind, usize> = HashMap::new();
        for (depth, node) in walk(graph) {
            node_count += 1;
            max_depth = max_depth.max(depth);
            *node_kinds.entry(node.kind).or_insert(0) += 1;
        }

        let mut edge_kinds: HashMap<EdgeKind, usize> = HashMap::new();
        for edge in &graph.edges {
            *edge_kinds.entry(edge.kind).or_insert(0) += 1;
        }

        let deps = DependencyGraph::build(graph);

        Self {
            node_count,
            top_level_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            max_depth,
            nodes_by_kind: ordered_counts(&NodeKind::ALL, &node_kinds),
            edges_by_kind: ordered_counts(&EdgeKind::ALL, &edge_kinds),
            hubs: deps.hubs(graph, HUB_LIMIT),
            import_cycles: deps.import_cycles(),
        }
    }

    pub fn node_kind_count(&self, kind: NodeKind) -> usize {
        self.nodes_by_kind
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn edge_kind_count(&self, kind: EdgeKind) -> usize {
        self.edges_by_kind
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

fn ordered_counts<K: Copy + Eq + std::hash::Hash>(
    order: &[K],
    counts: &HashMap<K, usize>,
) -> Vec<KindCount<K>> {
    order
        .iter()
        .filter_map(|k| {
            counts
                .get(k)
                .map(|&count| KindCount { kind: *k, count })
        })
        .collect()
}

/// Directed graph over resolved node ids. Edges with an unresolved end are
/// left out; duplicate ids collapse onto their first occurrence.
struct DependencyGraph<'a> {
    graph: DiGraph<&'a str, EdgeKind>,
    index: HashMap<&'a str, NodeIndex>,
}

impl<'a> DependencyGraph<'a> {
    fn build(source: &'a Graph) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for (_, node) in walk(source) {
            let id = node.id.as_str();
            index.entry(id).or_insert_with(|| graph.add_node(id));
        }

        for edge in &source.edges {
            let (Some(&from), Some(&to)) = (
                index.get(edge.source_id.as_str()),
                index.get(edge.target_id.as_str()),
            ) else {
                continue;
            };
            graph.add_edge(from, to, edge.kind);
        }

        Self { graph, index }
    }

    fn hubs(&self, source: &Graph, limit: usize) -> Vec<Hub> {
        let mut seen = std::collections::HashSet::new();
        let mut hubs: Vec<Hub> = walk(source)
            .map(|(_, n)| n)
            .filter(|n| seen.insert(n.id.as_str()))
            .filter_map(|n| {
                let idx = *self.index.get(n.id.as_str())?;
                // Counts each incident edge once, self-loops included.
                let degree = self.graph.edges_directed(idx, Direction::Outgoing).count()
                    + self
                        .graph
                        .edges_directed(idx, Direction::Incoming)
                        .filter(|e| e.source() != idx)
                        .count();
                (degree > 0).then(|| Hub {
                    id: n.id.clone(),
                    name: n.name.clone(),
                    degree,
                })
            })
            .collect();
        // Stable sort keeps document order among equal degrees.
        hubs.sort_by(|a, b| b.degree.cmp(&a.degree));
        hubs.truncate(limit);
        hubs
    }

    fn import_cycles(&self) -> Vec<Vec<String>> {
        let imports = self
            .graph
            .filter_map(|_, id| Some(*id), |_, kind| (*kind == EdgeKind::Import).then_some(()));

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&imports)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .map(|&n| imports.contains_edge(n, n))
                        .unwrap_or(false)
            })
            .map(|component| {
                let mut ids: Vec<String> = component
                    .into_iter()
                    .map(|n| imports[n].to_string())
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}
