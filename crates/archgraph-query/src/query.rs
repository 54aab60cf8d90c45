//! Forest traversal, lookup and depth-bounded disclosure.
//!
//! Traversal is always pre-order: a parent is visited before its children,
//! children in sequence order, top-level nodes in sequence order.

use std::collections::HashSet;

use archgraph_schema::{DetailLevel, Edge, Graph, Node};

/// Depth-annotated pre-order iterator over every node in the forest.
/// Top-level nodes are depth 1.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

pub fn walk(graph: &Graph) -> Walk<'_> {
    Walk {
        stack: graph.nodes.iter().rev().map(|n| (1, n)).collect(),
    }
}

/// First node in document order whose id matches.
///
/// Ids are not guaranteed unique; duplicates resolve to the earliest one.
pub fn find_node<'a>(graph: &'a Graph, id: &str) -> Option<&'a Node> {
    walk(graph).map(|(_, n)| n).find(|n| n.id == id)
}

/// Parent of the first node with `id`, or `None` for top-level and missing ids.
pub fn find_parent<'a>(graph: &'a Graph, id: &str) -> Option<&'a Node> {
    ancestors(graph, id).and_then(|path| {
        let len = path.len();
        if len >= 2 {
            Some(path[len - 2])
        } else {
            None
        }
    })
}

/// Root-to-node path (inclusive) for the first node with `id`.
pub fn ancestors<'a>(graph: &'a Graph, id: &str) -> Option<Vec<&'a Node>> {
    fn descend<'a>(node: &'a Node, id: &str, path: &mut Vec<&'a Node>) -> bool {
        path.push(node);
        if node.id == id {
            return true;
        }
        for child in node.children() {
            if descend(child, id, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let mut path = Vec::new();
    for root in &graph.nodes {
        if descend(root, id, &mut path) {
            return Some(path);
        }
    }
    None
}

/// Every edge with `id` at either end, in edge-list order.
///
/// Edges are returned whether or not `id` names an existing node.
pub fn edges_touching<'a>(graph: &'a Graph, id: &str) -> Vec<&'a Edge> {
    graph.edges.iter().filter(|e| e.touches(id)).collect()
}

/// Nodes to show at `detail_level`, in pre-order.
///
/// A node is always included once reached. Its children are visited when
/// its depth is below the level's ceiling, or when its id is in `expanded`.
pub fn visible_nodes<'a>(
    graph: &'a Graph,
    detail_level: DetailLevel,
    expanded: &HashSet<String>,
) -> Vec<&'a Node> {
    fn visit<'a>(
        node: &'a Node,
        depth: usize,
        ceiling: usize,
        expanded: &HashSet<String>,
        out: &mut Vec<&'a Node>,
    ) {
        out.push(node);
        if depth < ceiling || expanded.contains(&node.id) {
            for child in node.children() {
                visit(child, depth + 1, ceiling, expanded, out);
            }
        }
    }

    let ceiling = detail_level.depth_ceiling();
    let mut out = Vec::new();
    for root in &graph.nodes {
        visit(root, 1, ceiling, expanded, &mut out);
    }
    out
}

/// Total nodes in the forest, descendants included.
pub fn node_count(graph: &Graph) -> usize {
    walk(graph).count()
}

/// Depth of the deepest node; 0 only for an (invalid) empty forest.
pub fn max_depth(graph: &Graph) -> usize {
    walk(graph).map(|(d, _)| d).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_schema::{EdgeKind, NodeKind};

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

    /// a
    /// ├─ a1
    /// │  └─ a1x
    /// └─ a2
    /// b
    fn forest() -> Graph {
        graph(
            vec![
                Node::new("a", "A", NodeKind::Service)
                    .with_child(
                        Node::new("a1", "A1", NodeKind::Module)
                            .with_child(Node::new("a1x", "A1x", NodeKind::Class)),
                    )
                    .with_child(Node::new("a2", "A2", NodeKind::Module)),
                Node::new("b", "B", NodeKind::Database),
            ],
            vec![
                Edge::new("e1", "a", "b", EdgeKind::Database),
                Edge::new("e2", "a1", "a2", EdgeKind::Import),
                Edge::new("e3", "ghost", "b", EdgeKind::Http),
            ],
        )
    }

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_walk_is_preorder_with_depth() {
        let g = forest();
        let order: Vec<(usize, &str)> = walk(&g).map(|(d, n)| (d, n.id.as_str())).collect();
        assert_eq!(
            order,
            vec![(1, "a"), (2, "a1"), (3, "a1x"), (2, "a2"), (1, "b")]
        );
        assert_eq!(node_count(&g), 5);
        assert_eq!(max_depth(&g), 3);
    }

    #[test]
    fn test_find_node_nested_and_missing() {
        let g = forest();
        assert_eq!(find_node(&g, "a1x").unwrap().name, "A1x");
        assert!(find_node(&g, "missing-id").is_none());
    }

    #[test]
    fn test_find_node_prefers_first_duplicate() {
        let g = graph(
            vec![
                Node::new("p", "P", NodeKind::Service)
                    .with_child(Node::new("dup", "first", NodeKind::Module)),
                Node::new("dup", "second", NodeKind::Module),
            ],
            vec![],
        );
        assert_eq!(find_node(&g, "dup").unwrap().name, "first");
    }

    #[test]
    fn test_parent_and_ancestors() {
        let g = forest();
        assert_eq!(find_parent(&g, "a1x").unwrap().id, "a1");
        assert!(find_parent(&g, "a").is_none());
        assert!(find_parent(&g, "nope").is_none());
        let path = ancestors(&g, "a1x").unwrap();
        assert_eq!(ids(&path), vec!["a", "a1", "a1x"]);
    }

    #[test]
    fn test_edges_touching_keeps_order_and_dangling() {
        let g = forest();
        assert_eq!(
            edges_touching(&g, "b")
                .iter()
                .map(|e| e.id.as_str())
                .collect::<Vec<_>>(),
            vec!["e1", "e3"]
        );
        assert_eq!(edges_touching(&g, "ghost").len(), 1);
        assert!(edges_touching(&g, "a1x").is_empty());
    }

    #[test]
    fn test_visible_nodes_by_level() {
        let g = forest();
        let none = HashSet::new();
        assert_eq!(
            ids(&visible_nodes(&g, DetailLevel::Overview, &none)),
            vec!["a", "b"]
        );
        assert_eq!(
            ids(&visible_nodes(&g, DetailLevel::Service, &none)),
            vec!["a", "a1", "a2", "b"]
        );
        assert_eq!(
            ids(&visible_nodes(&g, DetailLevel::Module, &none)),
            vec!["a", "a1", "a1x", "a2", "b"]
        );
    }

    #[test]
    fn test_expanded_overrides_ceiling_for_one_branch() {
        let g = forest();
        let expanded: HashSet<String> = ["a1".to_string()].into_iter().collect();
        assert_eq!(
            ids(&visible_nodes(&g, DetailLevel::Service, &expanded)),
            vec!["a", "a1", "a1x", "a2", "b"]
        );

        // Expanding a node that is never reached has no effect.
        let unreachable: HashSet<String> = ["a1".to_string()].into_iter().collect();
        assert_eq!(
            ids(&visible_nodes(&g, DetailLevel::Overview, &unreachable)),
            vec!["a", "b"]
        );
    }
}
