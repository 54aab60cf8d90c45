//! Interactive view state for a presentation layer.
//!
//! One `ViewState` per session, owned by whatever renders the graph. It is
//! never stored on the graph; queries receive its fields as parameters.

use std::collections::HashSet;

use archgraph_schema::{DetailLevel, Edge, Graph, Node, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::query::{edges_touching, find_node, visible_nodes};

/// Camera position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 20.0, 40.0),
            target: Vec3::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    detail_level: DetailLevel,
    expanded: HashSet<String>,
    selected: Option<String>,
    hovered: Option<String>,
    camera: CameraPose,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the graph's advisory default view, if it has one.
    pub fn for_graph(graph: &Graph) -> Self {
        let mut state = Self::default();
        if let Some(view) = &graph.default_view {
            state.detail_level = view.detail_level;
            state.camera = CameraPose {
                position: view.position,
                target: view.target,
            };
        }
        state
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.detail_level
    }

    pub fn set_detail_level(&mut self, level: DetailLevel) {
        debug!("Detail level {} -> {}", self.detail_level, level);
        self.detail_level = level;
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: impl Into<String>) {
        self.expanded.insert(id.into());
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    /// Flip one node's expansion. Returns whether it is now expanded.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn hover(&mut self, id: Option<String>) {
        self.hovered = id;
    }

    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    pub fn set_camera(&mut self, camera: CameraPose) {
        self.camera = camera;
    }

    /// Nodes to render for the current level and expansion set.
    pub fn visible<'g>(&self, graph: &'g Graph) -> Vec<&'g Node> {
        visible_nodes(graph, self.detail_level, &self.expanded)
    }

    /// The selected node, if the selection still names one in `graph`.
    pub fn selected_node<'g>(&self, graph: &'g Graph) -> Option<&'g Node> {
        self.selected.as_deref().and_then(|id| find_node(graph, id))
    }

    /// Edges to highlight for the current selection.
    pub fn selected_edges<'g>(&self, graph: &'g Graph) -> Vec<&'g Edge> {
        match self.selected.as_deref() {
            Some(id) => edges_touching(graph, id),
            None => Vec::new(),
        }
    }
}
