//! archgraph query: read-only structural queries over a validated graph.
//!
//! Nothing here mutates a [`Graph`](archgraph_schema::Graph). Interactive
//! state (selection, expansion, camera) lives in [`view::ViewState`] and is
//! passed into queries as plain parameters.

pub mod consistency;
pub mod query;
pub mod stats;
pub mod view;

pub use consistency::{check as check_consistency, ConsistencyIssue};
pub use query::{
    ancestors, edges_touching, find_node, find_parent, max_depth, node_count, visible_nodes,
    walk, Walk,
};
pub use stats::GraphStats;
pub use view::{CameraPose, ViewState};
