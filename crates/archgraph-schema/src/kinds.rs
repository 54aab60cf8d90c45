//! Closed value sets used by the graph schema, and the kind → style table.
//!
//! Every enum here rejects unknown strings; nothing is coerced. New node or
//! edge kinds are added to the enum and to its `style()` match, nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Architectural element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Service,
    Module,
    Class,
    Function,
    Database,
    Cache,
    Queue,
    Gateway,
    External,
    Container,
    Region,
    Cluster,
}

/// Relationship kind between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Http,
    Grpc,
    Websocket,
    Database,
    Queue,
    Import,
    Inheritance,
    Composition,
    Event,
}

/// Progressive-disclosure level. Each maps to a traversal depth ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Overview,
    Service,
    Module,
    Code,
}

/// Layout strategy hint for a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    Force,
    Hierarchical,
    Radial,
    Manual,
}

/// Direction/shape of data carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFlow {
    Request,
    Response,
    Stream,
    Event,
}

/// Reported health of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
    Unknown,
}

/// Renderer hints for a node kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub label: &'static str,
    /// Hex color, `#rrggbb`.
    pub color: &'static str,
    /// Mesh primitive the renderer should use.
    pub shape: &'static str,
    /// Base scale multiplier.
    pub scale: f32,
}

/// Renderer hints for an edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub dashed: bool,
    pub animated: bool,
}

/// Error returned when a string is not a member of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {set} value '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    pub set: &'static str,
    pub value: String,
    pub expected: String,
}

fn unknown(set: &'static str, value: &str, all: &[&'static str]) -> UnknownVariant {
    UnknownVariant {
        set,
        value: value.to_string(),
        expected: all.join(", "),
    }
}

impl NodeKind {
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Service,
        NodeKind::Module,
        NodeKind::Class,
        NodeKind::Function,
        NodeKind::Database,
        NodeKind::Cache,
        NodeKind::Queue,
        NodeKind::Gateway,
        NodeKind::External,
        NodeKind::Container,
        NodeKind::Region,
        NodeKind::Cluster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Service => "service",
            NodeKind::Module => "module",
            NodeKind::Class => "class",
            NodeKind::Function => "function",
            NodeKind::Database => "database",
            NodeKind::Cache => "cache",
            NodeKind::Queue => "queue",
            NodeKind::Gateway => "gateway",
            NodeKind::External => "external",
            NodeKind::Container => "container",
            NodeKind::Region => "region",
            NodeKind::Cluster => "cluster",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }

    pub fn style(&self) -> NodeStyle {
        let (label, color, shape, scale) = match self {
            NodeKind::Service => ("Service", "#4f9dff", "box", 1.0),
            NodeKind::Module => ("Module", "#7c6cf2", "box", 0.8),
            NodeKind::Class => ("Class", "#b86cf2", "octahedron", 0.6),
            NodeKind::Function => ("Function", "#e36cf2", "sphere", 0.4),
            NodeKind::Database => ("Database", "#35c98d", "cylinder", 1.1),
            NodeKind::Cache => ("Cache", "#f2c46c", "cylinder", 0.8),
            NodeKind::Queue => ("Queue", "#f28c4f", "torus", 0.9),
            NodeKind::Gateway => ("Gateway", "#4fd3e3", "cone", 1.0),
            NodeKind::External => ("External", "#9aa4b2", "dodecahedron", 0.9),
            NodeKind::Container => ("Container", "#5b7083", "wireframe-box", 1.4),
            NodeKind::Region => ("Region", "#2f3b4a", "plane", 2.0),
            NodeKind::Cluster => ("Cluster", "#3e556b", "wireframe-sphere", 1.6),
        };
        NodeStyle {
            label,
            color,
            shape,
            scale,
        }
    }
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 9] = [
        EdgeKind::Http,
        EdgeKind::Grpc,
        EdgeKind::Websocket,
        EdgeKind::Database,
        EdgeKind::Queue,
        EdgeKind::Import,
        EdgeKind::Inheritance,
        EdgeKind::Composition,
        EdgeKind::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Http => "http",
            EdgeKind::Grpc => "grpc",
            EdgeKind::Websocket => "websocket",
            EdgeKind::Database => "database",
            EdgeKind::Queue => "queue",
            EdgeKind::Import => "import",
            EdgeKind::Inheritance => "inheritance",
            EdgeKind::Composition => "composition",
            EdgeKind::Event => "event",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }

    pub fn style(&self) -> EdgeStyle {
        let (label, color, dashed, animated) = match self {
            EdgeKind::Http => ("HTTP", "#4f9dff", false, true),
            EdgeKind::Grpc => ("gRPC", "#35c9c9", false, true),
            EdgeKind::Websocket => ("WebSocket", "#9d6cf2", false, true),
            EdgeKind::Database => ("Database", "#35c98d", false, false),
            EdgeKind::Queue => ("Queue", "#f28c4f", true, true),
            EdgeKind::Import => ("Import", "#9aa4b2", true, false),
            EdgeKind::Inheritance => ("Inheritance", "#e3e36c", false, false),
            EdgeKind::Composition => ("Composition", "#f2a66c", false, false),
            EdgeKind::Event => ("Event", "#f26c8c", true, true),
        };
        EdgeStyle {
            label,
            color,
            dashed,
            animated,
        }
    }
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 4] = [
        DetailLevel::Overview,
        DetailLevel::Service,
        DetailLevel::Module,
        DetailLevel::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Overview => "overview",
            DetailLevel::Service => "service",
            DetailLevel::Module => "module",
            DetailLevel::Code => "code",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }

    /// Deepest tree level shown without an explicit expand. Top-level nodes are depth 1.
    pub fn depth_ceiling(&self) -> usize {
        match self {
            DetailLevel::Overview => 1,
            DetailLevel::Service => 2,
            DetailLevel::Module => 3,
            DetailLevel::Code => 4,
        }
    }
}

impl Default for DetailLevel {
    fn default() -> Self {
        DetailLevel::Service
    }
}

impl LayoutType {
    pub const ALL: [LayoutType; 4] = [
        LayoutType::Force,
        LayoutType::Hierarchical,
        LayoutType::Radial,
        LayoutType::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutType::Force => "force",
            LayoutType::Hierarchical => "hierarchical",
            LayoutType::Radial => "radial",
            LayoutType::Manual => "manual",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl DataFlow {
    pub const ALL: [DataFlow; 4] = [
        DataFlow::Request,
        DataFlow::Response,
        DataFlow::Stream,
        DataFlow::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataFlow::Request => "request",
            DataFlow::Response => "response",
            DataFlow::Stream => "stream",
            DataFlow::Event => "event",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 4] = [
        HealthStatus::Healthy,
        HealthStatus::Degraded,
        HealthStatus::Down,
        HealthStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Down => "down",
            HealthStatus::Unknown => "unknown",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }
}

impl FromStr for NodeKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| unknown("node kind", s, &Self::names()))
    }
}

impl FromStr for EdgeKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| unknown("edge kind", s, &Self::names()))
    }
}

impl FromStr for DetailLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| unknown("detail level", s, &Self::names()))
    }
}

impl FromStr for LayoutType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| unknown("layout type", s, &Self::names()))
    }
}

impl FromStr for DataFlow {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| unknown("data flow", s, &Self::names()))
    }
}

impl FromStr for HealthStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| unknown("health status", s, &Self::names()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DataFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
