//! archgraph schema: architecture graph types, kind tables and validation.

pub mod kinds;
pub mod sample;
pub mod types;
pub mod validate;

pub use kinds::{
    DataFlow, DetailLevel, EdgeKind, EdgeStyle, HealthStatus, LayoutType, NodeKind, NodeStyle,
    UnknownVariant,
};
pub use types::*;
pub use validate::{
    parse_any, parse_envelope, parse_graph, validate, validate_graph, LoadError,
    ValidationReport, ValidationResult, Violation, ViolationCode,
};
