//! Schema validation of untrusted JSON into a typed [`AnalysisEnvelope`].
//!
//! Validation walks the raw `serde_json::Value` against the schema and
//! collects every violation with a dotted path, rather than stopping at the
//! first one. Only input that passes is decoded into the typed model.
//! Fields are checked in declaration order and array elements in index
//! order, so violations come out in document order.
//!
//! Cross-node consistency (unique ids, edges that resolve) is not checked
//! here; see the consistency pass in the query layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::kinds::{DataFlow, DetailLevel, EdgeKind, HealthStatus, LayoutType, NodeKind};
use crate::types::AnalysisEnvelope;

/// Machine-readable violation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// A required field is absent.
    Required,
    /// Wrong JSON type (including `null` for an optional field).
    InvalidType,
    /// Empty string, empty required array, or non-positive number.
    TooSmall,
    /// Integer out of range for its field.
    TooBig,
    /// Fractional number where an integer is required.
    NotInteger,
    /// String outside a closed set.
    InvalidEnumValue,
    /// Anything else.
    Custom,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::Required => "required",
            ViolationCode::InvalidType => "invalid_type",
            ViolationCode::TooSmall => "too_small",
            ViolationCode::TooBig => "too_big",
            ViolationCode::NotInteger => "not_integer",
            ViolationCode::InvalidEnumValue => "invalid_enum_value",
            ViolationCode::Custom => "custom",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema violation, located by dotted path (empty for the root value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
    pub code: ViolationCode,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "(root)"
        } else {
            self.path.as_str()
        };
        write!(f, "{}: {} [{}]", path, self.message, self.code)
    }
}

/// Every violation found in one input, in document order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{} schema violation(s), first: {}", .violations.len(), first_or_none(.violations))]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

fn first_or_none(violations: &[Violation]) -> String {
    violations
        .first()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "none".into())
}

impl ValidationReport {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// One `path: message` line per violation.
    pub fn lines(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}

/// Either the typed envelope or the full list of violations.
pub type ValidationResult = Result<AnalysisEnvelope, ValidationReport>;

/// Failure to turn text into a validated envelope.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Not well-formed JSON; there is no structure to report paths against.
    #[error("input is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(ValidationReport),
}

impl From<LoadError> for archgraph_core::Error {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Parse(e) => archgraph_core::Error::Parse(e.to_string()),
            LoadError::Invalid(report) => {
                archgraph_core::Error::Validation(report.lines().join("; "))
            }
        }
    }
}

/// Validate a full analysis envelope.
pub fn validate(input: &Value) -> ValidationResult {
    let mut validator = Validator::default();
    validator.envelope(input);

    if !validator.violations.is_empty() {
        debug!(
            "Schema validation failed with {} violation(s)",
            validator.violations.len()
        );
        return Err(ValidationReport {
            violations: validator.violations,
        });
    }

    // The structural pass accepts exactly what the typed model decodes, so a
    // failure here means the two have drifted apart.
    decode(input.clone()).map_err(|e| ValidationReport {
        violations: vec![Violation {
            path: String::new(),
            message: format!("Failed to decode validated input: {}", e),
            code: ViolationCode::Custom,
        }],
    })
}

/// Validate a bare graph, wrapping it in an envelope with an empty summary.
///
/// Violation paths are still reported relative to the envelope
/// (`architecture.nodes.0.id`).
pub fn validate_graph(input: &Value) -> ValidationResult {
    validate(&wrap_graph_value(input))
}

/// Parse JSON text with no nesting limit. Each node level costs two JSON
/// levels, so serde_json's default cap of 128 would reject valid graphs.
fn parse_value(text: &str) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn decode(value: Value) -> Result<AnalysisEnvelope, serde_json::Error> {
    AnalysisEnvelope::deserialize(serde_stacker::Deserializer::new(value))
}

/// Parse and validate envelope text.
pub fn parse_envelope(text: &str) -> Result<AnalysisEnvelope, LoadError> {
    let value = parse_value(text)?;
    validate(&value).map_err(LoadError::Invalid)
}

/// Parse and validate bare graph text.
pub fn parse_graph(text: &str) -> Result<AnalysisEnvelope, LoadError> {
    let value = parse_value(text)?;
    validate_graph(&value).map_err(LoadError::Invalid)
}

/// Parse text that is either an envelope or a bare graph.
///
/// An object with an `architecture` key is treated as an envelope.
pub fn parse_any(text: &str) -> Result<AnalysisEnvelope, LoadError> {
    let value = parse_value(text)?;
    let result = if is_envelope(&value) {
        validate(&value)
    } else {
        validate_graph(&value)
    };
    result.map_err(LoadError::Invalid)
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| o.contains_key("architecture"))
        .unwrap_or(false)
}

fn wrap_graph_value(graph: &Value) -> Value {
    json!({
        "architecture": graph,
        "summary": "",
        "insights": [],
        "warnings": [],
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Default)]
struct Validator {
    path: Vec<String>,
    violations: Vec<Violation>,
}

impl Validator {
    fn push(&mut self, code: ViolationCode, message: impl Into<String>) {
        self.violations.push(Violation {
            path: self.path.join("."),
            message: message.into(),
            code,
        });
    }

    fn enter<R>(&mut self, segment: impl ToString, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    fn invalid_type(&mut self, expected: &str, got: &Value) {
        self.push(
            ViolationCode::InvalidType,
            format!("Expected {}, received {}", expected, type_name(got)),
        );
    }

    fn required(&mut self, obj: &Map<String, Value>, key: &str, check: impl FnOnce(&mut Self, &Value)) {
        self.enter(key, |v| match obj.get(key) {
            Some(value) => check(v, value),
            None => v.push(ViolationCode::Required, "Required"),
        });
    }

    fn optional(&mut self, obj: &Map<String, Value>, key: &str, check: impl FnOnce(&mut Self, &Value)) {
        if let Some(value) = obj.get(key) {
            self.enter(key, |v| check(v, value));
        }
    }

    // --- Leaf checks ---

    fn object<'a>(&mut self, value: &'a Value) -> Option<&'a Map<String, Value>> {
        let obj = value.as_object();
        if obj.is_none() {
            self.invalid_type("object", value);
        }
        obj
    }

    fn array<'a>(&mut self, value: &'a Value) -> Option<&'a Vec<Value>> {
        let arr = value.as_array();
        if arr.is_none() {
            self.invalid_type("array", value);
        }
        arr
    }

    fn string(&mut self, value: &Value) {
        if !value.is_string() {
            self.invalid_type("string", value);
        }
    }

    fn non_empty_string(&mut self, value: &Value) {
        match value.as_str() {
            Some("") => self.push(
                ViolationCode::TooSmall,
                "String must contain at least 1 character(s)",
            ),
            Some(_) => {}
            None => self.invalid_type("string", value),
        }
    }

    fn boolean(&mut self, value: &Value) {
        if !value.is_boolean() {
            self.invalid_type("boolean", value);
        }
    }

    fn number(&mut self, value: &Value) {
        if !value.is_number() {
            self.invalid_type("number", value);
        }
    }

    fn positive_number(&mut self, value: &Value) {
        match value.as_f64() {
            Some(n) if n > 0.0 => {}
            Some(_) => self.push(ViolationCode::TooSmall, "Number must be greater than 0"),
            None => self.invalid_type("number", value),
        }
    }

    /// Strictly positive whole number that fits in `u32`. Integral floats
    /// such as `12.0` count as whole numbers.
    fn positive_integer(&mut self, value: &Value) {
        let Some(n) = value.as_f64() else {
            self.invalid_type("integer", value);
            return;
        };
        if n.fract() != 0.0 {
            self.push(ViolationCode::NotInteger, "Expected integer, received float");
        } else if n <= 0.0 {
            self.push(ViolationCode::TooSmall, "Number must be greater than 0");
        } else if n > f64::from(u32::MAX) {
            self.push(
                ViolationCode::TooBig,
                format!("Number must be less than or equal to {}", u32::MAX),
            );
        }
    }

    fn one_of(&mut self, value: &Value, allowed: &[&'static str]) {
        match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => {
                let expected = allowed
                    .iter()
                    .map(|a| format!("'{}'", a))
                    .collect::<Vec<_>>()
                    .join(" | ");
                self.push(
                    ViolationCode::InvalidEnumValue,
                    format!("Invalid enum value. Expected {}, received '{}'", expected, s),
                );
            }
            None => self.invalid_type("string", value),
        }
    }

    fn string_array(&mut self, value: &Value) {
        if let Some(items) = self.array(value) {
            for (i, item) in items.iter().enumerate() {
                self.enter(i, |v| v.string(item));
            }
        }
    }

    fn vec3(&mut self, value: &Value) {
        if let Some(obj) = self.object(value) {
            self.required(obj, "x", Self::number);
            self.required(obj, "y", Self::number);
            self.required(obj, "z", Self::number);
        }
    }

    fn metadata(&mut self, value: &Value) {
        // Contents are opaque; only the container shape is checked.
        self.object(value);
    }

    // --- Schema ---

    fn envelope(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        self.required(obj, "architecture", Self::graph);
        self.required(obj, "summary", Self::string);
        self.required(obj, "insights", Self::string_array);
        self.required(obj, "warnings", Self::string_array);
    }

    fn graph(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        self.required(obj, "name", Self::non_empty_string);
        self.required(obj, "version", Self::non_empty_string);
        self.optional(obj, "description", Self::string);
        self.optional(obj, "generatedAt", Self::string);
        self.optional(obj, "sourceRepository", Self::string);
        self.required(obj, "nodes", |v, nodes| {
            let Some(items) = v.array(nodes) else {
                return;
            };
            if items.is_empty() {
                v.push(
                    ViolationCode::TooSmall,
                    "Architecture must contain at least one node",
                );
            }
            for (i, node) in items.iter().enumerate() {
                v.enter(i, |v| v.node(node));
            }
        });
        self.required(obj, "connections", |v, edges| {
            if let Some(items) = v.array(edges) {
                for (i, edge) in items.iter().enumerate() {
                    v.enter(i, |v| v.edge(edge));
                }
            }
        });
        self.optional(obj, "layout", Self::layout);
        self.optional(obj, "defaultView", Self::default_view);
    }

    fn node(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        self.required(obj, "id", Self::non_empty_string);
        self.required(obj, "name", Self::non_empty_string);
        self.required(obj, "kind", |v, kind| v.one_of(kind, &NodeKind::names()));
        self.optional(obj, "description", Self::string);

        self.optional(obj, "position", Self::vec3);
        self.optional(obj, "color", Self::string);
        self.optional(obj, "size", Self::positive_number);

        self.optional(obj, "parentId", Self::string);

        self.optional(obj, "filePath", Self::string);
        self.optional(obj, "lineStart", Self::positive_integer);
        self.optional(obj, "lineEnd", Self::positive_integer);

        self.optional(obj, "technology", Self::string);
        self.optional(obj, "language", Self::string);
        self.optional(obj, "framework", Self::string);

        self.optional(obj, "status", |v, s| v.one_of(s, &HealthStatus::names()));
        self.optional(obj, "metrics", Self::node_metrics);

        self.optional(obj, "region", Self::string);
        self.optional(obj, "instances", Self::positive_integer);

        self.optional(obj, "metadata", Self::metadata);

        self.optional(obj, "children", |v, children| {
            if let Some(items) = v.array(children) {
                for (i, child) in items.iter().enumerate() {
                    v.enter(i, |v| v.node(child));
                }
            }
        });
    }

    fn node_metrics(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        for key in [
            "requestsPerSecond",
            "latencyMs",
            "errorRate",
            "cpuUsage",
            "memoryUsage",
        ] {
            self.optional(obj, key, Self::number);
        }
    }

    fn edge(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        self.required(obj, "id", Self::non_empty_string);
        self.required(obj, "sourceId", Self::non_empty_string);
        self.required(obj, "targetId", Self::non_empty_string);
        self.required(obj, "kind", |v, kind| v.one_of(kind, &EdgeKind::names()));
        self.optional(obj, "label", Self::string);

        self.optional(obj, "color", Self::string);
        self.optional(obj, "thickness", Self::positive_number);
        self.optional(obj, "animated", Self::boolean);

        self.optional(obj, "bidirectional", Self::boolean);
        self.optional(obj, "dataFlow", |v, f| v.one_of(f, &DataFlow::names()));

        self.optional(obj, "requestsPerSecond", Self::number);
        self.optional(obj, "latencyMs", Self::number);
        self.optional(obj, "errorRate", Self::number);

        self.optional(obj, "metadata", Self::metadata);
    }

    fn layout(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        self.required(obj, "type", |v, t| v.one_of(t, &LayoutType::names()));
        self.optional(obj, "spacing", Self::number);
        self.optional(obj, "layers", |v, layers| {
            if let Some(items) = v.array(layers) {
                for (i, layer) in items.iter().enumerate() {
                    v.enter(i, |v| v.string_array(layer));
                }
            }
        });
    }

    fn default_view(&mut self, value: &Value) {
        let Some(obj) = self.object(value) else {
            return;
        };
        self.required(obj, "position", Self::vec3);
        self.required(obj, "target", Self::vec3);
        self.required(obj, "detailLevel", |v, d| v.one_of(d, &DetailLevel::names()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, Graph, Node};
    use crate::{EdgeKind, NodeKind};

    fn envelope_with(architecture: Value) -> Value {
        json!({
            "architecture": architecture,
            "summary": "",
            "insights": [],
            "warnings": [],
        })
    }

    fn minimal_graph() -> Value {
        json!({
            "name": "Shop",
            "version": "1.0.0",
            "nodes": [{"id": "api", "name": "API", "kind": "service"}],
            "connections": [],
        })
    }

    fn paths(report: &ValidationReport) -> Vec<&str> {
        report.violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_minimal_envelope_is_valid() {
        let envelope = validate(&envelope_with(minimal_graph())).unwrap();
        assert_eq!(envelope.architecture.name, "Shop");
        assert_eq!(envelope.architecture.nodes[0].kind, NodeKind::Service);
        assert!(envelope.architecture.edges.is_empty());
    }

    #[test]
    fn test_non_object_root() {
        let report = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].path, "");
        assert_eq!(report.violations[0].code, ViolationCode::InvalidType);
        assert_eq!(report.violations[0].message, "Expected object, received array");
    }

    #[test]
    fn test_missing_envelope_fields_are_all_reported() {
        let report = validate(&json!({})).unwrap_err();
        assert_eq!(
            paths(&report),
            vec!["architecture", "summary", "insights", "warnings"]
        );
        assert!(report
            .violations
            .iter()
            .all(|v| v.code == ViolationCode::Required));
    }

    #[test]
    fn test_empty_nodes_single_violation() {
        let mut graph = minimal_graph();
        graph["nodes"] = json!([]);
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(report.len(), 1);
        let v = &report.violations[0];
        assert_eq!(v.path, "architecture.nodes");
        assert_eq!(v.code, ViolationCode::TooSmall);
        assert!(v.message.contains("at least one node"));
    }

    #[test]
    fn test_empty_id_is_too_small() {
        let mut graph = minimal_graph();
        graph["nodes"] = json!([{"id": "", "name": "X", "kind": "service"}]);
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(paths(&report), vec!["architecture.nodes.0.id"]);
        assert_eq!(report.violations[0].code, ViolationCode::TooSmall);
    }

    #[test]
    fn test_unknown_kinds_rejected() {
        let graph = json!({
            "name": "g",
            "version": "1",
            "nodes": [{"id": "a", "name": "A", "kind": "microservice"}],
            "connections": [{"id": "e", "sourceId": "a", "targetId": "a", "kind": "rest"}],
        });
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(
            paths(&report),
            vec!["architecture.nodes.0.kind", "architecture.connections.0.kind"]
        );
        assert!(report
            .violations
            .iter()
            .all(|v| v.code == ViolationCode::InvalidEnumValue));
        assert!(report.violations[0].message.contains("'microservice'"));
    }

    #[test]
    fn test_every_node_and_edge_kind_accepted() {
        for kind in NodeKind::ALL {
            let graph = json!({
                "name": "g",
                "version": "1",
                "nodes": [{"id": "a", "name": "A", "kind": kind.as_str()}],
                "connections": [],
            });
            let envelope = validate(&envelope_with(graph)).unwrap();
            assert_eq!(envelope.architecture.nodes[0].kind, kind);
        }
        for kind in EdgeKind::ALL {
            let graph = json!({
                "name": "g",
                "version": "1",
                "nodes": [{"id": "a", "name": "A", "kind": "module"}],
                "connections": [{"id": "e", "sourceId": "a", "targetId": "a", "kind": kind.as_str()}],
            });
            let envelope = validate(&envelope_with(graph)).unwrap();
            assert_eq!(envelope.architecture.edges[0].kind, kind);
        }
    }

    #[test]
    fn test_positive_number_rules() {
        let mut graph = minimal_graph();
        graph["nodes"] = json!([{
            "id": "a", "name": "A", "kind": "service",
            "size": 0,
            "lineStart": 10.5,
            "lineEnd": -3,
            "instances": 0,
        }]);
        graph["connections"] = json!([{
            "id": "e", "sourceId": "a", "targetId": "a", "kind": "http", "thickness": -1.0
        }]);
        let report = validate(&envelope_with(graph)).unwrap_err();
        let got: Vec<(&str, ViolationCode)> = report
            .violations
            .iter()
            .map(|v| (v.path.as_str(), v.code))
            .collect();
        assert_eq!(
            got,
            vec![
                ("architecture.nodes.0.size", ViolationCode::TooSmall),
                ("architecture.nodes.0.lineStart", ViolationCode::NotInteger),
                ("architecture.nodes.0.lineEnd", ViolationCode::TooSmall),
                ("architecture.nodes.0.instances", ViolationCode::TooSmall),
                ("architecture.connections.0.thickness", ViolationCode::TooSmall),
            ]
        );
    }

    #[test]
    fn test_line_number_overflow() {
        let mut graph = minimal_graph();
        graph["nodes"][0]["lineStart"] = json!(u64::from(u32::MAX) + 1);
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(report.violations[0].code, ViolationCode::TooBig);
    }

    #[test]
    fn test_null_optional_is_invalid_type() {
        let mut graph = minimal_graph();
        graph["description"] = Value::Null;
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(paths(&report), vec!["architecture.description"]);
        assert_eq!(report.violations[0].message, "Expected string, received null");
    }

    #[test]
    fn test_recursive_path_to_depth_three() {
        let mut graph = minimal_graph();
        graph["nodes"] = json!([{
            "id": "root", "name": "Root", "kind": "cluster",
            "children": [{
                "id": "mid", "name": "Mid", "kind": "service",
                "children": [{"id": "", "name": "Leaf", "kind": "module"}]
            }]
        }]);
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(
            paths(&report),
            vec!["architecture.nodes.0.children.0.children.0.id"]
        );
    }

    #[test]
    fn test_document_order_scalars_before_children() {
        let mut graph = minimal_graph();
        graph["nodes"] = json!([
            {
                "id": "a", "name": "", "kind": "service",
                "children": [{"id": "", "name": "B", "kind": "module"}],
                "instances": 0
            },
            {"id": "c", "name": "C", "kind": "bogus"}
        ]);
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(
            paths(&report),
            vec![
                "architecture.nodes.0.name",
                "architecture.nodes.0.instances",
                "architecture.nodes.0.children.0.id",
                "architecture.nodes.1.kind",
            ]
        );
    }

    #[test]
    fn test_layout_and_default_view_shapes() {
        let mut graph = minimal_graph();
        graph["layout"] = json!({"type": "spiral", "layers": [["a"], [1]]});
        graph["defaultView"] = json!({
            "position": {"x": 0, "y": 1},
            "target": {"x": 0, "y": 0, "z": 0},
            "detailLevel": "everything"
        });
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(
            paths(&report),
            vec![
                "architecture.layout.type",
                "architecture.layout.layers.1.0",
                "architecture.defaultView.position.z",
                "architecture.defaultView.detailLevel",
            ]
        );
    }

    #[test]
    fn test_metadata_passes_through_untouched() {
        let mut graph = minimal_graph();
        graph["nodes"][0]["metadata"] = json!({"owner": "team-a", "nested": {"k": [1, null]}});
        let envelope = validate(&envelope_with(graph)).unwrap();
        let metadata = envelope.architecture.nodes[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["nested"], json!({"k": [1, null]}));

        let mut bad = minimal_graph();
        bad["nodes"][0]["metadata"] = json!("owner=team-a");
        let report = validate(&envelope_with(bad)).unwrap_err();
        assert_eq!(paths(&report), vec!["architecture.nodes.0.metadata"]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut graph = minimal_graph();
        graph["nodes"][0]["shinyNewField"] = json!(true);
        assert!(validate(&envelope_with(graph)).is_ok());
    }

    #[test]
    fn test_validate_graph_wraps_envelope() {
        let envelope = validate_graph(&minimal_graph()).unwrap();
        assert_eq!(envelope.summary, "");
        assert!(envelope.insights.is_empty());

        let report = validate_graph(&json!({"name": "g"})).unwrap_err();
        assert_eq!(
            paths(&report),
            vec![
                "architecture.version",
                "architecture.nodes",
                "architecture.connections"
            ]
        );
    }

    #[test]
    fn test_parse_envelope_distinguishes_parse_failure() {
        match parse_envelope("{not json") {
            Err(LoadError::Parse(_)) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
        match parse_envelope("{}") {
            Err(LoadError::Invalid(report)) => assert_eq!(report.len(), 4),
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_any_detects_shape() {
        let bare = minimal_graph().to_string();
        assert!(parse_any(&bare).is_ok());
        let wrapped = envelope_with(minimal_graph()).to_string();
        assert!(parse_any(&wrapped).is_ok());
    }

    #[test]
    fn test_round_trip_preserves_nested_graph() {
        let mut graph = Graph {
            name: "Shop".into(),
            version: "2.1.0".into(),
            description: Some("online shop".into()),
            generated_at: Some("2026-01-01T00:00:00Z".into()),
            source_repository: None,
            nodes: vec![Node::new("api", "API", NodeKind::Service).with_child(
                Node::new("orders", "Orders", NodeKind::Module)
                    .with_child(Node::new("order-repo", "OrderRepo", NodeKind::Class)),
            )],
            edges: vec![Edge::new("e1", "api", "db", EdgeKind::Database).with_label("reads")],
            layout: None,
            default_view: None,
        };
        graph.nodes[0].line_start = Some(12);
        graph.nodes[0].size = Some(1.5);
        graph.nodes.push(Node::new("db", "Postgres", NodeKind::Database));

        let envelope = AnalysisEnvelope::wrap(graph);
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value["architecture"].get("connections").is_some());
        let decoded = validate(&value).unwrap();
        assert_eq!(decoded, envelope);
    }

    fn node_chain(depth: usize) -> Value {
        let mut node = json!({"id": format!("n{}", depth), "name": "Leaf", "kind": "function"});
        for level in (1..depth).rev() {
            node = json!({
                "id": format!("n{}", level),
                "name": format!("Level {}", level),
                "kind": "module",
                "children": [node],
            });
        }
        node
    }

    #[test]
    fn test_deep_nesting_parses_and_validates() {
        let mut graph = minimal_graph();
        graph["nodes"] = json!([node_chain(150)]);
        let text = envelope_with(graph).to_string();

        let envelope = parse_envelope(&text).unwrap();
        let mut depth = 0;
        let mut level = envelope.architecture.nodes.as_slice();
        while let Some(node) = level.first() {
            depth += 1;
            level = node.children();
        }
        assert_eq!(depth, 150);
        assert!(parse_any(&text).is_ok());
    }

    #[test]
    fn test_deep_violation_is_located_not_a_parse_error() {
        let mut chain = node_chain(100);
        let mut cursor = &mut chain;
        for _ in 1..100 {
            cursor = &mut cursor["children"][0];
        }
        cursor["kind"] = json!("lambda");
        let mut graph = minimal_graph();
        graph["nodes"] = json!([chain]);

        match parse_envelope(&envelope_with(graph).to_string()) {
            Err(LoadError::Invalid(report)) => {
                assert_eq!(report.len(), 1);
                let expected = format!(
                    "architecture.nodes.0{}.kind",
                    ".children.0".repeat(99)
                );
                assert_eq!(report.violations[0].path, expected);
                assert_eq!(report.violations[0].code, ViolationCode::InvalidEnumValue);
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_data_flow_and_status_rejected() {
        let mut graph = minimal_graph();
        graph["nodes"][0]["status"] = json!("on-fire");
        graph["connections"] = json!([{
            "id": "e", "sourceId": "api", "targetId": "api", "kind": "http",
            "dataFlow": "sideways",
        }]);
        let report = validate(&envelope_with(graph)).unwrap_err();
        assert_eq!(
            paths(&report),
            vec!["architecture.nodes.0.status", "architecture.connections.0.dataFlow"]
        );
        assert!(report
            .violations
            .iter()
            .all(|v| v.code == ViolationCode::InvalidEnumValue));
        assert!(report.violations[0].message.contains("'on-fire'"));
        assert!(report.violations[1].message.contains("'sideways'"));
    }

    #[test]
    fn test_integral_float_accepted_for_integer_fields() {
        let mut graph = minimal_graph();
        graph["nodes"][0]["lineStart"] = json!(12.0);
        graph["nodes"][0]["lineEnd"] = json!(40);
        graph["nodes"][0]["instances"] = json!(3.0);
        let envelope = validate(&envelope_with(graph)).unwrap();
        let node = &envelope.architecture.nodes[0];
        assert_eq!(node.line_start, Some(12));
        assert_eq!(node.line_end, Some(40));
        assert_eq!(node.instances, Some(3));
    }
}
