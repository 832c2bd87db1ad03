/// Request-document decoding: the wire side of graph ingestion.
///
/// A request is a JSON object with a `nodes` list and an `edges` list:
///
/// ```json
/// { "nodes": [ { "id": "a" } ], "edges": [ { "source": "a", "target": "b" } ] }
/// ```
///
/// Decoding is permissive about everything graph theory does not care
/// about: unknown fields are ignored, missing lists default to empty, and
/// edges may reference nodes that were never declared. It is strict only
/// about structure. An edge that cannot be read as a `(source, target)`
/// pair fails the whole request with [`IngestError::MalformedEdge`].
///
/// Decoding goes through [`serde_json::Value`] rather than a derived
/// `Deserialize` so that a bad edge can be reported by its position in the
/// `edges` list instead of by a line/column into the document.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::newtypes::NodeId;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Coarse classification of an [`IngestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request document itself could not be framed: not JSON, not an
    /// object, list fields of the wrong type, or a node entry without an id.
    MalformedRequest,
    /// An edge entry could not be decoded into a `(source, target)` pair.
    MalformedEdge,
}

/// Errors produced while decoding a request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The document is not a well-formed request.
    MalformedRequest {
        /// Human-readable description of the problem.
        detail: String,
    },
    /// The edge at `index` is not a valid `(source, target)` pair.
    MalformedEdge {
        /// Zero-based position of the offending entry in `edges`.
        index: usize,
        /// Human-readable description of the problem.
        detail: String,
    },
}

impl IngestError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest { .. } => ErrorKind::MalformedRequest,
            Self::MalformedEdge { .. } => ErrorKind::MalformedEdge,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequest { detail } => write!(f, "malformed request: {detail}"),
            Self::MalformedEdge { index, detail } => {
                write!(f, "malformed edge at edges[{index}]: {detail}")
            }
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A declared node. Only the identifier is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    /// Caller-defined identifier.
    pub id: NodeId,
}

impl NodeEntry {
    /// Creates a node entry for `id`.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self { id: id.into() }
    }
}

/// A directed edge from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEntry {
    /// Tail of the edge.
    pub source: NodeId,
    /// Head of the edge.
    pub target: NodeId,
}

impl EdgeEntry {
    /// Creates an edge entry `source -> target`.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns `true` if the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A decoded request: the caller's node and edge lists, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineRequest {
    /// Declared nodes, duplicates included.
    pub nodes: Vec<NodeEntry>,
    /// Edges, duplicates and self-loops included.
    pub edges: Vec<EdgeEntry>,
}

impl PipelineRequest {
    /// Builds a request from already-typed lists.
    pub fn new(nodes: Vec<NodeEntry>, edges: Vec<EdgeEntry>) -> Self {
        Self { nodes, edges }
    }

    /// Decodes a request from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// - [`IngestError::MalformedRequest`] if `value` is not an object, if
    ///   `nodes` or `edges` is present but not an array, or if a node entry
    ///   carries no decodable identifier.
    /// - [`IngestError::MalformedEdge`] for the first edge entry that is not
    ///   a `(source, target)` pair.
    pub fn from_value(value: &Value) -> Result<Self, IngestError> {
        let Value::Object(map) = value else {
            return Err(IngestError::MalformedRequest {
                detail: format!("expected a JSON object, got {}", json_kind(value)),
            });
        };

        let nodes = list_field(map, "nodes")?
            .iter()
            .enumerate()
            .map(|(index, entry)| decode_node(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let edges = list_field(map, "edges")?
            .iter()
            .enumerate()
            .map(|(index, entry)| decode_edge(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { nodes, edges })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses request text into a [`PipelineRequest`].
///
/// # Errors
///
/// Returns [`IngestError::MalformedRequest`] when `content` is not valid
/// JSON (the detail carries line and column), and otherwise whatever
/// [`PipelineRequest::from_value`] reports.
pub fn parse_request(content: &str) -> Result<PipelineRequest, IngestError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| IngestError::MalformedRequest {
            detail: format!("line {}, column {}: {e}", e.line(), e.column()),
        })?;
    PipelineRequest::from_value(&value)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Returns the array stored under `key`, treating absent and `null` as empty.
fn list_field<'a>(map: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], IngestError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(
            other @ (Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_)),
        ) => Err(IngestError::MalformedRequest {
            detail: format!("`{key}` must be an array, got {}", json_kind(other)),
        }),
    }
}

/// Decodes `nodes[index]`: either `{ "id": .. }` or a bare identifier.
fn decode_node(index: usize, entry: &Value) -> Result<NodeEntry, IngestError> {
    let id_value = match entry {
        Value::Object(map) => map.get("id").ok_or_else(|| IngestError::MalformedRequest {
            detail: format!("nodes[{index}]: missing `id`"),
        })?,
        Value::String(_) | Value::Number(_) => entry,
        Value::Null | Value::Bool(_) | Value::Array(_) => {
            return Err(IngestError::MalformedRequest {
                detail: format!(
                    "nodes[{index}]: expected an object or an identifier, got {}",
                    json_kind(entry)
                ),
            });
        }
    };

    NodeId::deserialize(id_value)
        .map(|id| NodeEntry { id })
        .map_err(|e| IngestError::MalformedRequest {
            detail: format!("nodes[{index}].id: {e}"),
        })
}

/// Decodes `edges[index]`: either `{ "source": .., "target": .. }` or a
/// two-element `[source, target]` array.
fn decode_edge(index: usize, entry: &Value) -> Result<EdgeEntry, IngestError> {
    let (source, target) = match entry {
        Value::Object(map) => (map.get("source"), map.get("target")),
        Value::Array(items) => match items.as_slice() {
            [source, target] => (Some(source), Some(target)),
            other => {
                return Err(IngestError::MalformedEdge {
                    index,
                    detail: format!(
                        "expected a [source, target] pair, got {} elements",
                        other.len()
                    ),
                });
            }
        },
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            return Err(IngestError::MalformedEdge {
                index,
                detail: format!(
                    "expected an object or a [source, target] pair, got {}",
                    json_kind(entry)
                ),
            });
        }
    };

    Ok(EdgeEntry {
        source: endpoint(index, source, "source")?,
        target: endpoint(index, target, "target")?,
    })
}

fn endpoint(index: usize, value: Option<&Value>, field: &str) -> Result<NodeId, IngestError> {
    let value = value.ok_or_else(|| IngestError::MalformedEdge {
        index,
        detail: format!("missing `{field}`"),
    })?;
    NodeId::deserialize(value).map_err(|e| IngestError::MalformedEdge {
        index,
        detail: format!("`{field}`: {e}"),
    })
}

/// Short name of a JSON value's kind, for error messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
