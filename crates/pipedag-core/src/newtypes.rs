/// Identifier newtype for pipeline-graph nodes.
///
/// A [`NodeId`] is opaque to the core: it is either a JSON string or a JSON
/// integer, chosen by the caller. The two kinds never compare equal, so the
/// text `"1"` and the integer `1` name different nodes. No shape constraint
/// is imposed beyond that; identity is all the validator needs.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Caller-defined identifier of a node, as received on the wire.
///
/// Ordering sorts all integer identifiers before all text identifiers, then
/// by value within each kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    /// Integer identifier (`i64` range).
    Int(i64),
    /// Text identifier; the empty string is allowed.
    Text(String),
}

impl NodeId {
    /// Returns the text form if this is a [`NodeId::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns the integer form if this is a [`NodeId::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}

struct NodeIdVisitor;

impl de::Visitor<'_> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer node identifier")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
        Ok(NodeId::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
        i64::try_from(v).map(NodeId::Int).map_err(|_| {
            E::invalid_value(de::Unexpected::Unsigned(v), &"an integer within i64 range")
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
        Ok(NodeId::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<NodeId, E> {
        Ok(NodeId::Text(v))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
