//! Document tree: the decoded form of a GraphML file.
//!
//! Ownership is strictly tree-shaped. Edges name their endpoints by node id;
//! they never hold references into the node list.

use std::fmt;

use crate::model::{Key, Value};

/// Standard GraphML namespace URI.
pub const NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";

/// A processing instruction kept verbatim for round-trip fidelity.
///
/// The XML declaration is stored the same way, with target `xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub target: String,
    /// Raw instruction text after the target, without leading whitespace.
    pub instruction: String,
}

impl ProcessingInstruction {
    pub fn new(target: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            instruction: instruction.into(),
        }
    }

    /// `<?xml version="1.0" encoding="UTF-8"?>`
    pub fn xml_declaration() -> Self {
        Self::new("xml", r#"version="1.0" encoding="UTF-8""#)
    }
}

/// A GraphML document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Leading XML declaration or processing instruction.
    pub instruction: Option<ProcessingInstruction>,
    /// Attributes of the `<graphml>` root element, in document order.
    pub attributes: Vec<(String, String)>,
    /// Key declarations, in document order.
    pub keys: Vec<Key>,
    /// Document-level data (keys declared `for="graphml"` or `all`).
    pub data: Vec<Data>,
    pub graphs: Vec<Graph>,
}

impl Document {
    /// Creates an empty document with no instruction and no root attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the XML declaration and the GraphML
    /// default namespace, as most producers write them.
    pub fn with_standard_header() -> Self {
        Self {
            instruction: Some(ProcessingInstruction::xml_declaration()),
            attributes: vec![("xmlns".to_string(), NAMESPACE.to_string())],
            keys: Vec::new(),
            data: Vec::new(),
            graphs: Vec::new(),
        }
    }

    /// Looks up a key declaration by id.
    pub fn key(&self, id: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.id == id)
    }

    /// Returns the first document-level value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        find_value(&self.data, key)
    }
}

/// Edge directionality (`edgedefault` on a `<graph>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeDirection {
    #[default]
    Directed,
    Undirected,
}

impl EdgeDirection {
    pub fn parse(s: &str) -> Option<EdgeDirection> {
        match s {
            "directed" => Some(EdgeDirection::Directed),
            "undirected" => Some(EdgeDirection::Undirected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeDirection::Directed => "directed",
            EdgeDirection::Undirected => "undirected",
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<graph>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    pub id: Option<String>,
    /// Applied to every edge without its own `directed` attribute.
    pub edge_default: EdgeDirection,
    /// Graph-level data.
    pub data: Vec<Data>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(edge_default: EdgeDirection) -> Self {
        Self {
            edge_default,
            ..Self::default()
        }
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id.as_deref() == Some(id))
    }

    /// Returns the first value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        find_value(&self.data, key)
    }
}

/// A `<node>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub data: Vec<Data>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Vec::new(),
        }
    }

    /// Appends a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.push(Data::new(key, value));
        self
    }

    /// Returns the first value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        find_value(&self.data, key)
    }
}

/// An `<edge>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Optional in GraphML; unique within the graph when present.
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    /// Per-edge override of the graph's `edgedefault`.
    pub directed: Option<bool>,
    pub data: Vec<Data>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            source: source.into(),
            target: target.into(),
            directed: None,
            data: Vec::new(),
        }
    }

    /// Creates an edge without an id.
    pub fn anonymous(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            directed: None,
            data: Vec::new(),
        }
    }

    /// Appends a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.push(Data::new(key, value));
        self
    }

    /// Resolves this edge's directionality against the owning graph's default.
    pub fn is_directed(&self, edge_default: EdgeDirection) -> bool {
        self.directed.unwrap_or(edge_default == EdgeDirection::Directed)
    }

    /// Returns the first value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        find_value(&self.data, key)
    }

    /// Names the edge in error messages: its id, or `source->target`.
    pub(crate) fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("{id:?}"),
            None => format!("{}->{}", self.source, self.target),
        }
    }
}

/// A `<data>` element: a typed value bound to a key id.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub key: String,
    pub value: Value,
}

impl Data {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn find_value<'a>(data: &'a [Data], key: &str) -> Option<&'a Value> {
    data.iter().find(|d| d.key == key).map(|d| &d.value)
}
