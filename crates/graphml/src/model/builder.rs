//! Builder API for ergonomic Document construction.
//!
//! Provides a fluent interface for building documents without spelling out
//! every struct literal.
//!
//! # Example
//!
//! ```rust
//! use graphml::model::builder::DocumentBuilder;
//! use graphml::{EdgeDirection, KeyDomain, ValueType};
//!
//! let doc = DocumentBuilder::standard()
//!     .key(KeyDomain::Node, "n", "label", ValueType::String)
//!     .key(KeyDomain::Edge, "w", "weight", ValueType::Float)
//!     .graph(EdgeDirection::Directed, |g| g
//!         .node("n0", |n| n.data("n", "Gizmo"))
//!         .node("n1", |n| n.data("n", "Gopher"))
//!         .edge("e0", "n0", "n1", |e| e.data("w", 0.25f32))
//!     )
//!     .build();
//!
//! assert_eq!(doc.graphs[0].nodes.len(), 2);
//! ```

use crate::model::{
    Data, Document, Edge, EdgeDirection, Graph, Key, KeyDomain, Node, ProcessingInstruction,
    Value, ValueType,
};

/// Builder for constructing a Document.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// Creates a builder for an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with the XML declaration and GraphML namespace.
    pub fn standard() -> Self {
        Self {
            doc: Document::with_standard_header(),
        }
    }

    /// Sets the leading processing instruction.
    pub fn instruction(mut self, target: impl Into<String>, instruction: impl Into<String>) -> Self {
        self.doc.instruction = Some(ProcessingInstruction::new(target, instruction));
        self
    }

    /// Appends an attribute to the `<graphml>` root element.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.doc.attributes.push((name.into(), value.into()));
        self
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Declares a key.
    pub fn key(
        self,
        domain: KeyDomain,
        id: impl Into<String>,
        name: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        self.declare(Key::new(domain, id, name, value_type))
    }

    /// Declares a fully constructed key (with description or default).
    pub fn declare(mut self, key: Key) -> Self {
        self.doc.keys.push(key);
        self
    }

    /// Adds document-level data.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.doc.data.push(Data::new(key, value));
        self
    }

    // =========================================================================
    // Graphs
    // =========================================================================

    /// Adds a graph using a builder function.
    pub fn graph<F>(mut self, edge_default: EdgeDirection, f: F) -> Self
    where
        F: FnOnce(GraphBuilder) -> GraphBuilder,
    {
        let builder = f(GraphBuilder::new(edge_default));
        self.doc.graphs.push(builder.graph);
        self
    }

    /// Builds the document.
    pub fn build(self) -> Document {
        self.doc
    }
}

/// Builder for the contents of one graph.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(edge_default: EdgeDirection) -> Self {
        Self {
            graph: Graph::new(edge_default),
        }
    }

    /// Sets the graph id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.graph.id = Some(id.into());
        self
    }

    /// Adds graph-level data.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.graph.data.push(Data::new(key, value));
        self
    }

    /// Adds a node using a builder function for its data.
    pub fn node<F>(mut self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(DataBuilder) -> DataBuilder,
    {
        let builder = f(DataBuilder::new());
        self.graph.nodes.push(Node {
            id: id.into(),
            data: builder.data,
        });
        self
    }

    /// Adds a node with no data.
    pub fn empty_node(mut self, id: impl Into<String>) -> Self {
        self.graph.nodes.push(Node::new(id));
        self
    }

    /// Adds an edge using a builder function for its data.
    pub fn edge<F>(
        mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        f: F,
    ) -> Self
    where
        F: FnOnce(DataBuilder) -> DataBuilder,
    {
        let builder = f(DataBuilder::new());
        let mut edge = Edge::new(id, source, target);
        edge.data = builder.data;
        self.graph.edges.push(edge);
        self
    }

    /// Adds a fully constructed edge (anonymous or with a direction override).
    pub fn push_edge(mut self, edge: Edge) -> Self {
        self.graph.edges.push(edge);
        self
    }

    /// Builds the graph.
    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Collects the data entries of a node or edge.
#[derive(Debug, Clone, Default)]
pub struct DataBuilder {
    data: Vec<Data>,
}

impl DataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.push(Data::new(key, value));
        self
    }

    /// Returns the collected entries.
    pub fn build(self) -> Vec<Data> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = DocumentBuilder::new()
            .instruction("xml", r#"version="1.0""#)
            .attribute("xmlns", crate::model::NAMESPACE)
            .key(KeyDomain::Node, "n", "label", ValueType::String)
            .graph(EdgeDirection::Undirected, |g| {
                g.id("G")
                    .node("a", |n| n.data("n", "A"))
                    .empty_node("b")
                    .edge("e0", "a", "b", |e| e)
                    .push_edge(Edge::anonymous("b", "a"))
            })
            .build();

        assert_eq!(doc.instruction.as_ref().map(|i| i.target.as_str()), Some("xml"));
        assert_eq!(doc.keys.len(), 1);
        let graph = &doc.graphs[0];
        assert_eq!(graph.id.as_deref(), Some("G"));
        assert_eq!(graph.edge_default, EdgeDirection::Undirected);
        assert_eq!(graph.nodes[0].data, vec![Data::new("n", "A")]);
        assert!(graph.nodes[1].data.is_empty());
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[1].id, None);
    }

    #[test]
    fn test_document_data() {
        let doc = DocumentBuilder::new()
            .key(KeyDomain::Graphml, "v", "version", ValueType::Int)
            .data("v", 3)
            .build();
        assert_eq!(doc.value("v"), Some(&Value::Int(3)));
        assert!(doc.graphs.is_empty());
    }

    #[test]
    fn test_graph_builder_standalone() {
        let graph = GraphBuilder::new(EdgeDirection::Directed)
            .data("d", 3i64)
            .build();
        assert_eq!(graph.value("d"), Some(&Value::Long(3)));
    }

    #[test]
    fn test_data_builder() {
        let data = DataBuilder::new().data("c", true).data("s", 30).build();
        assert_eq!(data, vec![Data::new("c", true), Data::new("s", 30)]);
    }
}
