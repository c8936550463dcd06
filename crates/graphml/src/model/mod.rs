//! Data model types for GraphML.
//!
//! This module contains the in-memory document tree:
//! - Values (typed attribute instances)
//! - Keys (attribute declarations)
//! - Document, graphs, nodes, edges and data
//! - Builders (ergonomic construction)

pub mod builder;
pub mod document;
pub mod key;
pub mod value;

pub use builder::{DataBuilder, DocumentBuilder, GraphBuilder};
pub use document::{
    Data, Document, Edge, EdgeDirection, Graph, NAMESPACE, Node, ProcessingInstruction,
};
pub use key::{Key, KeyDomain};
pub use value::{Value, ValueType};
