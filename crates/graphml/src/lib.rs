//! GraphML: reading and writing typed graph documents.
//!
//! This crate decodes GraphML files into an in-memory document tree and
//! encodes documents back to GraphML, preserving key declarations, typed
//! attribute values, graph structure and edge directionality across
//! round-trips.
//!
//! # Quick Start
//!
//! ```rust
//! use graphml::{DocumentBuilder, EdgeDirection, KeyDomain, Value, ValueType};
//! use graphml::{decode_str, encode_to_string};
//!
//! let doc = DocumentBuilder::standard()
//!     .key(KeyDomain::Node, "n", "name", ValueType::String)
//!     .key(KeyDomain::Edge, "w", "weight", ValueType::Float)
//!     .graph(EdgeDirection::Undirected, |g| g
//!         .node("n00", |n| n.data("n", "Gizmo"))
//!         .node("n01", |n| n.data("n", "Gopher"))
//!         .edge("e00", "n00", "n01", |e| e.data("w", 0.5f32))
//!     )
//!     .build();
//!
//! // Encode to text
//! let text = encode_to_string(&doc).unwrap();
//!
//! // Decode back
//! let decoded = decode_str(&text).unwrap();
//! assert_eq!(decoded, doc);
//! assert_eq!(
//!     decoded.graphs[0].node("n01").and_then(|n| n.value("n")),
//!     Some(&Value::from("Gopher")),
//! );
//! ```
//!
//! # Modules
//!
//! - [`model`]: Document tree (keys, graphs, nodes, edges, typed values)
//! - [`codec`]: Value codec, streaming decoder and encoder
//! - [`registry`]: Key declarations by id
//! - [`validate`]: Document invariants checked before encoding
//! - [`error`]: Error types
//!
//! # Wire Format
//!
//! The supported subset is `<graphml>`, `<key>` (with `<desc>` and
//! `<default>`), `<graph>`, `<node>`, `<edge>` and `<data>`. Other elements
//! (ports, hyperedges, nested graphs, extension payloads) are skipped on
//! decode unless [`DecodeOptions::strict`] is used.

pub mod codec;
pub mod error;
pub mod model;
pub mod registry;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    DecodeOptions, EncodeOptions, UnknownElements, decode, decode_str, decode_with_options,
    encode, encode_to_string, encode_to_vec, encode_with_options,
};
pub use error::{DecodeError, EncodeError, ErrorKind, RegistryError, ValidationError, ValueError};
pub use model::{
    Data, DataBuilder, Document, DocumentBuilder, Edge, EdgeDirection, Graph, GraphBuilder, Key,
    KeyDomain, NAMESPACE, Node, ProcessingInstruction, Value, ValueType,
};
pub use registry::KeyRegistry;
pub use validate::validate_document;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Conventional file extension for GraphML documents.
pub const EXTENSION: &str = "graphml";
