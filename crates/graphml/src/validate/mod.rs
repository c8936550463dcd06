//! Semantic validation for in-memory documents.
//!
//! The decoder enforces these rules while reading. Documents assembled by
//! hand (or mutated after decoding) are checked here before encoding, so
//! that everything written can be read back.

use rustc_hash::FxHashSet;

use crate::error::{RegistryError, ValidationError};
use crate::model::{Data, Document, Graph, KeyDomain, ProcessingInstruction};
use crate::registry::KeyRegistry;

/// Validates a document.
///
/// Checks that:
/// - the processing instruction, if any, can be written as `<?target text?>`
/// - key ids are unique and key defaults match their declared type
/// - every data entry references a declared key whose domain covers the
///   owning element, and holds a value of the key's type
/// - node ids and edge ids are unique within each graph
/// - every edge endpoint names a node of the same graph
pub fn validate_document(doc: &Document) -> Result<(), ValidationError> {
    if let Some(pi) = &doc.instruction {
        validate_instruction(pi)?;
    }

    let registry = KeyRegistry::from_keys(doc.keys.iter().cloned()).map_err(|err| match err {
        RegistryError::DuplicateKey { id } | RegistryError::NotFound { id } => {
            ValidationError::DuplicateKey { id }
        }
    })?;

    for key in registry.iter() {
        if let Some(default) = &key.default {
            if default.value_type() != key.value_type {
                return Err(ValidationError::DefaultTypeMismatch {
                    key: key.id.clone(),
                    expected: key.value_type,
                    found: default.value_type(),
                });
            }
        }
    }

    validate_data(&doc.data, KeyDomain::Graphml, &registry)?;
    for graph in &doc.graphs {
        validate_graph(graph, &registry)?;
    }
    Ok(())
}

fn validate_instruction(pi: &ProcessingInstruction) -> Result<(), ValidationError> {
    let reason = if pi.target.is_empty() {
        Some("has an empty target")
    } else if pi
        .target
        .contains(|c: char| c.is_whitespace() || matches!(c, '?' | '<' | '>'))
    {
        Some("has a target that is not an XML name")
    } else if pi.instruction.contains("?>") {
        Some("contains `?>`")
    } else if pi.instruction.starts_with(char::is_whitespace) {
        Some("starts with whitespace")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ValidationError::InvalidInstruction {
            target: pi.target.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

fn validate_graph(graph: &Graph, registry: &KeyRegistry) -> Result<(), ValidationError> {
    validate_data(&graph.data, KeyDomain::Graph, registry)?;

    let mut node_ids: FxHashSet<&str> = FxHashSet::default();
    for node in &graph.nodes {
        if !node_ids.insert(&node.id) {
            return Err(ValidationError::DuplicateNodeId { id: node.id.clone() });
        }
        validate_data(&node.data, KeyDomain::Node, registry)?;
    }

    let mut edge_ids: FxHashSet<&str> = FxHashSet::default();
    for edge in &graph.edges {
        if let Some(id) = &edge.id {
            if !edge_ids.insert(id) {
                return Err(ValidationError::DuplicateEdgeId { id: id.clone() });
            }
        }
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(ValidationError::DanglingEdgeReference {
                    edge: edge.describe(),
                    missing: endpoint.clone(),
                });
            }
        }
        validate_data(&edge.data, KeyDomain::Edge, registry)?;
    }
    Ok(())
}

fn validate_data(
    data: &[Data],
    element: KeyDomain,
    registry: &KeyRegistry,
) -> Result<(), ValidationError> {
    for entry in data {
        let key = registry
            .get(&entry.key)
            .ok_or_else(|| ValidationError::UnknownKeyReference {
                key: entry.key.clone(),
                element,
            })?;
        if !key.domain.covers(element) {
            return Err(ValidationError::KeyDomainMismatch {
                key: key.id.clone(),
                domain: key.domain,
                element,
            });
        }
        let found = entry.value.value_type();
        if found != key.value_type {
            return Err(ValidationError::TypeMismatch {
                key: key.id.clone(),
                expected: key.value_type,
                found,
            });
        }
    }
    Ok(())
}
