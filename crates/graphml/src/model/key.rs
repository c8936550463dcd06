//! Attribute key declarations.

use std::fmt;

use crate::model::{Value, ValueType};

/// The entity kinds a key applies to (`for` on a `<key>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyDomain {
    Graph,
    Node,
    Edge,
    /// Applies to every entity kind. The GraphML default.
    #[default]
    All,
    // Kinds below are declared by real-world documents but the entities
    // themselves are not modeled, so no data ever attaches to them.
    Graphml,
    Hyperedge,
    Port,
    Endpoint,
}

impl KeyDomain {
    /// Creates a KeyDomain from its `for` spelling.
    pub fn parse(s: &str) -> Option<KeyDomain> {
        match s {
            "graph" => Some(KeyDomain::Graph),
            "node" => Some(KeyDomain::Node),
            "edge" => Some(KeyDomain::Edge),
            "all" => Some(KeyDomain::All),
            "graphml" => Some(KeyDomain::Graphml),
            "hyperedge" => Some(KeyDomain::Hyperedge),
            "port" => Some(KeyDomain::Port),
            "endpoint" => Some(KeyDomain::Endpoint),
            _ => None,
        }
    }

    /// Returns the `for` spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyDomain::Graph => "graph",
            KeyDomain::Node => "node",
            KeyDomain::Edge => "edge",
            KeyDomain::All => "all",
            KeyDomain::Graphml => "graphml",
            KeyDomain::Hyperedge => "hyperedge",
            KeyDomain::Port => "port",
            KeyDomain::Endpoint => "endpoint",
        }
    }

    /// Returns true if a key of this domain may be attached to `entity`.
    pub fn covers(self, entity: KeyDomain) -> bool {
        self == KeyDomain::All || self == entity
    }
}

impl fmt::Display for KeyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attribute declaration (a `<key>` element).
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// Document-unique identifier referenced by `<data key="...">`.
    pub id: String,
    pub domain: KeyDomain,
    /// Display name (`attr.name`). Empty when not declared.
    pub name: String,
    pub value_type: ValueType,
    /// Optional `<desc>` text.
    pub desc: Option<String>,
    /// Optional `<default>` value, typed by `value_type`.
    pub default: Option<Value>,
}

impl Key {
    /// Creates a key with no description and no default.
    pub fn new(
        domain: KeyDomain,
        id: impl Into<String>,
        name: impl Into<String>,
        value_type: ValueType,
    ) -> Self {
        Self {
            id: id.into(),
            domain,
            name: name.into(),
            value_type,
            desc: None,
            default: None,
        }
    }

    /// Sets the `<desc>` text.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Sets the `<default>` value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_names() {
        for domain in [
            KeyDomain::Graph,
            KeyDomain::Node,
            KeyDomain::Edge,
            KeyDomain::All,
            KeyDomain::Graphml,
            KeyDomain::Hyperedge,
            KeyDomain::Port,
            KeyDomain::Endpoint,
        ] {
            assert_eq!(KeyDomain::parse(domain.as_str()), Some(domain));
        }
        assert_eq!(KeyDomain::parse("Node"), None);
    }

    #[test]
    fn test_domain_covers() {
        assert!(KeyDomain::All.covers(KeyDomain::Edge));
        assert!(KeyDomain::Node.covers(KeyDomain::Node));
        assert!(!KeyDomain::Node.covers(KeyDomain::Edge));
        assert!(!KeyDomain::Port.covers(KeyDomain::Graph));
    }

    #[test]
    fn test_key_constructor() {
        let key = Key::new(KeyDomain::Node, "c", "cute", ValueType::Boolean).with_default(false);
        assert_eq!(key.id, "c");
        assert_eq!(key.name, "cute");
        assert_eq!(key.default, Some(Value::Boolean(false)));
        assert_eq!(key.desc, None);
    }
}
