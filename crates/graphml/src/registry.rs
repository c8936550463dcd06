//! Key registry: the set of declared attribute keys of one document.
//!
//! The decoder declares keys as it meets them and resolves `<data key>`
//! references against what has been declared so far. Keys must therefore be
//! declared before their first use, which matches the canonical GraphML
//! ordering (`<key>` elements precede `<graph>` elements) and keeps decoding
//! to a single forward pass.

use rustc_hash::FxHashMap;

use crate::error::RegistryError;
use crate::model::Key;

/// Declared keys, in declaration order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: Vec<Key>,
    index: FxHashMap<String, usize>,
}

impl KeyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from keys in declaration order.
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for key in keys {
            registry.declare(key)?;
        }
        Ok(registry)
    }

    /// Registers a new key. Fails if the id is already declared.
    pub fn declare(&mut self, key: Key) -> Result<(), RegistryError> {
        if self.index.contains_key(&key.id) {
            return Err(RegistryError::DuplicateKey { id: key.id });
        }
        self.index.insert(key.id.clone(), self.keys.len());
        self.keys.push(key);
        Ok(())
    }

    /// Resolves a key id.
    pub fn resolve(&self, id: &str) -> Result<&Key, RegistryError> {
        self.get(id).ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    /// Looks up a key id.
    pub fn get(&self, id: &str) -> Option<&Key> {
        self.index.get(id).map(|&i| &self.keys[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates keys in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Returns the keys in declaration order.
    pub fn into_keys(self) -> Vec<Key> {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyDomain, ValueType};

    fn key(id: &str, value_type: ValueType) -> Key {
        Key::new(KeyDomain::Node, id, id, value_type)
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut registry = KeyRegistry::new();
        registry.declare(key("n", ValueType::String)).unwrap();
        registry.declare(key("s", ValueType::Int)).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("s").unwrap().value_type, ValueType::Int);
        assert!(registry.contains("n"));
        assert_eq!(
            registry.resolve("w"),
            Err(RegistryError::NotFound { id: "w".to_string() })
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = KeyRegistry::new();
        registry.declare(key("n", ValueType::String)).unwrap();
        let result = registry.declare(key("n", ValueType::Int));
        assert_eq!(result, Err(RegistryError::DuplicateKey { id: "n".to_string() }));
        // First declaration wins.
        assert_eq!(registry.resolve("n").unwrap().value_type, ValueType::String);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let registry = KeyRegistry::from_keys([
            key("z", ValueType::Double),
            key("a", ValueType::Boolean),
            key("m", ValueType::Long),
        ])
        .unwrap();
        let ids: Vec<_> = registry.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
        assert_eq!(registry.into_keys().len(), 3);
    }

    #[test]
    fn test_from_keys_duplicate() {
        let result = KeyRegistry::from_keys([key("n", ValueType::String), key("n", ValueType::String)]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey { .. })));
    }
}
