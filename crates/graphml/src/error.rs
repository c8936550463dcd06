//! Error types for GraphML encoding/decoding and validation.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::model::{KeyDomain, ValueType};

/// Coarse error categories shared by every decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structural violation of the XML or of the GraphML element layout.
    MalformedXml,
    DuplicateKey,
    TypeMismatch,
    UnknownKeyReference,
    DanglingEdgeReference,
    /// The underlying byte stream failed.
    Io,
}

/// Error converting between attribute text and a typed value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("expected {expected} value, found {raw:?}")]
    TypeMismatch { expected: ValueType, raw: String },

    #[error("{found} value cannot be written as {expected}")]
    WrongVariant { expected: ValueType, found: ValueType },
}

/// Error declaring or resolving a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate key id {id:?}")]
    DuplicateKey { id: String },

    #[error("key {id:?} is not declared")]
    NotFound { id: String },
}

/// Error during GraphML decoding.
///
/// Every variant except `Io` and `MissingRoot` carries the byte offset at
/// which the fault was detected.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(Arc<io::Error>),

    #[error("malformed XML at byte {offset}: {message}")]
    MalformedXml { message: String, offset: u64 },

    #[error("document has no <graphml> root element")]
    MissingRoot,

    #[error("unexpected root element <{name}> at byte {offset}")]
    UnexpectedRoot { name: String, offset: u64 },

    #[error("<{element}> at byte {offset} is missing required attribute {attribute:?}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
        offset: u64,
    },

    #[error("<{element}> at byte {offset} has invalid {attribute}={value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
        offset: u64,
    },

    #[error("duplicate key id {id:?} at byte {offset}")]
    DuplicateKey { id: String, offset: u64 },

    #[error("data at byte {offset} references undeclared key {key:?}")]
    UnknownKeyReference { key: String, offset: u64 },

    #[error("key {key:?} is declared for {domain} but used on {element} at byte {offset}")]
    KeyDomainMismatch {
        key: String,
        domain: KeyDomain,
        element: KeyDomain,
        offset: u64,
    },

    #[error("type mismatch for key {key:?} at byte {offset}: expected {expected}, found {raw:?}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        raw: String,
        offset: u64,
    },

    #[error("duplicate node id {id:?} at byte {offset}")]
    DuplicateNodeId { id: String, offset: u64 },

    #[error("duplicate edge id {id:?} at byte {offset}")]
    DuplicateEdgeId { id: String, offset: u64 },

    #[error("edge {edge} references missing node {missing:?} (graph ending at byte {offset})")]
    DanglingEdgeReference {
        edge: String,
        missing: String,
        offset: u64,
    },

    #[error("unexpected element <{name}> inside <{parent}> at byte {offset}")]
    UnexpectedElement {
        name: String,
        parent: &'static str,
        offset: u64,
    },
}

impl DecodeError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Io(_) => ErrorKind::Io,
            DecodeError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            DecodeError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DecodeError::UnknownKeyReference { .. } => ErrorKind::UnknownKeyReference,
            DecodeError::DanglingEdgeReference { .. } => ErrorKind::DanglingEdgeReference,
            _ => ErrorKind::MalformedXml,
        }
    }

    /// Returns the byte offset of the fault, if known.
    pub fn offset(&self) -> Option<u64> {
        match self {
            DecodeError::Io(_) | DecodeError::MissingRoot => None,
            DecodeError::MalformedXml { offset, .. }
            | DecodeError::UnexpectedRoot { offset, .. }
            | DecodeError::MissingAttribute { offset, .. }
            | DecodeError::InvalidAttribute { offset, .. }
            | DecodeError::DuplicateKey { offset, .. }
            | DecodeError::UnknownKeyReference { offset, .. }
            | DecodeError::KeyDomainMismatch { offset, .. }
            | DecodeError::TypeMismatch { offset, .. }
            | DecodeError::DuplicateNodeId { offset, .. }
            | DecodeError::DuplicateEdgeId { offset, .. }
            | DecodeError::DanglingEdgeReference { offset, .. }
            | DecodeError::UnexpectedElement { offset, .. } => Some(*offset),
        }
    }
}

/// Error during GraphML encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(#[from] ValidationError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Violation of a document invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("processing instruction {target:?} {reason}")]
    InvalidInstruction { target: String, reason: &'static str },

    #[error("duplicate key id {id:?}")]
    DuplicateKey { id: String },

    #[error("{element} data references undeclared key {key:?}")]
    UnknownKeyReference { key: String, element: KeyDomain },

    #[error("key {key:?} is declared for {domain} but used on {element}")]
    KeyDomainMismatch {
        key: String,
        domain: KeyDomain,
        element: KeyDomain,
    },

    #[error("data for key {key:?} holds a {found} value, key declares {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("default of key {key:?} holds a {found} value, key declares {expected}")]
    DefaultTypeMismatch {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("duplicate node id {id:?}")]
    DuplicateNodeId { id: String },

    #[error("duplicate edge id {id:?}")]
    DuplicateEdgeId { id: String },

    #[error("edge {edge} references missing node {missing:?}")]
    DanglingEdgeReference { edge: String, missing: String },
}
