//! Streaming GraphML decoder.
//!
//! Reads the wire format in a single forward pass over XML events. Only the
//! document under construction is held in memory; keys are registered as
//! they are met and every `<data>` is typed against the registry at the
//! point it is read.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::codec::value::{decode_bool, decode_value};
use crate::error::DecodeError;
use crate::model::{
    Data, Document, Edge, EdgeDirection, Graph, Key, KeyDomain, Node, ProcessingInstruction,
    ValueType,
};
use crate::registry::KeyRegistry;

/// Policy for elements outside the modeled subset of GraphML
/// (ports, hyperedges, nested graphs, extension payloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownElements {
    /// Skip the element and its whole subtree.
    #[default]
    Skip,
    /// Fail with [`DecodeError::UnexpectedElement`].
    Reject,
}

/// Options for decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub unknown_elements: UnknownElements,
}

impl DecodeOptions {
    /// Creates default (permissive) decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject unknown elements.
    pub fn strict() -> Self {
        Self {
            unknown_elements: UnknownElements::Reject,
        }
    }
}

/// Decodes a document from a byte stream.
///
/// Keys must be declared before the first `<data>` that references them.
/// Decoding is all-or-nothing: on error no partial document is returned.
pub fn decode<R: BufRead>(reader: R) -> Result<Document, DecodeError> {
    decode_with_options(reader, DecodeOptions::default())
}

/// Decodes a document from a byte stream with the given options.
pub fn decode_with_options<R: BufRead>(
    reader: R,
    options: DecodeOptions,
) -> Result<Document, DecodeError> {
    Decoder::new(reader, options).read_document()
}

/// Decodes a document held in a string.
pub fn decode_str(input: &str) -> Result<Document, DecodeError> {
    decode(input.as_bytes())
}

/// One step inside an element body.
enum Child {
    Element {
        start: BytesStart<'static>,
        empty: bool,
        offset: u64,
    },
    Text(String),
    End,
}

struct Decoder<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    registry: KeyRegistry,
    options: DecodeOptions,
}

impl<R: BufRead> Decoder<R> {
    fn new(inner: R, options: DecodeOptions) -> Self {
        Self {
            reader: Reader::from_reader(inner),
            buf: Vec::new(),
            registry: KeyRegistry::new(),
            options,
        }
    }

    // =========================================================================
    // Document structure
    // =========================================================================

    fn read_document(mut self) -> Result<Document, DecodeError> {
        let mut doc = Document::new();

        // Prolog: declaration, instructions, comments up to the root element.
        loop {
            let offset = self.position();
            match self.next_event()? {
                Event::Decl(decl) => self.store_instruction(&mut doc, &decl, offset)?,
                Event::PI(pi) => self.store_instruction(&mut doc, &pi, offset)?,
                Event::Start(start) => {
                    self.read_root(&mut doc, &start, false, offset)?;
                    break;
                }
                Event::Empty(start) => {
                    self.read_root(&mut doc, &start, true, offset)?;
                    break;
                }
                Event::Eof => return Err(DecodeError::MissingRoot),
                _ => {}
            }
        }

        // Epilog: only comments, instructions and whitespace may follow.
        loop {
            let offset = self.position();
            match self.next_event()? {
                Event::Start(start) | Event::Empty(start) => {
                    return Err(DecodeError::MalformedXml {
                        message: format!("element <{}> after the root element", element_name(&start)),
                        offset,
                    });
                }
                Event::Eof => break,
                _ => {}
            }
        }

        doc.keys = std::mem::take(&mut self.registry).into_keys();
        debug!(
            keys = doc.keys.len(),
            graphs = doc.graphs.len(),
            "decoded GraphML document"
        );
        Ok(doc)
    }

    fn store_instruction(
        &self,
        doc: &mut Document,
        raw: &[u8],
        offset: u64,
    ) -> Result<(), DecodeError> {
        let raw = std::str::from_utf8(raw).map_err(|_| DecodeError::MalformedXml {
            message: "processing instruction is not valid UTF-8".to_string(),
            offset,
        })?;
        if doc.instruction.is_some() {
            debug!(offset, "skipping additional processing instruction");
            return Ok(());
        }
        let (target, instruction) = match raw.find(char::is_whitespace) {
            Some(split) => (&raw[..split], raw[split..].trim_start()),
            None => (raw, ""),
        };
        doc.instruction = Some(ProcessingInstruction::new(target, instruction));
        Ok(())
    }

    fn read_root(
        &mut self,
        doc: &mut Document,
        start: &BytesStart<'_>,
        empty: bool,
        offset: u64,
    ) -> Result<(), DecodeError> {
        if start.local_name().as_ref() != b"graphml" {
            return Err(DecodeError::UnexpectedRoot {
                name: element_name(start),
                offset,
            });
        }
        doc.attributes = self.attributes(start, offset)?;
        if empty {
            return Ok(());
        }

        loop {
            match self.next_child()? {
                Child::Element { start, empty, offset } => match start.local_name().as_ref() {
                    b"key" => self.read_key(&start, empty, offset)?,
                    b"data" => {
                        let data = self.read_data(&start, empty, offset, KeyDomain::Graphml)?;
                        doc.data.push(data);
                    }
                    b"graph" => {
                        let graph = self.read_graph(&start, empty, offset)?;
                        doc.graphs.push(graph);
                    }
                    _ => self.skip_unknown(&start, empty, "graphml", offset)?,
                },
                Child::Text(_) => {}
                Child::End => return Ok(()),
            }
        }
    }

    fn read_key(&mut self, start: &BytesStart<'_>, empty: bool, offset: u64) -> Result<(), DecodeError> {
        let attrs = self.attributes(start, offset)?;
        let id = required(&attrs, "key", "id", offset)?.to_string();
        if self.registry.contains(&id) {
            return Err(DecodeError::DuplicateKey { id, offset });
        }

        let domain = match attr(&attrs, "for") {
            None => KeyDomain::All,
            Some(v) => KeyDomain::parse(v).ok_or_else(|| invalid("key", "for", v, offset))?,
        };
        let name = attr(&attrs, "attr.name").unwrap_or_default();
        let value_type = match attr(&attrs, "attr.type") {
            None => ValueType::String,
            Some(v) => ValueType::parse(v).ok_or_else(|| invalid("key", "attr.type", v, offset))?,
        };
        let mut key = Key::new(domain, id.as_str(), name, value_type);

        if !empty {
            loop {
                match self.next_child()? {
                    Child::Element { start, empty, offset } => match start.local_name().as_ref() {
                        b"desc" => key.desc = Some(self.read_text(empty, "desc")?),
                        b"default" => {
                            let text = self.read_text(empty, "default")?;
                            let value = decode_value(&text, value_type).map_err(|_| {
                                DecodeError::TypeMismatch {
                                    key: id.clone(),
                                    expected: value_type,
                                    raw: text,
                                    offset,
                                }
                            })?;
                            key.default = Some(value);
                        }
                        _ => self.skip_unknown(&start, empty, "key", offset)?,
                    },
                    Child::Text(_) => {}
                    Child::End => break,
                }
            }
        }

        self.registry
            .declare(key)
            .map_err(|_| DecodeError::DuplicateKey { id, offset })
    }

    fn read_graph(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
        offset: u64,
    ) -> Result<Graph, DecodeError> {
        let attrs = self.attributes(start, offset)?;
        let edge_default = match attr(&attrs, "edgedefault") {
            None => EdgeDirection::Directed,
            Some(v) => EdgeDirection::parse(v)
                .ok_or_else(|| invalid("graph", "edgedefault", v, offset))?,
        };
        let mut graph = Graph {
            id: attr(&attrs, "id").map(str::to_string),
            edge_default,
            ..Graph::default()
        };

        let mut node_ids: FxHashSet<String> = FxHashSet::default();
        let mut edge_ids: FxHashSet<String> = FxHashSet::default();

        if !empty {
            loop {
                match self.next_child()? {
                    Child::Element { start, empty, offset } => match start.local_name().as_ref() {
                        b"data" => {
                            let data = self.read_data(&start, empty, offset, KeyDomain::Graph)?;
                            graph.data.push(data);
                        }
                        b"node" => {
                            let node = self.read_node(&start, empty, offset)?;
                            if !node_ids.insert(node.id.clone()) {
                                return Err(DecodeError::DuplicateNodeId { id: node.id, offset });
                            }
                            graph.nodes.push(node);
                        }
                        b"edge" => {
                            let edge = self.read_edge(&start, empty, offset)?;
                            if let Some(id) = &edge.id {
                                if !edge_ids.insert(id.clone()) {
                                    return Err(DecodeError::DuplicateEdgeId {
                                        id: id.clone(),
                                        offset,
                                    });
                                }
                            }
                            graph.edges.push(edge);
                        }
                        _ => self.skip_unknown(&start, empty, "graph", offset)?,
                    },
                    Child::Text(_) => {}
                    Child::End => break,
                }
            }
        }

        // Edges may precede the nodes they connect, so endpoints are only
        // checked once the whole graph has been read.
        let end_offset = self.position();
        for edge in &graph.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(DecodeError::DanglingEdgeReference {
                        edge: edge.describe(),
                        missing: endpoint.clone(),
                        offset: end_offset,
                    });
                }
            }
        }

        trace!(
            id = graph.id.as_deref().unwrap_or(""),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "decoded graph"
        );
        Ok(graph)
    }

    fn read_node(&mut self, start: &BytesStart<'_>, empty: bool, offset: u64) -> Result<Node, DecodeError> {
        let attrs = self.attributes(start, offset)?;
        let mut node = Node::new(required(&attrs, "node", "id", offset)?);
        if !empty {
            node.data = self.read_data_children(KeyDomain::Node, "node")?;
        }
        Ok(node)
    }

    fn read_edge(&mut self, start: &BytesStart<'_>, empty: bool, offset: u64) -> Result<Edge, DecodeError> {
        let attrs = self.attributes(start, offset)?;
        let source = required(&attrs, "edge", "source", offset)?;
        let target = required(&attrs, "edge", "target", offset)?;
        let mut edge = match attr(&attrs, "id") {
            Some(id) => Edge::new(id, source, target),
            None => Edge::anonymous(source, target),
        };
        edge.directed = match attr(&attrs, "directed") {
            None => None,
            Some(v) => Some(decode_bool(v).ok_or_else(|| invalid("edge", "directed", v, offset))?),
        };
        if !empty {
            edge.data = self.read_data_children(KeyDomain::Edge, "edge")?;
        }
        Ok(edge)
    }

    /// Reads the body of a node or edge: a sequence of `<data>` elements.
    fn read_data_children(
        &mut self,
        entity: KeyDomain,
        parent: &'static str,
    ) -> Result<Vec<Data>, DecodeError> {
        let mut data = Vec::new();
        loop {
            match self.next_child()? {
                Child::Element { start, empty, offset } => {
                    if start.local_name().as_ref() == b"data" {
                        data.push(self.read_data(&start, empty, offset, entity)?);
                    } else {
                        self.skip_unknown(&start, empty, parent, offset)?;
                    }
                }
                Child::Text(_) => {}
                Child::End => return Ok(data),
            }
        }
    }

    fn read_data(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
        offset: u64,
        entity: KeyDomain,
    ) -> Result<Data, DecodeError> {
        let attrs = self.attributes(start, offset)?;
        let key_id = required(&attrs, "data", "key", offset)?;
        let (domain, value_type) = match self.registry.get(key_id) {
            Some(key) => (key.domain, key.value_type),
            None => {
                return Err(DecodeError::UnknownKeyReference {
                    key: key_id.to_string(),
                    offset,
                });
            }
        };
        if !domain.covers(entity) {
            return Err(DecodeError::KeyDomainMismatch {
                key: key_id.to_string(),
                domain,
                element: entity,
                offset,
            });
        }

        let text = self.read_text(empty, "data")?;
        let value = decode_value(&text, value_type).map_err(|_| DecodeError::TypeMismatch {
            key: key_id.to_string(),
            expected: value_type,
            raw: text,
            offset,
        })?;
        Ok(Data::new(key_id, value))
    }

    /// Reads the character content of a text-only element up to its end tag.
    fn read_text(&mut self, empty: bool, parent: &'static str) -> Result<String, DecodeError> {
        let mut text = String::new();
        if empty {
            return Ok(text);
        }
        loop {
            match self.next_child()? {
                Child::Text(t) => text.push_str(&t),
                Child::Element { start, empty, offset } => {
                    self.skip_unknown(&start, empty, parent, offset)?;
                }
                Child::End => return Ok(text),
            }
        }
    }

    fn skip_unknown(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
        parent: &'static str,
        offset: u64,
    ) -> Result<(), DecodeError> {
        let name = element_name(start);
        if self.options.unknown_elements == UnknownElements::Reject {
            return Err(DecodeError::UnexpectedElement { name, parent, offset });
        }
        debug!(element = %name, parent, offset, "skipping unmodeled element");
        if !empty {
            self.buf.clear();
            if let Err(err) = self.reader.read_to_end_into(start.name(), &mut self.buf) {
                return Err(xml_error(err, self.reader.error_position()));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Event plumbing
    // =========================================================================

    fn position(&self) -> u64 {
        self.reader.buffer_position()
    }

    fn next_event(&mut self) -> Result<Event<'static>, DecodeError> {
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf) {
            Ok(event) => Ok(event.into_owned()),
            Err(err) => Err(xml_error(err, self.reader.error_position())),
        }
    }

    /// Returns the next child element, text run or end tag of the current
    /// element. Comments and instructions are dropped; entity and character
    /// references come back as the text they stand for. Line ends follow
    /// XML 1.0: only `\r\n` and `\r` become `\n`.
    fn next_child(&mut self) -> Result<Child, DecodeError> {
        loop {
            let offset = self.position();
            let child = match self.next_event()? {
                Event::Start(start) => Child::Element { start, empty: false, offset },
                Event::Empty(start) => Child::Element { start, empty: true, offset },
                Event::End(_) => Child::End,
                Event::Text(t) => Child::Text(
                    t.xml10_content()
                        .map_err(|e| malformed(e, offset))?
                        .into_owned(),
                ),
                Event::CData(c) => Child::Text(
                    c.xml10_content()
                        .map_err(|e| malformed(e, offset))?
                        .into_owned(),
                ),
                Event::GeneralRef(r) => {
                    if let Some(ch) = r.resolve_char_ref().map_err(|e| malformed(e, offset))? {
                        Child::Text(ch.to_string())
                    } else {
                        let entity = r.decode().map_err(|e| malformed(e, offset))?;
                        let resolved = resolve_xml_entity(&entity).ok_or_else(|| {
                            DecodeError::MalformedXml {
                                message: format!("unknown entity &{entity};"),
                                offset,
                            }
                        })?;
                        Child::Text(resolved.to_string())
                    }
                }
                Event::Eof => {
                    return Err(DecodeError::MalformedXml {
                        message: "unexpected end of document".to_string(),
                        offset,
                    });
                }
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => continue,
            };
            return Ok(child);
        }
    }

    fn attributes(
        &self,
        start: &BytesStart<'_>,
        offset: u64,
    ) -> Result<Vec<(String, String)>, DecodeError> {
        start
            .attributes()
            .map(|attr| {
                let attr = attr.map_err(|e| malformed(e, offset))?;
                let name = std::str::from_utf8(attr.key.as_ref())
                    .map_err(|e| malformed(e, offset))?
                    .to_string();
                let value = attr
                    .unescape_value()
                    .map_err(|e| malformed(e, offset))?
                    .into_owned();
                Ok((name, value))
            })
            .collect()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn required<'a>(
    attrs: &'a [(String, String)],
    element: &'static str,
    attribute: &'static str,
    offset: u64,
) -> Result<&'a str, DecodeError> {
    attr(attrs, attribute).ok_or(DecodeError::MissingAttribute {
        element,
        attribute,
        offset,
    })
}

fn invalid(element: &'static str, attribute: &'static str, value: &str, offset: u64) -> DecodeError {
    DecodeError::InvalidAttribute {
        element,
        attribute,
        value: value.to_string(),
        offset,
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn malformed(err: impl std::fmt::Display, offset: u64) -> DecodeError {
    DecodeError::MalformedXml {
        message: err.to_string(),
        offset,
    }
}

fn xml_error(err: quick_xml::Error, offset: u64) -> DecodeError {
    match err {
        quick_xml::Error::Io(err) => DecodeError::Io(err),
        other => malformed(other, offset),
    }
}
