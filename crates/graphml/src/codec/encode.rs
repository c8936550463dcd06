//! GraphML encoder.
//!
//! Writes a [`Document`] as GraphML in a single pass. Output is
//! deterministic: the same document always produces the same bytes.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesPI, BytesStart, BytesText, Event};
use tracing::debug;

use crate::codec::value::encode_value;
use crate::error::EncodeError;
use crate::model::{Data, Document, Edge, Graph, Key, Node};
use crate::registry::KeyRegistry;
use crate::validate::validate_document;

/// Options for encoding.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Spaces per nesting level, or `None` for compact output.
    ///
    /// Data text is always written inline, so indentation never changes
    /// the decoded values.
    pub indent: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { indent: Some(2) }
    }
}

impl EncodeOptions {
    /// Creates default (two-space indented) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for output without line breaks or indentation.
    pub fn compact() -> Self {
        Self { indent: None }
    }
}

/// Encodes a document to a writer.
///
/// The document is validated first; nothing is written if it is invalid.
pub fn encode<W: Write>(writer: W, doc: &Document) -> Result<(), EncodeError> {
    encode_with_options(writer, doc, EncodeOptions::default())
}

/// Encodes a document to a writer with the given options.
pub fn encode_with_options<W: Write>(
    writer: W,
    doc: &Document,
    options: EncodeOptions,
) -> Result<(), EncodeError> {
    validate_document(doc)?;
    // Validation guarantees unique key ids.
    let registry = KeyRegistry::from_keys(doc.keys.iter().cloned()).unwrap_or_default();

    let writer = match options.indent {
        Some(size) => Writer::new_with_indent(writer, b' ', size),
        None => Writer::new(writer),
    };
    let mut encoder = Encoder { writer, registry };
    encoder.write_document(doc)?;

    debug!(
        keys = doc.keys.len(),
        graphs = doc.graphs.len(),
        "encoded GraphML document"
    );
    Ok(())
}

/// Encodes a document to a byte vector.
pub fn encode_to_vec(doc: &Document) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode(&mut out, doc)?;
    Ok(out)
}

/// Encodes a document to a string.
pub fn encode_to_string(doc: &Document) -> Result<String, EncodeError> {
    let bytes = encode_to_vec(doc)?;
    String::from_utf8(bytes)
        .map_err(|err| EncodeError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

struct Encoder<W> {
    writer: Writer<W>,
    registry: KeyRegistry,
}

impl<W: Write> Encoder<W> {
    fn write_document(&mut self, doc: &Document) -> Result<(), EncodeError> {
        if let Some(pi) = &doc.instruction {
            let content = if pi.instruction.is_empty() {
                pi.target.clone()
            } else {
                format!("{} {}", pi.target, pi.instruction)
            };
            self.writer.write_event(Event::PI(BytesPI::new(content)))?;
        }

        let mut root = BytesStart::new("graphml");
        for (name, value) in &doc.attributes {
            push_attribute(&mut root, name, value);
        }

        if doc.keys.is_empty() && doc.data.is_empty() && doc.graphs.is_empty() {
            self.writer.write_event(Event::Empty(root))?;
        } else {
            self.writer.write_event(Event::Start(root))?;
            for key in &doc.keys {
                self.write_key(key)?;
            }
            self.write_data(&doc.data)?;
            for graph in &doc.graphs {
                self.write_graph(graph)?;
            }
            self.writer.write_event(Event::End(BytesEnd::new("graphml")))?;
        }

        self.writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    fn write_key(&mut self, key: &Key) -> Result<(), EncodeError> {
        let mut start = BytesStart::new("key");
        push_attribute(&mut start, "id", &key.id);
        push_attribute(&mut start, "for", key.domain.as_str());
        if !key.name.is_empty() {
            push_attribute(&mut start, "attr.name", &key.name);
        }
        push_attribute(&mut start, "attr.type", key.value_type.as_str());

        if key.desc.is_none() && key.default.is_none() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;
        if let Some(desc) = &key.desc {
            self.write_text_element(BytesStart::new("desc"), "desc", desc)?;
        }
        if let Some(default) = &key.default {
            let text = encode_value(default, key.value_type)?;
            self.write_text_element(BytesStart::new("default"), "default", &text)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new("key")))?;
        Ok(())
    }

    fn write_graph(&mut self, graph: &Graph) -> Result<(), EncodeError> {
        let mut start = BytesStart::new("graph");
        if let Some(id) = &graph.id {
            push_attribute(&mut start, "id", id);
        }
        push_attribute(&mut start, "edgedefault", graph.edge_default.as_str());

        if graph.data.is_empty() && graph.nodes.is_empty() && graph.edges.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;
        self.write_data(&graph.data)?;
        for node in &graph.nodes {
            self.write_node(node)?;
        }
        for edge in &graph.edges {
            self.write_edge(edge)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new("graph")))?;
        Ok(())
    }

    fn write_node(&mut self, node: &Node) -> Result<(), EncodeError> {
        let mut start = BytesStart::new("node");
        push_attribute(&mut start, "id", &node.id);
        self.write_with_data(start, "node", &node.data)
    }

    fn write_edge(&mut self, edge: &Edge) -> Result<(), EncodeError> {
        let mut start = BytesStart::new("edge");
        if let Some(id) = &edge.id {
            push_attribute(&mut start, "id", id);
        }
        push_attribute(&mut start, "source", &edge.source);
        push_attribute(&mut start, "target", &edge.target);
        if let Some(directed) = edge.directed {
            push_attribute(&mut start, "directed", if directed { "true" } else { "false" });
        }
        self.write_with_data(start, "edge", &edge.data)
    }

    /// Writes an element whose only children are data entries.
    fn write_with_data(
        &mut self,
        start: BytesStart<'_>,
        name: &str,
        data: &[Data],
    ) -> Result<(), EncodeError> {
        if data.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
        } else {
            self.writer.write_event(Event::Start(start))?;
            self.write_data(data)?;
            self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    fn write_data(&mut self, data: &[Data]) -> Result<(), EncodeError> {
        for entry in data {
            let value_type = self
                .registry
                .get(&entry.key)
                .map_or_else(|| entry.value.value_type(), |key| key.value_type);
            let text = encode_value(&entry.value, value_type)?;
            let mut start = BytesStart::new("data");
            push_attribute(&mut start, "key", &entry.key);
            self.write_text_element(start, "data", &text)?;
        }
        Ok(())
    }

    /// Writes `<name>text</name>` on one line. The text event is written
    /// even when empty so that no indentation lands inside the element.
    fn write_text_element(
        &mut self,
        start: BytesStart<'_>,
        name: &str,
        text: &str,
    ) -> Result<(), EncodeError> {
        self.writer.write_event(Event::Start(start))?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

// =============================================================================
// Escaping
// =============================================================================

/// Escapes element text. `\r` becomes a character reference; readers fold
/// a literal one into `\n`.
fn escape_text(text: &str) -> Cow<'_, str> {
    char_refs(partial_escape(text), &['\r'])
}

/// Escapes an attribute value. Tabs and line ends become character
/// references; readers turn literal ones into spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    char_refs(escape(value), &['\t', '\n', '\r'])
}

fn char_refs<'a>(escaped: Cow<'a, str>, chars: &[char]) -> Cow<'a, str> {
    if !escaped.contains(chars) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        if chars.contains(&c) {
            let _ = write!(out, "&#{};", u32::from(c));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn push_attribute(start: &mut BytesStart<'_>, name: &str, value: &str) {
    let value = escape_attribute(value);
    start.push_attribute(Attribute::from((name.as_bytes(), value.as_bytes())));
}
