//! Round-trip tests over fixture files and generated documents.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use graphml::{
    DecodeOptions, Document, DocumentBuilder, Edge, EdgeDirection, EncodeOptions, Key, KeyDomain,
    Value, ValueType, decode, decode_str, decode_with_options, encode_to_string, encode_to_vec,
    encode_with_options,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture(name)).unwrap()
}

fn gnames() -> Document {
    let names = ["Gizmo", "Gopher", "Gong", "Gonzo", "Gracie", "Granite", "Gobi"];
    let weights = [1.5f32, 0.25, 2.0, 0.125];
    let edges = [("n00", "n01"), ("n00", "n04"), ("n02", "n03"), ("n02", "n05")];

    DocumentBuilder::standard()
        .key(KeyDomain::Node, "n", "label", ValueType::String)
        .key(KeyDomain::Node, "c", "cute", ValueType::Boolean)
        .key(KeyDomain::Node, "s", "size", ValueType::Int)
        .key(KeyDomain::Edge, "w", "weight", ValueType::Float)
        .graph(EdgeDirection::Directed, |mut g| {
            for (i, name) in names.iter().enumerate() {
                let size = (10 - i as i32) * 3;
                g = g.node(format!("n{i:02}"), |n| n.data("n", *name).data("c", true).data("s", size));
            }
            for (i, ((source, target), weight)) in edges.iter().zip(weights).enumerate() {
                g = g.edge(format!("e{i:02}"), *source, *target, |e| e.data("w", weight));
            }
            g
        })
        .build()
}

#[test]
fn test_gnames_encodes_to_fixture() {
    init_tracing();
    let text = encode_to_string(&gnames()).unwrap();
    assert_eq!(text, read_fixture("gnames.graphml"));
}

#[test]
fn test_gnames_decodes_from_fixture() {
    init_tracing();
    let file = fs::File::open(fixture("gnames.graphml")).unwrap();
    let doc = decode(BufReader::new(file)).unwrap();
    assert_eq!(doc, gnames());

    let graph = &doc.graphs[0];
    assert_eq!(graph.nodes.len(), 7);
    assert_eq!(graph.edges.len(), 4);
    assert_eq!(graph.node("n03").and_then(|n| n.value("n")), Some(&Value::from("Gonzo")));
    assert_eq!(graph.node("n06").and_then(|n| n.value("s")), Some(&Value::Int(12)));
    assert_eq!(graph.edge("e01").map(|e| e.target.as_str()), Some("n04"));
}

#[test]
fn test_primer_document() {
    init_tracing();
    let doc = decode_str(&read_fixture("primer.graphml")).unwrap();

    assert_eq!(doc.attributes.len(), 3);
    assert_eq!(doc.attributes[2].0, "xsi:schemaLocation");

    let color = doc.key("d0").unwrap();
    assert_eq!(color.desc.as_deref(), Some("Fill color of the node"));
    assert_eq!(color.default, Some(Value::from("yellow")));
    let note = doc.key("d3").unwrap();
    assert_eq!(note.domain, KeyDomain::All);
    assert_eq!(note.value_type, ValueType::String);

    assert_eq!(doc.graphs.len(), 1);
    let graph = &doc.graphs[0];
    assert_eq!(graph.id.as_deref(), Some("G"));
    assert_eq!(graph.edge_default, EdgeDirection::Undirected);
    assert_eq!(graph.value("d2"), Some(&Value::Long(1_700_000_000_000)));
    assert_eq!(graph.nodes.len(), 6);
    assert_eq!(graph.edges.len(), 6);

    let n2 = graph.node("n2").unwrap();
    assert_eq!(n2.value("d3"), Some(&Value::from("Ports & nested graphs are skipped")));
    let n5 = graph.node("n5").unwrap();
    assert_eq!(n5.value("d0"), Some(&Value::from("turquoise <light>")));

    let override_edge = &graph.edges[3];
    assert_eq!(override_edge.id, None);
    assert!(override_edge.is_directed(graph.edge_default));
    assert!(!graph.edges[4].is_directed(graph.edge_default));
    assert_eq!(graph.edge("e2").and_then(|e| e.value("d1")), Some(&Value::Double(2.0)));
}

#[test]
fn test_primer_strict_mode_rejects_ports() {
    init_tracing();
    let text = read_fixture("primer.graphml");
    let result = decode_with_options(text.as_bytes(), DecodeOptions::strict());
    assert!(matches!(
        result,
        Err(graphml::DecodeError::UnexpectedElement { ref name, .. }) if name == "port"
    ));
}

#[test]
fn test_roundtrip_and_idempotence() {
    init_tracing();
    let original = decode_str(&read_fixture("primer.graphml")).unwrap();

    let first = encode_to_vec(&original).unwrap();
    let decoded = decode(first.as_slice()).unwrap();
    assert_eq!(decoded, original);

    let second = encode_to_vec(&decoded).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compact_output_roundtrips() {
    let doc = gnames();
    let mut out = Vec::new();
    encode_with_options(&mut out, &doc, EncodeOptions::compact()).unwrap();
    assert_eq!(decode(out.as_slice()).unwrap(), doc);
}

#[test]
fn test_whitespace_and_escapes_survive() {
    let doc = DocumentBuilder::new()
        .declare(
            Key::new(KeyDomain::All, "t", "text", ValueType::String)
                .with_desc("free <text> & more")
                .with_default("  "),
        )
        .graph(EdgeDirection::Undirected, |g| {
            g.id("g&1")
                .data("t", "\n  indented\n")
                .node("a<1>", |n| n.data("t", "'single' \"double\""))
                .empty_node("b")
                .push_edge(Edge::anonymous("a<1>", "b").with_data("t", ""))
        })
        .build();

    let text = encode_to_string(&doc).unwrap();
    assert_eq!(decode_str(&text).unwrap(), doc);
}

#[test]
fn test_line_ends_and_tabs_survive() {
    let value = "line1\r\nline2\rend";
    let doc = DocumentBuilder::standard()
        .declare(
            Key::new(KeyDomain::All, "t", "text\twith\r\nbreaks", ValueType::String)
                .with_desc(value)
                .with_default(value),
        )
        .data("t", value)
        .graph(EdgeDirection::Directed, |g| {
            g.id("g\r\n")
                .data("t", "\r\n")
                .node("a\tb", |n| n.data("t", value))
                .empty_node(" c\n")
                .edge("e\r", "a\tb", " c\n", |e| e.data("t", "\t\r"))
        })
        .build();

    let text = encode_to_string(&doc).unwrap();
    assert!(!text.contains('\r'));
    let decoded = decode_str(&text).unwrap();
    assert_eq!(decoded.value("t"), Some(&Value::from(value)));
    assert_eq!(decoded.key("t").and_then(|k| k.desc.as_deref()), Some(value));
    assert_eq!(decoded, doc);
}

// =============================================================================
// Generated documents
// =============================================================================

fn value_of(value_type: ValueType) -> BoxedStrategy<Value> {
    match value_type {
        ValueType::Boolean => any::<bool>().prop_map(Value::Boolean).boxed(),
        ValueType::Int => any::<i32>().prop_map(Value::Int).boxed(),
        ValueType::Long => any::<i64>().prop_map(Value::Long).boxed(),
        ValueType::Float => any::<f32>()
            .prop_filter("NaN never compares equal", |v| !v.is_nan())
            .prop_map(Value::Float)
            .boxed(),
        ValueType::Double => any::<f64>()
            .prop_filter("NaN never compares equal", |v| !v.is_nan())
            .prop_map(Value::Double)
            .boxed(),
        ValueType::String => text().prop_map(Value::String).boxed(),
    }
}

/// Free text: any printable characters, runs of XML whitespace, and
/// markup-heavy ASCII, with `\r\n` line ends mixed in.
fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,16}",
        "[\\r\\n\\t ]{1,4}",
        "[ \\t]?\\PC{0,6}\\r\\n\\PC{0,6}\\r?[ \\n]?",
        "[a-zA-Z0-9 <>&'\"._-]{0,16}",
    ]
}

/// Id prefixes drawn from the same alphabet as [`text`].
#[derive(Debug, Clone)]
struct Names {
    key: String,
    node: String,
    edge: String,
    attr: String,
    graph: Option<String>,
}

fn names() -> impl Strategy<Value = Names> {
    (text(), text(), text(), text(), proptest::option::of(text())).prop_map(
        |(key, node, edge, attr, graph)| Names {
            key,
            node,
            edge,
            attr,
            graph,
        },
    )
}

fn value_type() -> impl Strategy<Value = ValueType> {
    prop_oneof![
        Just(ValueType::Boolean),
        Just(ValueType::Int),
        Just(ValueType::Long),
        Just(ValueType::Float),
        Just(ValueType::Double),
        Just(ValueType::String),
    ]
}

/// A node or edge body: for each key, maybe a value.
fn entity_values(types: Vec<ValueType>) -> impl Strategy<Value = Vec<Option<Value>>> {
    types
        .into_iter()
        .map(|t| proptest::option::of(value_of(t)))
        .collect::<Vec<_>>()
}

fn document() -> impl Strategy<Value = Document> {
    (prop::collection::vec(value_type(), 1..5), 1usize..8, any::<bool>(), names())
        .prop_flat_map(|(types, node_count, undirected, names)| {
            let doc_values = entity_values(types.clone());
            let nodes = prop::collection::vec(entity_values(types.clone()), node_count);
            let edges = prop::collection::vec(
                (0..node_count, 0..node_count, proptest::option::of(any::<bool>()), entity_values(types.clone())),
                0..10,
            );
            (Just(types), doc_values, nodes, edges, Just(undirected), Just(names))
        })
        .prop_map(|(types, doc_values, nodes, edges, undirected, names)| {
            let direction = if undirected { EdgeDirection::Undirected } else { EdgeDirection::Directed };
            let key_id = |k: usize| format!("{}{k}", names.key);
            let node_id = |n: usize| format!("{}{n}", names.node);

            let mut builder = DocumentBuilder::standard();
            for (i, t) in types.iter().enumerate() {
                builder = builder.key(KeyDomain::All, key_id(i), format!("{}{i}", names.attr), *t);
            }
            for (k, value) in doc_values.into_iter().enumerate() {
                if let Some(value) = value {
                    builder = builder.data(key_id(k), value);
                }
            }
            builder
                .graph(direction, |mut g| {
                    if let Some(id) = &names.graph {
                        g = g.id(id.clone());
                    }
                    for (i, values) in nodes.into_iter().enumerate() {
                        g = g.node(node_id(i), |mut n| {
                            for (k, value) in values.into_iter().enumerate() {
                                if let Some(value) = value {
                                    n = n.data(key_id(k), value);
                                }
                            }
                            n
                        });
                    }
                    for (i, (source, target, directed, values)) in edges.into_iter().enumerate() {
                        let mut edge = if i % 3 == 0 {
                            Edge::anonymous(node_id(source), node_id(target))
                        } else {
                            Edge::new(format!("{}{i}", names.edge), node_id(source), node_id(target))
                        };
                        edge.directed = directed;
                        for (k, value) in values.into_iter().enumerate() {
                            if let Some(value) = value {
                                edge = edge.with_data(key_id(k), value);
                            }
                        }
                        g = g.push_edge(edge);
                    }
                    g
                })
                .build()
        })
}

proptest! {
    #[test]
    fn roundtrip_generated_documents(doc in document()) {
        let bytes = encode_to_vec(&doc).unwrap();
        let decoded = decode(bytes.as_slice()).unwrap();
        prop_assert_eq!(&decoded, &doc);
        prop_assert_eq!(encode_to_vec(&decoded).unwrap(), bytes);
    }
}
