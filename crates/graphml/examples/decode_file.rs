//! Simple decoder to inspect GraphML files.
//!
//! Usage: `cargo run --example decode_file -- path/to/file.graphml`

use std::fs::File;
use std::io::BufReader;

use graphml::{Data, Document, Value, decode};

fn format_value(v: &Value) -> String {
    match v {
        Value::String(s) => {
            let preview: String = s.chars().take(60).collect();
            if s.chars().count() > 60 {
                format!("{preview:?}...")
            } else {
                format!("{preview:?}")
            }
        }
        Value::Boolean(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Long(l) => l.to_string(),
        Value::Float(f) => format!("{f}"),
        Value::Double(d) => format!("{d}"),
    }
}

fn format_data(data: &[Data]) -> String {
    data.iter()
        .map(|d| format!("{}={}", d.key, format_value(&d.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_document(doc: &Document) {
    if let Some(pi) = &doc.instruction {
        println!("<?{} {}?>", pi.target, pi.instruction);
    }
    println!("Keys: {}", doc.keys.len());
    for key in &doc.keys {
        println!(
            "  {:<8} for={:<6} type={:<8} name={:?}",
            key.id, key.domain, key.value_type, key.name
        );
    }

    if !doc.data.is_empty() {
        println!("Data: {}", format_data(&doc.data));
    }

    for (i, graph) in doc.graphs.iter().enumerate() {
        println!(
            "\nGraph {} (id={}, {}): {} nodes, {} edges",
            i,
            graph.id.as_deref().unwrap_or("-"),
            graph.edge_default,
            graph.nodes.len(),
            graph.edges.len()
        );
        if !graph.data.is_empty() {
            println!("  data: {}", format_data(&graph.data));
        }
        for node in graph.nodes.iter().take(20) {
            println!("  node {} [{}]", node.id, format_data(&node.data));
        }
        if graph.nodes.len() > 20 {
            println!("  ... {} more nodes", graph.nodes.len() - 20);
        }
        for edge in graph.edges.iter().take(20) {
            let arrow = if edge.is_directed(graph.edge_default) { "->" } else { "--" };
            println!(
                "  edge {} {} {} {} [{}]",
                edge.id.as_deref().unwrap_or("-"),
                edge.source,
                arrow,
                edge.target,
                format_data(&edge.data)
            );
        }
        if graph.edges.len() > 20 {
            println!("  ... {} more edges", graph.edges.len() - 20);
        }
    }
}

fn main() {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: decode_file <file.{}>", graphml::EXTENSION);
            std::process::exit(2);
        }
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to open {path}: {e}");
            std::process::exit(1);
        }
    };

    match decode(BufReader::new(file)) {
        Ok(doc) => print_document(&doc),
        Err(e) => {
            eprintln!("failed to decode {path}: {e}");
            std::process::exit(1);
        }
    }
}
