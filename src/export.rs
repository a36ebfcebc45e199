//! Graphviz DOT export.
//!
//! Emits one node per vertex with its display label and a pinned
//! position (`pos="x,y!"` — the `!` keeps `neato -n` from moving it),
//! then one directed edge per include relation. Node ids are the dense
//! petgraph indices.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use petgraph::visit::EdgeRef;
use tracing::info;

use crate::error::Result;
use crate::graph::IncludeGraph;

pub fn write_dot<W: Write>(graph: &IncludeGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph includes {{")?;
    for idx in graph.node_indices() {
        let vertex = &graph[idx];
        writeln!(
            out,
            "    {} [label=\"{}\", pos=\"{},{}!\"];",
            idx.index(),
            escape_label(&vertex.label),
            vertex.pos.x,
            vertex.pos.y,
        )?;
    }
    for edge in graph.edge_references() {
        writeln!(
            out,
            "    {} -> {};",
            edge.source().index(),
            edge.target().index()
        )?;
    }
    writeln!(out, "}}")
}

/// Backslash-escape characters that would break out of a double-quoted
/// DOT string.
fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Write the description to `path`, or to stdout when no path is given.
/// The file handle is released on every path out of here; the explicit
/// flush surfaces buffered write errors instead of dropping them.
pub fn export(graph: &IncludeGraph, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut out = BufWriter::new(file);
            write_dot(graph, &mut out)?;
            out.flush()?;
            info!(path = %path.display(), "wrote graph description");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_dot(graph, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}
