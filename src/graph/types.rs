//! Core types for the include graph.

use petgraph::graph::DiGraph;

/// The underlying petgraph storage: one vertex per canonical file
/// identity, one unweighted edge per direct include relation. Directed,
/// and cycles are legal (mutually forward-declaring headers exist in
/// real codebases).
pub type IncludeGraph = DiGraph<VertexData, ()>;

/// A 2-D position assigned by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Data stored in a graph vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// Display label: initially the canonical path, made root-relative
    /// by `DepGraph::clean`.
    pub label: String,
    /// Set by the layout engine; meaningless before `layout` runs.
    pub pos: Point,
}

impl VertexData {
    pub fn new(label: String) -> Self {
        Self {
            label,
            pos: Point::default(),
        }
    }
}

/// A directed include relation between two files as named by the trace.
/// Endpoints are raw names; they are resolved to canonical identities
/// when the edge is merged into the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeEdge {
    pub source: String,
    pub target: String,
}

impl IncludeEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Counts reported after the merge phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub vertices: usize,
    pub edges: usize,
}
