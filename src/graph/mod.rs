//! Dependency graph: storage, merge semantics, and pipeline assembly.

pub mod builder;
pub mod engine;
pub mod types;

pub use builder::build_graph;
pub use engine::DepGraph;
pub use types::{GraphStats, IncludeEdge, IncludeGraph, Point, VertexData};
