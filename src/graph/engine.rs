//! The shared dependency graph.
//!
//! Uses petgraph to store the deduplicated include relation, with a
//! label-to-index map colocated with the graph so insert-or-find by
//! canonical identity is a single operation. Concurrent merges
//! synchronize on an internal mutex whose critical section covers only
//! the per-edge insert-or-find pair; path canonicalization and
//! exclusion checks run outside the lock so they never serialize the
//! I/O-heavy work of sibling tasks.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::{debug, info};

use super::types::{GraphStats, IncludeEdge, IncludeGraph, Point, VertexData};
use crate::error::Result;
use crate::export;
use crate::layout::{self, LayoutOptions};
use crate::paths;

/// The merge target for all parsed traces. Thread-safe: `merge` may be
/// called from any number of tasks at once; `clean`, `layout` and
/// `export` form the sequential phase after all merges have joined.
pub struct DepGraph {
    inner: Mutex<Inner>,
    excludes: Vec<String>,
}

#[derive(Default)]
struct Inner {
    graph: IncludeGraph,
    /// Canonical identity -> vertex. Kept in lockstep with `graph`.
    index: HashMap<String, NodeIndex>,
}

impl Inner {
    /// Insert-or-find a vertex by canonical identity.
    fn intern(&mut self, identity: String) -> NodeIndex {
        if let Some(&idx) = self.index.get(&identity) {
            return idx;
        }
        let idx = self.graph.add_node(VertexData::new(identity.clone()));
        self.index.insert(identity, idx);
        idx
    }
}

impl DepGraph {
    pub fn new(excludes: Vec<String>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            excludes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicked merge task cannot leave the graph half-updated in a
        // way later phases would misread, so a poisoned lock is usable.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fold one trace's edges into the graph.
    ///
    /// Both endpoints are canonicalized first; an unresolvable path
    /// drops that edge only. Edges touching an excluded identity are
    /// skipped before any vertex is created for them. Duplicate
    /// vertices and edges collapse, so the final content is the same
    /// for any merge order.
    pub fn merge(&self, edges: &[IncludeEdge]) {
        for edge in edges {
            let source = match paths::canonicalize(&edge.source) {
                Ok(identity) => identity,
                Err(error) => {
                    debug!(file = %edge.source, %error, "dropping edge: unresolvable source");
                    continue;
                }
            };
            let target = match paths::canonicalize(&edge.target) {
                Ok(identity) => identity,
                Err(error) => {
                    debug!(file = %edge.target, %error, "dropping edge: unresolvable target");
                    continue;
                }
            };
            if paths::is_excluded(&source, &self.excludes)
                || paths::is_excluded(&target, &self.excludes)
            {
                debug!(%source, %target, "dropping edge: excluded");
                continue;
            }

            let mut inner = self.lock();
            let s = inner.intern(source);
            let t = inner.intern(target);
            if inner.graph.find_edge(s, t).is_none() {
                inner.graph.add_edge(s, t, ());
            }
        }
    }

    /// Strip the longest common label prefix so displayed names are
    /// relative to the project root. Idempotent; meant to run once,
    /// after all merges have completed.
    pub fn clean(&self) {
        let mut inner = self.lock();
        let prefix = paths::common_prefix(inner.graph.node_weights().map(|v| v.label.as_str()));
        if prefix.is_empty() {
            return;
        }
        for vertex in inner.graph.node_weights_mut() {
            vertex.label = vertex.label[prefix.len()..].to_string();
        }
        info!(%prefix, "stripped common path prefix");
    }

    /// Compute 2-D positions for every vertex.
    pub fn layout(&self, opts: &LayoutOptions) {
        let mut inner = self.lock();
        layout::layout(&mut inner.graph, opts);
    }

    /// Write the DOT description to `path`, or stdout when no path is
    /// given.
    pub fn export(&self, path: Option<&Path>) -> Result<()> {
        let inner = self.lock();
        export::export(&inner.graph, path)
    }

    /// Write the DOT description to an arbitrary writer.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let inner = self.lock();
        export::write_dot(&inner.graph, out)
    }

    pub fn stats(&self) -> GraphStats {
        let inner = self.lock();
        GraphStats {
            vertices: inner.graph.node_count(),
            edges: inner.graph.edge_count(),
        }
    }

    /// Vertex labels in insertion order.
    pub fn labels(&self) -> Vec<String> {
        let inner = self.lock();
        inner.graph.node_weights().map(|v| v.label.clone()).collect()
    }

    /// Vertex positions in insertion order.
    pub fn positions(&self) -> Vec<Point> {
        let inner = self.lock();
        inner.graph.node_weights().map(|v| v.pos).collect()
    }

    /// Edges as (source label, target label) pairs.
    pub fn edges(&self) -> Vec<(String, String)> {
        let inner = self.lock();
        inner
            .graph
            .edge_references()
            .map(|e| {
                (
                    inner.graph[e.source()].label.clone(),
                    inner.graph[e.target()].label.clone(),
                )
            })
            .collect()
    }
}
