//! 2-D graph layout: circular seeding followed by force-directed
//! refinement.
//!
//! The refinement is the Fruchterman–Reingold model: every vertex pair
//! repels with `k²/d`, every edge attracts with `d²/k`, and the
//! per-iteration displacement is capped by a temperature that decays
//! linearly to zero. Two properties matter more than the constants:
//! there is no randomness anywhere (two runs over the same graph agree
//! exactly, so tests can pin positions), and repulsion is pairwise over
//! all vertices, which keeps disconnected components from collapsing
//! onto each other.

use serde::Deserialize;
use tracing::debug;

use crate::graph::{IncludeGraph, Point};

/// Distances below this contribute no force. The circular seed is
/// non-degenerate, so coincident vertices only arise transiently.
const MIN_DIST: f64 = 1e-9;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutOptions {
    /// Radius of the seeding circle.
    pub radius: f64,
    /// Side length of the square the layout is confined to.
    pub side: f64,
    /// Refinement iterations; the displacement cap reaches zero on the
    /// last one.
    pub iterations: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            radius: 15.0,
            side: 40.0,
            iterations: 100,
        }
    }
}

/// Assign a position to every vertex.
pub fn layout(graph: &mut IncludeGraph, opts: &LayoutOptions) {
    let n = graph.node_count();
    if n == 0 {
        return;
    }
    seed_circle(graph, opts.radius);
    if n > 1 {
        refine(graph, opts);
    }
    debug!(vertices = n, iterations = opts.iterations, "layout finished");
}

/// Place vertices evenly around a circle in insertion order: a
/// deterministic, non-degenerate start for any topology.
fn seed_circle(graph: &mut IncludeGraph, radius: f64) {
    let n = graph.node_count() as f64;
    for (i, vertex) in graph.node_weights_mut().enumerate() {
        let angle = std::f64::consts::TAU * i as f64 / n;
        vertex.pos = Point {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        };
    }
}

fn refine(graph: &mut IncludeGraph, opts: &LayoutOptions) {
    use petgraph::visit::EdgeRef;

    let n = graph.node_count();
    let half = opts.side / 2.0;
    let k = opts.side / (n as f64).sqrt();

    // Node indices are dense (no removals ever happen), so positions
    // can live in a plain vector during the iteration.
    let mut pos: Vec<Point> = graph.node_weights().map(|v| v.pos).collect();
    let edges: Vec<(usize, usize)> = graph
        .edge_references()
        .map(|e| (e.source().index(), e.target().index()))
        .collect();
    let mut disp = vec![Point::default(); n];

    for iteration in 0..opts.iterations {
        let temp = (opts.side / 10.0) * (1.0 - iteration as f64 / opts.iterations as f64);
        for d in &mut disp {
            *d = Point::default();
        }

        // Repulsion over all pairs.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < MIN_DIST {
                    continue;
                }
                let force = k * k / dist / dist;
                disp[i].x += dx * force;
                disp[i].y += dy * force;
                disp[j].x -= dx * force;
                disp[j].y -= dy * force;
            }
        }

        // Attraction along edges. Self-includes exert no pull.
        for &(s, t) in &edges {
            if s == t {
                continue;
            }
            let dx = pos[s].x - pos[t].x;
            let dy = pos[s].y - pos[t].y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < MIN_DIST {
                continue;
            }
            let force = dist / k;
            disp[s].x -= dx * force;
            disp[s].y -= dy * force;
            disp[t].x += dx * force;
            disp[t].y += dy * force;
        }

        // Apply, capped by the current temperature, clamped to the
        // bounding square.
        for i in 0..n {
            let len = (disp[i].x * disp[i].x + disp[i].y * disp[i].y).sqrt();
            if len < MIN_DIST {
                continue;
            }
            let scale = len.min(temp) / len;
            pos[i].x = (pos[i].x + disp[i].x * scale).clamp(-half, half);
            pos[i].y = (pos[i].y + disp[i].y * scale).clamp(-half, half);
        }
    }

    for (vertex, p) in graph.node_weights_mut().zip(pos) {
        vertex.pos = p;
    }
}
