//! Per-invocation scratch space for subdivision.
//!
//! Buffers are sized from the diagram counts once per call and reused by every phase of
//! that call; they carry no meaning between calls.

use super::Dir;
use crate::diagram::PlanarDiagram;

#[derive(Clone, Debug, Default)]
pub struct Scratch {
    /// Absolute orientation per crossing slot (direction of the `OutRight` port).
    pub(crate) orientation: Vec<Option<Dir>>,
    pub(crate) dfs_stack: Vec<(usize, usize)>,
    pub(crate) dfs_seen: Vec<bool>,
    /// Vertices of the arc currently being subdivided, tail to head.
    pub(crate) chain_vertices: Vec<usize>,
    /// Edges of the arc currently being subdivided, tail to head.
    pub(crate) chain_edges: Vec<usize>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch with capacity for `diagram` and an expected number of bends.
    pub fn for_diagram(diagram: &PlanarDiagram, bend_count: usize) -> Self {
        let mut s = Self::new();
        s.prepare(
            diagram.crossing_slots(),
            diagram.crossing_slots() + bend_count,
            diagram.arc_slots() + bend_count,
        );
        s
    }

    /// Reset for a diagram with `crossing_slots` crossings and the given output totals.
    pub(crate) fn prepare(&mut self, crossing_slots: usize, vertex_count: usize, edge_count: usize) {
        self.orientation.clear();
        self.orientation.resize(crossing_slots, None);
        self.dfs_stack.clear();
        self.dfs_stack.reserve(crossing_slots);
        self.dfs_seen.clear();
        self.dfs_seen.reserve(crossing_slots);
        self.chain_vertices.clear();
        self.chain_vertices.reserve(2 * vertex_count);
        self.chain_edges.clear();
        self.chain_edges.reserve(2 * edge_count);
    }
}
