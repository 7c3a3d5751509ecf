//! Orthogonal representation: crossings oriented on the grid and arcs split at their bends.
//!
//! Purpose
//! - Turn a diagram plus per-arc bends into a 4-regular grid graph whose every edge is
//!   axis-aligned and bend-free. Crossings become vertices with an orientation; each bend
//!   becomes a `Corner` vertex.
//!
//! Construction
//! - Orientation is propagated along a depth-first spanning forest, starting every component
//!   at east. Leaving crossing `c0` through port `p0`, an arc heads `std(p0) + orient[c0]`,
//!   turns by its bend (negated when traversed backward) and enters the next crossing from
//!   the opposite side; that fixes the next crossing's orientation.
//! - Arc `a` keeps edge index `a` for its first segment; segments after each corner are
//!   appended with fresh indices. Corner vertices are appended after the crossing slots.
//!
//! Size
//! - `vertex_count = crossing_slots + Σ|bend|` and `edge_count = arc_slots + Σ|bend|`, both
//!   summed over active arcs.

mod dir;
mod scratch;

pub use dir::{Dir, Turn};
pub use scratch::Scratch;

use nalgebra::Vector2;
use tracing::{debug, debug_span, error, warn};

use crate::diagram::{CrossingState, End, PlanarDiagram};
use crate::error::SubdivideError;

/// Kind of a grid vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexState {
    /// Introduced by a bend.
    Corner,
    RightHanded,
    LeftHanded,
    /// Inactive crossing slot.
    Inactive,
}

impl From<CrossingState> for VertexState {
    fn from(s: CrossingState) -> Self {
        match s {
            CrossingState::RightHanded => VertexState::RightHanded,
            CrossingState::LeftHanded => VertexState::LeftHanded,
            CrossingState::Inactive => VertexState::Inactive,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeState {
    /// First segment of an arc.
    Active,
    /// Segment created by subdivision.
    Virtual,
}

/// Edge traversed toward one of its ends.
///
/// Stored in a vertex's direction slot, it leaves that vertex: `toward` is the far end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirectedEdge {
    pub edge: usize,
    pub toward: End,
}

impl DirectedEdge {
    #[inline]
    pub fn new(edge: usize, toward: End) -> Self {
        Self { edge, toward }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridVertex {
    pub state: VertexState,
    /// Incident edge in each direction, indexed by [`Dir::index`].
    pub edges: [Option<DirectedEdge>; 4],
}

impl GridVertex {
    fn new(state: VertexState) -> Self {
        Self {
            state,
            edges: [None; 4],
        }
    }

    #[inline]
    pub fn edge(&self, dir: Dir) -> Option<DirectedEdge> {
        self.edges[dir.index()]
    }

    pub fn degree(&self) -> usize {
        self.edges.iter().flatten().count()
    }
}

/// Straight axis-aligned segment of an arc.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridEdge {
    /// Arc this segment belongs to.
    pub arc: usize,
    /// Heading from tail to head.
    pub dir: Dir,
    /// `[tail, head]` vertex.
    pub ends: [usize; 2],
    /// Turn taken at `[tail, head]` when walking the segment forward.
    pub turns: [Turn; 2],
    pub state: EdgeState,
}

impl GridEdge {
    #[inline]
    pub fn tail(&self) -> usize {
        self.ends[End::Tail.index()]
    }

    #[inline]
    pub fn head(&self) -> usize {
        self.ends[End::Head.index()]
    }
}

/// Subdivided diagram on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrthoRepr {
    exterior_face: Option<usize>,
    bends: Vec<Turn>,
    bend_count: usize,
    orientation: Vec<Option<Dir>>,
    vertices: Vec<GridVertex>,
    edges: Vec<Option<GridEdge>>,
    arc_vertex_ptr: Vec<usize>,
    arc_vertex_idx: Vec<usize>,
    arc_edge_ptr: Vec<usize>,
    arc_edge_idx: Vec<usize>,
    arc_over: Vec<[bool; 2]>,
}

impl OrthoRepr {
    /// Vertex slots: crossing slots followed by corners.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Edge slots, including the empty slots of inactive arcs.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn active_edge_count(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Σ |bend| over active arcs; also the number of corner vertices.
    #[inline]
    pub fn bend_count(&self) -> usize {
        self.bend_count
    }

    pub fn exterior_face(&self) -> Option<usize> {
        self.exterior_face
    }

    pub fn bends(&self) -> &[Turn] {
        &self.bends
    }

    /// Direction of the `OutRight` port of crossing `c`; `None` for inactive slots.
    #[inline]
    pub fn crossing_orientation(&self, c: usize) -> Option<Dir> {
        self.orientation.get(c).copied().flatten()
    }

    pub fn vertices(&self) -> &[GridVertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, v: usize) -> &GridVertex {
        &self.vertices[v]
    }

    pub fn edges(&self) -> &[Option<GridEdge>] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, e: usize) -> Option<&GridEdge> {
        self.edges.get(e).and_then(Option::as_ref)
    }

    /// Vertices along arc `a` from tail crossing to head crossing; empty for inactive arcs.
    pub fn arc_vertices(&self, a: usize) -> &[usize] {
        &self.arc_vertex_idx[self.arc_vertex_ptr[a]..self.arc_vertex_ptr[a + 1]]
    }

    /// Edges along arc `a` from tail to head; empty for inactive arcs.
    pub fn arc_edges(&self, a: usize) -> &[usize] {
        &self.arc_edge_idx[self.arc_edge_ptr[a]..self.arc_edge_ptr[a + 1]]
    }

    /// Whether arc `a` passes over the crossing at its `end`.
    pub fn arc_over(&self, a: usize, end: End) -> bool {
        self.arc_over[a][end.index()]
    }

    /// Sum of the unit steps of all segments of arc `a`.
    pub fn arc_displacement(&self, a: usize) -> Vector2<i64> {
        self.arc_edges(a)
            .iter()
            .filter_map(|&e| self.edge(e))
            .map(|g| g.dir.unit())
            .sum()
    }

    /// Active arcs whose last segment does not enter the head crossing through the
    /// direction of the head port. Empty whenever the bends satisfy the winding condition.
    pub fn port_mismatches(&self, diagram: &PlanarDiagram) -> Vec<usize> {
        (0..diagram.arc_slots())
            .filter(|&a| {
                let Some(head) = diagram.arc_end(a, End::Head) else {
                    return false;
                };
                let Some(last) = self.arc_edges(a).last().and_then(|&e| self.edge(e)) else {
                    return false;
                };
                let orient = self.crossing_orientation(head.crossing).unwrap_or(Dir::East);
                let expected = head.port.standard_dir().rotate(orient.index() as Turn);
                last.dir.opposite() != expected
            })
            .collect()
    }
}

/// Orient every active crossing, writing into `scratch.orientation`.
fn orient_crossings(diagram: &PlanarDiagram, bends: &[Turn], scratch: &mut Scratch) {
    let Scratch {
        orientation,
        dfs_stack,
        dfs_seen,
        ..
    } = scratch;
    diagram.depth_first_search_with(dfs_stack, dfs_seen, |visit| {
        let Some(d) = visit.dart else {
            orientation[visit.head] = Some(Dir::East);
            return;
        };
        let (Some(from), Some(to)) = (diagram.dart_start(d), diagram.dart_finish(d)) else {
            return;
        };
        let known = orientation[visit.tail].unwrap_or(Dir::East);
        let b = bends[d.arc()];
        let heading = from
            .port
            .standard_dir()
            .rotate(known.index() as Turn)
            .rotate(if d.forward() { b } else { -b });
        // Enters through the side facing back along the heading.
        let port_dir = heading.opposite();
        orientation[visit.head] = Some(Dir::East.rotate(port_dir.turns_from(to.port.standard_dir())));
    });
}

/// Subdivide `diagram` with the given per-arc `bends`.
///
/// A port mismatch (bends that violate the winding condition) is logged as a warning and
/// the representation is still returned; see [`OrthoRepr::port_mismatches`].
///
/// # Errors
///
/// [`SubdivideError::BendLengthMismatch`] when `bends` does not have one entry per arc slot.
/// Nothing is built in that case.
pub fn subdivide(
    diagram: &PlanarDiagram,
    exterior_face: Option<usize>,
    bends: &[Turn],
    scratch: &mut Scratch,
) -> Result<OrthoRepr, SubdivideError> {
    let _span = debug_span!(
        "subdivide",
        crossings = diagram.crossing_count(),
        arcs = diagram.arc_count()
    )
    .entered();

    let arc_slots = diagram.arc_slots();
    if bends.len() != arc_slots {
        error!(
            expected = arc_slots,
            found = bends.len(),
            "bend optimization failed to produce one bend per arc; not subdividing"
        );
        return Err(SubdivideError::BendLengthMismatch {
            expected: arc_slots,
            found: bends.len(),
        });
    }

    let bend_count: usize = (0..arc_slots)
        .filter(|&a| diagram.arc_active(a))
        .map(|a| bends[a].unsigned_abs() as usize)
        .sum();
    let crossing_slots = diagram.crossing_slots();
    let vertex_count = crossing_slots + bend_count;
    let edge_count = arc_slots + bend_count;
    scratch.prepare(crossing_slots, vertex_count, edge_count);

    orient_crossings(diagram, bends, scratch);

    let mut vertices: Vec<GridVertex> = Vec::with_capacity(vertex_count);
    vertices.extend((0..crossing_slots).map(|c| GridVertex::new(diagram.crossing_state(c).into())));
    let mut edges: Vec<Option<GridEdge>> = Vec::with_capacity(edge_count);
    edges.resize(arc_slots, None);

    let mut arc_vertex_ptr = Vec::with_capacity(arc_slots + 1);
    let mut arc_vertex_idx = Vec::with_capacity(edge_count + diagram.arc_count());
    let mut arc_edge_ptr = Vec::with_capacity(arc_slots + 1);
    let mut arc_edge_idx = Vec::with_capacity(edge_count);
    arc_vertex_ptr.push(0);
    arc_edge_ptr.push(0);
    let mut arc_over = vec![[false; 2]; arc_slots];

    for a in 0..arc_slots {
        let ends = match diagram.arc_ends(a) {
            Some(ends) if diagram.arc_active(a) => ends,
            _ => {
                arc_vertex_ptr.push(arc_vertex_idx.len());
                arc_edge_ptr.push(arc_edge_idx.len());
                continue;
            }
        };
        let [tail, head] = ends;
        arc_over[a] = [
            diagram.arc_over_at(a, End::Tail),
            diagram.arc_over_at(a, End::Head),
        ];

        let b = bends[a];
        let sign = b.signum();
        let tail_orient = scratch.orientation[tail.crossing].unwrap_or(Dir::East);
        let mut dir = tail.port.standard_dir().rotate(tail_orient.index() as Turn);

        scratch.chain_vertices.clear();
        scratch.chain_edges.clear();
        scratch.chain_vertices.push(tail.crossing);
        scratch.chain_edges.push(a);

        edges[a] = Some(GridEdge {
            arc: a,
            dir,
            ends: [tail.crossing, tail.crossing],
            turns: [1, 1],
            state: EdgeState::Active,
        });
        vertices[tail.crossing].edges[dir.index()] = Some(DirectedEdge::new(a, End::Head));

        let mut prev = a;
        for _ in 0..b.unsigned_abs() {
            let v = vertices.len();
            let e = edges.len();
            let mut corner = GridVertex::new(VertexState::Corner);
            corner.edges[dir.opposite().index()] = Some(DirectedEdge::new(prev, End::Tail));
            dir = dir.rotate(sign);
            corner.edges[dir.index()] = Some(DirectedEdge::new(e, End::Head));
            vertices.push(corner);

            if let Some(p) = edges[prev].as_mut() {
                p.ends[End::Head.index()] = v;
                p.turns[End::Head.index()] = sign;
            }
            edges.push(Some(GridEdge {
                arc: a,
                dir,
                ends: [v, v],
                turns: [-sign, 1],
                state: EdgeState::Virtual,
            }));
            scratch.chain_vertices.push(v);
            scratch.chain_edges.push(e);
            prev = e;
        }

        vertices[head.crossing].edges[dir.opposite().index()] =
            Some(DirectedEdge::new(prev, End::Tail));
        if let Some(p) = edges[prev].as_mut() {
            p.ends[End::Head.index()] = head.crossing;
            p.turns[End::Head.index()] = 1;
        }
        scratch.chain_vertices.push(head.crossing);

        arc_vertex_idx.extend_from_slice(&scratch.chain_vertices);
        arc_edge_idx.extend_from_slice(&scratch.chain_edges);
        arc_vertex_ptr.push(arc_vertex_idx.len());
        arc_edge_ptr.push(arc_edge_idx.len());
    }

    let repr = OrthoRepr {
        exterior_face,
        bends: bends.to_vec(),
        bend_count,
        orientation: scratch.orientation.clone(),
        vertices,
        edges,
        arc_vertex_ptr,
        arc_vertex_idx,
        arc_edge_ptr,
        arc_edge_idx,
        arc_over,
    };

    let mismatches = repr.port_mismatches(diagram);
    if !mismatches.is_empty() {
        warn!(
            arcs = ?mismatches,
            "arcs do not enter their head port; bends violate the winding condition"
        );
    }
    debug!(
        vertices = repr.vertex_count(),
        edges = repr.edge_count(),
        corners = bend_count,
        "subdivision done"
    );
    Ok(repr)
}

#[cfg(test)]
mod tests;
