//! Planar diagrams: crossings with four ports, directed arcs, and the rotation system.
//!
//! Purpose
//! - Read-only model of a knot/link projection that the layout stages query.
//! - Slots are never compacted: inactive crossings and arcs keep their index.
//!
//! Conventions
//! - Ports in counterclockwise order for the standard orientation:
//!   `OutRight` (east), `OutLeft` (north), `InLeft` (west), `InRight` (south).
//!   The strands run `InLeft → OutRight` and `InRight → OutLeft`.
//! - A right-handed crossing has `InLeft → OutRight` on top.
//! - A dart is `2 * arc + 1` for forward traversal (tail to head) and `2 * arc` backward.
//! - Faces lie to the left of their darts.
//!
//! Constructors: [`PlanarDiagram::new`] (raw ports), [`PlanarDiagram::from_pd_code`],
//! and [`Braid::closure`].

pub mod braid;
mod dfs;
mod pd;

pub use braid::{Braid, BraidSample, RandomBraidGenerator, RandomBraidParams, SeedReplay};
pub use dfs::DartVisit;
pub use pd::parse_pd_code;

use std::fmt;

use crate::error::DiagramError;
use crate::ortho::Dir;

/// One of the four ports of a crossing, `(In/Out) × (Left/Right)`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    OutRight = 0,
    OutLeft = 1,
    InLeft = 2,
    InRight = 3,
}

impl Port {
    /// Counterclockwise order.
    pub const ALL: [Port; 4] = [Port::OutRight, Port::OutLeft, Port::InLeft, Port::InRight];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }

    #[inline]
    pub fn is_out(self) -> bool {
        matches!(self, Port::OutRight | Port::OutLeft)
    }

    /// Direction the port points to when the crossing has orientation 0.
    #[inline]
    pub fn standard_dir(self) -> Dir {
        Dir::from_index(self.index())
    }

    /// Next port in clockwise order.
    #[inline]
    pub fn clockwise(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// The end of an arc that attaches to this port.
    #[inline]
    pub fn end(self) -> End {
        if self.is_out() {
            End::Tail
        } else {
            End::Head
        }
    }
}

/// Tail or head of an arc (or edge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum End {
    Tail = 0,
    Head = 1,
}

impl End {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            End::Tail => "tail",
            End::Head => "head",
        }
    }
}

/// A traversal direction of an arc, encoded as `2 * arc + forward`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dart(pub usize);

impl Dart {
    #[inline]
    pub fn new(arc: usize, forward: bool) -> Self {
        Self(2 * arc + usize::from(forward))
    }

    #[inline]
    pub fn arc(self) -> usize {
        self.0 >> 1
    }

    /// `true` when the dart runs from the arc's tail to its head.
    #[inline]
    pub fn forward(self) -> bool {
        self.0 & 1 == 1
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Arc end the dart leaves from.
    #[inline]
    pub fn start(self) -> End {
        if self.forward() {
            End::Tail
        } else {
            End::Head
        }
    }

    /// Arc end the dart arrives at.
    #[inline]
    pub fn finish(self) -> End {
        if self.forward() {
            End::Head
        } else {
            End::Tail
        }
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingState {
    RightHanded,
    LeftHanded,
    Inactive,
}

impl CrossingState {
    #[inline]
    pub fn is_active(self) -> bool {
        self != CrossingState::Inactive
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArcState {
    Active,
    Inactive,
}

impl ArcState {
    #[inline]
    pub fn is_active(self) -> bool {
        self == ArcState::Active
    }
}

/// Raw crossing record: the arc at each port (indexed by [`Port::index`]) and the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossing {
    pub arcs: [usize; 4],
    pub state: CrossingState,
}

impl Crossing {
    pub fn new(arcs: [usize; 4], state: CrossingState) -> Self {
        Self { arcs, state }
    }

    /// Slot placeholder; its port entries are ignored.
    pub fn inactive() -> Self {
        Self {
            arcs: [0; 4],
            state: CrossingState::Inactive,
        }
    }

    #[inline]
    pub fn arc(&self, port: Port) -> usize {
        self.arcs[port.index()]
    }
}

/// Where an arc end is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArcEnd {
    pub crossing: usize,
    pub port: Port,
}

#[derive(Clone, Debug)]
struct ArcSlot {
    state: ArcState,
    /// `[tail, head]`, `None` for inactive slots.
    ends: Option<[ArcEnd; 2]>,
}

/// Validated, read-only planar diagram.
#[derive(Clone, Debug)]
pub struct PlanarDiagram {
    crossings: Vec<Crossing>,
    arcs: Vec<ArcSlot>,
    crossing_count: usize,
    arc_count: usize,
}

impl PlanarDiagram {
    /// Build a diagram from raw port tables.
    ///
    /// Every port of an active crossing must reference an active arc, and every active arc
    /// must be attached exactly once at an `Out*` port (its tail) and once at an `In*` port
    /// (its head).
    ///
    /// # Errors
    ///
    /// Returns a [`DiagramError`] describing the first inconsistency found.
    pub fn new(crossings: Vec<Crossing>, arc_states: Vec<ArcState>) -> Result<Self, DiagramError> {
        let arc_slots = arc_states.len();
        let mut ends: Vec<[Option<ArcEnd>; 2]> = vec![[None, None]; arc_slots];
        for (c, x) in crossings.iter().enumerate() {
            if !x.state.is_active() {
                continue;
            }
            for port in Port::ALL {
                let a = x.arc(port);
                if a >= arc_slots {
                    return Err(DiagramError::ArcOutOfRange {
                        crossing: c,
                        arc: a,
                        arc_slots,
                    });
                }
                if !arc_states[a].is_active() {
                    return Err(DiagramError::InactiveArc { crossing: c, arc: a });
                }
                let end = port.end();
                let slot = &mut ends[a][end.index()];
                if slot.is_some() {
                    return Err(DiagramError::DuplicateEnd {
                        arc: a,
                        end: end.as_str(),
                    });
                }
                *slot = Some(ArcEnd { crossing: c, port });
            }
        }

        let mut arcs = Vec::with_capacity(arc_slots);
        for (a, (state, e)) in arc_states.into_iter().zip(ends).enumerate() {
            let ends = if state.is_active() {
                match e {
                    [Some(tail), Some(head)] => Some([tail, head]),
                    [None, _] => {
                        return Err(DiagramError::DanglingArc {
                            arc: a,
                            end: End::Tail.as_str(),
                        })
                    }
                    [_, None] => {
                        return Err(DiagramError::DanglingArc {
                            arc: a,
                            end: End::Head.as_str(),
                        })
                    }
                }
            } else {
                None
            };
            arcs.push(ArcSlot { state, ends });
        }

        let crossing_count = crossings.iter().filter(|x| x.state.is_active()).count();
        let arc_count = arcs.iter().filter(|s| s.state.is_active()).count();
        Ok(Self {
            crossings,
            arcs,
            crossing_count,
            arc_count,
        })
    }

    /// Number of crossing slots, including inactive ones.
    #[inline]
    pub fn crossing_slots(&self) -> usize {
        self.crossings.len()
    }

    /// Number of arc slots, including inactive ones.
    #[inline]
    pub fn arc_slots(&self) -> usize {
        self.arcs.len()
    }

    /// Number of active crossings.
    #[inline]
    pub fn crossing_count(&self) -> usize {
        self.crossing_count
    }

    /// Number of active arcs.
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    #[inline]
    pub fn dart_slots(&self) -> usize {
        2 * self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossing_count == 0
    }

    #[inline]
    pub fn crossing(&self, c: usize) -> &Crossing {
        &self.crossings[c]
    }

    #[inline]
    pub fn crossing_state(&self, c: usize) -> CrossingState {
        self.crossings[c].state
    }

    #[inline]
    pub fn crossing_active(&self, c: usize) -> bool {
        self.crossings[c].state.is_active()
    }

    #[inline]
    pub fn arc_state(&self, a: usize) -> ArcState {
        self.arcs[a].state
    }

    #[inline]
    pub fn arc_active(&self, a: usize) -> bool {
        self.arcs[a].state.is_active()
    }

    /// Arc attached to `port` of crossing `c`.
    #[inline]
    pub fn port_arc(&self, c: usize, port: Port) -> usize {
        self.crossings[c].arc(port)
    }

    /// `[tail, head]` attachment of an active arc.
    #[inline]
    pub fn arc_ends(&self, a: usize) -> Option<[ArcEnd; 2]> {
        self.arcs[a].ends
    }

    #[inline]
    pub fn arc_end(&self, a: usize, end: End) -> Option<ArcEnd> {
        self.arcs[a].ends.map(|e| e[end.index()])
    }

    /// Attachment the dart leaves from.
    #[inline]
    pub fn dart_start(&self, d: Dart) -> Option<ArcEnd> {
        self.arc_end(d.arc(), d.start())
    }

    /// Attachment the dart arrives at.
    #[inline]
    pub fn dart_finish(&self, d: Dart) -> Option<ArcEnd> {
        self.arc_end(d.arc(), d.finish())
    }

    /// Next dart along the face to the left of `d`.
    ///
    /// At the crossing where `d` arrives, the walk continues through the port clockwise-adjacent
    /// to the arrival port. `None` for darts of inactive arcs.
    pub fn next_dart_on_face(&self, d: Dart) -> Option<Dart> {
        let at = self.dart_finish(d)?;
        let port = at.port.clockwise();
        let next = self.port_arc(at.crossing, port);
        Some(Dart::new(next, port.is_out()))
    }

    /// Whether arc `a` is the over-strand at the crossing of its `end`.
    pub fn arc_over_at(&self, a: usize, end: End) -> bool {
        let Some(at) = self.arc_end(a, end) else {
            return false;
        };
        match self.crossing_state(at.crossing) {
            CrossingState::RightHanded => matches!(at.port, Port::InLeft | Port::OutRight),
            CrossingState::LeftHanded => matches!(at.port, Port::InRight | Port::OutLeft),
            CrossingState::Inactive => false,
        }
    }
}
