//! Error types for diagram construction and the layout pipeline.

use thiserror::Error;

/// Invalid input while building a [`PlanarDiagram`](crate::diagram::PlanarDiagram).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("crossing {crossing} references arc {arc}, but there are only {arc_slots} arc slots")]
    ArcOutOfRange {
        crossing: usize,
        arc: usize,
        arc_slots: usize,
    },

    #[error("crossing {crossing} references inactive arc {arc}")]
    InactiveArc { crossing: usize, arc: usize },

    #[error("arc {arc} is attached to more than one {end} port")]
    DuplicateEnd { arc: usize, end: &'static str },

    #[error("active arc {arc} has no {end} port")]
    DanglingArc { arc: usize, end: &'static str },

    #[error("PD code: {0}")]
    PdCode(String),

    #[error("braid letter {letter} is invalid for {strands} strands")]
    BraidLetter { letter: i32, strands: usize },

    #[error("braid needs at least one strand")]
    NoStrands,

    #[error("strand {strand} takes part in no crossing")]
    FreeStrand { strand: usize },

    #[error("invalid generator params: {0}")]
    InvalidParams(String),
}

/// Failure of the bend optimization stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BendError {
    #[error("{what} = {size} exceeds the solver limit {limit}")]
    CapacityOverflow {
        what: &'static str,
        size: u64,
        limit: u64,
    },
}

/// Failure of the subdivision stage. Nothing is built when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubdivideError {
    #[error("bend vector has length {found}, expected one entry per arc slot ({expected})")]
    BendLengthMismatch { expected: usize, found: usize },
}

/// Error of the whole [`Layout`](crate::layout::Layout) pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Bends(#[from] BendError),

    #[error(transparent)]
    Subdivide(#[from] SubdivideError),
}
