//! Orthogonal layouts of knot and link diagrams.
//!
//! Pipeline
//! - [`diagram`]: planar diagrams from raw ports, PD codes or braid closures.
//! - [`faces`]: face boundary cycles and the exterior-face choice.
//! - [`bends`]: minimum bends per arc from a linear program with one winding row per face.
//! - [`ortho`]: crossing orientations and subdivision into an axis-aligned grid graph.
//! - [`layout`]: all of the above behind one caching object.
//!
//! API Policy
//! - Project-internal crate without a stable public API; the CLI is the only consumer.

pub mod bends;
pub mod cfg;
pub mod diagram;
pub mod error;
pub mod faces;
pub mod layout;
pub mod ortho;

#[cfg(test)]
pub(crate) mod test_util;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::OrthoCfg;
pub use error::{BendError, DiagramError, LayoutError, SubdivideError};
pub use layout::Layout;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::bends::{optimize_bends, Bends, LpSolver, MicroLpSolver};
    pub use crate::cfg::OrthoCfg;
    pub use crate::diagram::{
        parse_pd_code, ArcState, Braid, Crossing, CrossingState, Dart, End, PlanarDiagram, Port,
        RandomBraidGenerator, RandomBraidParams,
    };
    pub use crate::faces::{ExteriorFaces, FaceSet};
    pub use crate::layout::Layout;
    pub use crate::ortho::{subdivide, Dir, OrthoRepr, Scratch, Turn};
}
