//! Caching layout pipeline: faces → exterior choice → bends → orthogonal representation.
//!
//! Each stage result lives in its own `Option` field and is computed on first access.
//! Changing the exterior face drops everything downstream of the face cycles; replacing the
//! diagram drops everything.

use tracing::debug;

use crate::bends::{optimize_bends, Bends, LpSolver, MicroLpSolver};
use crate::cfg::OrthoCfg;
use crate::diagram::PlanarDiagram;
use crate::error::{BendError, LayoutError};
use crate::faces::{ExteriorFaces, FaceSet};
use crate::ortho::{subdivide, OrthoRepr, Scratch};

pub struct Layout<S: LpSolver = MicroLpSolver> {
    diagram: PlanarDiagram,
    cfg: OrthoCfg,
    solver: S,
    scratch: Scratch,
    faces: Option<FaceSet>,
    exterior: Option<ExteriorFaces>,
    bends: Option<Bends>,
    ortho: Option<OrthoRepr>,
}

impl Layout<MicroLpSolver> {
    pub fn new(diagram: PlanarDiagram, cfg: OrthoCfg) -> Self {
        Self::with_solver(diagram, cfg, MicroLpSolver)
    }
}

impl<S: LpSolver> Layout<S> {
    pub fn with_solver(diagram: PlanarDiagram, cfg: OrthoCfg, solver: S) -> Self {
        Self {
            diagram,
            cfg,
            solver,
            scratch: Scratch::new(),
            faces: None,
            exterior: None,
            bends: None,
            ortho: None,
        }
    }

    pub fn diagram(&self) -> &PlanarDiagram {
        &self.diagram
    }

    pub fn cfg(&self) -> &OrthoCfg {
        &self.cfg
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn faces(&mut self) -> &FaceSet {
        self.faces
            .get_or_insert_with(|| FaceSet::extract(&self.diagram))
    }

    pub fn exterior(&mut self) -> &ExteriorFaces {
        let exterior = match self.exterior.take() {
            Some(e) => e,
            None => {
                let requested = self.cfg.exterior_face;
                self.faces().exterior_faces(requested)
            }
        };
        self.exterior.insert(exterior)
    }

    /// # Errors
    ///
    /// See [`optimize_bends`].
    pub fn bends(&mut self) -> Result<&Bends, BendError> {
        let bends = match self.bends.take() {
            Some(b) => b,
            None => {
                let faces = self
                    .faces
                    .take()
                    .unwrap_or_else(|| FaceSet::extract(&self.diagram));
                let exterior = self
                    .exterior
                    .take()
                    .unwrap_or_else(|| faces.exterior_faces(self.cfg.exterior_face));
                let result = optimize_bends(
                    &self.diagram,
                    &faces,
                    &exterior,
                    &mut self.solver,
                    &self.cfg,
                );
                self.faces = Some(faces);
                self.exterior = Some(exterior);
                result?
            }
        };
        Ok(self.bends.insert(bends))
    }

    /// Run the whole pipeline (or return the cached representation).
    ///
    /// # Errors
    ///
    /// [`LayoutError`] from the bend or subdivision stage.
    pub fn ortho(&mut self) -> Result<&OrthoRepr, LayoutError> {
        let repr = match self.ortho.take() {
            Some(r) => r,
            None => {
                let exterior_face = self.exterior().primary();
                self.bends()?;
                let values = self.bends.as_ref().map(Bends::values).unwrap_or(&[]);
                subdivide(&self.diagram, exterior_face, values, &mut self.scratch)?
            }
        };
        Ok(self.ortho.insert(repr))
    }

    /// Choose another exterior face. Face cycles are kept.
    pub fn set_exterior_face(&mut self, face: Option<usize>) {
        if self.cfg.exterior_face == face {
            return;
        }
        debug!(?face, "exterior face changed");
        self.cfg.exterior_face = face;
        self.exterior = None;
        self.bends = None;
        self.ortho = None;
    }

    /// Swap in a new diagram and return the old one; all cached results are dropped.
    pub fn replace_diagram(&mut self, diagram: PlanarDiagram) -> PlanarDiagram {
        self.invalidate();
        std::mem::replace(&mut self.diagram, diagram)
    }

    pub fn invalidate(&mut self) {
        self.faces = None;
        self.exterior = None;
        self.bends = None;
        self.ortho = None;
    }

    pub fn into_diagram(self) -> PlanarDiagram {
        self.diagram
    }
}
