//! Minimum-bend optimization via linear programming.
//!
//! Purpose
//! - Compute one signed bend count per arc such that every face turns by a full rotation:
//!   `corners + Σ signed bends = +4` for interior faces and `-4` for exterior faces, while
//!   the total number of bends is minimal.
//!
//! Formulation
//! - Two nonnegative columns per arc slot, `2a` (tail potential) and `2a + 1` (head
//!   potential); `bend[a] = x[2a + 1] - x[2a]` and the objective is `Σ x`, an l¹ norm.
//! - One equality row per face. A dart contributes `+bend` when it runs forward and `-bend`
//!   otherwise, so each active arc has at most four nonzeros.
//! - The matrix is totally unimodular, so basic optimal solutions are integral and rounding
//!   only removes floating-point noise.
//!
//! This is Tamassia's minimum-bend formulation specialized to 4-valent vertices, solved as a
//! general LP instead of a min-cost flow.

mod lp;

pub use lp::{LpDiagnostics, LpOutcome, LpSolver, LpStatus, MicroLpSolver, SparseLp};

use tracing::{debug, debug_span, error, warn};

use crate::cfg::{OrthoCfg, EXTERIOR_ROTATION, INTERIOR_ROTATION};
use crate::diagram::PlanarDiagram;
use crate::error::BendError;
use crate::faces::{ExteriorFaces, FaceSet};
use crate::ortho::Turn;

/// Signed bend count per arc slot plus solver provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct Bends {
    values: Vec<Turn>,
    status: LpStatus,
    diagnostics: LpDiagnostics,
    max_rounding_error: f64,
}

impl Bends {
    fn empty() -> Self {
        Self {
            values: Vec::new(),
            status: LpStatus::Optimal,
            diagnostics: LpDiagnostics::default(),
            max_rounding_error: 0.0,
        }
    }

    /// Bend of every arc slot (zero for inactive slots). Positive bends turn left.
    pub fn values(&self) -> &[Turn] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Σ |bend|.
    pub fn total(&self) -> u64 {
        self.values.iter().map(|b| u64::from(b.unsigned_abs())).sum()
    }

    /// `true` when the solver did not report optimality; the values are best-effort.
    pub fn degraded(&self) -> bool {
        !self.status.is_optimal()
    }

    pub fn status(&self) -> &LpStatus {
        &self.status
    }

    pub fn diagnostics(&self) -> &LpDiagnostics {
        &self.diagnostics
    }

    /// Largest `|x_head - x_tail - round(x_head - x_tail)|` over all arcs.
    pub fn max_rounding_error(&self) -> f64 {
        self.max_rounding_error
    }
}

/// Assemble the bend LP for `diagram` with the given exterior faces.
pub fn build_bend_lp(
    diagram: &PlanarDiagram,
    faces: &FaceSet,
    exterior: &ExteriorFaces,
    max_iterations: u64,
) -> SparseLp {
    let arc_slots = diagram.arc_slots();
    let col_count = 2 * arc_slots;

    let mut col_ptr = Vec::with_capacity(col_count + 1);
    let mut row_idx = Vec::with_capacity(4 * diagram.arc_count());
    let mut values = Vec::with_capacity(4 * diagram.arc_count());
    let mut col_lower = Vec::with_capacity(col_count);
    let mut col_upper = Vec::with_capacity(col_count);
    let mut objective = Vec::with_capacity(col_count);
    col_ptr.push(0);

    for a in 0..arc_slots {
        let sides = if diagram.arc_active(a) {
            faces.arc_faces(a)
        } else {
            None
        };
        // Tail column enters with -1, head column with +1 on the left (forward) side.
        for sign in [-1.0, 1.0] {
            if let Some([right, left]) = sides {
                // Both sides on the same face cancel out.
                if right != left {
                    let mut entries = [(left, sign), (right, -sign)];
                    entries.sort_by_key(|&(row, _)| row);
                    for (row, v) in entries {
                        row_idx.push(row);
                        values.push(v);
                    }
                }
            }
            col_ptr.push(row_idx.len());
            col_lower.push(0.0);
            if sides.is_some() {
                col_upper.push(f64::INFINITY);
                objective.push(1.0);
            } else {
                col_upper.push(0.0);
                objective.push(0.0);
            }
        }
    }

    let row_rhs = (0..faces.face_count())
        .map(|f| {
            let full_turn = if exterior.is_exterior(f) {
                EXTERIOR_ROTATION
            } else {
                INTERIOR_ROTATION
            };
            (full_turn - faces.face_size(f) as i64) as f64
        })
        .collect();

    SparseLp {
        row_count: faces.face_count(),
        col_count,
        col_ptr,
        row_idx,
        values,
        col_lower,
        col_upper,
        objective,
        row_rhs,
        max_iterations,
    }
}

/// Compute minimum bends for `diagram`.
///
/// A non-optimal solver status is not an error: the rounded solution is returned with
/// [`Bends::degraded`] set and diagnostics logged.
///
/// # Errors
///
/// [`BendError::CapacityOverflow`] when the LP would not fit the solver's index types. The
/// solver is not invoked in that case.
pub fn optimize_bends<S: LpSolver + ?Sized>(
    diagram: &PlanarDiagram,
    faces: &FaceSet,
    exterior: &ExteriorFaces,
    solver: &mut S,
    cfg: &OrthoCfg,
) -> Result<Bends, BendError> {
    let _span = debug_span!(
        "optimize_bends",
        arcs = diagram.arc_count(),
        faces = faces.face_count(),
        solver = solver.name()
    )
    .entered();

    let columns = 2 * diagram.arc_slots() as u64;
    if columns > solver.max_columns() {
        error!(
            columns,
            limit = solver.max_columns(),
            solver = solver.name(),
            "too many arcs to index the LP columns"
        );
        return Err(BendError::CapacityOverflow {
            what: "columns",
            size: columns,
            limit: solver.max_columns(),
        });
    }
    let nnz = 4 * diagram.arc_count() as u64;
    if nnz > solver.max_nonzeros() {
        error!(
            nnz,
            limit = solver.max_nonzeros(),
            solver = solver.name(),
            "system matrix has more nonzeros than the solver can count"
        );
        return Err(BendError::CapacityOverflow {
            what: "nonzeros",
            size: nnz,
            limit: solver.max_nonzeros(),
        });
    }
    if diagram.arc_slots() == 0 {
        return Ok(Bends::empty());
    }

    let lp = build_bend_lp(diagram, faces, exterior, cfg.max_iterations);
    let outcome = solver.solve(&lp);

    let mut status = outcome.status;
    let primal = match outcome.primal {
        Some(x) if x.len() == lp.col_count => x,
        _ => {
            warn!(
                solver = solver.name(),
                "LP backend returned no usable primal solution; using zero bends"
            );
            if status.is_optimal() {
                status = LpStatus::Failed("missing primal solution".into());
            }
            vec![0.0; lp.col_count]
        }
    };
    if !status.is_optimal() {
        let d = &outcome.diagnostics;
        warn!(
            solver = solver.name(),
            status = ?status,
            "LP solve did not reach optimality; the returned bends may be incorrect"
        );
        warn!(
            iterations = ?d.iterations,
            primal_feasible = ?d.primal_feasible,
            dual_feasible = ?d.dual_feasible,
            largest_primal_error = ?d.largest_primal_error,
            largest_dual_error = ?d.largest_dual_error,
            "LP diagnostics"
        );
    }

    let mut max_rounding_error: f64 = 0.0;
    let values: Vec<Turn> = (0..diagram.arc_slots())
        .map(|a| {
            let diff = primal[2 * a + 1] - primal[2 * a];
            let rounded = diff.round();
            max_rounding_error = max_rounding_error.max((diff - rounded).abs());
            rounded as Turn
        })
        .collect();
    if max_rounding_error > cfg.integrality_eps {
        warn!(
            max_rounding_error,
            eps = cfg.integrality_eps,
            "LP solution is not integral"
        );
    }

    let bends = Bends {
        values,
        status,
        diagnostics: outcome.diagnostics,
        max_rounding_error,
    };
    debug!(total = bends.total(), degraded = bends.degraded(), "bends computed");
    Ok(bends)
}
