//! Sparse linear programs and the solver seam.
//!
//! The bend optimization only needs "minimize `c·x` subject to `A x = b`, `l ≤ x ≤ u`" with
//! `A` in compressed column form. [`LpSolver`] is that capability; [`MicroLpSolver`] is the
//! default backend (pure Rust, through `good_lp`).
//!
//! A min-cost-flow / network simplex backend would exploit the totally unimodular structure
//! of the bend system; it can be plugged in behind the same trait.

use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use tracing::debug;

use crate::cfg::PRIMAL_FEAS_EPS;

/// Equality-constrained LP with column bounds, matrix in compressed column form.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseLp {
    pub row_count: usize,
    pub col_count: usize,
    /// Length `col_count + 1`.
    pub col_ptr: Vec<usize>,
    pub row_idx: Vec<usize>,
    pub values: Vec<f64>,
    pub col_lower: Vec<f64>,
    /// `f64::INFINITY` for unbounded columns.
    pub col_upper: Vec<f64>,
    pub objective: Vec<f64>,
    /// Row lower bound equals row upper bound.
    pub row_rhs: Vec<f64>,
    pub max_iterations: u64,
}

impl SparseLp {
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Nonzeros `(row, value)` of column `j`.
    pub fn column(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.col_ptr[j]..self.col_ptr[j + 1];
        self.row_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// `A x`.
    pub fn row_activity(&self, x: &[f64]) -> Vec<f64> {
        let mut activity = vec![0.0; self.row_count];
        for (j, &xj) in x.iter().enumerate().take(self.col_count) {
            for (i, v) in self.column(j) {
                activity[i] += v * xj;
            }
        }
        activity
    }

    /// Largest violation of the row equalities and column bounds at `x`.
    pub fn largest_primal_error(&self, x: &[f64]) -> f64 {
        let rows = self
            .row_activity(x)
            .iter()
            .zip(&self.row_rhs)
            .map(|(ax, b)| (ax - b).abs())
            .fold(0.0, f64::max);
        let bounds = x
            .iter()
            .zip(self.col_lower.iter().zip(&self.col_upper))
            .map(|(&xj, (&lo, &hi))| (lo - xj).max(xj - hi).max(0.0))
            .fold(0.0, f64::max);
        rows.max(bounds)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
    Failed(String),
}

impl LpStatus {
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, LpStatus::Optimal)
    }
}

/// Solver diagnostics; `None` where a backend does not report a quantity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LpDiagnostics {
    pub iterations: Option<u64>,
    pub primal_feasible: Option<bool>,
    pub dual_feasible: Option<bool>,
    pub largest_primal_error: Option<f64>,
    pub largest_dual_error: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LpOutcome {
    pub status: LpStatus,
    /// Primal column values, if the backend produced any.
    pub primal: Option<Vec<f64>>,
    pub diagnostics: LpDiagnostics,
}

/// Minimal LP capability used by the bend optimizer.
pub trait LpSolver {
    fn name(&self) -> &'static str;

    /// Largest column count the backend can index.
    fn max_columns(&self) -> u64 {
        i32::MAX as u64
    }

    /// Largest number of matrix nonzeros the backend can count.
    fn max_nonzeros(&self) -> u64 {
        i32::MAX as u64
    }

    /// Minimize `objective · x` subject to the rows and bounds of `lp`.
    fn solve(&mut self, lp: &SparseLp) -> LpOutcome;
}

/// `good_lp` with the `microlp` simplex engine.
///
/// microlp runs to completion and has no iteration knob, so `max_iterations` is advisory
/// here. Primal feasibility and error are recomputed from the returned point; iteration
/// counts and dual quantities are not reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicroLpSolver;

impl LpSolver for MicroLpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&mut self, lp: &SparseLp) -> LpOutcome {
        let mut vars = ProblemVariables::new();
        let cols: Vec<Variable> = (0..lp.col_count)
            .map(|j| {
                let mut def = variable().min(lp.col_lower[j]);
                if lp.col_upper[j].is_finite() {
                    def = def.max(lp.col_upper[j]);
                }
                vars.add(def)
            })
            .collect();

        let objective: Expression = cols
            .iter()
            .zip(&lp.objective)
            .filter(|(_, c)| **c != 0.0)
            .map(|(&v, &c)| c * v)
            .sum();

        let mut rows: Vec<Vec<(Variable, f64)>> = vec![Vec::new(); lp.row_count];
        for (j, &v) in cols.iter().enumerate() {
            for (i, a) in lp.column(j) {
                rows[i].push((v, a));
            }
        }

        let mut model = vars.minimise(objective).using(microlp);
        for (terms, &rhs) in rows.iter().zip(&lp.row_rhs) {
            let lhs: Expression = terms.iter().map(|&(v, a)| a * v).sum();
            model.add_constraint(constraint!(lhs == rhs));
        }

        debug!(
            rows = lp.row_count,
            cols = lp.col_count,
            nnz = lp.nnz(),
            "microlp solve"
        );
        let (status, primal) = match model.solve() {
            Ok(solution) => {
                let x: Vec<f64> = cols.iter().map(|&v| solution.value(v)).collect();
                (LpStatus::Optimal, Some(x))
            }
            Err(ResolutionError::Infeasible) => (LpStatus::Infeasible, None),
            Err(ResolutionError::Unbounded) => (LpStatus::Unbounded, None),
            Err(other) => (LpStatus::Failed(other.to_string()), None),
        };

        let diagnostics = match &primal {
            Some(x) => {
                let err = lp.largest_primal_error(x);
                LpDiagnostics {
                    primal_feasible: Some(err <= PRIMAL_FEAS_EPS),
                    largest_primal_error: Some(err),
                    ..LpDiagnostics::default()
                }
            }
            None => LpDiagnostics {
                primal_feasible: Some(false),
                ..LpDiagnostics::default()
            },
        };
        LpOutcome {
            status,
            primal,
            diagnostics,
        }
    }
}
