//! Pipeline configuration and fixed constants.
//!
//! Policy
//! - Defaults are fixed constants; callers override them through [`OrthoCfg`]
//!   (the CLI maps its flags onto it).

/// Iteration budget handed to the LP backend.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000;
/// Largest accepted distance between an LP bend difference and its rounded value.
pub const INTEGRALITY_EPS: f64 = 1e-6;
/// Residual tolerance used when deriving primal feasibility from a solution.
pub(crate) const PRIMAL_FEAS_EPS: f64 = 1e-7;
/// Right-hand side of the winding condition for interior faces (quarter turns).
pub const INTERIOR_ROTATION: i64 = 4;
/// Right-hand side of the winding condition for exterior faces (quarter turns).
pub const EXTERIOR_ROTATION: i64 = -4;

/// Layout configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoCfg {
    /// Face to draw as the unbounded region; `None` picks a largest face.
    pub exterior_face: Option<usize>,
    pub max_iterations: u64,
    pub integrality_eps: f64,
}

impl Default for OrthoCfg {
    fn default() -> Self {
        Self {
            exterior_face: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            integrality_eps: INTEGRALITY_EPS,
        }
    }
}
