use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;
use serde::{Deserialize, Serialize};

use crate::error::VariableError;

/// Sparse derivative of a constraint (rows) w.r.t. one variable set (columns).
pub type Jacobian = CscMatrix<f64>;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Closed interval `[lower, upper]` for one variable or constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const NO_BOUND: Self = Self {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };

    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Both sides fixed to `value`.
    pub const fn equality(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

// ---------------------------------------------------------------------------
// VariableSet
// ---------------------------------------------------------------------------

/// A named block of decision variables handed to the NLP solver.
///
/// The solver drives a strict request/response cycle: it writes a candidate
/// with [`set_variables`](Self::set_variables), then reads values, bounds and
/// Jacobians of everything depending on it.
pub trait VariableSet {
    /// Unique name, used to look up Jacobian blocks.
    fn name(&self) -> &str;

    /// Number of independent scalar variables.
    fn rows(&self) -> usize;

    /// Current values, `rows()` long.
    fn values(&self) -> DVector<f64>;

    /// Take a new iterate from the solver.
    ///
    /// An `Err` means the iterate was rejected and the set is unchanged.
    fn set_variables(&mut self, x: &DVector<f64>) -> Result<(), VariableError>;

    /// One interval per variable.
    fn bounds(&self) -> Vec<Bounds>;
}

// ---------------------------------------------------------------------------
// Constraint
// ---------------------------------------------------------------------------

/// A vector-valued constraint `g(x)` with per-row bounds.
pub trait Constraint {
    fn name(&self) -> &str;

    /// Number of constraint rows.
    fn rows(&self) -> usize;

    /// `g(x)` evaluated at the current variables.
    fn values(&self) -> DVector<f64>;

    /// One interval per row.
    fn bounds(&self) -> Vec<Bounds>;

    /// Derivative w.r.t. the variable set called `var_set`, or `None` if the
    /// constraint does not depend on it.
    fn jacobian_block(&self, var_set: &str) -> Option<Jacobian>;
}

// ---------------------------------------------------------------------------
// ContactScheduleObserver
// ---------------------------------------------------------------------------

/// Anything caching state derived from phase boundaries.
///
/// Notified synchronously, in registration order, each time a contact
/// schedule accepts new durations.
pub trait ContactScheduleObserver {
    /// Re-derive phase boundaries from the full duration list (derived last
    /// phase included).
    fn update_phase_durations(&mut self, durations: &[f64]) -> Result<(), VariableError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_contains_is_inclusive() {
        let b = Bounds::new(0.1, 0.6);
        assert!(b.contains(0.1));
        assert!(b.contains(0.6));
        assert!(!b.contains(0.61));
        assert!(!b.contains(0.0));
    }

    #[test]
    fn equality_bounds() {
        let b = Bounds::equality(0.25);
        assert!(b.contains(0.25));
        assert!(!b.contains(0.2500001));
    }

    #[test]
    fn no_bound_contains_everything() {
        assert!(Bounds::NO_BOUND.contains(-1e300));
        assert!(Bounds::NO_BOUND.contains(1e300));
    }
}
