//! Phase durations of one end-effector as optimization variables.
//!
//! A foot with `n` phases contributes `n - 1` variables: the duration of the
//! last phase is not free but follows from the fixed total time,
//!
//! ```text
//! T_last = T_total - (T_0 + ... + T_{n-2})
//! ```
//!
//! so every accepted iterate keeps `sum(durations) == T_total`.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};
use stance_core::config::{validate_duration_bounds, validate_timings};
use stance_core::{
    Bounds, ConfigError, ContactScheduleObserver, EndeffectorId, Jacobian, ScheduleConfig,
    VariableError, VariableSet,
};
use tracing::{debug, trace, warn};

/// Name of the variable set holding the schedule of `ee`.
pub fn schedule_name(ee: EndeffectorId) -> String {
    format!("ee-schedule-{}", ee.index())
}

/// Contact schedule of one end-effector.
pub struct ContactSchedule {
    ee: EndeffectorId,
    name: String,
    durations: Vec<f64>,
    total_time: f64,
    phase_duration_bounds: Bounds,
    observers: Vec<Weak<RefCell<dyn ContactScheduleObserver>>>,
}

impl ContactSchedule {
    /// Schedule with initial `timings`, each free duration kept within
    /// `[min_duration, max_duration]`.
    ///
    /// The total time is fixed here to `sum(timings)`.
    pub fn new(
        ee: EndeffectorId,
        timings: Vec<f64>,
        min_duration: f64,
        max_duration: f64,
    ) -> Result<Self, ConfigError> {
        validate_timings(&timings)?;
        validate_duration_bounds(min_duration, max_duration)?;

        let total_time = timings.iter().sum();
        debug!(%ee, phases = timings.len(), total_time, "contact schedule created");
        Ok(Self {
            ee,
            name: schedule_name(ee),
            durations: timings,
            total_time,
            phase_duration_bounds: Bounds::new(min_duration, max_duration),
            observers: Vec::new(),
        })
    }

    pub fn from_config(
        ee: EndeffectorId,
        timings: Vec<f64>,
        config: &ScheduleConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(ee, timings, config.min_duration, config.max_duration)
    }

    /// Register `observer` to be told about every accepted duration update.
    ///
    /// Only a weak reference is kept; observers dropped by their owner are
    /// skipped.
    pub fn add_observer<O: ContactScheduleObserver + 'static>(
        &mut self,
        observer: &Rc<RefCell<O>>,
    ) {
        let weak: Weak<RefCell<O>> = Rc::downgrade(observer);
        self.observers.push(weak);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Push the current durations to every live observer.
    ///
    /// On failure returns the index of the refusing observer; the ones before
    /// it have already been updated.
    fn update_observers(&self) -> Result<(), (usize, VariableError)> {
        for (i, observer) in self.observers.iter().enumerate() {
            match observer.upgrade() {
                Some(o) => o
                    .borrow_mut()
                    .update_phase_durations(&self.durations)
                    .map_err(|err| (i, err))?,
                None => trace!(ee = %self.ee, observer = i, "skipping dropped observer"),
            }
        }
        Ok(())
    }

    /// Hand the restored durations back to the first `count` observers.
    fn revert_observers(&self, count: usize) {
        for observer in self.observers[..count].iter().filter_map(Weak::upgrade) {
            if let Err(err) = observer.borrow_mut().update_phase_durations(&self.durations) {
                warn!(ee = %self.ee, %err, "observer refused restored durations");
            }
        }
    }

    pub const fn endeffector(&self) -> EndeffectorId {
        self.ee
    }

    /// All phase durations, derived last phase included.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub const fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn phase_count(&self) -> usize {
        self.durations.len()
    }

    /// Jacobian of a position-like quantity w.r.t. every free duration.
    ///
    /// The quantity is evaluated at a time inside `current_phase`; `dx_dt` is
    /// its derivative w.r.t. that phase's own duration (phase start held
    /// fixed) and `xd` its velocity.
    ///
    /// - The current phase's column is `dx_dt`: its duration stretches the
    ///   local motion. The last phase has no column.
    /// - Every earlier column is `-xd`: a longer earlier phase shifts the
    ///   motion later in time.
    /// - In the last phase every earlier column also gets `-dx_dt`, since the
    ///   fixed total time shortens the last phase by the same amount.
    ///
    /// Every entry of the `xd.len() x rows()` block is stored, zeros included,
    /// so the sparsity pattern stays the same while the query time moves
    /// between phases over the iterations.
    pub fn jacobian_of_pos(
        &self,
        current_phase: usize,
        dx_dt: &DVector<f64>,
        xd: &DVector<f64>,
    ) -> Result<Jacobian, VariableError> {
        let phases = self.phase_count();
        if current_phase >= phases {
            return Err(VariableError::PhaseOutOfRange {
                phase: current_phase,
                phases,
            });
        }
        if dx_dt.len() != xd.len() {
            return Err(VariableError::DimensionMismatch {
                expected: xd.len(),
                got: dx_dt.len(),
            });
        }

        let n_dim = xd.len();
        let mut jac = DMatrix::zeros(n_dim, self.rows());
        let in_last_phase = current_phase == phases - 1;

        if !in_last_phase {
            jac.set_column(current_phase, dx_dt);
        }

        for phase in 0..current_phase {
            let mut col = -xd;
            if in_last_phase {
                col -= dx_dt;
            }
            jac.set_column(phase, &col);
        }

        Ok(dense_to_csc(&jac))
    }
}

/// Convert to CSC keeping every entry, explicit zeros included.
fn dense_to_csc(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let (nrows, ncols) = m.shape();
    let mut coo = CooMatrix::new(nrows, ncols);
    for j in 0..ncols {
        for i in 0..nrows {
            coo.push(i, j, m[(i, j)]);
        }
    }
    CscMatrix::from(&coo)
}

impl VariableSet for ContactSchedule {
    fn name(&self) -> &str {
        &self.name
    }

    /// The last phase duration is not optimized over but comes from the total time.
    fn rows(&self) -> usize {
        self.durations.len() - 1
    }

    fn values(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.durations[..self.rows()])
    }

    fn set_variables(&mut self, x: &DVector<f64>) -> Result<(), VariableError> {
        let rows = self.rows();
        if x.len() != rows {
            return Err(VariableError::DimensionMismatch {
                expected: rows,
                got: x.len(),
            });
        }

        let last = self.total_time - x.sum();
        if !(last > 0.0 && last.is_finite()) {
            warn!(ee = %self.ee, last, total = self.total_time, "rejected iterate: last phase duration not positive");
            return Err(VariableError::NonPositiveLastDuration {
                duration: last,
                total: self.total_time,
            });
        }

        let previous = self.durations.clone();
        self.durations[..rows].copy_from_slice(x.as_slice());
        self.durations[rows] = last;

        if let Err((failed, err)) = self.update_observers() {
            warn!(ee = %self.ee, observer = failed, %err, "rejected iterate: observer refused durations");
            self.durations = previous;
            self.revert_observers(failed);
            return Err(err);
        }
        trace!(ee = %self.ee, durations = ?self.durations, "durations updated");
        Ok(())
    }

    fn bounds(&self) -> Vec<Bounds> {
        vec![self.phase_duration_bounds; self.rows()]
    }
}

impl fmt::Debug for ContactSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactSchedule")
            .field("ee", &self.ee)
            .field("durations", &self.durations)
            .field("total_time", &self.total_time)
            .field("bounds", &self.phase_duration_bounds)
            .field("observers", &self.observers.len())
            .finish()
    }
}
