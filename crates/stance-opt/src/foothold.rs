//! Constraint pinning every foot to a nominal position at one time instant.
//!
//! The foot positions depend on the contact schedules through the phase
//! timing, so the constraint exposes one Jacobian block per schedule.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use stance_core::{
    Bounds, ConfigError, Constraint, Endeffectors, EndeffectorsPos, Jacobian, VariableSet,
};
use stance_motion::EndeffectorsMotion;
use tracing::warn;

use crate::jacobian::pos_jacobian_wrt_durations;
use crate::schedule::ContactSchedule;

/// One foot's schedule, shared with the variable composite handed to the solver.
pub type SharedSchedule = Rc<RefCell<ContactSchedule>>;

/// `pos_ee(t) == nominal_ee` for every end-effector.
#[derive(Debug)]
pub struct FootholdConstraint {
    motions: EndeffectorsMotion,
    schedules: Endeffectors<SharedSchedule>,
    nominal: EndeffectorsPos,
    t: f64,
}

impl FootholdConstraint {
    pub fn new(
        motions: EndeffectorsMotion,
        schedules: Endeffectors<SharedSchedule>,
        nominal: EndeffectorsPos,
        t: f64,
    ) -> Result<Self, ConfigError> {
        let n = motions.count();
        if schedules.count() != n || nominal.count() != n {
            return Err(ConfigError::InvalidValue {
                field: "nominal".into(),
                message: format!(
                    "{n} motions but {} schedules and {} nominal positions",
                    schedules.count(),
                    nominal.count()
                ),
            });
        }
        for (ee, schedule) in schedules.iter() {
            let phases = schedule.borrow().phase_count();
            let motion_phases = motions.motion(ee).borrow().phase_count();
            if phases != motion_phases {
                return Err(ConfigError::InvalidValue {
                    field: "schedules".into(),
                    message: format!(
                        "{ee}: schedule has {phases} phases but motion has {motion_phases}"
                    ),
                });
            }
        }
        Ok(Self {
            motions,
            schedules,
            nominal,
            t,
        })
    }

    pub const fn time(&self) -> f64 {
        self.t
    }
}

impl Constraint for FootholdConstraint {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "foothold"
    }

    fn rows(&self) -> usize {
        3 * self.motions.count()
    }

    fn values(&self) -> DVector<f64> {
        let positions = self.motions.positions(self.t);
        DVector::from_iterator(
            self.rows(),
            positions.values().iter().flat_map(|p| p.iter().copied()),
        )
    }

    fn bounds(&self) -> Vec<Bounds> {
        self.nominal
            .values()
            .iter()
            .flat_map(|p| p.iter().map(|&v| Bounds::equality(v)))
            .collect()
    }

    fn jacobian_block(&self, var_set: &str) -> Option<Jacobian> {
        let (ee, schedule) = self
            .schedules
            .iter()
            .find(|(_, s)| s.borrow().name() == var_set)?;
        let schedule = schedule.borrow();

        let block = match pos_jacobian_wrt_durations(
            &self.motions.motion(ee).borrow(),
            &schedule,
            self.t,
        ) {
            Ok(block) => block,
            Err(err) => {
                warn!(%ee, %err, "foothold jacobian unavailable");
                return None;
            }
        };

        // Rows of the other feet do not depend on this schedule.
        let row_offset = 3 * ee.index();
        let mut coo = CooMatrix::new(self.rows(), schedule.rows());
        for (i, j, v) in block.triplet_iter() {
            coo.push(row_offset + i, j, *v);
        }
        Some(CscMatrix::from(&coo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use stance_core::EndeffectorId;
    use stance_motion::EndEffectorMotion;
    use stance_test_utils::single_step_motion;

    fn setup(t: f64) -> (FootholdConstraint, SharedSchedule) {
        let left = single_step_motion();
        let mut right: EndEffectorMotion = EndEffectorMotion::default();
        right.set_initial_pos(Vector3::new(0.0, -0.1, 0.0));
        right.add_stance_phase(0.5);
        right.add_swing_phase(0.5, Vector3::new(0.1, -0.1, 0.0));

        let s0 = Rc::new(RefCell::new(
            ContactSchedule::new(EndeffectorId::E0, left.durations().to_vec(), 0.1, 0.6).unwrap(),
        ));
        let s1 = Rc::new(RefCell::new(
            ContactSchedule::new(EndeffectorId::E1, right.durations().to_vec(), 0.1, 0.6)
                .unwrap(),
        ));
        let motions = EndeffectorsMotion::new(vec![left, right]).unwrap();
        s0.borrow_mut().add_observer(motions.motion(EndeffectorId::E0));
        s1.borrow_mut().add_observer(motions.motion(EndeffectorId::E1));

        let nominal = Endeffectors::from_vec(vec![
            Vector3::new(0.2, 0.1, 0.0),
            Vector3::new(0.1, -0.1, 0.0),
        ])
        .unwrap();
        let schedules = Endeffectors::from_vec(vec![s0.clone(), s1]).unwrap();
        (FootholdConstraint::new(motions, schedules, nominal, t).unwrap(), s0)
    }

    #[test]
    fn values_stack_positions() {
        let (c, _) = setup(1.0);
        assert_eq!(c.rows(), 6);
        let v = c.values();
        assert_relative_eq!(v[0], 0.2, epsilon = 1e-10);
        assert_relative_eq!(v[1], 0.1, epsilon = 1e-10);
        assert_relative_eq!(v[3], 0.1, epsilon = 1e-10);
        assert_relative_eq!(v[4], -0.1, epsilon = 1e-10);
        assert_relative_eq!(c.time(), 1.0);
    }

    #[test]
    fn bounds_pin_nominal() {
        let (c, _) = setup(1.0);
        let b = c.bounds();
        assert_eq!(b.len(), 6);
        assert_eq!(b[0], Bounds::equality(0.2));
        assert_eq!(b[4], Bounds::equality(-0.1));
    }

    #[test]
    fn jacobian_block_only_fills_own_rows() {
        let (c, _) = setup(0.5);
        let jac = c.jacobian_block("ee-schedule-0").unwrap();
        assert_eq!(jac.nrows(), 6);
        assert_eq!(jac.ncols(), 2);
        assert_eq!(jac.nnz(), 6);
        assert!(jac.triplet_iter().all(|(i, _, _)| i < 3));

        let other = c.jacobian_block("ee-schedule-1").unwrap();
        assert_eq!(other.ncols(), 1);
        assert!(other.triplet_iter().all(|(i, _, _)| (3..6).contains(&i)));
    }

    #[test]
    fn unknown_set_has_no_block() {
        let (c, _) = setup(0.5);
        assert!(c.jacobian_block("base-lin").is_none());
    }

    #[test]
    fn constraint_sees_schedule_updates() {
        let (c, s0) = setup(0.25);
        assert_relative_eq!(c.values()[2], 0.0); // still in stance
        s0.borrow_mut()
            .set_variables(&DVector::from_vec(vec![0.1, 0.3]))
            .unwrap();
        // 0.25 is now in the middle of the swing
        assert_relative_eq!(c.values()[2], 0.03, epsilon = 1e-10);
    }

    #[test]
    fn schedule_motion_phase_mismatch_rejected() {
        let (c, _) = setup(0.5);
        let short = Rc::new(RefCell::new(
            ContactSchedule::new(EndeffectorId::E0, vec![0.5, 0.5], 0.1, 0.6).unwrap(),
        ));
        let schedules =
            Endeffectors::from_vec(vec![short, c.schedules[EndeffectorId::E1].clone()]).unwrap();
        let err = FootholdConstraint::new(c.motions.clone(), schedules, c.nominal.clone(), 0.5)
            .unwrap_err();
        assert!(err.to_string().contains("E0"));
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn mismatched_counts_rejected() {
        let (c, _) = setup(0.5);
        let nominal = Endeffectors::from_vec(vec![Vector3::zeros()]).unwrap();
        let err = FootholdConstraint::new(c.motions.clone(), c.schedules.clone(), nominal, 0.5)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
