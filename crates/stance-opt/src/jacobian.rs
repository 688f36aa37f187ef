//! Chain rule between an end-effector's motion and its contact schedule.

use nalgebra::{DVector, Vector3};
use stance_core::{Jacobian, VariableError};
use stance_motion::{EndEffectorMotion, SwingMotionModel};

use crate::schedule::ContactSchedule;

fn to_dvector(v: &Vector3<f64>) -> DVector<f64> {
    DVector::from_column_slice(v.as_slice())
}

/// Jacobian (3 x free durations) of the foot position at `t_global` w.r.t.
/// the schedule driving `motion`.
///
/// Looks up the phase containing `t_global`, takes the motion's velocity and
/// duration sensitivity there, and hands both to
/// [`ContactSchedule::jacobian_of_pos`].
pub fn pos_jacobian_wrt_durations<M: SwingMotionModel>(
    motion: &EndEffectorMotion<M>,
    schedule: &ContactSchedule,
    t_global: f64,
) -> Result<Jacobian, VariableError> {
    if motion.phase_count() != schedule.phase_count() {
        return Err(VariableError::DimensionMismatch {
            expected: schedule.phase_count(),
            got: motion.phase_count(),
        });
    }
    let Some(query) = motion.phase_at(t_global) else {
        return Err(VariableError::PhaseOutOfRange {
            phase: 0,
            phases: 0,
        });
    };

    let xd = motion.state(t_global).vel;
    let dx_dt = motion.derivative_of_pos_wrt_duration(t_global);
    schedule.jacobian_of_pos(query.phase, &to_dvector(&dx_dt), &to_dvector(&xd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use stance_core::EndeffectorId;
    use stance_test_utils::single_step_motion;

    fn dense(jac: &Jacobian) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(jac.nrows(), jac.ncols());
        for (i, j, v) in jac.triplet_iter() {
            m[(i, j)] += *v;
        }
        m
    }

    fn schedule_for(motion: &EndEffectorMotion) -> ContactSchedule {
        ContactSchedule::new(EndeffectorId::E0, motion.durations().to_vec(), 0.1, 0.6).unwrap()
    }

    #[test]
    fn stance_before_swing_has_zero_sensitivity() {
        let motion = single_step_motion();
        let schedule = schedule_for(&motion);
        let jac = dense(&pos_jacobian_wrt_durations(&motion, &schedule, 0.1).unwrap());
        assert_eq!(jac.shape(), (3, 2));
        assert_relative_eq!(jac.norm(), 0.0);
    }

    #[test]
    fn swing_sensitivity_uses_velocity_and_stretch() {
        let motion = single_step_motion();
        let schedule = schedule_for(&motion);
        let t = 0.45;
        let jac = dense(&pos_jacobian_wrt_durations(&motion, &schedule, t).unwrap());

        let v = motion.state(t).vel;
        let stretch = motion.derivative_of_pos_wrt_duration(t);
        assert_relative_eq!(jac.column(0).into_owned(), to_dvector(&-v), epsilon = 1e-12);
        assert_relative_eq!(jac.column(1).into_owned(), to_dvector(&stretch), epsilon = 1e-12);
    }

    #[test]
    fn all_entries_structurally_present() {
        let motion = single_step_motion();
        let schedule = schedule_for(&motion);
        for t in [0.0, 0.1, 0.5, 0.9, 2.0] {
            let jac = pos_jacobian_wrt_durations(&motion, &schedule, t).unwrap();
            assert_eq!(jac.nnz(), 6, "t = {t}");
        }
    }

    #[test]
    fn mismatched_phase_count_rejected() {
        let motion = single_step_motion();
        let schedule =
            ContactSchedule::new(EndeffectorId::E0, vec![0.5, 0.5], 0.1, 0.6).unwrap();
        assert!(matches!(
            pos_jacobian_wrt_durations(&motion, &schedule, 0.2),
            Err(VariableError::DimensionMismatch { .. })
        ));
    }
}
