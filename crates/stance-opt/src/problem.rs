//! Assembly of the contact-timing problem from a [`ProblemConfig`].

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::{DVector, Vector3};
use stance_core::{
    Bounds, ConfigError, EndeffectorId, Endeffectors, EndeffectorsPos, FootConfig, Jacobian,
    MotionConfig, ProblemConfig, VariableComposite, VariableError, VariableSet,
};
use stance_motion::{EndEffectorMotion, EndeffectorsMotion};
use tracing::info;

use crate::foothold::{FootholdConstraint, SharedSchedule};
use crate::jacobian::pos_jacobian_wrt_durations;
use crate::schedule::ContactSchedule;

/// Name of the composite stacking every foot's schedule.
pub const SCHEDULES_NAME: &str = "contact-schedules";

/// Per-foot motions, their schedules, and the stacked duration variables.
///
/// Every motion is registered as an observer of its own schedule, so setting
/// the stacked variables moves the foot trajectories along.
#[derive(Debug)]
pub struct MotionProblem {
    motions: EndeffectorsMotion,
    schedules: Endeffectors<SharedSchedule>,
    variables: VariableComposite,
}

impl MotionProblem {
    /// Validate `config` and build one motion and one schedule per foot.
    pub fn from_config(config: &ProblemConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut motions = Vec::with_capacity(config.feet.len());
        let mut schedules = Vec::with_capacity(config.feet.len());
        for (i, foot) in config.feet.iter().enumerate() {
            let ee = EndeffectorId::from_index(i).ok_or_else(|| ConfigError::InvalidValue {
                field: "feet".into(),
                message: format!("no end-effector id for foot {i}"),
            })?;
            motions.push(build_motion(i, foot, &config.motion)?);
            schedules.push(Rc::new(RefCell::new(ContactSchedule::from_config(
                ee,
                foot.timings(),
                &config.schedule,
            )?)));
        }

        let motions = EndeffectorsMotion::new(motions)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "feet".into(),
                message: "too many feet".into(),
            })?;
        let schedules = Endeffectors::from_vec(schedules).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "feet".into(),
                message: "too many feet".into(),
            }
        })?;

        let mut variables = VariableComposite::new(SCHEDULES_NAME);
        for (ee, schedule) in schedules.iter() {
            schedule.borrow_mut().add_observer(motions.motion(ee));
            variables.add_set(schedule.clone());
        }

        info!(
            feet = motions.count(),
            variables = variables.rows(),
            "motion problem assembled"
        );
        Ok(Self {
            motions,
            schedules,
            variables,
        })
    }

    pub const fn motions(&self) -> &EndeffectorsMotion {
        &self.motions
    }

    pub fn schedule(&self, ee: EndeffectorId) -> &SharedSchedule {
        self.schedules.at(ee)
    }

    pub const fn schedules(&self) -> &Endeffectors<SharedSchedule> {
        &self.schedules
    }

    /// All schedules stacked E0 -> EN.
    pub const fn variables(&self) -> &VariableComposite {
        &self.variables
    }

    pub fn values(&self) -> DVector<f64> {
        self.variables.values()
    }

    pub fn bounds(&self) -> Vec<Bounds> {
        self.variables.bounds()
    }

    /// Apply a new iterate to every schedule; the motions follow.
    pub fn set_variables(&mut self, x: &DVector<f64>) -> Result<(), VariableError> {
        self.variables.set_variables(x)
    }

    /// Position Jacobian of foot `ee` at `t_global` w.r.t. its own schedule.
    pub fn pos_jacobian(
        &self,
        ee: EndeffectorId,
        t_global: f64,
    ) -> Result<Jacobian, VariableError> {
        pos_jacobian_wrt_durations(
            &self.motions.motion(ee).borrow(),
            &self.schedule(ee).borrow(),
            t_global,
        )
    }

    /// Constraint pinning every foot to `nominal` at `t`.
    pub fn foothold_constraint(
        &self,
        nominal: EndeffectorsPos,
        t: f64,
    ) -> Result<FootholdConstraint, ConfigError> {
        FootholdConstraint::new(self.motions.clone(), self.schedules.clone(), nominal, t)
    }
}

fn build_motion(
    foot_index: usize,
    foot: &FootConfig,
    config: &MotionConfig,
) -> Result<EndEffectorMotion, ConfigError> {
    let mut motion: EndEffectorMotion = EndEffectorMotion::with_config(config);
    motion.set_initial_pos(Vector3::from(foot.initial_position));
    for (i, phase) in foot.phases.iter().enumerate() {
        match (phase.contact, phase.goal) {
            (true, _) => motion.add_stance_phase(phase.duration),
            (false, Some(goal)) => motion.add_swing_phase(phase.duration, Vector3::from(goal)),
            (false, None) => {
                return Err(ConfigError::PhaseOrder {
                    foot: foot_index,
                    message: format!("swing phase {i} has no goal"),
                });
            }
        }
    }
    Ok(motion)
}
