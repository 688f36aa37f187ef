//! Motion of one end-effector over several stance and swing phases.

use nalgebra::Vector3;
use stance_core::{
    ContactScheduleObserver, MotionConfig, MotionError, StateLin3d, VariableError,
};
use tracing::trace;

use crate::swing::{BezierSwing, SwingMotionModel};
use crate::timeline::{PhaseQuery, PhaseTimeline};

/// Default peak height of a swing above the straight start-goal line (meters).
pub const DEFAULT_LIFT_HEIGHT: f64 = 0.03;

#[derive(Clone, Debug)]
enum PhaseMotion<M> {
    /// Foot resting on `contacts[contact]`.
    Stance { contact: usize },
    /// Foot moving from `contacts[from]` to `contacts[from + 1]`.
    Swing { from: usize, model: M },
}

/// Parametrizes the motion of one end-effector swinging multiple times.
///
/// Contact positions are indexed in landing order: `contacts[0]` is the
/// initial stance, `contacts[n + 1]` is where the nth swing lands.
#[derive(Clone, Debug)]
pub struct EndEffectorMotion<M: SwingMotionModel = BezierSwing> {
    timeline: PhaseTimeline,
    contacts: Vec<Vector3<f64>>,
    motions: Vec<PhaseMotion<M>>,
    lift_height: f64,
}

impl Default for EndEffectorMotion {
    fn default() -> Self {
        Self::new(DEFAULT_LIFT_HEIGHT)
    }
}

impl<M: SwingMotionModel> EndEffectorMotion<M> {
    /// Motion starting at the origin with no phases yet.
    pub fn new(lift_height: f64) -> Self {
        Self {
            timeline: PhaseTimeline::new(),
            contacts: vec![Vector3::zeros()],
            motions: Vec::new(),
            lift_height,
        }
    }

    pub fn with_config(config: &MotionConfig) -> Self {
        Self::new(config.lift_height)
    }

    /// Fix the position of the initial stance (phase 0).
    pub fn set_initial_pos(&mut self, pos: Vector3<f64>) {
        self.contacts[0] = pos;
        self.refresh_endpoints();
    }

    /// Append a phase resting on the most recent contact.
    pub fn add_stance_phase(&mut self, duration: f64) {
        let contact = self.contacts.len() - 1;
        self.timeline.push(true, duration);
        self.motions.push(PhaseMotion::Stance { contact });
    }

    /// Append a swing from the most recent contact to `goal`.
    pub fn add_swing_phase(&mut self, duration: f64, goal: Vector3<f64>) {
        let from = self.contacts.len() - 1;
        let model = M::from_endpoints(self.contacts[from], goal, duration, self.lift_height);
        self.contacts.push(goal);
        self.timeline.push(false, duration);
        self.motions.push(PhaseMotion::Swing { from, model });
    }

    /// Overwrite where the `index`th swing lands.
    pub fn set_contact_position(
        &mut self,
        index: usize,
        pos: Vector3<f64>,
    ) -> Result<(), MotionError> {
        let count = self.contacts.len() - 1;
        let slot = self
            .contacts
            .get_mut(index + 1)
            .ok_or(MotionError::ContactOutOfRange { index, count })?;
        *slot = pos;
        self.refresh_endpoints();
        Ok(())
    }

    fn refresh_endpoints(&mut self) {
        for motion in &mut self.motions {
            if let PhaseMotion::Swing { from, model } = motion {
                model.set_endpoints(self.contacts[*from], self.contacts[*from + 1]);
            }
        }
    }

    /// Resolve a global time to a phase, see [`PhaseTimeline::phase_at`].
    pub fn phase_at(&self, t_global: f64) -> Option<PhaseQuery> {
        self.timeline.phase_at(t_global)
    }

    /// Position, velocity and acceleration at `t_global`.
    ///
    /// Times outside `[0, total_time]` clamp to the first/last phase. With no
    /// phases the foot rests on its initial position.
    pub fn state(&self, t_global: f64) -> StateLin3d {
        let Some(query) = self.phase_at(t_global) else {
            return StateLin3d::at_rest(self.contacts[0]);
        };
        match &self.motions[query.phase] {
            PhaseMotion::Stance { contact } => StateLin3d::at_rest(self.contacts[*contact]),
            PhaseMotion::Swing { model, .. } => model.state(query.local_time),
        }
    }

    /// Sensitivity of the position at `t_global` to the duration of the phase
    /// containing it, with that phase's start held fixed. Zero during stance.
    pub fn derivative_of_pos_wrt_duration(&self, t_global: f64) -> Vector3<f64> {
        match self.phase_at(t_global) {
            Some(query) => match &self.motions[query.phase] {
                PhaseMotion::Stance { .. } => Vector3::zeros(),
                PhaseMotion::Swing { model, .. } => {
                    model.derivative_of_pos_wrt_duration(query.local_time)
                }
            },
            None => Vector3::zeros(),
        }
    }

    /// Whether the foot is on the ground at `t_global`.
    pub fn is_in_contact(&self, t_global: f64) -> bool {
        self.phase_at(t_global).is_none_or(|q| q.is_contact)
    }

    /// Landing positions of all swings; the initial stance is not free.
    pub fn free_contact_positions(&self) -> Vec<Vector3<f64>> {
        self.contacts[1..].to_vec()
    }

    /// Every contact position, initial stance first.
    pub fn contact_positions(&self) -> &[Vector3<f64>] {
        &self.contacts
    }

    pub fn phase_count(&self) -> usize {
        self.timeline.len()
    }

    pub fn durations(&self) -> &[f64] {
        self.timeline.durations()
    }

    pub fn total_time(&self) -> f64 {
        self.timeline.total_time()
    }

    pub const fn timeline(&self) -> &PhaseTimeline {
        &self.timeline
    }

    pub const fn lift_height(&self) -> f64 {
        self.lift_height
    }
}

impl<M: SwingMotionModel> ContactScheduleObserver for EndEffectorMotion<M> {
    fn update_phase_durations(&mut self, durations: &[f64]) -> Result<(), VariableError> {
        self.timeline.set_durations(durations)?;
        for (motion, &duration) in self.motions.iter_mut().zip(durations) {
            if let PhaseMotion::Swing { model, .. } = motion {
                model.set_duration(duration);
            }
        }
        trace!(total = self.timeline.total_time(), "phase durations updated");
        Ok(())
    }
}
