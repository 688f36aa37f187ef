//! Motions of all end-effectors of one robot.

use std::cell::RefCell;
use std::rc::Rc;

use nalgebra::Vector3;
use stance_core::{
    EndeffectorId, Endeffectors, EndeffectorsBool, EndeffectorsPos, StateLin3d,
};

use crate::ee_motion::EndEffectorMotion;

/// One foot's motion, shared with the contact schedule that observes it.
pub type SharedMotion = Rc<RefCell<EndEffectorMotion>>;

/// Per-foot motions, ordered E0 -> EN.
#[derive(Clone, Debug, Default)]
pub struct EndeffectorsMotion {
    motions: Endeffectors<SharedMotion>,
}

impl EndeffectorsMotion {
    /// Wrap already built motions. Returns `None` for more than six.
    pub fn new(motions: Vec<EndEffectorMotion>) -> Option<Self> {
        let shared = motions.into_iter().map(|m| Rc::new(RefCell::new(m))).collect();
        Endeffectors::from_vec(shared).map(|motions| Self { motions })
    }

    pub fn count(&self) -> usize {
        self.motions.count()
    }

    pub fn ees_ordered(&self) -> Vec<EndeffectorId> {
        self.motions.ees_ordered()
    }

    /// Shared handle to one foot's motion.
    pub fn motion(&self, ee: EndeffectorId) -> &SharedMotion {
        self.motions.at(ee)
    }

    /// State of every foot at `t_global`.
    pub fn states(&self, t_global: f64) -> Endeffectors<StateLin3d> {
        self.motions.map(|m| m.borrow().state(t_global))
    }

    /// Position of every foot at `t_global`.
    pub fn positions(&self, t_global: f64) -> EndeffectorsPos {
        self.motions.map(|m| m.borrow().state(t_global).pos)
    }

    /// Contact flag of every foot at `t_global`.
    pub fn contacts(&self, t_global: f64) -> EndeffectorsBool {
        self.motions.map(|m| m.borrow().is_in_contact(t_global))
    }

    /// Free landing positions of every foot.
    pub fn free_contact_positions(&self) -> Endeffectors<Vec<Vector3<f64>>> {
        self.motions.map(|m| m.borrow().free_contact_positions())
    }

    /// Longest total time over all feet.
    pub fn total_time(&self) -> f64 {
        self.motions
            .values()
            .iter()
            .map(|m| m.borrow().total_time())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn biped() -> EndeffectorsMotion {
        let mut left: EndEffectorMotion = EndEffectorMotion::default();
        left.set_initial_pos(Vector3::new(0.0, 0.1, 0.0));
        left.add_stance_phase(0.3);
        left.add_swing_phase(0.4, Vector3::new(0.2, 0.1, 0.0));
        left.add_stance_phase(0.3);

        let mut right: EndEffectorMotion = EndEffectorMotion::default();
        right.set_initial_pos(Vector3::new(0.0, -0.1, 0.0));
        right.add_stance_phase(1.0);

        EndeffectorsMotion::new(vec![left, right]).unwrap()
    }

    #[test]
    fn contacts_per_foot() {
        let feet = biped();
        assert_eq!(feet.count(), 2);
        assert_eq!(feet.contacts(0.1).values(), &[true, true]);
        assert_eq!(feet.contacts(0.5).values(), &[false, true]);
        assert_eq!(feet.contacts(0.5).true_count(), 1);
    }

    #[test]
    fn positions_per_foot() {
        let feet = biped();
        let pos = feet.positions(1.0);
        assert_relative_eq!(pos[EndeffectorId::E0], Vector3::new(0.2, 0.1, 0.0));
        assert_relative_eq!(pos[EndeffectorId::E1], Vector3::new(0.0, -0.1, 0.0));
        let states = feet.states(0.5);
        assert!(states[EndeffectorId::E0].vel.norm() > 0.0);
        assert_relative_eq!(states[EndeffectorId::E1].vel.norm(), 0.0);
    }

    #[test]
    fn free_contacts_per_foot() {
        let feet = biped();
        let free = feet.free_contact_positions();
        assert_eq!(free[EndeffectorId::E0].len(), 1);
        assert!(free[EndeffectorId::E1].is_empty());
    }

    #[test]
    fn shared_handle_sees_updates() {
        let feet = biped();
        feet.motion(EndeffectorId::E0)
            .borrow_mut()
            .set_contact_position(0, Vector3::new(0.4, 0.1, 0.0))
            .unwrap();
        assert_relative_eq!(feet.positions(1.0)[EndeffectorId::E0].x, 0.4);
        assert_relative_eq!(feet.total_time(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn more_than_six_feet_rejected() {
        let motions = vec![EndEffectorMotion::default(); 7];
        assert!(EndeffectorsMotion::new(motions).is_none());
    }
}
