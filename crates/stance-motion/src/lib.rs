//! Stance/swing phase timing and end-effector motion for legged robots.
//!
//! Each end-effector moves through an ordered sequence of phases:
//!
//! 1. **Phase Timeline** — `(is_contact, duration)` list with cumulative end times
//! 2. **Swing Motion Model** — smooth Bezier arc between two contacts, with its
//!    analytic sensitivity to the swing duration
//! 3. **End-Effector Motion** — resolves a global time to a phase and evaluates
//!    position, velocity and acceleration there
//!
//! [`EndEffectorMotion`] observes its contact schedule: whenever the optimizer
//! changes phase durations it rewrites its timeline and rescales its swings.

pub mod ee_motion;
pub mod endeffectors_motion;
pub mod swing;
pub mod timeline;

pub use ee_motion::{DEFAULT_LIFT_HEIGHT, EndEffectorMotion};
pub use endeffectors_motion::{EndeffectorsMotion, SharedMotion};
pub use swing::{BezierSwing, SwingMotionModel};
pub use timeline::{PhaseQuery, PhaseTimeline};
