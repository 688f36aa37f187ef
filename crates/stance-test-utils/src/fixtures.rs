//! Reusable motions, timings and configs.

use nalgebra::Vector3;
use stance_core::{FootConfig, MotionConfig, PhaseConfig, ProblemConfig, ScheduleConfig};
use stance_motion::EndEffectorMotion;

/// stance 0.3 | swing 0.4 | stance 0.3
pub fn three_phase_timings() -> Vec<f64> {
    vec![0.3, 0.4, 0.3]
}

/// One foot starting at `(0, 0.1, 0)`, stepping to `(0.2, 0.1, 0)` during
/// `[0.3, 0.7)` and resting there until `t = 1.0`.
pub fn single_step_motion() -> EndEffectorMotion {
    let mut m: EndEffectorMotion = EndEffectorMotion::default();
    m.set_initial_pos(Vector3::new(0.0, 0.1, 0.0));
    m.add_stance_phase(0.3);
    m.add_swing_phase(0.4, Vector3::new(0.2, 0.1, 0.0));
    m.add_stance_phase(0.3);
    m
}

/// Two steps with the second swing ending the motion:
/// stance 0.2 | swing 0.3 | stance 0.2 | swing 0.3.
pub fn two_step_motion() -> EndEffectorMotion {
    let mut m: EndEffectorMotion = EndEffectorMotion::default();
    m.set_initial_pos(Vector3::new(0.0, -0.1, 0.0));
    m.add_stance_phase(0.2);
    m.add_swing_phase(0.3, Vector3::new(0.15, -0.1, 0.0));
    m.add_stance_phase(0.2);
    m.add_swing_phase(0.3, Vector3::new(0.3, -0.05, 0.02));
    m
}

/// Biped where the left foot takes one step and the right one stands still.
pub fn biped_step_config() -> ProblemConfig {
    ProblemConfig {
        schedule: ScheduleConfig {
            min_duration: 0.1,
            max_duration: 0.6,
        },
        motion: MotionConfig::default(),
        feet: vec![
            FootConfig {
                initial_position: [0.0, 0.1, 0.0],
                phases: vec![
                    PhaseConfig::stance(0.3),
                    PhaseConfig::swing(0.4, [0.2, 0.1, 0.0]),
                    PhaseConfig::stance(0.3),
                ],
            },
            FootConfig {
                initial_position: [0.0, -0.1, 0.0],
                phases: vec![PhaseConfig::stance(1.0)],
            },
        ],
    }
}
