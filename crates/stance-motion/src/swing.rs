//! Swing leg motion model.
//!
//! While a foot swings it follows a trajectory from its lift-off contact to
//! its landing contact, with a smooth height profile on top.
//!
//! Uses 12-point (degree-11) Bezier curves for both the horizontal
//! interpolation and the height profile. The control points are arranged to
//! guarantee zero velocity and acceleration at lift-off (t=0) and touchdown
//! (t=T).
//!
//! The whole profile is a function of the normalized time `u = t / T`, so the
//! sensitivity to the swing duration at a fixed local time is
//! `∂p/∂T = −(t/T) · v(t)`.

use std::fmt::Debug;

use nalgebra::Vector3;
use stance_core::StateLin3d;

// 12-point Bezier for horizontal interpolation (S-curve from 0 to 1).
// First 3 and last 3 control points are equal → zero velocity and acceleration
// at both endpoints.
const BEZIER_S: [f64; 12] = [
    0.0, 0.0, 0.0, // zero vel/accel at start
    0.5, 0.5, // transition
    0.5, 0.5, // midpoint plateau
    0.5, 0.5, // transition
    1.0, 1.0, 1.0, // zero vel/accel at end
];

// 12-point Bezier for height profile (peaks at u=0.5).
// First 3 and last 3 are 0 → zero height + zero vel/accel at endpoints.
const BEZIER_H: [f64; 12] = [
    0.0, 0.0, 0.0, // zero at liftoff
    0.9, 0.9, // rise
    1.0, 1.0, // peak
    0.9, 0.9, // descent
    0.0, 0.0, 0.0, // zero at touchdown
];

// bezier(&BEZIER_H, 0.5, 0); divides the profile so its peak equals lift_height.
const BEZIER_H_PEAK: f64 = 0.886_230_468_75;

/// Durations below this are treated as instantaneous (no velocity).
const MIN_DURATION: f64 = 1e-10;

/// Evaluate the `order`-th derivative of a degree-11 Bezier curve at `u`.
///
/// Each derivative takes forward differences of the control points (the
/// hodograph) scaled by the current degree; the remaining curve is then
/// evaluated with De Casteljau's algorithm.
fn bezier(points: &[f64; 12], u: f64, order: usize) -> f64 {
    let mut work = *points;
    let mut len = work.len();
    let mut scale = 1.0;
    for _ in 0..order {
        #[allow(clippy::cast_precision_loss)]
        let degree = (len - 1) as f64;
        scale *= degree;
        for i in 0..len - 1 {
            work[i] = work[i + 1] - work[i];
        }
        len -= 1;
    }
    for k in 1..len {
        for i in 0..(len - k) {
            work[i] = work[i] * (1.0 - u) + work[i + 1] * u;
        }
    }
    scale * work[0]
}

// ---------------------------------------------------------------------------
// SwingMotionModel
// ---------------------------------------------------------------------------

/// Continuous motion of a foot between two contacts.
pub trait SwingMotionModel: Clone + Debug {
    /// Model from `start` to `goal` lasting `duration`, peaking `lift_height`
    /// above the straight line.
    fn from_endpoints(
        start: Vector3<f64>,
        goal: Vector3<f64>,
        duration: f64,
        lift_height: f64,
    ) -> Self;

    fn set_endpoints(&mut self, start: Vector3<f64>, goal: Vector3<f64>);

    fn set_duration(&mut self, duration: f64);

    fn duration(&self) -> f64;

    /// Position, velocity and acceleration at local time `t_local`, clamped to
    /// `[0, duration]`.
    fn state(&self, t_local: f64) -> StateLin3d;

    /// `∂pos/∂duration` at fixed local time `t_local`.
    fn derivative_of_pos_wrt_duration(&self, t_local: f64) -> Vector3<f64>;
}

// ---------------------------------------------------------------------------
// BezierSwing
// ---------------------------------------------------------------------------

/// Bezier swing arc (S-curve ground track plus a height bump).
#[derive(Clone, Debug, PartialEq)]
pub struct BezierSwing {
    start: Vector3<f64>,
    goal: Vector3<f64>,
    duration: f64,
    lift_height: f64,
}

impl BezierSwing {
    pub const fn start(&self) -> &Vector3<f64> {
        &self.start
    }

    pub const fn goal(&self) -> &Vector3<f64> {
        &self.goal
    }

    pub const fn lift_height(&self) -> f64 {
        self.lift_height
    }

    fn normalized(&self, t_local: f64) -> f64 {
        if self.duration < MIN_DURATION {
            1.0
        } else {
            (t_local / self.duration).clamp(0.0, 1.0)
        }
    }
}

impl SwingMotionModel for BezierSwing {
    fn from_endpoints(
        start: Vector3<f64>,
        goal: Vector3<f64>,
        duration: f64,
        lift_height: f64,
    ) -> Self {
        Self {
            start,
            goal,
            duration,
            lift_height,
        }
    }

    fn set_endpoints(&mut self, start: Vector3<f64>, goal: Vector3<f64>) {
        self.start = start;
        self.goal = goal;
    }

    fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn state(&self, t_local: f64) -> StateLin3d {
        let u = self.normalized(t_local);
        let diff = self.goal - self.start;
        let lift = self.lift_height / BEZIER_H_PEAK;

        let pos = self.start + diff * bezier(&BEZIER_S, u, 0)
            + Vector3::z() * (lift * bezier(&BEZIER_H, u, 0));

        if self.duration < MIN_DURATION {
            return StateLin3d::at_rest(pos);
        }

        // du/dt = 1/T
        let inv_dur = 1.0 / self.duration;
        let vel = (diff * bezier(&BEZIER_S, u, 1)
            + Vector3::z() * (lift * bezier(&BEZIER_H, u, 1)))
            * inv_dur;
        let acc = (diff * bezier(&BEZIER_S, u, 2)
            + Vector3::z() * (lift * bezier(&BEZIER_H, u, 2)))
            * (inv_dur * inv_dur);

        StateLin3d::new(pos, vel, acc)
    }

    fn derivative_of_pos_wrt_duration(&self, t_local: f64) -> Vector3<f64> {
        let u = self.normalized(t_local);
        self.state(t_local).vel * -u
    }
}
