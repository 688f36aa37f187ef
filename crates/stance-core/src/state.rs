use nalgebra::Vector3;

/// Position, velocity and acceleration of a point in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateLin3d {
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    pub acc: Vector3<f64>,
}

impl StateLin3d {
    pub const fn new(pos: Vector3<f64>, vel: Vector3<f64>, acc: Vector3<f64>) -> Self {
        Self { pos, vel, acc }
    }

    /// A point resting at `pos`.
    pub fn at_rest(pos: Vector3<f64>) -> Self {
        Self {
            pos,
            vel: Vector3::zeros(),
            acc: Vector3::zeros(),
        }
    }
}

impl Default for StateLin3d {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros())
    }
}
