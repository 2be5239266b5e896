use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Per-axis torque envelope of an engine set.
///
/// Non-negative contributions accumulate into `positive`, negative ones into
/// `negative`, axis by axis. The result bounds what any throttle combination
/// of those engines can produce on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TorqueClamp {
    pub positive: Vector3<f64>,
    pub negative: Vector3<f64>,
}

impl TorqueClamp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, torque: &Vector3<f64>) {
        for axis in 0..3 {
            let d = torque[axis];
            if d >= 0.0 {
                self.positive[axis] += d;
            } else {
                self.negative[axis] += d;
            }
        }
    }

    pub fn from_torques<'a>(torques: impl IntoIterator<Item = &'a Vector3<f64>>) -> Self {
        let mut clamp = Self::new();
        torques.into_iter().for_each(|t| clamp.add(t));
        clamp
    }

    /// Caps each axis of `target` at the envelope on the matching side.
    pub fn clamp(&self, target: &Vector3<f64>) -> Vector3<f64> {
        let mut clamped = Vector3::zeros();
        for axis in 0..3 {
            let d = target[axis];
            clamped[axis] = if d >= 0.0 {
                d.min(self.positive[axis])
            } else {
                d.max(self.negative[axis])
            };
        }
        clamped
    }
}
