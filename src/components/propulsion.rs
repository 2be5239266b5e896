use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{clamp01, lerp, TorqueVectorExt};

/// One thrust-producing torque generator on the craft.
///
/// The descriptor is immutable geometry; the allocator keeps its per-call
/// working state elsewhere so an engine set can be reused across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    /// Name of the engine
    #[serde(default)]
    pub name: String,
    /// Mount position relative to the CoM (m)
    pub position: Vector3<f64>,
    /// Thrust direction in body frame
    pub direction: Vector3<f64>,
    /// Torque produced per unit of thrust
    pub specific_torque: Vector3<f64>,
    /// Thrust at zero throttle
    #[serde(default)]
    pub min_thrust: f64,
    /// Thrust at full throttle
    pub max_thrust: f64,
    /// Attitude-only engine; starts inactive and ignores the vertical-speed factor
    #[serde(default)]
    pub maneuvering: bool,
    /// Engine outside automatic control, always at full output
    #[serde(default)]
    pub manual: bool,
}

impl Engine {
    pub fn new(
        position: Vector3<f64>,
        direction: Vector3<f64>,
        specific_torque: Vector3<f64>,
        min_thrust: f64,
        max_thrust: f64,
    ) -> Self {
        Self {
            name: String::new(),
            position,
            direction,
            specific_torque,
            min_thrust,
            max_thrust,
            maneuvering: false,
            manual: false,
        }
    }

    /// Builds an engine whose specific torque is `position x direction`
    /// scaled by `torque_arm`.
    pub fn from_geometry(
        position: Vector3<f64>,
        direction: Vector3<f64>,
        torque_arm: f64,
        min_thrust: f64,
        max_thrust: f64,
    ) -> Self {
        let specific_torque = position.cross(&direction) * torque_arm;
        Self::new(position, direction, specific_torque, min_thrust, max_thrust)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn maneuvering(mut self) -> Self {
        self.maneuvering = true;
        self
    }

    pub fn manual(mut self) -> Self {
        self.manual = true;
        self
    }

    /// Torque at throttle `k`. Manual engines ignore `k` and run at max thrust.
    pub fn nominal_torque(&self, k: f64) -> Vector3<f64> {
        let thrust = if self.manual {
            self.max_thrust
        } else {
            lerp(self.min_thrust, self.max_thrust, k)
        };
        self.specific_torque * thrust
    }

    /// Effective vertical-speed factor for this engine
    pub fn vsf(&self, k: f64) -> f64 {
        if self.maneuvering {
            1.0
        } else {
            k
        }
    }

    /// Leverage weight in [0, 1]. Radially mounted engines (thrust along the
    /// position vector) get the lowest weight.
    pub fn torque_ratio(&self) -> f64 {
        let alignment = match (self.position.safe_normalize(), self.direction.safe_normalize()) {
            (Some(p), Some(d)) => p.dot(&d).abs(),
            _ => 0.0,
        };
        clamp01(1.0 - alignment).powf(0.1)
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|x| x.is_finite())
            && self.direction.iter().all(|x| x.is_finite())
            && self.specific_torque.iter().all(|x| x.is_finite())
            && self.min_thrust.is_finite()
            && self.max_thrust.is_finite()
    }
}
