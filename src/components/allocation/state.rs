use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Working state of one engine during an allocation call.
///
/// Stored index-aligned with the engine slice and reset at the start of
/// every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineScratch {
    /// Throttle-limit fraction [0-1]
    pub limit: f64,
    /// Proposed adjustment for the current pass
    pub limit_tmp: f64,
    /// Limit at the best iteration seen so far
    pub best_limit: f64,
    /// Leverage weight [0-1]
    pub torque_ratio: f64,
    /// Torque at full limit and the call's vertical-speed factor
    pub current_torque: Vector3<f64>,
}

impl Default for EngineScratch {
    fn default() -> Self {
        Self {
            limit: 1.0,
            limit_tmp: 1.0,
            best_limit: 1.0,
            torque_ratio: 1.0,
            current_torque: Vector3::zeros(),
        }
    }
}

/// Why the iteration loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Torque error fell below the convergence tolerance
    Converged,
    /// Torque error stopped changing
    Stalled,
    /// No engine could be adjusted towards the demand
    NoFeasibleAdjustment,
    /// Iteration cap reached
    MaxIterations,
}

impl Termination {
    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::Converged)
    }
}

/// Error and direction error recorded at one iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub error: f64,
    pub angle_error: f64,
}

/// Results from one allocation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Torque error magnitude at the best iteration
    pub error: f64,
    /// Direction error in degrees at the best iteration
    pub angle_error: f64,
    /// Committed throttle limits, index-aligned with the engines
    pub limits: Vec<f64>,
    /// Net torque produced with the committed limits
    pub torque: Vector3<f64>,
    /// Demand after clamping into the engines' envelope
    pub clamped_demand: Vector3<f64>,
    /// Vertical-speed factor actually used, after escalation
    pub vertical_speed_factor: f64,
    pub iterations: usize,
    pub best_iteration: usize,
    pub termination: Termination,
    /// Per-iteration trace, empty unless requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<IterationRecord>,
}

impl AllocationResult {
    /// Combined score used to rank iterations
    pub fn score(&self) -> f64 {
        self.error + self.angle_error
    }
}
