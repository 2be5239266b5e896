use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::TorqueAllocator;
use crate::{
    components::{AllocationResult, Engine},
    utils::{AllocError, RngManager},
};

/// Outcome of a single demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandOutcome {
    pub demand: Vector3<f64>,
    pub result: AllocationResult,
}

/// Results of running a craft against a list of demands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftReport {
    pub outcomes: Vec<DemandOutcome>,
    /// Sum of `error + angle_error` across all demands
    pub total_error: f64,
    /// Number of demands met within tolerance
    pub converged: usize,
}

/// Allocates every demand in turn on the same engine set.
pub fn evaluate_craft(
    allocator: &mut TorqueAllocator,
    engines: &[Engine],
    demands: &[Vector3<f64>],
) -> Result<CraftReport, AllocError> {
    let mut outcomes = Vec::with_capacity(demands.len());
    let mut total_error = 0.0;
    let mut converged = 0;

    for demand in demands {
        let result = allocator.allocate(engines, demand)?;
        info!(
            "demand {:?}: error {:.4}, angle {:.4} deg after {} iterations",
            demand.as_slice(),
            result.error,
            result.angle_error,
            result.iterations
        );
        total_error += result.score();
        if result.termination.is_converged() {
            converged += 1;
        }
        outcomes.push(DemandOutcome {
            demand: *demand,
            result,
        });
    }

    info!(
        "total error: {:.4}, {}/{} demands converged",
        total_error,
        converged,
        demands.len()
    );
    Ok(CraftReport {
        outcomes,
        total_error,
        converged,
    })
}

/// Random demand sweep settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub samples: usize,
    /// Demands are drawn uniformly from [-range, range] on each axis
    pub range: f64,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            samples: 500,
            range: 100.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepSample {
    pub demand: Vector3<f64>,
    /// Torque error as a percentage of the demand magnitude
    pub error_percent: f64,
    pub angle_error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub samples: Vec<SweepSample>,
    pub mean_error_percent: f64,
    pub max_error_percent: f64,
    pub mean_angle_error: f64,
    pub max_angle_error: f64,
}

/// Allocates seeded random demands and summarizes relative errors.
pub fn sweep(
    allocator: &mut TorqueAllocator,
    engines: &[Engine],
    config: &SweepConfig,
) -> Result<SweepReport, AllocError> {
    if !(config.range.is_finite() && config.range > 0.0) {
        return Err(AllocError::InvalidConfig(format!(
            "sweep range must be positive and finite, got {}",
            config.range
        )));
    }

    let rng_manager = RngManager::new(config.seed);
    let mut rng = rng_manager.get_rng("demand_sweep");
    let mut samples = Vec::with_capacity(config.samples);

    for _ in 0..config.samples {
        let demand = Vector3::new(
            rng.gen_range(-config.range..config.range),
            rng.gen_range(-config.range..config.range),
            rng.gen_range(-config.range..config.range),
        );
        let result = allocator.allocate(engines, &demand)?;
        let magnitude = demand.norm();
        let error_percent = if magnitude > 0.0 {
            result.error / magnitude * 100.0
        } else {
            0.0
        };
        samples.push(SweepSample {
            demand,
            error_percent,
            angle_error: result.angle_error,
        });
    }

    let n = samples.len().max(1) as f64;
    let report = SweepReport {
        mean_error_percent: samples.iter().map(|s| s.error_percent).sum::<f64>() / n,
        max_error_percent: samples.iter().map(|s| s.error_percent).fold(0.0, f64::max),
        mean_angle_error: samples.iter().map(|s| s.angle_error).sum::<f64>() / n,
        max_angle_error: samples.iter().map(|s| s.angle_error).fold(0.0, f64::max),
        samples,
    };
    info!(
        "sweep of {} demands (seed {}): mean error {:.2}%, max {:.2}%, mean angle {:.2} deg",
        report.samples.len(),
        rng_manager.master_seed(),
        report.mean_error_percent,
        report.max_error_percent,
        report.mean_angle_error
    );
    Ok(report)
}
