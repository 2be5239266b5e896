use nalgebra::{DMatrix, DVector, Vector3};
use serde::{Deserialize, Serialize};

use crate::{components::Engine, utils::AllocError};

const SVD_EPS: f64 = 1e-12;

/// Unconstrained least-squares throttle solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeastSquaresSolution {
    /// Throttle per engine; not limited to [0, 1]
    pub throttles: Vec<f64>,
    /// Produced torque minus demand
    pub residual: Vector3<f64>,
}

impl LeastSquaresSolution {
    /// Whether every throttle is physically realizable
    pub fn is_feasible(&self) -> bool {
        self.throttles.iter().all(|t| (0.0..=1.0).contains(t))
    }
}

/// Solves `A x = demand` in the least-squares sense, where column `i` of `A`
/// is engine `i`'s full-throttle torque.
///
/// Reference baseline for the iterative allocator: it ignores throttle bounds,
/// so the solution can ask for negative or above-full throttle.
pub fn least_squares_limits(
    engines: &[Engine],
    demand: &Vector3<f64>,
) -> Result<LeastSquaresSolution, AllocError> {
    if engines.is_empty() {
        return Err(AllocError::EmptyEngineSet);
    }

    let torques: Vec<Vector3<f64>> = engines.iter().map(|e| e.nominal_torque(1.0)).collect();
    let a = DMatrix::from_fn(3, torques.len(), |row, col| torques[col][row]);
    let b = DVector::from_column_slice(demand.as_slice());

    let x = a
        .clone()
        .svd(true, true)
        .solve(&b, SVD_EPS)
        .map_err(|e| AllocError::SolverError(e.to_string()))?;
    let produced = &a * &x;

    Ok(LeastSquaresSolution {
        throttles: x.iter().copied().collect(),
        residual: Vector3::new(produced[0], produced[1], produced[2]) - demand,
    })
}
