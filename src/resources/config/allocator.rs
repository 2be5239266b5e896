use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::{AllocError, ConfigError};

/// Tuning for one allocation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Vertical-speed factor applied to non-maneuvering engines [0-1]
    pub vertical_speed_factor: f64,
    /// Convergence tolerance on the torque error
    pub convergence_eps: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Keep the per-iteration error/angle trace in the result
    pub record_trace: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            vertical_speed_factor: 1.0,
            convergence_eps: 0.1,
            max_iterations: 500,
            record_trace: false,
        }
    }
}

impl AllocatorConfig {
    pub fn with_vertical_speed_factor(mut self, vsf: f64) -> Self {
        self.vertical_speed_factor = vsf;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.convergence_eps = eps;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_trace(mut self) -> Self {
        self.record_trace = true;
        self
    }

    pub fn validate(&self) -> Result<(), AllocError> {
        if !(self.convergence_eps.is_finite() && self.convergence_eps > 0.0) {
            return Err(AllocError::InvalidConfig(format!(
                "convergence_eps must be positive and finite, got {}",
                self.convergence_eps
            )));
        }
        if !self.vertical_speed_factor.is_finite() {
            return Err(AllocError::InvalidConfig(format!(
                "vertical_speed_factor must be finite, got {}",
                self.vertical_speed_factor
            )));
        }
        if self.max_iterations == 0 {
            return Err(AllocError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }
}
