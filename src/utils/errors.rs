use std::io;
use thiserror::Error;

/// Errors raised by the allocator entry points.
///
/// Numerical degeneracy (zero vectors, zero capability) is never an error;
/// only violated preconditions are.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocError {
    #[error("Engine set is empty")]
    EmptyEngineSet,

    #[error("Config error: {0}")]
    InvalidConfig(String),

    #[error("Invalid demand: {0}")]
    InvalidDemand(String),

    #[error("Solver error: {0}")]
    SolverError(String),
}

/// Errors raised while loading craft or allocator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid craft configuration: {0}")]
    ValidationError(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}
