use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{components::Engine, utils::ConfigError};

/// Engine entry as written in a craft file.
///
/// `specific_torque` may be omitted, in which case it is derived from the
/// mount geometry as `position x direction * torque_arm`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEngineConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub position: Vector3<f64>,
    pub direction: Vector3<f64>,
    #[serde(default)]
    pub specific_torque: Option<Vector3<f64>>,
    #[serde(default = "default_torque_arm")]
    pub torque_arm: f64,
    #[serde(default)]
    pub min_thrust: f64,
    pub max_thrust: f64,
    #[serde(default)]
    pub maneuvering: bool,
    #[serde(default)]
    pub manual: bool,
}

fn default_torque_arm() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCraftConfig {
    pub name: String,
    pub engines: Vec<RawEngineConfig>,
}

/// A named engine layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftConfig {
    pub name: String,
    pub engines: Vec<Engine>,
}

impl From<RawEngineConfig> for Engine {
    fn from(raw: RawEngineConfig) -> Self {
        let mut engine = match raw.specific_torque {
            Some(torque) => Engine::new(
                raw.position,
                raw.direction,
                torque,
                raw.min_thrust,
                raw.max_thrust,
            ),
            None => Engine::from_geometry(
                raw.position,
                raw.direction,
                raw.torque_arm,
                raw.min_thrust,
                raw.max_thrust,
            ),
        };
        engine.name = raw.name.unwrap_or_default();
        engine.maneuvering = raw.maneuvering;
        engine.manual = raw.manual;
        engine
    }
}

impl CraftConfig {
    pub fn new(name: impl Into<String>, engines: Vec<Engine>) -> Self {
        Self {
            name: name.into(),
            engines,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawCraftConfig = serde_yaml::from_str(yaml)?;
        let config = Self::from_raw(raw);
        config.validate()?;
        debug!(
            "Loaded craft {} with {} engines",
            config.name,
            config.engines.len()
        );
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    fn from_raw(raw: RawCraftConfig) -> Self {
        let engines = raw
            .engines
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                let mut engine = Engine::from(e);
                if engine.name.is_empty() {
                    engine.name = format!("engine_{}", i);
                }
                engine
            })
            .collect();
        Self {
            name: raw.name,
            engines,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engines.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "craft {} has no engines",
                self.name
            )));
        }
        for (i, engine) in self.engines.iter().enumerate() {
            if !engine.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "engine {} ({}) has non-finite geometry or thrust",
                    i, engine.name
                )));
            }
            if engine.min_thrust > engine.max_thrust {
                return Err(ConfigError::ValidationError(format!(
                    "engine {} ({}) has min_thrust {} above max_thrust {}",
                    i, engine.name, engine.min_thrust, engine.max_thrust
                )));
            }
        }
        Ok(())
    }
}
