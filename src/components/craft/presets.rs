use nalgebra::Vector3;

use super::CraftConfig;
use crate::{components::Engine, utils::ConfigError};

/// Thrust axis shared by the preset layouts
fn down() -> Vector3<f64> {
    Vector3::new(0.0, -1.0, 0.0)
}

pub const PRESET_NAMES: [&str; 4] = ["uneven", "shuttle", "hover", "vtol"];
pub const DEMAND_SET_NAMES: [&str; 2] = ["vtol_bad", "hover_bad"];

impl CraftConfig {
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "uneven" => Ok(Self::uneven()),
            "shuttle" => Ok(Self::shuttle()),
            "hover" => Ok(Self::hover()),
            "vtol" => Ok(Self::vtol()),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    /// Five engines of very different authority around the CoM
    pub fn uneven() -> Self {
        let engines = vec![
            Engine::new(
                Vector3::new(-0.1, -2.1, 0.0),
                down(),
                Vector3::new(0.0, 0.0, 0.1),
                0.0,
                200.0,
            ),
            Engine::new(
                Vector3::new(-1.4, -1.4, 0.0),
                down(),
                Vector3::new(0.0, 0.0, 1.4),
                0.0,
                60.0,
            ),
            Engine::new(
                Vector3::new(1.1, -1.4, 0.0),
                down(),
                Vector3::new(0.0, 0.0, -1.1),
                0.0,
                200.0,
            ),
            Engine::new(
                Vector3::new(-0.1, 0.2, 0.8),
                Vector3::new(0.0, -1.0, 0.1),
                Vector3::new(0.8, 0.0, 0.1),
                0.0,
                16.0,
            ),
            Engine::new(
                Vector3::new(-0.1, 0.2, -0.8),
                Vector3::new(0.0, -1.0, -0.1),
                Vector3::new(-0.8, 0.0, 0.1),
                0.0,
                16.0,
            ),
        ];
        Self::new("uneven", named(engines))
    }

    /// Two main engines of unequal thrust on the pitch axis
    pub fn shuttle() -> Self {
        let engines = vec![
            Engine::new(
                Vector3::new(0.0, -5.9, -2.7),
                down(),
                Vector3::new(-2.7, 0.0, 0.0),
                0.0,
                1500.0,
            ),
            Engine::new(
                Vector3::new(0.0, -6.2, 1.2),
                down(),
                Vector3::new(1.2, 0.0, 0.0),
                0.0,
                4000.0,
            ),
        ];
        Self::new("shuttle", named(engines))
    }

    /// Asymmetric quad lifter
    pub fn hover() -> Self {
        let engines = [
            Vector3::new(-6.2, 6.4, 0.6),
            Vector3::new(-6.2, -6.4, -0.6),
            Vector3::new(3.9, 7.4, 0.6),
            Vector3::new(3.9, -6.4, -0.6),
        ]
        .into_iter()
        .map(|p| Engine::from_geometry(p, down(), 1.0, 0.0, 450.0))
        .collect();
        Self::new("hover", named(engines))
    }

    /// Four lift engines plus four maneuvering thrusters
    pub fn vtol() -> Self {
        let lift = [
            Vector3::new(-3.4, -2.0, 0.0),
            Vector3::new(-3.4, 2.0, 0.0),
            Vector3::new(3.5, -2.0, 0.0),
            Vector3::new(1.5, 2.0, 0.0),
        ]
        .into_iter()
        .map(|p| Engine::from_geometry(p, down(), 1.0, 0.0, 250.0));
        let rcs = [
            Vector3::new(1.3, 2.0, 1.6),
            Vector3::new(3.1, -2.0, -3.7),
            Vector3::new(-3.1, -2.0, 3.7),
            Vector3::new(-2.4, 2.0, -2.9),
        ]
        .into_iter()
        .map(|p| Engine::from_geometry(p, down(), 1.0, 0.0, 20.0).maneuvering());
        Self::new("vtol", named(lift.chain(rcs).collect()))
    }
}

fn named(engines: Vec<Engine>) -> Vec<Engine> {
    engines
        .into_iter()
        .enumerate()
        .map(|(i, e)| e.with_name(format!("engine_{}", i)))
        .collect()
}

/// Reference demand sets that historically gave large errors
pub fn demand_set(name: &str) -> Option<Vec<Vector3<f64>>> {
    match name {
        "vtol_bad" => Some(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(0.0, 10.0, 0.0),
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::new(-1797.147, 112.3649, 80.1167),
            Vector3::new(1327.126, -59.91731, 149.1847),
            Vector3::new(107.5895, -529.4326, -131.0672),
            Vector3::new(50.84914, -1.706408, 113.4622),
            Vector3::new(-0.4953138, 0.2008617, 39.52808),
            Vector3::new(14.88248, 0.9660782, -51.20171),
            Vector3::new(-20.34281, -10.67025, 38.88113),
        ]),
        "hover_bad" => Some(vec![
            Vector3::new(0.2597602, -5.2778279, 0.8444),
            Vector3::new(0.9042788, -1.347212, 483.4898),
            Vector3::new(-0.7012861, 0.2607862, -294.2217),
            Vector3::new(0.2597602, -0.2778279, 295.8444),
        ]),
        _ => None,
    }
}
