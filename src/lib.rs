//! Multi-engine torque allocation.
//!
//! Given a demanded torque and a set of engines with fixed geometry, the
//! [`TorqueAllocator`](systems::TorqueAllocator) searches for per-engine
//! throttle limits whose net torque reproduces the demand as closely as
//! possible in both magnitude and direction.

pub mod components;
pub mod resources;
pub mod systems;
pub mod utils;
