pub mod allocation;
pub mod craft;
pub mod propulsion;
pub mod torque_clamp;

pub use allocation::{AllocationResult, EngineScratch, IterationRecord, Termination};
pub use craft::{demand_set, CraftConfig, RawCraftConfig, RawEngineConfig};
pub use propulsion::Engine;
pub use torque_clamp::TorqueClamp;
