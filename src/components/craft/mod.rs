mod loader;
mod presets;

pub use loader::{CraftConfig, RawCraftConfig, RawEngineConfig};
pub use presets::{demand_set, DEMAND_SET_NAMES, PRESET_NAMES};
