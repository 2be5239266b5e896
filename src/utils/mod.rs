pub mod errors;
pub mod math;
pub mod rng;

pub use errors::{AllocError, ConfigError};
pub use math::{clamp01, lerp, rad_to_deg, ratio01, TorqueVectorExt};
pub use rng::RngManager;
