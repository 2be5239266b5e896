mod state;

pub use state::{AllocationResult, EngineScratch, IterationRecord, Termination};
