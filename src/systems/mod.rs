pub mod allocation;

pub use allocation::{
    adjust_limits, allocate, evaluate_craft, least_squares_limits, net_torque, sweep,
    CraftReport, DemandOutcome, LeastSquaresSolution, SweepConfig, SweepReport, SweepSample,
    TorqueAllocator,
};
