mod evaluate;
mod least_squares;
mod solver;

pub use evaluate::{
    evaluate_craft, sweep, CraftReport, DemandOutcome, SweepConfig, SweepReport, SweepSample,
};
pub use least_squares::{least_squares_limits, LeastSquaresSolution};
pub use solver::{adjust_limits, allocate, net_torque, TorqueAllocator};
