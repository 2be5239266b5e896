use approx::assert_relative_eq;
use nalgebra::Vector3;
use torque_alloc::{
    components::{Engine, Termination},
    resources::AllocatorConfig,
    systems::TorqueAllocator,
};

use crate::common::{
    assert_result_valid, assert_torque_eq, create_manual_pair, create_opposed_pair,
    create_yaw_engine,
};

#[test]
fn test_opposed_pair_reaches_demand() {
    let engines = create_opposed_pair();
    let mut allocator =
        TorqueAllocator::new(AllocatorConfig::default().with_eps(0.1).with_max_iterations(50));

    let result = allocator
        .allocate(&engines, &Vector3::new(0.0, 0.0, 500.0))
        .unwrap();

    assert_result_valid(&result);
    assert_eq!(result.termination, Termination::Converged);
    assert!(result.error < 0.1);
    assert_relative_eq!(result.angle_error, 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.limits[0], 1.0);
    assert_relative_eq!(result.limits[1], 0.5);
    assert_torque_eq(&result.torque, &Vector3::new(0.0, 0.0, 500.0), 1e-9);
    assert_eq!(allocator.limits(), result.limits);
}

#[test]
fn test_manual_engine_is_cancelled() {
    let engines = create_manual_pair();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator.allocate(&engines, &Vector3::zeros()).unwrap();

    assert_result_valid(&result);
    assert_eq!(result.limits[0], 1.0);
    assert_relative_eq!(result.limits[1], 0.5, epsilon = 1e-9);
    assert!(result.torque.norm() < 0.1);
    assert_eq!(result.angle_error, 0.0);
}

#[test]
fn test_unreachable_demand_is_clamped() {
    let engines = vec![create_yaw_engine(1.0, 50.0)];
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator
        .allocate(&engines, &Vector3::new(0.0, 0.0, 500.0))
        .unwrap();

    assert_result_valid(&result);
    assert_torque_eq(&result.clamped_demand, &Vector3::new(0.0, 0.0, 50.0), 1e-12);
    // measured against the clamped target, not the raw 500 Nm
    assert!(result.error < 0.1, "error {} too large", result.error);
    assert_eq!(result.limits, vec![1.0]);
}

#[test]
fn test_zero_demand_on_balanced_craft() {
    let engines = create_opposed_pair();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator.allocate(&engines, &Vector3::zeros()).unwrap();

    assert_eq!(result.error, 0.0);
    assert_eq!(result.angle_error, 0.0);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.termination, Termination::Converged);
    assert_eq!(result.limits, vec![1.0, 1.0]);
}

#[test]
fn test_zero_capability_returns_idle_imbalance() {
    // engines without any torque authority
    let engines = vec![
        Engine::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::zeros(),
            0.0,
            100.0,
        ),
        Engine::new(
            Vector3::zeros(),
            Vector3::zeros(),
            Vector3::zeros(),
            0.0,
            100.0,
        ),
    ];
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator
        .allocate(&engines, &Vector3::new(10.0, -5.0, 3.0))
        .unwrap();

    assert_result_valid(&result);
    assert_eq!(result.termination, Termination::Converged);
    assert_eq!(result.clamped_demand, Vector3::zeros());
    assert_eq!(result.error, 0.0);
    assert_eq!(result.limits, vec![1.0, 1.0]);
}

#[test]
fn test_manual_only_craft_returns_initial_imbalance() {
    let engines = vec![create_yaw_engine(1.0, 100.0).manual()];
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator.allocate(&engines, &Vector3::zeros()).unwrap();

    assert_result_valid(&result);
    assert_eq!(result.termination, Termination::NoFeasibleAdjustment);
    assert_eq!(result.iterations, 1);
    assert_relative_eq!(result.error, 100.0);
    assert_eq!(result.limits, vec![1.0]);
}

#[test]
fn test_maneuvering_engine_starts_idle() {
    let engines = vec![
        create_yaw_engine(1.0, 100.0),
        create_yaw_engine(-1.0, 100.0),
        create_yaw_engine(1.0, 20.0).maneuvering(),
    ];
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default().with_trace());

    let result = allocator.allocate(&engines, &Vector3::zeros()).unwrap();

    // the maneuvering engine is off, lift engines cancel out
    assert_result_valid(&result);
    assert_eq!(result.limits, vec![1.0, 1.0, 0.0]);
    assert_eq!(result.trace.len(), 1);
}

#[test]
fn test_manual_maneuvering_engine_stays_at_full() {
    let engines = vec![
        create_yaw_engine(1.0, 100.0).manual().maneuvering(),
        create_yaw_engine(-1.0, 200.0),
    ];
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator.allocate(&engines, &Vector3::zeros()).unwrap();

    assert_result_valid(&result);
    assert_eq!(result.termination, Termination::Converged);
    assert_eq!(result.limits[0], 1.0);
    assert_relative_eq!(result.limits[1], 0.5);
    assert_torque_eq(&result.torque, &Vector3::zeros(), 1e-9);
}

#[test]
fn test_iteration_cap_keeps_initial_limits() {
    let engines = create_opposed_pair();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default().with_max_iterations(1));

    let result = allocator
        .allocate(&engines, &Vector3::new(0.0, 0.0, 500.0))
        .unwrap();

    assert_result_valid(&result);
    assert_eq!(result.termination, Termination::MaxIterations);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.best_iteration, 0);
    assert_relative_eq!(result.error, 500.0);
    assert_eq!(result.limits, vec![1.0, 1.0]);
    assert_torque_eq(&result.torque, &Vector3::zeros(), 1e-9);
}

#[test]
fn test_oscillating_search_stalls_on_best_limits() {
    let engines = vec![
        create_yaw_engine(1.0, 100.0).maneuvering(),
        create_yaw_engine(-1.0, 100.0).maneuvering(),
    ];
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let result = allocator
        .allocate(&engines, &Vector3::new(0.0, 0.0, 50.0))
        .unwrap();

    assert_result_valid(&result);
    assert_eq!(result.termination, Termination::Stalled);
    assert!(!result.termination.is_converged());
    assert!(result.best_iteration < result.iterations);
    // committed limits reproduce the reported error
    assert_relative_eq!(
        (result.torque - result.clamped_demand).norm(),
        result.error,
        epsilon = 1e-9
    );
    assert_relative_eq!(result.error, 90.0 / 7.0, epsilon = 1e-9);
    assert_relative_eq!(result.limits[0], 1.0);
}
