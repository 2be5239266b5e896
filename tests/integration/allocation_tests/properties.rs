use approx::assert_relative_eq;
use nalgebra::Vector3;
use rand::Rng;
use torque_alloc::{
    components::{CraftConfig, TorqueClamp},
    resources::AllocatorConfig,
    systems::TorqueAllocator,
    utils::RngManager,
};

use crate::common::{
    assert_best_tracking_monotonic, assert_result_valid, assert_torque_eq, create_manual_pair,
    create_six_axis_craft,
};

fn random_demands(name: &str, count: usize, range: f64) -> Vec<Vector3<f64>> {
    let mut rng = RngManager::new(7).get_rng(name);
    (0..count)
        .map(|_| {
            Vector3::new(
                rng.gen_range(-range..range),
                rng.gen_range(-range..range),
                rng.gen_range(-range..range),
            )
        })
        .collect()
}

#[test]
fn test_invariants_hold_for_random_demands() {
    let config = AllocatorConfig::default()
        .with_eps(0.01)
        .with_max_iterations(50)
        .with_trace();
    let mut allocator = TorqueAllocator::new(config);

    for name in ["uneven", "shuttle", "hover", "vtol"] {
        let craft = CraftConfig::preset(name).unwrap();
        for demand in random_demands(name, 40, 500.0) {
            let result = allocator.allocate(&craft.engines, &demand).unwrap();
            assert_result_valid(&result);
            assert_best_tracking_monotonic(&result);
        }
    }
}

#[test]
fn test_committed_limits_reproduce_reported_error() {
    let craft = CraftConfig::uneven();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default().with_max_iterations(50));

    for demand in random_demands("reported", 20, 50.0) {
        let result = allocator.allocate(&craft.engines, &demand).unwrap();
        let error = (result.torque - result.clamped_demand).norm();
        assert_relative_eq!(result.error, error, epsilon = 1e-9);
    }
}

#[test]
fn test_demand_is_clamped_per_axis() {
    let engines = create_six_axis_craft();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    let demand = Vector3::new(1000.0, -40.0, -250.0);
    let result = allocator.allocate(&engines, &demand).unwrap();

    let envelope = TorqueClamp::from_torques(
        allocator
            .scratch()
            .iter()
            .map(|s| &s.current_torque)
            .collect::<Vec<_>>(),
    );
    assert_torque_eq(&result.clamped_demand, &envelope.clamp(&demand), 1e-12);
    assert_torque_eq(
        &result.clamped_demand,
        &Vector3::new(100.0, -40.0, -100.0),
        1e-12,
    );
    assert_result_valid(&result);
    assert!(result.error < (demand - result.clamped_demand).norm());
}

#[test]
fn test_manual_engine_limit_is_never_touched() {
    let engines = create_manual_pair();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default().with_max_iterations(50));

    for demand in random_demands("manual", 25, 300.0) {
        let result = allocator.allocate(&engines, &demand).unwrap();
        assert_eq!(result.limits[0], 1.0);
        assert_result_valid(&result);
    }
}

#[test]
fn test_engine_descriptors_are_not_mutated() {
    let craft = CraftConfig::vtol();
    let before = craft.clone();
    let mut allocator = TorqueAllocator::new(AllocatorConfig::default());

    allocator
        .allocate(&craft.engines, &Vector3::new(50.0, -20.0, 10.0))
        .unwrap();

    assert_eq!(craft, before);
}
