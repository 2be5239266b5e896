use nalgebra::Vector3;
use torque_alloc::components::Engine;

/// Engine producing pure yaw torque of `sign * max_thrust` at full throttle,
/// mounted perpendicular to its thrust line
pub fn create_yaw_engine(sign: f64, max_thrust: f64) -> Engine {
    Engine::new(
        Vector3::new(0.0, sign, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, sign),
        0.0,
        max_thrust,
    )
}

/// Two engines symmetric about the CoM with opposing 1000 Nm of yaw authority
pub fn create_opposed_pair() -> Vec<Engine> {
    vec![
        create_yaw_engine(1.0, 1000.0).with_name("left"),
        create_yaw_engine(-1.0, 1000.0).with_name("right"),
    ]
}

/// Manual engine fixed at +100 Nm plus an automatic engine with -200 Nm authority
pub fn create_manual_pair() -> Vec<Engine> {
    vec![
        create_yaw_engine(1.0, 100.0).manual().with_name("manual"),
        create_yaw_engine(-1.0, 200.0).with_name("auto"),
    ]
}

/// Six engines covering both signs of every axis
pub fn create_six_axis_craft() -> Vec<Engine> {
    let axes = [
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];
    axes.iter()
        .flat_map(|axis| {
            [1.0, -1.0].into_iter().map(move |sign| {
                // any mount perpendicular to the thrust line
                let position = axis.cross(&Vector3::new(1.0, 1.0, 1.0)).normalize();
                let direction = axis.cross(&position);
                Engine::new(position, direction, axis * sign, 0.0, 100.0)
            })
        })
        .collect()
}
