use crate::agents::DriverParams;

/// Computes the Intelligent Driver Model longitudinal acceleration command.
///
/// `ego_speed` is clamped to `≥ 0`. `gap` is the
/// bumper-to-bumper distance to the leader, `None` on a free road. `delta_v`
/// is `v_ego − v_leader` (positive when closing) and is ignored when `gap`
/// is `None`.
///
/// # Example
/// ```rust
/// use dense_traffic_core::agents::{DriverDefaults, DriverParams, DriverPersonality, VehicleKind};
/// use dense_traffic_core::control::idm::acceleration;
///
/// let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
/// let free_road_accel = acceleration(20.0, None, 0.0, &params);
/// assert!(free_road_accel > 0.0);
/// ```
pub fn acceleration(ego_speed: f64, gap: Option<f64>, delta_v: f64, params: &DriverParams) -> f64 {
    let v = ego_speed.max(0.0);
    let free_road = free_road_term(v, params);

    let raw = match gap {
        None => params.max_accel * free_road,
        Some(gap) => {
            let s_star = desired_dynamic_gap(v, delta_v, params);
            let interaction = if gap > 0.1 {
                (s_star / gap).powi(2)
            } else {
                1.0
            };
            params.max_accel * (free_road - interaction)
        }
    };

    raw.clamp(-params.max_decel, params.max_accel)
}

/// `f_free = 1 − (v/v0)^δ`, the free-road term shared by both branches.
fn free_road_term(v: f64, params: &DriverParams) -> f64 {
    1.0 - (v / params.desired_speed).powf(params.accel_exponent)
}

/// `s* = s0 + max(0, v·T + v·Δv / (2·√(a·b)))`, the desired dynamic gap to
/// the leader at the current speed and closing rate.
pub fn desired_dynamic_gap(v: f64, delta_v: f64, params: &DriverParams) -> f64 {
    let braking_term = (v * delta_v) / (2.0 * (params.max_accel * params.comfort_decel).sqrt());
    params.min_gap + (v * params.time_headway + braking_term).max(0.0)
}
