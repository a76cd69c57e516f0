use crate::agents::Direction;
use crate::trajectory::quintic::quintic_basis_derivative;

/// Steering-yaw heading offset at progress `t ∈ [0, 1]` for a lane change at
/// speed `v` (m/s) in the given `direction`:
/// `ψ(t) = sign(direction) · (0.12 / (v/30)) · (30t² − 60t³ + 30t⁴) / 1.875`.
///
/// Peaks at `t = 0.5` (the quintic velocity profile's own symmetric peak)
/// at exactly 0.12 rad (~7°) when `v = 30 m/s`, and scales inversely with
/// speed: faster vehicles steer less abruptly for the same lane change.
///
/// # Example
/// ```rust
/// use dense_traffic_core::agents::Direction;
/// use dense_traffic_core::trajectory::steering::yaw;
///
/// assert_eq!(yaw(0.0, 30.0, Direction::Right), 0.0);
/// assert!(yaw(0.3, 30.0, Direction::Right) > 0.0);
/// assert!(yaw(0.3, 30.0, Direction::Left) < 0.0);
/// ```
pub fn yaw(t: f64, v: f64, direction: Direction) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let speed_scale = 0.12 / (v / 30.0).max(1e-6);
    direction.sign() * speed_scale * quintic_basis_derivative(t) / 1.875
}

/// Steering-yaw during an abort, applied with the reversed direction of the
/// maneuver being aborted: applied equally in `Aborting`, with direction
/// reversed.
pub fn abort_yaw(t: f64, v: f64, original_direction: Direction) -> f64 {
    let reversed = match original_direction {
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    };
    yaw(t, v, reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_is_zero_at_maneuver_endpoints() {
        assert!(yaw(0.0, 30.0, Direction::Right).abs() < 1e-12);
        assert!(yaw(1.0, 30.0, Direction::Right).abs() < 1e-12);
    }

    #[test]
    fn yaw_peak_matches_reference_value() {
        // Peak ≈ 0.122 rad (~7°) at v = 30 m/s; the quintic velocity
        // profile itself peaks at t = 0.5.
        let peak = yaw(0.5, 30.0, Direction::Right);
        assert!((peak - 0.122).abs() < 0.01);
    }

    #[test]
    fn yaw_scales_inversely_with_speed() {
        let slow = yaw(0.5, 15.0, Direction::Right);
        let fast = yaw(0.5, 60.0, Direction::Right);
        assert!(slow > fast);
    }

    #[test]
    fn abort_yaw_reverses_direction() {
        let forward = yaw(0.3, 30.0, Direction::Right);
        let aborted = abort_yaw(0.3, 30.0, Direction::Right);
        assert!((forward + aborted).abs() < 1e-12);
    }
}
