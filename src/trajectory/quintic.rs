/// Lateral offset at progress `t ∈ [0, 1]` during a lane change of lateral
/// width `delta_w`: `y(t) = ΔW·(10t³ − 15t⁴ + 6t⁵)`.
///
/// The quintic coefficients guarantee `y(0) = 0`, `y(1) = ΔW`, and zero
/// velocity/acceleration at both endpoints, so lateral motion is continuous
/// with `Cruise` on either side of the maneuver.
///
/// # Example
/// ```rust
/// use dense_traffic_core::trajectory::quintic::offset;
///
/// assert_eq!(offset(0.0, 3.5), 0.0);
/// assert!((offset(1.0, 3.5) - 3.5).abs() < 1e-9);
/// ```
pub fn offset(t: f64, delta_w: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    delta_w * quintic_basis(t)
}

/// Lateral velocity at progress `t`, given the lane-change duration
/// `duration_s`: `y′(t) = ΔW·(30t² − 60t³ + 30t⁴) / T_LC`.
pub fn velocity(t: f64, delta_w: f64, duration_s: f64) -> f64 {
    if duration_s <= 0.0 {
        return 0.0;
    }
    let t = t.clamp(0.0, 1.0);
    delta_w * quintic_basis_derivative(t) / duration_s
}

/// The unscaled basis polynomial `10t³ − 15t⁴ + 6t⁵`.
pub fn quintic_basis(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;
    10.0 * t3 - 15.0 * t4 + 6.0 * t5
}

/// The unscaled basis derivative `30t² − 60t³ + 30t⁴`.
pub fn quintic_basis_derivative(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    30.0 * t2 - 60.0 * t3 + 30.0 * t4
}

/// Duration of a lane change as a function of the ego's current speed in
/// m/s: `T_LC = clamp(3.5·(1 + 0.5·ln(max(1, v/27.8))), 2.5, 7.0)`.
///
/// Monotone non-decreasing in `v`: faster vehicles get a longer, gentler
/// lane change.
pub fn duration_from_speed(v: f64) -> f64 {
    let ratio = (v / 27.8).max(1.0);
    (3.5 * (1.0 + 0.5 * ratio.ln())).clamp(2.5, 7.0)
}

/// Peak lateral acceleration (`m/s²`) for a lane change of lateral width
/// `delta_w` and duration `t_lc` (`≈ 5.77·ΔW / T_LC²`).
pub fn peak_lateral_acceleration(delta_w: f64, t_lc: f64) -> f64 {
    5.77 * delta_w / (t_lc * t_lc)
}

/// Whether a lane change of lateral width `delta_w` and duration `t_lc`
/// stays within the 1.5 m/s² comfort bound, exposed for tests even though
/// `duration_from_speed` already enforces it in practice.
pub fn is_comfortable(delta_w: f64, t_lc: f64) -> bool {
    peak_lateral_acceleration(delta_w, t_lc) <= 1.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quintic_basis_matches_boundary_conditions() {
        assert_eq!(quintic_basis(0.0), 0.0);
        assert!((quintic_basis(1.0) - 1.0).abs() < 1e-12);
        assert!(quintic_basis_derivative(0.0).abs() < 1e-12);
        assert!(quintic_basis_derivative(1.0).abs() < 1e-12);
    }

    #[test]
    fn offset_endpoints_match_lane_width() {
        let delta_w = 3.5;
        assert_eq!(offset(0.0, delta_w), 0.0);
        assert!((offset(1.0, delta_w) - delta_w).abs() < 1e-9);
    }

    #[test]
    fn velocity_is_zero_at_endpoints() {
        let delta_w = 3.5;
        let duration = 4.0;
        assert!(velocity(0.0, delta_w, duration).abs() < 1e-9);
        assert!(velocity(1.0, delta_w, duration).abs() < 1e-9);
    }

    #[test]
    fn duration_from_speed_is_clamped_and_monotone() {
        // Below 27.8 m/s the ln() argument floors at 1, so duration is flat at 3.5 s.
        assert_eq!(duration_from_speed(0.0), 3.5);
        assert_eq!(duration_from_speed(27.8), 3.5);
        assert!(duration_from_speed(27.8) < duration_from_speed(55.6));
        assert!(duration_from_speed(1000.0) <= 7.0);
    }

    #[test]
    fn comfort_guard_rejects_short_durations() {
        assert!(!is_comfortable(3.5, 1.0));
        assert!(is_comfortable(3.5, duration_from_speed(20.0)));
    }
}
