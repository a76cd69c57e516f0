use crate::agents::personality::DriverPersonality;
use crate::agents::vehicle_kind::VehicleKind;

/// The base (pre-kind, pre-personality) IDM and MOBIL defaults a
/// [`DriverParams`] is derived from. Mirrors the `Default*` configuration
/// keys exposed through `SimConfig`.
#[derive(Debug, Clone, Copy)]
pub struct DriverDefaults {
    pub desired_speed: f64,
    pub time_headway: f64,
    pub min_gap: f64,
    pub max_accel: f64,
    pub comfort_decel: f64,
    pub max_decel: f64,
    pub accel_exponent: f64,
    pub politeness: f64,
    pub safe_decel: f64,
    pub accel_threshold: f64,
    pub keep_bias: f64,
    pub lane_change_cooldown: f64,
    pub player_reaction_margin: f64,
}

impl Default for DriverDefaults {
    /// Values chosen so the boundary scenarios hold for a
    /// `Car` + `Normal` driver under default configuration: desired speed
    /// 36 m/s, `s0 + v·T = 2 + 25·1.2 = 32 m` car-following equilibrium,
    /// MOBIL politeness 0.25 and acceptance threshold 0.15.
    fn default() -> Self {
        DriverDefaults {
            desired_speed: 36.0,
            time_headway: 1.2,
            min_gap: 2.0,
            max_accel: 1.5,
            comfort_decel: 2.0,
            max_decel: 6.0,
            accel_exponent: 4.0,
            politeness: 0.25,
            safe_decel: 4.0,
            accel_threshold: 0.15,
            keep_bias: 0.1,
            lane_change_cooldown: 5.0,
            player_reaction_margin: 5.0,
        }
    }
}

/// Immutable per-vehicle parameters derived once at spawn time from a
/// [`VehicleKind`] and [`DriverPersonality`].
///
/// Never mutated after construction — consulted by `control::idm` and
/// `mobil::decider` every tick.
#[derive(Debug, Clone, Copy)]
pub struct DriverParams {
    pub desired_speed: f64,
    pub max_accel: f64,
    pub comfort_decel: f64,
    pub max_decel: f64,
    pub time_headway: f64,
    pub min_gap: f64,
    pub accel_exponent: f64,
    pub politeness: f64,
    pub safe_decel: f64,
    pub accel_threshold: f64,
    pub keep_bias: f64,
    pub lane_change_cooldown: f64,
    pub player_reaction_margin: f64,
    personality: DriverPersonality,
}

impl DriverParams {
    /// Derives driver parameters for a `kind`/`personality` pair from
    /// `defaults`, applying the kind scaling (trucks get lower desired
    /// speed, lower acceleration, longer headway, longer minimum gap)
    /// followed by the personality scaling
    /// (`v0 ← v0·f`, `a ← a·f`, `T ← T/f`; MOBIL parameters unchanged).
    ///
    /// # Example
    /// ```rust
    /// use dense_traffic_core::agents::{DriverDefaults, DriverParams, DriverPersonality, VehicleKind};
    ///
    /// let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
    /// assert_eq!(params.desired_speed, 36.0);
    /// ```
    pub fn derive(kind: VehicleKind, personality: DriverPersonality, defaults: &DriverDefaults) -> Self {
        let f = personality.factor();

        let desired_speed = defaults.desired_speed * kind.desired_speed_scale() * f;
        let max_accel = defaults.max_accel * kind.accel_scale() * f;
        let time_headway = (defaults.time_headway + kind.headway_offset()) / f;
        let min_gap = defaults.min_gap + kind.min_gap_offset();

        DriverParams {
            desired_speed,
            max_accel,
            comfort_decel: defaults.comfort_decel,
            max_decel: defaults.max_decel,
            time_headway,
            min_gap,
            accel_exponent: defaults.accel_exponent,
            politeness: defaults.politeness,
            safe_decel: defaults.safe_decel,
            accel_threshold: defaults.accel_threshold,
            keep_bias: defaults.keep_bias,
            lane_change_cooldown: defaults.lane_change_cooldown,
            player_reaction_margin: defaults.player_reaction_margin,
            personality,
        }
    }

    pub fn personality(&self) -> DriverPersonality {
        self.personality
    }

    /// Normalized aggressiveness in `[0, 1]`, forwarded from
    /// [`DriverPersonality::aggressiveness`] for the MOBIL safety overlay.
    pub fn aggressiveness(&self) -> f64 {
        self.personality.aggressiveness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_car_matches_free_road_scenario() {
        let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
        assert_eq!(params.desired_speed, 36.0);
    }

    #[test]
    fn car_following_equilibrium_defaults() {
        let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
        let gap = params.min_gap + 25.0 * params.time_headway;
        assert!((gap - 32.0).abs() < 1e-9);
    }

    #[test]
    fn truck_is_slower_and_has_more_headway_than_car() {
        let defaults = DriverDefaults::default();
        let car = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &defaults);
        let truck = DriverParams::derive(VehicleKind::Truck, DriverPersonality::Normal, &defaults);
        assert!(truck.desired_speed < car.desired_speed);
        assert!(truck.max_accel < car.max_accel);
        assert!(truck.time_headway > car.time_headway);
        assert!(truck.min_gap > car.min_gap);
    }

    #[test]
    fn aggressive_personality_raises_speed_and_shortens_headway() {
        let defaults = DriverDefaults::default();
        let normal = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &defaults);
        let aggressive = DriverParams::derive(VehicleKind::Car, DriverPersonality::Aggressive, &defaults);
        assert!(aggressive.desired_speed > normal.desired_speed);
        assert!(aggressive.max_accel > normal.max_accel);
        assert!(aggressive.time_headway < normal.time_headway);
    }
}
