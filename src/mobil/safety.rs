use crate::mobil::types::AdjacentVehicle;

/// Default adjacent-vehicle margin endpoints in meters (20 m passive → 12 m
/// aggressive), overridable via `SimConfig`.
pub const DEFAULT_ADJACENT_MARGIN_PASSIVE: f64 = 20.0;
pub const DEFAULT_ADJACENT_MARGIN_AGGRESSIVE: f64 = 12.0;
/// Default chain-reaction cooldown endpoints in seconds (3.0 s passive →
/// 1.5 s aggressive), overridable via `SimConfig`.
pub const DEFAULT_CHAIN_COOLDOWN_PASSIVE: f64 = 3.0;
pub const DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE: f64 = 1.5;

/// Adjacent-vehicle margin in meters, interpolated by `aggressiveness ∈
/// [0, 1]` between the configured `passive`/`aggressive` endpoints.
pub fn adjacent_margin(aggressiveness: f64, passive: f64, aggressive: f64) -> f64 {
    lerp(passive, aggressive, aggressiveness.clamp(0.0, 1.0))
}

/// Chain-reaction cooldown in seconds, interpolated by `aggressiveness ∈
/// [0, 1]` between the configured `passive`/`aggressive` endpoints.
pub fn chain_reaction_cooldown(aggressiveness: f64, passive: f64, aggressive: f64) -> f64 {
    lerp(passive, aggressive, aggressiveness.clamp(0.0, 1.0))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Per-vehicle margin for a player in the target lane, widened by closing
/// speed: faster closing means a larger margin.
pub fn player_margin(base_margin: f64, closing_speed: f64, reaction_margin: f64) -> f64 {
    base_margin + reaction_margin * closing_speed.max(0.0) / 10.0
}

/// Rejects the direction if any adjacent-lane vehicle is within its margin
/// in world-space distance.
pub fn adjacent_check_passes(adjacent: &[AdjacentVehicle], margin: f64, reaction_margin: f64) -> bool {
    adjacent.iter().all(|vehicle| {
        let effective_margin = if vehicle.is_player {
            player_margin(margin, vehicle.closing_speed, reaction_margin)
        } else {
            margin
        };
        vehicle.world_distance > effective_margin
    })
}

/// Rejects the direction if a new obstacle (leader-identity change) appeared
/// less than `cooldown` seconds ago.
pub fn chain_reaction_check_passes(time_since_leader_change: Option<f64>, cooldown: f64) -> bool {
    match time_since_leader_change {
        None => true,
        Some(elapsed) => elapsed >= cooldown,
    }
}

/// Rejects the direction if the new follower's post-change acceleration
/// would fall below `-b_safe`.
pub fn follower_safety_passes(follower_accel_after: f64, b_safe: f64) -> bool {
    follower_accel_after >= -b_safe
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_margin_interpolates_between_configured_endpoints() {
        assert_eq!(
            adjacent_margin(0.0, DEFAULT_ADJACENT_MARGIN_PASSIVE, DEFAULT_ADJACENT_MARGIN_AGGRESSIVE),
            20.0
        );
        assert_eq!(
            adjacent_margin(1.0, DEFAULT_ADJACENT_MARGIN_PASSIVE, DEFAULT_ADJACENT_MARGIN_AGGRESSIVE),
            12.0
        );
    }

    #[test]
    fn chain_reaction_cooldown_interpolates_between_configured_endpoints() {
        assert_eq!(
            chain_reaction_cooldown(0.0, DEFAULT_CHAIN_COOLDOWN_PASSIVE, DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE),
            3.0
        );
        assert_eq!(
            chain_reaction_cooldown(1.0, DEFAULT_CHAIN_COOLDOWN_PASSIVE, DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE),
            1.5
        );
    }

    #[test]
    fn adjacent_check_rejects_when_vehicle_within_margin() {
        let adjacent = vec![AdjacentVehicle {
            world_distance: 10.0,
            is_player: false,
            closing_speed: 0.0,
        }];
        assert!(!adjacent_check_passes(&adjacent, 12.0, 5.0));
        assert!(adjacent_check_passes(&adjacent, 8.0, 5.0));
    }

    #[test]
    fn adjacent_check_widens_margin_for_fast_closing_players() {
        let slow_player = vec![AdjacentVehicle {
            world_distance: 21.0,
            is_player: true,
            closing_speed: 0.0,
        }];
        assert!(adjacent_check_passes(&slow_player, 20.0, 5.0));

        let fast_player = vec![AdjacentVehicle {
            world_distance: 21.0,
            is_player: true,
            closing_speed: 50.0,
        }];
        assert!(!adjacent_check_passes(&fast_player, 20.0, 5.0));
    }

    #[test]
    fn chain_reaction_check_respects_cooldown() {
        assert!(chain_reaction_check_passes(None, 3.0));
        assert!(!chain_reaction_check_passes(Some(1.0), 3.0));
        assert!(chain_reaction_check_passes(Some(3.0), 3.0));
    }

    #[test]
    fn follower_safety_rejects_harsh_braking() {
        assert!(!follower_safety_passes(-5.0, 4.0));
        assert!(follower_safety_passes(-3.0, 4.0));
    }
}
