use crate::agents::Direction;
use crate::control::idm;
use crate::mobil::safety::{
    adjacent_check_passes, chain_reaction_check_passes, chain_reaction_cooldown, follower_safety_passes,
};
use crate::mobil::types::{CandidateContext, CandidateScore, MobilContext, MobilDecision};

/// Ego's current IDM acceleration given `ctx.current_leader`.
fn ego_current_acceleration(ctx: &MobilContext) -> f64 {
    match ctx.current_leader {
        None => idm::acceleration(ctx.ego_speed, None, 0.0, ctx.ego_params),
        Some(leader) => idm::acceleration(ctx.ego_speed, Some(leader.gap), ctx.ego_speed - leader.speed, ctx.ego_params),
    }
}

/// Ego's hypothetical IDM acceleration with the candidate's new leader `L′`.
fn ego_hypothetical_acceleration(ctx: &MobilContext, candidate: &CandidateContext) -> f64 {
    match candidate.new_leader {
        None => idm::acceleration(ctx.ego_speed, None, 0.0, ctx.ego_params),
        Some(leader) => idm::acceleration(ctx.ego_speed, Some(leader.gap), ctx.ego_speed - leader.speed, ctx.ego_params),
    }
}

/// Follower disadvantage `d_F = a_F_before − a_F_after` (0 if no `F′`).
fn follower_disadvantage(ctx: &MobilContext, candidate: &CandidateContext) -> (f64, Option<f64>) {
    let Some(follower) = candidate.new_follower else {
        return (0.0, None);
    };

    let before = match follower.leader_speed_before {
        None => idm::acceleration(follower.speed, None, 0.0, &follower.params),
        Some(leader_speed) => idm::acceleration(
            follower.speed,
            Some(follower.gap_before),
            follower.speed - leader_speed,
            &follower.params,
        ),
    };
    let after = idm::acceleration(
        follower.speed,
        Some(follower.gap_after),
        follower.speed - ctx.ego_speed,
        &follower.params,
    );

    (before - after, Some(after))
}

/// Keep-bias applied to `direction`: left-hand traffic biases against
/// moving right; right-hand traffic mirrors it.
fn keep_bias(direction: Direction, keep_bias: f64, is_left_hand_traffic: bool) -> f64 {
    let moving_right = direction == Direction::Right;
    let right_is_biased_against = is_left_hand_traffic;
    if moving_right == right_is_biased_against {
        keep_bias
    } else {
        -keep_bias
    }
}

/// Evaluates one candidate direction end to end: safety overlay first, then
/// the incentive rule. Returns `None` if any safety check rejects the
/// direction or the incentive does not clear `AccelThreshold`.
pub fn evaluate_candidate(ctx: &MobilContext, candidate: &CandidateContext) -> Option<CandidateScore> {
    let aggressiveness = ctx.ego_params.aggressiveness();
    let margin = crate::mobil::safety::adjacent_margin(
        aggressiveness,
        ctx.adjacent_margin_passive,
        ctx.adjacent_margin_aggressive,
    );
    let cooldown = chain_reaction_cooldown(aggressiveness, ctx.chain_cooldown_passive, ctx.chain_cooldown_aggressive);

    if !adjacent_check_passes(&candidate.adjacent_vehicles, margin, ctx.ego_params.player_reaction_margin) {
        return None;
    }
    if !chain_reaction_check_passes(ctx.time_since_leader_change, cooldown) {
        return None;
    }

    let (d_f, follower_accel_after) = follower_disadvantage(ctx, candidate);
    if let Some(after) = follower_accel_after {
        if !follower_safety_passes(after, ctx.ego_params.safe_decel) {
            return None;
        }
    }

    let a_cur = ego_current_acceleration(ctx);
    let a_new = ego_hypothetical_acceleration(ctx, candidate);
    let bias = keep_bias(candidate.direction, ctx.ego_params.keep_bias, ctx.is_left_hand_traffic);

    let incentive = (a_new - a_cur) - ctx.ego_params.politeness * d_f - bias;
    if incentive <= ctx.ego_params.accel_threshold {
        return None;
    }

    let gap_distance = candidate.new_leader.map(|l| l.gap).unwrap_or(f64::INFINITY);

    Some(CandidateScore {
        direction: candidate.direction,
        target_lane: candidate.target_lane,
        incentive,
        bias,
        gap_distance,
    })
}

/// Evaluates both candidate directions and returns the decider's verdict:
/// the direction with the larger incentive wins; exact ties are broken in
/// favor of the direction with the smaller (less-against) keep-bias, i.e.
/// the side the vehicle is already biased to prefer.
pub fn decide(ctx: &MobilContext, candidates: &[CandidateContext]) -> MobilDecision {
    let best = candidates
        .iter()
        .filter_map(|candidate| evaluate_candidate(ctx, candidate))
        .max_by(|a, b| match a.incentive.total_cmp(&b.incentive) {
            std::cmp::Ordering::Equal => b.bias.total_cmp(&a.bias),
            other => other,
        });

    match best {
        Some(score) => MobilDecision::Accept {
            direction: score.direction,
            target_lane: score.target_lane,
            gap_distance: score.gap_distance,
        },
        None => MobilDecision::Reject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{DriverDefaults, DriverParams, DriverPersonality, VehicleKind};
    use crate::mobil::types::LeaderInfo;

    fn ego_params() -> DriverParams {
        DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default())
    }

    #[test]
    fn accepts_right_lane_change_around_slow_leader_with_empty_target_lane() {
        let params = ego_params();
        let ctx = MobilContext::with_defaults(
            20.0,
            &params,
            Some(LeaderInfo { gap: 20.0, speed: 20.0 }),
            true,
            10.0,
            None,
        );
        let candidate = CandidateContext {
            direction: Direction::Right,
            target_lane: 1,
            new_leader: None,
            new_follower: None,
            adjacent_vehicles: vec![],
        };
        let decision = decide(&ctx, &[candidate]);
        assert!(matches!(decision, MobilDecision::Accept { direction: Direction::Right, .. }));
    }

    #[test]
    fn rejects_when_adjacent_vehicle_blocks_target_lane() {
        let params = ego_params();
        let ctx = MobilContext::with_defaults(
            20.0,
            &params,
            Some(LeaderInfo { gap: 20.0, speed: 20.0 }),
            true,
            10.0,
            None,
        );
        let candidate = CandidateContext {
            direction: Direction::Right,
            target_lane: 1,
            new_leader: None,
            new_follower: None,
            adjacent_vehicles: vec![crate::mobil::types::AdjacentVehicle {
                world_distance: 5.0,
                is_player: false,
                closing_speed: 0.0,
            }],
        };
        let decision = decide(&ctx, &[candidate]);
        assert_eq!(decision, MobilDecision::Reject);
    }

    #[test]
    fn rejects_within_chain_reaction_cooldown() {
        let params = ego_params();
        let ctx = MobilContext::with_defaults(
            20.0,
            &params,
            Some(LeaderInfo { gap: 20.0, speed: 20.0 }),
            true,
            10.0,
            Some(0.2),
        );
        let candidate = CandidateContext {
            direction: Direction::Right,
            target_lane: 1,
            new_leader: None,
            new_follower: None,
            adjacent_vehicles: vec![],
        };
        assert_eq!(decide(&ctx, &[candidate]), MobilDecision::Reject);
    }

    #[test]
    fn rejects_when_follower_safety_would_be_violated() {
        let params = ego_params();
        let ctx = MobilContext::with_defaults(
            20.0,
            &params,
            Some(LeaderInfo { gap: 20.0, speed: 20.0 }),
            true,
            10.0,
            None,
        );
        let candidate = CandidateContext {
            direction: Direction::Right,
            target_lane: 1,
            new_leader: None,
            new_follower: Some(crate::mobil::types::FollowerInfo {
                vehicle_id: 99,
                params,
                speed: 30.0,
                gap_before: 100.0,
                leader_speed_before: None,
                gap_after: 0.2,
            }),
            adjacent_vehicles: vec![],
        };
        assert_eq!(decide(&ctx, &[candidate]), MobilDecision::Reject);
    }
}
