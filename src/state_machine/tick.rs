use std::fmt;

use crate::agents::{DriverParams, Direction, LaneChangePlan, Phase, VehicleId, VehicleState, VehicleStorage};
use crate::control::idm;
use crate::log_additional;
use crate::log_detailed;
use crate::mobil::types::{AdjacentVehicle, CandidateContext, FollowerInfo, LeaderInfo, MobilContext};
use crate::mobil::{decide, MobilDecision};
use crate::path::Path;
use crate::scheduler::config::SimConfig;
use crate::spatial::{NeighborEntry, SpatialIndex, WorldPos};
use crate::trajectory::{abort, quintic, steering};
use crate::verbose::{
    EVENT_LANE_CHANGE_ABORT, EVENT_LANE_CHANGE_COMPLETE, EVENT_LANE_CHANGE_EXECUTE, EVENT_LANE_CHANGE_PLAN,
    EVENT_NEIGHBORS,
};

/// An unexpected fault during a single vehicle's per-tick update. The
/// scheduler despawns the vehicle and continues the tick; it never
/// propagates as a hard error.
#[derive(Debug, Clone, Copy)]
pub enum VehicleFault {
    /// Integration produced a non-finite speed or arc-length position.
    NonFiniteState { vehicle_id: VehicleId },
}

impl fmt::Display for VehicleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleFault::NonFiniteState { vehicle_id } => {
                write!(f, "vehicle '{}' produced a non-finite state during integration", vehicle_id)
            }
        }
    }
}

impl std::error::Error for VehicleFault {}

/// A candidate lane change is executed only once the ego is obstacle-
/// limited; this factor over the IDM desired dynamic gap sets how close the
/// leader must be before a planned change fires — its longitudinal gap to
/// the current leader falls within a threshold that would cause material
/// deceleration.
const OBSTACLE_LIMITED_FACTOR: f64 = 1.5;

/// Extra radius (meters) added on top of the configured adjacent-vehicle
/// margins when querying the spatial index, so the query window always
/// covers the widened player margin before per-entry filtering narrows it
/// back down to the real margin.
const ADJACENT_QUERY_PADDING: f64 = 30.0;

/// Arc-length bumper-to-bumper gap between a leader at `leader_s` and a
/// follower at `follower_s`, accounting for both vehicle bodies.
fn arc_gap(leader_s: f64, follower_s: f64, leader_length: f64, follower_length: f64) -> f64 {
    (leader_s - follower_s) - (leader_length + follower_length) / 2.0
}

/// Local planar proxy for a world position, used only for the adjacent-
/// vehicle safety check's world-space distance requirement. Spline-to-world
/// conversion is out of scope; AI vehicles are approximated here the same
/// way the spatial index's own tests do: arc length as one axis, lane
/// offset as the other.
fn local_world_pos(s: f64, lane: u32, lane_width: f64) -> WorldPos {
    WorldPos::new(s, lane as f64 * lane_width)
}

/// Advances one vehicle by one tick.
///
/// `storage` must not contain `vehicle` itself — callers remove it from
/// the storage before calling `advance` and reinsert it afterward, so a
/// would-be follower's own `DriverParams` can be looked up without a
/// second mutable borrow of the same entity.
pub fn advance(
    vehicle: &mut VehicleState,
    path: &Path,
    index: &SpatialIndex,
    storage: &VehicleStorage,
    config: &SimConfig,
    now: f64,
    dt: f64,
) -> Result<(), VehicleFault> {
    let lane = vehicle.lane();
    let lookahead = config.lookahead_window();
    let ego_length = vehicle.kind().length();

    let current_leader = index
        .leader(path.id(), lane, vehicle.s(), lookahead)
        .filter(|e| e.vehicle_id != vehicle.id());
    let current_leader_id = current_leader.map(|e| e.vehicle_id);
    vehicle.note_leader_change(current_leader_id, now);
    log_detailed!(
        EVENT_NEIGHBORS,
        "resolved current-lane leader",
        vehicle_id = vehicle.id(),
        has_leader = current_leader.is_some(),
    );

    let leader_info = current_leader.map(|e| LeaderInfo {
        gap: arc_gap(e.s, vehicle.s(), e.length, ego_length),
        speed: e.speed,
    });
    let delta_v_leader = leader_info.map(|l| vehicle.v() - l.speed).unwrap_or(0.0);
    let gap = leader_info.map(|l| l.gap);
    let accel = idm::acceleration(vehicle.v(), gap, delta_v_leader, vehicle.params());

    let prev_v = vehicle.v();
    let new_v = (prev_v + accel * dt).max(0.0);
    let new_s = vehicle.s() + prev_v * dt + 0.5 * accel * dt * dt;
    if !new_v.is_finite() || !new_s.is_finite() {
        return Err(VehicleFault::NonFiniteState { vehicle_id: vehicle.id() });
    }
    vehicle.set_v(new_v);
    vehicle.set_s(new_s);
    vehicle.set_accel(accel);

    match vehicle.phase() {
        Phase::Cruise => run_cruise(vehicle, path, index, storage, config, now, leader_info),
        Phase::Changing => run_changing(vehicle, path, index, config, now),
        Phase::Aborting => run_aborting(vehicle, now),
        Phase::Despawned => {}
    }

    if vehicle.s() > path.length() {
        vehicle.despawn();
    }

    Ok(())
}

fn run_cruise(
    vehicle: &mut VehicleState,
    path: &Path,
    index: &SpatialIndex,
    storage: &VehicleStorage,
    config: &SimConfig,
    now: f64,
    leader_info: Option<LeaderInfo>,
) {
    vehicle.set_yaw(0.0);

    let time_since_last_change = now - vehicle.last_lane_change_time();
    if time_since_last_change > vehicle.params().lane_change_cooldown && leader_info.is_some() {
        let ctx = MobilContext {
            ego_speed: vehicle.v(),
            ego_params: vehicle.params(),
            current_leader: leader_info,
            is_left_hand_traffic: config.is_left_hand_traffic(),
            time_since_last_change,
            time_since_leader_change: vehicle.new_obstacle_appeared_time().map(|t| now - t),
            adjacent_margin_passive: config.adjacent_margin_passive(),
            adjacent_margin_aggressive: config.adjacent_margin_aggressive(),
            chain_cooldown_passive: config.chain_cooldown_passive(),
            chain_cooldown_aggressive: config.chain_cooldown_aggressive(),
        };
        let candidates = build_candidates(vehicle, path, index, storage, config);
        match decide(&ctx, &candidates) {
            MobilDecision::Accept { direction, target_lane, gap_distance } => {
                let direction_str = format!("{:?}", direction);
                log_additional!(
                    EVENT_LANE_CHANGE_PLAN,
                    "lane change planned",
                    vehicle_id = vehicle.id(),
                    direction = direction_str.as_str(),
                    target_lane = target_lane,
                    gap_distance = gap_distance,
                );
                vehicle.set_plan(Some(LaneChangePlan { direction, target_lane, gap_distance }));
            }
            MobilDecision::Reject => {
                vehicle.set_plan(None);
            }
        }
    }

    if let Some(plan) = vehicle.plan() {
        let delta_v = leader_info.map(|l| vehicle.v() - l.speed).unwrap_or(0.0);
        let gap = leader_info.map(|l| l.gap);
        if obstacle_limited(gap, vehicle.v(), delta_v, vehicle.params()) {
            let duration = quintic::duration_from_speed(vehicle.v());
            log_additional!(
                EVENT_LANE_CHANGE_EXECUTE,
                "lane change executing",
                vehicle_id = vehicle.id(),
                target_lane = plan.target_lane,
                duration = duration,
            );
            vehicle.begin_lane_change(plan.direction, plan.target_lane, now, duration);
        }
    }
}

fn obstacle_limited(gap: Option<f64>, v: f64, delta_v: f64, params: &DriverParams) -> bool {
    match gap {
        None => false,
        Some(gap) => gap <= idm::desired_dynamic_gap(v, delta_v, params) * OBSTACLE_LIMITED_FACTOR,
    }
}

fn build_candidates(
    vehicle: &VehicleState,
    path: &Path,
    index: &SpatialIndex,
    storage: &VehicleStorage,
    config: &SimConfig,
) -> Vec<CandidateContext> {
    let lane = vehicle.resting_lane();
    let mut candidates = Vec::with_capacity(2);
    if lane > 0 {
        if let Some(candidate) = build_one_candidate(vehicle, path, lane - 1, Direction::Left, index, storage, config) {
            candidates.push(candidate);
        }
    }
    if lane + 1 < path.lane_count() {
        if let Some(candidate) = build_one_candidate(vehicle, path, lane + 1, Direction::Right, index, storage, config)
        {
            candidates.push(candidate);
        }
    }
    candidates
}

fn build_one_candidate(
    vehicle: &VehicleState,
    path: &Path,
    target_lane: u32,
    direction: Direction,
    index: &SpatialIndex,
    storage: &VehicleStorage,
    config: &SimConfig,
) -> Option<CandidateContext> {
    let ego_length = vehicle.kind().length();
    let lookahead = config.lookahead_window();

    let leader_entry = index
        .leader(path.id(), target_lane, vehicle.s(), lookahead)
        .filter(|e| e.vehicle_id != vehicle.id());
    let new_leader = leader_entry.map(|e| LeaderInfo {
        gap: arc_gap(e.s, vehicle.s(), e.length, ego_length),
        speed: e.speed,
    });

    let follower_entry = index
        .follower(path.id(), target_lane, vehicle.s(), lookahead)
        .filter(|e| e.vehicle_id != vehicle.id());
    let new_follower = follower_entry.and_then(|f_entry| {
        let follower_state = storage.get(&f_entry.vehicle_id)?;
        let leader_before = index
            .leader(path.id(), target_lane, f_entry.s, lookahead)
            .filter(|e| e.vehicle_id != f_entry.vehicle_id);
        let gap_before = leader_before.map(|e| arc_gap(e.s, f_entry.s, e.length, f_entry.length));
        let leader_speed_before = leader_before.map(|e| e.speed);
        let gap_after = arc_gap(vehicle.s(), f_entry.s, ego_length, f_entry.length);
        Some(FollowerInfo {
            vehicle_id: f_entry.vehicle_id,
            params: *follower_state.params(),
            speed: f_entry.speed,
            gap_before: gap_before.unwrap_or(f64::INFINITY),
            leader_speed_before,
            gap_after,
        })
    });

    let margin_radius = config
        .adjacent_margin_passive()
        .max(config.adjacent_margin_aggressive())
        + ADJACENT_QUERY_PADDING;
    let ego_world_pos = local_world_pos(vehicle.s(), lane_for_pos(vehicle), config.lane_width());
    let adjacent_vehicles: Vec<AdjacentVehicle> = index
        .adjacent(path.id(), target_lane, vehicle.s(), margin_radius)
        .into_iter()
        .filter(|e| e.vehicle_id != vehicle.id())
        .map(|e| adjacent_vehicle(vehicle, e, ego_world_pos))
        .collect();

    Some(CandidateContext {
        direction,
        target_lane,
        new_leader,
        new_follower,
        adjacent_vehicles,
    })
}

fn lane_for_pos(vehicle: &VehicleState) -> u32 {
    vehicle.resting_lane()
}

fn adjacent_vehicle(vehicle: &VehicleState, entry: &NeighborEntry, ego_world_pos: WorldPos) -> AdjacentVehicle {
    let world_distance = if entry.is_player {
        ego_world_pos.distance_to(&entry.world_pos)
    } else {
        (entry.s - vehicle.s()).abs()
    };
    AdjacentVehicle {
        world_distance,
        is_player: entry.is_player,
        closing_speed: (vehicle.v() - entry.speed).abs(),
    }
}

fn run_changing(vehicle: &mut VehicleState, path: &Path, index: &SpatialIndex, config: &SimConfig, now: f64) {
    let progress = vehicle.progress_at(now);
    let start_lane = vehicle.maneuver().start_lane;
    let target_lane = vehicle.maneuver().target_lane;
    let duration = vehicle.maneuver().duration;
    let delta_w = config.lane_width() * (target_lane as i64 - start_lane as i64).unsigned_abs() as f64;
    let direction = vehicle.maneuver().planned_direction.unwrap_or(Direction::Right);

    let offset = quintic::offset(progress, delta_w);
    let lateral_velocity = quintic::velocity(progress, delta_w, duration);
    let yaw = steering::yaw(progress, vehicle.v(), direction);

    {
        let maneuver = vehicle.maneuver_mut();
        maneuver.progress = progress;
        maneuver.lateral_offset = offset;
        maneuver.lateral_velocity = lateral_velocity;
    }
    vehicle.set_yaw(yaw);

    if (0.1..=0.9).contains(&progress) {
        if collision_in_target_lane(vehicle, path, target_lane, progress, index, config) {
            log_additional!(
                EVENT_LANE_CHANGE_ABORT,
                "lane change aborted",
                vehicle_id = vehicle.id(),
                progress = progress,
            );
            vehicle.begin_abort(now, progress);
            return;
        }
    }

    if progress >= 1.0 {
        log_additional!(
            EVENT_LANE_CHANGE_COMPLETE,
            "lane change completed",
            vehicle_id = vehicle.id(),
            target_lane = target_lane,
        );
        vehicle.complete_lane_change(now);
    }
}

/// Dynamic collision margin for the mid-merge abort check: `lerp(8 m at
/// edges, 20 m at progress = 0.5)`.
fn abort_margin(progress: f64) -> f64 {
    let triangular = 1.0 - (progress - 0.5).abs() * 2.0;
    8.0 + (20.0 - 8.0) * triangular.clamp(0.0, 1.0)
}

fn collision_in_target_lane(
    vehicle: &VehicleState,
    path: &Path,
    target_lane: u32,
    progress: f64,
    index: &SpatialIndex,
    config: &SimConfig,
) -> bool {
    let margin = abort_margin(progress);
    let query_radius = margin + ADJACENT_QUERY_PADDING;
    let ego_world_pos = local_world_pos(vehicle.s(), lane_for_pos(vehicle), config.lane_width());

    index
        .adjacent(path.id(), target_lane, vehicle.s(), query_radius)
        .into_iter()
        .filter(|e| e.vehicle_id != vehicle.id())
        .any(|e| {
            if e.is_player {
                let closing_speed = (vehicle.v() - e.speed).abs();
                let effective_margin =
                    crate::mobil::safety::player_margin(margin, closing_speed, vehicle.params().player_reaction_margin);
                ego_world_pos.distance_to(&e.world_pos) <= effective_margin
            } else {
                (e.s - vehicle.s()).abs() <= margin
            }
        })
}

fn run_aborting(vehicle: &mut VehicleState, now: f64) {
    let tau = vehicle.progress_at(now);
    let o0 = vehicle.maneuver().abort_start_offset;
    let original_direction = vehicle.maneuver().planned_direction.unwrap_or(Direction::Right);

    let offset = abort::offset(o0, tau);
    let yaw = steering::abort_yaw(tau, vehicle.v(), original_direction);

    vehicle.maneuver_mut().lateral_offset = offset;
    vehicle.set_yaw(yaw);

    if tau >= 1.0 {
        vehicle.complete_abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{DriverDefaults, DriverParams, DriverPersonality, VehicleKind};
    use crate::path::{Path, ZoneTag};

    fn config() -> SimConfig {
        SimConfig::builder().build().unwrap()
    }

    fn straight_path() -> Path {
        Path::new(1).with_length(5000.0).with_lane_count(2).with_zone(ZoneTag::Highway).build()
    }

    fn normal_car(id: VehicleId, s: f64, v: f64) -> VehicleState {
        let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
        VehicleState::new(id, VehicleKind::Car, params)
            .with_path(1)
            .with_lane(0)
            .with_arc_length(s)
            .with_speed(v)
            .build()
    }

    #[test]
    fn free_road_vehicle_accelerates_toward_desired_speed() {
        let path = straight_path();
        let index = SpatialIndex::new(200.0);
        let storage = VehicleStorage::new();
        let config = config();
        let mut vehicle = normal_car(1, 0.0, 20.0);

        for _ in 0..(50 * 60) {
            advance(&mut vehicle, &path, &index, &storage, &config, 0.0, config.tick_dt()).unwrap();
        }

        assert!((vehicle.v() - vehicle.params().desired_speed).abs() < 0.5);
    }

    #[test]
    fn vehicle_despawns_past_path_end() {
        let path = Path::new(1).with_length(10.0).with_lane_count(1).build();
        let index = SpatialIndex::new(200.0);
        let storage = VehicleStorage::new();
        let config = config();
        let mut vehicle = normal_car(1, 9.0, 30.0);

        advance(&mut vehicle, &path, &index, &storage, &config, 0.0, config.tick_dt()).unwrap();

        assert!(vehicle.is_despawned());
    }

    #[test]
    fn changing_vehicle_reaches_target_lane_after_full_duration() {
        let path = straight_path();
        let index = SpatialIndex::new(200.0);
        let storage = VehicleStorage::new();
        let config = config();
        let mut vehicle = normal_car(1, 100.0, 25.0);
        vehicle.begin_lane_change(Direction::Right, 1, 0.0, 4.0);

        let dt = config.tick_dt();
        let mut now = 0.0;
        while now < 4.2 {
            now += dt;
            advance(&mut vehicle, &path, &index, &storage, &config, now, dt).unwrap();
        }

        assert_eq!(vehicle.phase(), Phase::Cruise);
        assert_eq!(vehicle.resting_lane(), 1);
    }

    #[test]
    fn abort_margin_peaks_at_half_progress() {
        assert!((abort_margin(0.0) - 8.0).abs() < 1e-9);
        assert!((abort_margin(1.0) - 8.0).abs() < 1e-9);
        assert!((abort_margin(0.5) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn a_vehicle_appearing_mid_merge_aborts_the_maneuver() {
        let path = straight_path();
        let storage = VehicleStorage::new();
        let config = config();
        let mut vehicle = normal_car(1, 100.0, 25.0);
        vehicle.begin_lane_change(Direction::Right, 1, 0.0, 4.0);

        let dt = config.tick_dt();
        let mut now = 0.0;
        let mut index = SpatialIndex::new(200.0);

        // Let the maneuver reach its midpoint with the target lane clear.
        while now < 2.0 {
            now += dt;
            advance(&mut vehicle, &path, &index, &storage, &config, now, dt).unwrap();
        }
        assert_eq!(vehicle.phase(), Phase::Changing);

        // A vehicle appears right beside the ego in the target lane.
        index.rebuild([NeighborEntry {
            vehicle_id: 99,
            path: path.id(),
            lane: 1,
            s: vehicle.s() + 2.0,
            length: VehicleKind::Car.length(),
            speed: 25.0,
            world_pos: crate::spatial::WorldPos::new(vehicle.s() + 2.0, 1.0 * config.lane_width()),
            is_player: false,
        }]);

        advance(&mut vehicle, &path, &index, &storage, &config, now + dt, dt).unwrap();
        assert_eq!(vehicle.phase(), Phase::Aborting);

        // Run the abort to completion and confirm the vehicle settles back
        // into its original lane rather than the target.
        let mut tau_now = now + dt;
        index.rebuild(std::iter::empty());
        while vehicle.phase() == Phase::Aborting {
            tau_now += dt;
            advance(&mut vehicle, &path, &index, &storage, &config, tau_now, dt).unwrap();
        }
        assert_eq!(vehicle.phase(), Phase::Cruise);
        assert_eq!(vehicle.resting_lane(), 0);
    }
}
