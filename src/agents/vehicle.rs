use crate::agents::driver_params::DriverParams;
use crate::agents::personality::DriverPersonality;
use crate::agents::vehicle_kind::VehicleKind;
use crate::path::PathId;

pub type VehicleId = u64;

/// Lane-change direction, also used to orient steering yaw and MOBIL
/// keep-bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// +1 for `Right`, -1 for `Left`; matches the `sign(direction)` term in
    /// the steering-yaw formula.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// The vehicle's discrete lane-change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Longitudinal-only driving; may carry a [`LaneChangePlan`].
    Cruise,
    /// Mid lane-change, lateral offset interpolating from `start_lane` to `target_lane`.
    Changing,
    /// Mid abort, lateral offset easing back to zero.
    Aborting,
    /// Removed from the simulation; all lane-change bookkeeping cleared.
    Despawned,
}

/// A MOBIL-accepted lane change that has not yet been executed because the
/// ego is not yet obstacle-limited (plan-then-execute).
#[derive(Debug, Clone, Copy)]
pub struct LaneChangePlan {
    pub direction: Direction,
    pub target_lane: u32,
    pub gap_distance: f64,
}

/// The active interpolation state while `phase` is `Changing` or `Aborting`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaneChangeManeuver {
    pub start_lane: u32,
    pub target_lane: u32,
    pub start_time: f64,
    pub duration: f64,
    pub lateral_offset: f64,
    pub lateral_velocity: f64,
    pub planned_direction: Option<Direction>,
    /// Captured lateral offset at the instant `Changing` became `Aborting`.
    pub abort_start_offset: f64,
    pub abort_start_time: f64,
    /// Progress `elapsed / duration` clamped to `[0, 1]`, refreshed every
    /// tick by `state_machine::tick::advance`. Drives both the `lane()`
    /// neighbor-query rule and the abort-collision window.
    pub progress: f64,
}

/// Per-vehicle mutable simulation state.
///
/// Constructed with the builder returned by [`VehicleState::new`], then
/// advanced tick by tick by `state_machine::tick::advance`.
#[derive(Debug, Clone)]
pub struct VehicleState {
    id: VehicleId,
    kind: VehicleKind,
    params: DriverParams,
    is_player: bool,

    path: PathId,
    lane: u32,
    s: f64,
    v: f64,
    accel: f64,
    yaw: f64,

    phase: Phase,
    plan: Option<LaneChangePlan>,
    maneuver: LaneChangeManeuver,
    hazard_indicator: bool,

    last_lane_change_time: f64,
    last_known_leader_id: Option<VehicleId>,
    new_obstacle_appeared_time: Option<f64>,
}

impl VehicleState {
    /// Constructs a new [`VehicleStateBuilder`].
    ///
    /// # Example
    /// ```rust
    /// use dense_traffic_core::agents::{VehicleState, VehicleKind, DriverPersonality, DriverDefaults, DriverParams};
    ///
    /// let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
    /// let vehicle = VehicleState::new(1, VehicleKind::Car, params)
    ///     .with_path(7)
    ///     .with_lane(0)
    ///     .with_arc_length(0.0)
    ///     .build();
    /// assert_eq!(vehicle.id(), 1);
    /// ```
    pub fn new(id: VehicleId, kind: VehicleKind, params: DriverParams) -> VehicleStateBuilder {
        VehicleStateBuilder {
            vehicle: VehicleState {
                id,
                kind,
                params,
                is_player: false,
                path: 0,
                lane: 0,
                s: 0.0,
                v: 0.0,
                accel: 0.0,
                yaw: 0.0,
                phase: Phase::Cruise,
                plan: None,
                maneuver: LaneChangeManeuver::default(),
                hazard_indicator: false,
                last_lane_change_time: f64::NEG_INFINITY,
                last_known_leader_id: None,
                new_obstacle_appeared_time: None,
            },
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub fn path(&self) -> PathId {
        self.path
    }

    pub fn set_path(&mut self, path: PathId) {
        self.path = path;
    }

    /// Lane the vehicle is considered to occupy for neighbor queries: still
    /// `start_lane` while `Changing` with progress below 0.5, otherwise the
    /// resting/target lane.
    pub fn lane(&self) -> u32 {
        match self.phase {
            Phase::Changing if self.maneuver.progress < 0.5 => self.maneuver.start_lane,
            Phase::Changing => self.maneuver.target_lane,
            _ => self.lane,
        }
    }

    /// The vehicle's resting lane, ignoring any in-progress `Changing` interpolation.
    pub fn resting_lane(&self) -> u32 {
        self.lane
    }

    pub fn set_lane(&mut self, lane: u32) {
        self.lane = lane;
    }

    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn set_s(&mut self, s: f64) {
        self.s = s;
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    pub fn set_v(&mut self, v: f64) {
        self.v = v.max(0.0);
    }

    pub fn accel(&self) -> f64 {
        self.accel
    }

    pub fn set_accel(&mut self, accel: f64) {
        self.accel = accel;
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        self.yaw = yaw;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn plan(&self) -> Option<LaneChangePlan> {
        self.plan
    }

    pub fn set_plan(&mut self, plan: Option<LaneChangePlan>) {
        self.plan = plan;
    }

    pub fn maneuver(&self) -> &LaneChangeManeuver {
        &self.maneuver
    }

    pub fn maneuver_mut(&mut self) -> &mut LaneChangeManeuver {
        &mut self.maneuver
    }

    pub fn hazard_indicator(&self) -> bool {
        self.hazard_indicator
    }

    pub fn set_hazard_indicator(&mut self, on: bool) {
        self.hazard_indicator = on;
    }

    pub fn lateral_offset(&self) -> f64 {
        match self.phase {
            Phase::Cruise | Phase::Despawned => 0.0,
            Phase::Changing | Phase::Aborting => self.maneuver.lateral_offset,
        }
    }

    pub fn last_lane_change_time(&self) -> f64 {
        self.last_lane_change_time
    }

    pub fn last_known_leader_id(&self) -> Option<VehicleId> {
        self.last_known_leader_id
    }

    /// Progress of the current `Changing`/`Aborting` maneuver given the
    /// current simulation time, clamped to `[0, 1]`. Does not mutate state;
    /// `state_machine::tick::advance` is responsible for writing the result
    /// back into `maneuver.progress`.
    pub fn progress_at(&self, now: f64) -> f64 {
        if self.maneuver.duration <= 0.0 {
            return 1.0;
        }
        match self.phase {
            Phase::Changing => ((now - self.maneuver.start_time) / self.maneuver.duration).clamp(0.0, 1.0),
            Phase::Aborting => ((now - self.maneuver.abort_start_time) / self.maneuver.duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Records that the lane change starting now has cleared cooldown, and
    /// flips the resting lane and phase to `Cruise`. Called by the state
    /// machine on `Changing → Cruise` (progress reaches 1.0).
    pub fn complete_lane_change(&mut self, now: f64) {
        self.lane = self.maneuver.target_lane;
        self.maneuver = LaneChangeManeuver::default();
        self.phase = Phase::Cruise;
        self.plan = None;
        self.last_lane_change_time = now;
    }

    /// `Aborting → Cruise`: lane remains `start_lane`;
    /// `last_lane_change_time` is intentionally **not** updated, since the
    /// change never occurred.
    pub fn complete_abort(&mut self) {
        self.lane = self.maneuver.start_lane;
        self.maneuver = LaneChangeManeuver::default();
        self.phase = Phase::Cruise;
        self.hazard_indicator = false;
    }

    /// Notes a change in leader identity, resetting the chain-reaction guard
    /// timer and dropping any pending plan.
    pub fn note_leader_change(&mut self, new_leader: Option<VehicleId>, now: f64) {
        if new_leader != self.last_known_leader_id {
            self.new_obstacle_appeared_time = Some(now);
            self.plan = None;
        }
        self.last_known_leader_id = new_leader;
    }

    pub fn new_obstacle_appeared_time(&self) -> Option<f64> {
        self.new_obstacle_appeared_time
    }

    pub fn begin_lane_change(&mut self, direction: Direction, target_lane: u32, now: f64, duration: f64) {
        self.maneuver = LaneChangeManeuver {
            start_lane: self.lane,
            target_lane,
            start_time: now,
            duration,
            lateral_offset: 0.0,
            lateral_velocity: 0.0,
            planned_direction: Some(direction),
            abort_start_offset: 0.0,
            abort_start_time: 0.0,
        };
        self.phase = Phase::Changing;
        self.plan = None;
    }

    pub fn begin_abort(&mut self, now: f64, progress: f64) {
        let duration = (2.0 * progress).clamp(0.5, 2.0);
        self.maneuver.abort_start_offset = self.maneuver.lateral_offset;
        self.maneuver.abort_start_time = now;
        self.maneuver.duration = duration;
        self.phase = Phase::Aborting;
        self.hazard_indicator = true;
    }

    /// Resets all lane-change and obstacle bookkeeping and marks the
    /// vehicle `Despawned`.
    pub fn despawn(&mut self) {
        self.phase = Phase::Despawned;
        self.plan = None;
        self.maneuver = LaneChangeManeuver::default();
        self.hazard_indicator = false;
        self.last_known_leader_id = None;
        self.new_obstacle_appeared_time = None;
    }

    pub fn is_despawned(&self) -> bool {
        matches!(self.phase, Phase::Despawned)
    }
}

/// Builder for [`VehicleState`], matching the `with_*`/`build` shape used
/// throughout the crate's data model.
pub struct VehicleStateBuilder {
    vehicle: VehicleState,
}

impl VehicleStateBuilder {
    pub fn with_path(mut self, path: PathId) -> Self {
        self.vehicle.path = path;
        self
    }

    pub fn with_lane(mut self, lane: u32) -> Self {
        self.vehicle.lane = lane;
        self
    }

    pub fn with_arc_length(mut self, s: f64) -> Self {
        self.vehicle.s = s;
        self
    }

    pub fn with_speed(mut self, v: f64) -> Self {
        self.vehicle.v = v.max(0.0);
        self
    }

    pub fn as_player(mut self) -> Self {
        self.vehicle.is_player = true;
        self
    }

    pub fn build(self) -> VehicleState {
        self.vehicle
    }
}

/// Convenience constructor bundling kind + personality derivation, mirroring
/// `spawnAiVehicle`'s `{ path, lane, s0, kind, personality }` request shape.
pub fn spawn_ai_vehicle(
    id: VehicleId,
    path: PathId,
    lane: u32,
    s0: f64,
    kind: VehicleKind,
    personality: DriverPersonality,
    defaults: &crate::agents::driver_params::DriverDefaults,
) -> VehicleState {
    let params = DriverParams::derive(kind, personality, defaults);
    VehicleState::new(id, kind, params)
        .with_path(path)
        .with_lane(lane)
        .with_arc_length(s0)
        .build()
}
