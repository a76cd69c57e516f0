use crate::agents::{DriverParams, VehicleId};
use crate::agents::Direction;
use crate::mobil::safety::{
    DEFAULT_ADJACENT_MARGIN_AGGRESSIVE, DEFAULT_ADJACENT_MARGIN_PASSIVE, DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE,
    DEFAULT_CHAIN_COOLDOWN_PASSIVE,
};

/// A leader's gap and speed, as seen by whichever vehicle is evaluating it.
#[derive(Debug, Clone, Copy)]
pub struct LeaderInfo {
    pub gap: f64,
    pub speed: f64,
}

/// The target lane's would-be follower `F′`, carrying its own driver
/// parameters so the decider can run IDM on its behalf, treating ego as
/// its new leader.
#[derive(Debug, Clone, Copy)]
pub struct FollowerInfo {
    pub vehicle_id: VehicleId,
    pub params: DriverParams,
    pub speed: f64,
    pub gap_before: f64,
    pub leader_speed_before: Option<f64>,
    pub gap_after: f64,
}

/// A vehicle found alongside ego in the target lane by the
/// `adjacent`/`worldRadius` queries, used by the layered safety overlay.
#[derive(Debug, Clone, Copy)]
pub struct AdjacentVehicle {
    pub world_distance: f64,
    pub is_player: bool,
    /// Closing speed of a player relative to ego, used to widen the margin
    /// for human-driven vehicles.
    pub closing_speed: f64,
}

/// Everything the decider needs about one candidate direction: the would-be
/// new leader `L′` and new follower `F′`.
#[derive(Debug, Clone)]
pub struct CandidateContext {
    pub direction: Direction,
    pub target_lane: u32,
    pub new_leader: Option<LeaderInfo>,
    pub new_follower: Option<FollowerInfo>,
    pub adjacent_vehicles: Vec<AdjacentVehicle>,
}

/// Ego-side context shared by both candidate directions.
#[derive(Debug, Clone, Copy)]
pub struct MobilContext<'a> {
    pub ego_speed: f64,
    pub ego_params: &'a DriverParams,
    pub current_leader: Option<LeaderInfo>,
    pub is_left_hand_traffic: bool,
    /// Seconds since the last completed lane change; evaluated only when
    /// `> LaneChangeCooldown`.
    pub time_since_last_change: f64,
    /// Seconds since `last_known_leader_id` last changed, `None` if it has
    /// never been recorded (treated as "cooldown already satisfied").
    pub time_since_leader_change: Option<f64>,
    /// Adjacent-vehicle margin (meters) at `aggressiveness = 0` / `= 1`.
    pub adjacent_margin_passive: f64,
    pub adjacent_margin_aggressive: f64,
    /// Chain-reaction cooldown (seconds) at `aggressiveness = 0` / `= 1`.
    pub chain_cooldown_passive: f64,
    pub chain_cooldown_aggressive: f64,
}

impl<'a> MobilContext<'a> {
    /// Convenience constructor filling in the default margin/cooldown
    /// endpoints; use the struct literal directly to override them from
    /// `SimConfig`.
    pub fn with_defaults(
        ego_speed: f64,
        ego_params: &'a DriverParams,
        current_leader: Option<LeaderInfo>,
        is_left_hand_traffic: bool,
        time_since_last_change: f64,
        time_since_leader_change: Option<f64>,
    ) -> Self {
        MobilContext {
            ego_speed,
            ego_params,
            current_leader,
            is_left_hand_traffic,
            time_since_last_change,
            time_since_leader_change,
            adjacent_margin_passive: DEFAULT_ADJACENT_MARGIN_PASSIVE,
            adjacent_margin_aggressive: DEFAULT_ADJACENT_MARGIN_AGGRESSIVE,
            chain_cooldown_passive: DEFAULT_CHAIN_COOLDOWN_PASSIVE,
            chain_cooldown_aggressive: DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE,
        }
    }
}

/// Outcome of evaluating one candidate direction: its incentive value if the
/// layered safety overlay passed, paired with the bias applied to it (used
/// to break exact-tie incentives).
#[derive(Debug, Clone, Copy)]
pub struct CandidateScore {
    pub direction: Direction,
    pub target_lane: u32,
    pub incentive: f64,
    pub bias: f64,
    pub gap_distance: f64,
}

/// The decider's final verdict for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MobilDecision {
    Accept {
        direction: Direction,
        target_lane: u32,
        gap_distance: f64,
    },
    Reject,
}
