use rand::Rng;

use crate::agents::{spawn_ai_vehicle, DriverDefaults, DriverPersonality, VehicleId, VehicleKind, VehicleStorage};
use crate::log_additional;
use crate::log_main;
use crate::path::{PathCatalog, PathId};
use crate::scheduler::config::SimConfig;
use crate::scheduler::error::{CoreError, SpawnError};
use crate::scheduler::players::{PlayerId, PlayerMailbox, PlayerSnapshot};
use crate::spatial::{NeighborEntry, SpatialIndex, WorldPos};
use crate::state_machine;
use crate::verbose::{
    EVENT_DESPAWN_VEHICLE, EVENT_PLAYER_STALE, EVENT_PLAYER_UPDATE, EVENT_SPAWN_VEHICLE, EVENT_TICK,
    EVENT_VEHICLE_FAULT,
};

/// A vehicle the host can render, matching the read-only fields of a
/// `getSnapshot` reply.
#[derive(Debug, Clone, Copy)]
pub struct VehicleSnapshot {
    pub vehicle_id: VehicleId,
    pub path: PathId,
    pub lane: u32,
    pub s: f64,
    pub lateral_offset: f64,
    pub yaw: f64,
    pub speed: f64,
    pub hazard_indicator: bool,
}

/// How long a player snapshot is trusted before `tick` drops it from the
/// spatial index as stale; players whose snapshot has gone stale are
/// excluded from neighbor queries for that tick.
const PLAYER_STALE_AFTER_SECONDS: f64 = 2.0;

/// The single owner of all mutable simulation state, ticked once per call to
/// [`tick`](Self::tick) by a host-owned worker thread. Single-writer core:
/// the host is responsible for calling `tick` at the configured cadence
/// from one thread.
///
/// A builder-free, directly constructed owner of a path catalog, vehicle
/// storage, and spatial index, ticking deterministically rather than
/// exposing session-keyed grids.
#[derive(Debug)]
pub struct SimulationCore {
    path_catalog: PathCatalog,
    config: SimConfig,
    vehicles: VehicleStorage,
    players: PlayerMailbox,
    player_last_seen: std::collections::HashMap<PlayerId, f64>,
    spatial: SpatialIndex,
    next_vehicle_id: VehicleId,
    now: f64,
}

impl SimulationCore {
    pub fn new(path_catalog: PathCatalog, config: SimConfig) -> Self {
        let spatial = SpatialIndex::new(config.spatial_cell_size());
        SimulationCore {
            path_catalog,
            config,
            vehicles: VehicleStorage::new(),
            players: PlayerMailbox::new(),
            player_last_seen: std::collections::HashMap::new(),
            spatial,
            next_vehicle_id: 1,
            now: 0.0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Idempotent latest-wins player update.
    pub fn update_player(&mut self, player_id: PlayerId, snapshot: PlayerSnapshot) {
        self.players.update(player_id, snapshot);
        self.player_last_seen.insert(player_id, self.now);
        log_main!(EVENT_PLAYER_UPDATE, "player snapshot updated", player_id = player_id);
    }

    /// Drops a player that has disconnected or left the session.
    pub fn remove_player(&mut self, player_id: PlayerId) {
        self.players.remove(player_id);
        self.player_last_seen.remove(&player_id);
    }

    /// Spawns a new AI vehicle, deriving its `DriverParams` from the core's
    /// configured defaults.
    pub fn spawn_ai_vehicle(
        &mut self,
        path: PathId,
        lane: u32,
        s0: f64,
        kind: VehicleKind,
        personality: DriverPersonality,
    ) -> Result<VehicleId, SpawnError> {
        let path_ref = self
            .path_catalog
            .get_path(&path)
            .ok_or(SpawnError::UnknownPath { path })?;
        if !path_ref.has_lane(lane) {
            return Err(SpawnError::InvalidLane { path, lane });
        }

        let id = self.next_vehicle_id;
        self.next_vehicle_id += 1;

        let defaults = if self.config.driver_param_jitter() {
            jitter(self.config.driver_defaults(), id)
        } else {
            *self.config.driver_defaults()
        };

        let vehicle = spawn_ai_vehicle(id, path, lane, s0, kind, personality, &defaults);
        self.vehicles.insert_vehicle(vehicle);
        log_main!(EVENT_SPAWN_VEHICLE, "vehicle spawned", vehicle_id = id, path = path, lane = lane);
        Ok(id)
    }

    /// Removes an AI vehicle by id. Errors if the id is unknown.
    pub fn despawn_ai_vehicle(&mut self, vehicle_id: VehicleId) -> Result<(), CoreError> {
        self.vehicles
            .remove_vehicle(vehicle_id)
            .map(|_| {
                log_main!(EVENT_DESPAWN_VEHICLE, "vehicle despawned by host", vehicle_id = vehicle_id);
            })
            .ok_or(CoreError::UnknownVehicle { vehicle_id })
    }

    /// Advances the simulation by one tick: rebuild the spatial index,
    /// advance every vehicle's state machine, then drop any vehicle that
    /// despawned this tick.
    pub fn tick(&mut self) {
        let dt = self.config.tick_dt();
        self.now += dt;

        self.rebuild_spatial_index();

        let ids: Vec<VehicleId> = self.vehicles.keys().copied().collect();
        for id in ids {
            let Some(mut vehicle) = self.vehicles.remove_vehicle(id) else {
                continue;
            };

            let outcome = match self.path_catalog.get_path(&vehicle.path()) {
                Some(path) => state_machine::advance(
                    &mut vehicle,
                    path,
                    &self.spatial,
                    &self.vehicles,
                    &self.config,
                    self.now,
                    dt,
                ),
                None => {
                    vehicle.despawn();
                    Ok(())
                }
            };

            if let Err(fault) = outcome {
                let reason = fault.to_string();
                log_additional!(EVENT_VEHICLE_FAULT, "vehicle fault during tick", vehicle_id = id, reason = reason.as_str());
                vehicle.despawn();
            }

            self.vehicles.insert_vehicle(vehicle);
        }

        self.vehicles.retain(|_, v| !v.is_despawned());
        self.drop_stale_players();

        log_main!(EVENT_TICK, "tick complete", now = self.now, vehicle_count = self.vehicles.len() as u64);
    }

    /// Clears and rebuilds the spatial index from every AI vehicle and every
    /// fresh player snapshot, handling straddling players separately.
    fn rebuild_spatial_index(&mut self) {
        let lane_width = self.config.lane_width();
        let cell_size = self.config.spatial_cell_size();
        let mut spatial = SpatialIndex::new(cell_size);

        let vehicle_entries = self.vehicles.values().filter(|v| !v.is_despawned()).map(|v| NeighborEntry {
            vehicle_id: v.id(),
            path: v.path(),
            lane: v.lane(),
            s: v.s(),
            length: v.kind().length(),
            speed: v.v(),
            world_pos: WorldPos::new(v.s(), v.lane() as f64 * lane_width),
            is_player: v.is_player(),
        });

        let fresh_players: Vec<(&PlayerId, &PlayerSnapshot)> =
            self.players.iter().filter(|(id, _)| !self.is_player_stale(id)).collect();

        let non_straddling_player_entries = fresh_players
            .iter()
            .filter(|(_, snapshot)| snapshot.straddled_lane.is_none())
            .map(|(id, snapshot)| player_entry(**id, **snapshot));

        spatial.rebuild(vehicle_entries.chain(non_straddling_player_entries));

        for (id, snapshot, other_lane) in fresh_players
            .iter()
            .filter_map(|(id, snapshot)| snapshot.straddled_lane.map(|other_lane| (**id, **snapshot, other_lane)))
        {
            spatial.insert_straddling_player(player_entry(id, snapshot), other_lane);
        }

        self.spatial = spatial;
    }

    fn is_player_stale(&self, player_id: &PlayerId) -> bool {
        match self.player_last_seen.get(player_id) {
            Some(last_seen) => self.now - last_seen > PLAYER_STALE_AFTER_SECONDS,
            None => false,
        }
    }

    fn drop_stale_players(&mut self) {
        let stale: Vec<PlayerId> = self
            .player_last_seen
            .iter()
            .filter(|(_, last_seen)| self.now - **last_seen > PLAYER_STALE_AFTER_SECONDS)
            .map(|(id, _)| *id)
            .collect();
        for player_id in stale {
            log_additional!(EVENT_PLAYER_STALE, "player snapshot went stale", player_id = player_id);
            self.players.remove(player_id);
            self.player_last_seen.remove(&player_id);
        }
    }

    /// A read-only render of every tracked vehicle.
    pub fn snapshot(&self) -> Vec<VehicleSnapshot> {
        self.vehicles
            .values()
            .filter(|v| !v.is_despawned())
            .map(|v| VehicleSnapshot {
                vehicle_id: v.id(),
                path: v.path(),
                lane: v.lane(),
                s: v.s(),
                lateral_offset: v.lateral_offset(),
                yaw: v.yaw(),
                speed: v.v(),
                hazard_indicator: v.hazard_indicator(),
            })
            .collect()
    }
}

fn player_entry(player_id: PlayerId, snapshot: PlayerSnapshot) -> NeighborEntry {
    NeighborEntry {
        vehicle_id: player_id,
        path: snapshot.path,
        lane: snapshot.lane,
        s: snapshot.s,
        length: VehicleKind::Car.length(),
        speed: snapshot.velocity,
        world_pos: snapshot.world_pos,
        is_player: true,
    }
}

/// Applies bounded ±5% per-driver parameter jitter, seeded from the
/// vehicle's own id so a replayed spawn sequence reproduces identical
/// parameters.
fn jitter(defaults: &DriverDefaults, seed: VehicleId) -> DriverDefaults {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut scale = || rng.random_range(0.95..=1.05);

    DriverDefaults {
        desired_speed: defaults.desired_speed * scale(),
        time_headway: defaults.time_headway * scale(),
        min_gap: defaults.min_gap * scale(),
        max_accel: defaults.max_accel * scale(),
        comfort_decel: defaults.comfort_decel * scale(),
        max_decel: defaults.max_decel * scale(),
        accel_exponent: defaults.accel_exponent,
        politeness: defaults.politeness,
        safe_decel: defaults.safe_decel,
        accel_threshold: defaults.accel_threshold,
        keep_bias: defaults.keep_bias,
        lane_change_cooldown: defaults.lane_change_cooldown,
        player_reaction_margin: defaults.player_reaction_margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Path, ZoneTag};

    fn two_lane_highway() -> PathCatalog {
        let mut catalog = PathCatalog::new();
        catalog.add_path(Path::new(1).with_length(5000.0).with_lane_count(2).with_zone(ZoneTag::Highway).build());
        catalog
    }

    #[test]
    fn spawn_rejects_unknown_path() {
        let mut core = SimulationCore::new(PathCatalog::new(), SimConfig::builder().build().unwrap());
        let result = core.spawn_ai_vehicle(99, 0, 0.0, VehicleKind::Car, DriverPersonality::Normal);
        assert!(matches!(result, Err(SpawnError::UnknownPath { .. })));
    }

    #[test]
    fn spawn_rejects_invalid_lane() {
        let mut core = SimulationCore::new(two_lane_highway(), SimConfig::builder().build().unwrap());
        let result = core.spawn_ai_vehicle(1, 5, 0.0, VehicleKind::Car, DriverPersonality::Normal);
        assert!(matches!(result, Err(SpawnError::InvalidLane { .. })));
    }

    #[test]
    fn spawned_vehicle_advances_over_several_ticks() {
        let mut core = SimulationCore::new(two_lane_highway(), SimConfig::builder().build().unwrap());
        let id = core.spawn_ai_vehicle(1, 0, 0.0, VehicleKind::Car, DriverPersonality::Normal).unwrap();

        for _ in 0..100 {
            core.tick();
        }

        let snapshot = core.snapshot();
        let vehicle = snapshot.iter().find(|v| v.vehicle_id == id).expect("vehicle must still exist");
        assert!(vehicle.s > 0.0);
        assert!(vehicle.speed > 0.0);
    }

    #[test]
    fn despawn_ai_vehicle_removes_it_from_snapshot() {
        let mut core = SimulationCore::new(two_lane_highway(), SimConfig::builder().build().unwrap());
        let id = core.spawn_ai_vehicle(1, 0, 0.0, VehicleKind::Car, DriverPersonality::Normal).unwrap();
        core.despawn_ai_vehicle(id).unwrap();
        assert!(core.snapshot().is_empty());
    }

    #[test]
    fn despawn_unknown_vehicle_is_an_error() {
        let mut core = SimulationCore::new(two_lane_highway(), SimConfig::builder().build().unwrap());
        assert!(matches!(core.despawn_ai_vehicle(42), Err(CoreError::UnknownVehicle { .. })));
    }

    #[test]
    fn vehicle_exceeding_path_length_disappears_from_snapshot() {
        let mut core = SimulationCore::new(two_lane_highway(), SimConfig::builder().build().unwrap());
        core.spawn_ai_vehicle(1, 0, 4999.5, VehicleKind::Car, DriverPersonality::Normal).unwrap();

        for _ in 0..200 {
            core.tick();
        }

        assert!(core.snapshot().is_empty());
    }
}
