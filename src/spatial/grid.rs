use std::collections::HashMap;

use crate::agents::VehicleId;
use crate::path::PathId;

/// Default cell size (meters) for the arc-length grid (≈ 200 m).
pub const DEFAULT_CELL_SIZE: f64 = 200.0;

/// A world-space position, used only for `worldRadius` queries and for the
/// straddling check on human-driven players. Conversion to/from the host's
/// own coordinate system is out of scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
}

impl WorldPos {
    pub fn new(x: f64, y: f64) -> Self {
        WorldPos { x, y }
    }

    pub fn distance_to(&self, other: &WorldPos) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A single vehicle's entry in the spatial index for the tick it was built.
#[derive(Debug, Clone, Copy)]
pub struct NeighborEntry {
    pub vehicle_id: VehicleId,
    pub path: PathId,
    pub lane: u32,
    pub s: f64,
    /// Body length in meters, subtracted (half from each side) when a
    /// caller turns this entry's arc-length gap into a bumper-to-bumper
    /// `gap` for `control::idm`.
    pub length: f64,
    pub speed: f64,
    pub world_pos: WorldPos,
    pub is_player: bool,
}

fn cell_key(path: PathId, s: f64, cell_size: f64) -> (PathId, i64) {
    (path, (s / cell_size).floor() as i64)
}

/// Coarse uniform grid keyed by `(path-id, arc-length ÷ cell_size)`,
/// rebuilt at the start of every tick.
///
/// Human-driven vehicles whose lateral position straddles two lanes are
/// inserted once per straddled lane so MOBIL treats them as present in
/// both.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<(PathId, i64), Vec<NeighborEntry>>,
    /// Flat list backing `worldRadius`, since that query is not bucketed by
    /// path/arc-length at all.
    all: Vec<NeighborEntry>,
}

impl SpatialIndex {
    pub fn new(cell_size: f64) -> Self {
        SpatialIndex {
            cell_size: if cell_size > 0.0 { cell_size } else { DEFAULT_CELL_SIZE },
            cells: HashMap::new(),
            all: Vec::new(),
        }
    }

    /// Clears and rebuilds the index from scratch. Called once per tick
    /// before any neighbor resolution.
    pub fn rebuild<I: IntoIterator<Item = NeighborEntry>>(&mut self, entries: I) {
        self.cells.clear();
        self.all.clear();
        for entry in entries {
            self.insert(entry);
        }
    }

    fn insert(&mut self, entry: NeighborEntry) {
        let key = cell_key(entry.path, entry.s, self.cell_size);
        self.cells.entry(key).or_default().push(entry);
        self.all.push(entry);
    }

    /// Inserts a player straddling two lanes under both lane indices so
    /// either lane's MOBIL evaluation treats it as present.
    pub fn insert_straddling_player(&mut self, entry: NeighborEntry, other_lane: u32) {
        self.insert(entry);
        self.insert(NeighborEntry {
            lane: other_lane,
            ..entry
        });
    }

    fn candidates(&self, path: PathId, s: f64, window: f64) -> Vec<&NeighborEntry> {
        let lo = cell_key(path, s - window, self.cell_size).1;
        let hi = cell_key(path, s + window, self.cell_size).1;
        let mut result = Vec::new();
        for bucket in lo..=hi {
            if let Some(entries) = self.cells.get(&(path, bucket)) {
                result.extend(entries.iter());
            }
        }
        result
    }

    /// Nearest vehicle with arc-length `> s` in `lane`, within `window`
    /// meters ahead (default lookahead 300 m).
    pub fn leader(&self, path: PathId, lane: u32, s: f64, window: f64) -> Option<&NeighborEntry> {
        self.candidates(path, s, window)
            .into_iter()
            .filter(|e| e.lane == lane && e.s > s && e.s - s <= window)
            .min_by(|a, b| (a.s - s).total_cmp(&(b.s - s)))
    }

    /// Nearest vehicle with arc-length `< s` in `lane`, within `window`
    /// meters behind. Symmetric to [`leader`](Self::leader).
    pub fn follower(&self, path: PathId, lane: u32, s: f64, window: f64) -> Option<&NeighborEntry> {
        self.candidates(path, s, window)
            .into_iter()
            .filter(|e| e.lane == lane && e.s < s && s - e.s <= window)
            .min_by(|a, b| (s - a.s).total_cmp(&(s - b.s)))
    }

    /// All vehicles in `lane` with `|s' − s| ≤ margin`.
    pub fn adjacent(&self, path: PathId, lane: u32, s: f64, margin: f64) -> Vec<&NeighborEntry> {
        self.candidates(path, s, margin)
            .into_iter()
            .filter(|e| e.lane == lane && (e.s - s).abs() <= margin)
            .collect()
    }

    /// All vehicles within world-space distance `r` of `pos` (used for
    /// player proximity queries).
    pub fn world_radius(&self, pos: WorldPos, r: f64) -> Vec<&NeighborEntry> {
        self.all.iter().filter(|e| e.world_pos.distance_to(&pos) <= r).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: VehicleId, path: PathId, lane: u32, s: f64) -> NeighborEntry {
        NeighborEntry {
            vehicle_id: id,
            path,
            lane,
            s,
            length: 4.5,
            speed: 20.0,
            world_pos: WorldPos::new(s, lane as f64 * 3.5),
            is_player: false,
        }
    }

    #[test]
    fn leader_finds_nearest_ahead_in_lane() {
        let mut index = SpatialIndex::new(DEFAULT_CELL_SIZE);
        index.rebuild([entry(1, 1, 0, 100.0), entry(2, 1, 0, 150.0), entry(3, 1, 1, 120.0)]);
        let leader = index.leader(1, 0, 90.0, 300.0).expect("leader must exist");
        assert_eq!(leader.vehicle_id, 1);
    }

    #[test]
    fn leader_respects_lookahead_window() {
        let mut index = SpatialIndex::new(DEFAULT_CELL_SIZE);
        index.rebuild([entry(1, 1, 0, 500.0)]);
        assert!(index.leader(1, 0, 0.0, 300.0).is_none());
        assert!(index.leader(1, 0, 250.0, 300.0).is_some());
    }

    #[test]
    fn follower_finds_nearest_behind_in_lane() {
        let mut index = SpatialIndex::new(DEFAULT_CELL_SIZE);
        index.rebuild([entry(1, 1, 0, 50.0), entry(2, 1, 0, 10.0)]);
        let follower = index.follower(1, 0, 60.0, 300.0).expect("follower must exist");
        assert_eq!(follower.vehicle_id, 1);
    }

    #[test]
    fn adjacent_returns_all_vehicles_within_margin() {
        let mut index = SpatialIndex::new(DEFAULT_CELL_SIZE);
        index.rebuild([entry(1, 1, 1, 105.0), entry(2, 1, 1, 300.0)]);
        let found = index.adjacent(1, 1, 100.0, 10.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].vehicle_id, 1);
    }

    #[test]
    fn world_radius_ignores_path_and_lane() {
        let mut index = SpatialIndex::new(DEFAULT_CELL_SIZE);
        index.rebuild([entry(1, 1, 0, 0.0), entry(2, 2, 3, 0.0)]);
        let near = WorldPos::new(0.0, 0.0);
        assert_eq!(index.world_radius(near, 1.0).len(), 2);
    }

    #[test]
    fn straddling_player_is_visible_in_both_lanes() {
        let mut index = SpatialIndex::new(DEFAULT_CELL_SIZE);
        index.rebuild(std::iter::empty());
        index.insert_straddling_player(entry(9, 1, 0, 100.0), 1);
        assert!(index.adjacent(1, 0, 100.0, 5.0).iter().any(|e| e.vehicle_id == 9));
        assert!(index.adjacent(1, 1, 100.0, 5.0).iter().any(|e| e.vehicle_id == 9));
    }
}
