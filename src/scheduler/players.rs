use std::collections::HashMap;

use crate::path::PathId;
use crate::spatial::WorldPos;

/// Opaque session identifier for a human-driven player, matching
/// `updatePlayer(session_id, ...)`.
pub type PlayerId = u64;

/// The host's latest-known state for one player.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    pub path: PathId,
    pub s: f64,
    pub world_pos: WorldPos,
    /// Signed speed along the path, m/s.
    pub velocity: f64,
    /// Nominal lane derived from lateral position.
    pub lane: u32,
    /// When `Some`, the player's lateral position straddles `lane` and this
    /// adjacent lane, and both are populated in the spatial index.
    pub straddled_lane: Option<u32>,
}

/// Bounded, latest-wins mailbox of player snapshots: delivered via a
/// bounded mailbox where the most recent snapshot per player wins.
///
/// A literal cross-thread channel is a hosting concern; this type is the
/// idempotent latest-wins map the host drains into once per tick, matching
/// `updatePlayer`'s idempotent set-by-latest-wins contract.
#[derive(Debug, Default)]
pub struct PlayerMailbox {
    snapshots: HashMap<PlayerId, PlayerSnapshot>,
}

impl PlayerMailbox {
    pub fn new() -> Self {
        PlayerMailbox { snapshots: HashMap::new() }
    }

    /// Idempotent set by latest wins.
    pub fn update(&mut self, player_id: PlayerId, snapshot: PlayerSnapshot) {
        self.snapshots.insert(player_id, snapshot);
    }

    /// Drops a player that has disconnected or left the session.
    pub fn remove(&mut self, player_id: PlayerId) -> Option<PlayerSnapshot> {
        self.snapshots.remove(&player_id)
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&PlayerSnapshot> {
        self.snapshots.get(player_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerSnapshot)> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(s: f64) -> PlayerSnapshot {
        PlayerSnapshot {
            path: 1,
            s,
            world_pos: WorldPos::new(s, 0.0),
            velocity: 20.0,
            lane: 0,
            straddled_lane: None,
        }
    }

    #[test]
    fn latest_update_wins() {
        let mut mailbox = PlayerMailbox::new();
        mailbox.update(1, snapshot(10.0));
        mailbox.update(1, snapshot(20.0));
        assert_eq!(mailbox.len(), 1);
        assert_eq!(mailbox.get(&1).unwrap().s, 20.0);
    }

    #[test]
    fn remove_clears_player() {
        let mut mailbox = PlayerMailbox::new();
        mailbox.update(1, snapshot(10.0));
        mailbox.remove(1);
        assert!(mailbox.get(&1).is_none());
    }
}
