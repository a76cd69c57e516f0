//! # Spatial Module
//!
//! A coarse uniform grid keyed by `(path-id, arc-length bucket)`, rebuilt
//! every tick, plus a world-space radius query for player proximity.
pub mod grid;

pub use grid::{NeighborEntry, SpatialIndex, WorldPos, DEFAULT_CELL_SIZE};
