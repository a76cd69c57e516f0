//! # dense_traffic_core
//!
//! A fixed-rate, single-writer simulation core for dense AI traffic sharing
//! a road network with human-driven players: Intelligent Driver Model
//! car-following, MOBIL lane changes with a layered safety overlay, and
//! quintic-polynomial lateral trajectories for smooth merges and aborts.
//!
//! ## Layout
//!
//! - [`agents`] — vehicle kind, driver personality, derived driver
//!   parameters, and the mutable per-vehicle state
//! - [`control`] — the IDM longitudinal acceleration function
//! - [`mobil`] — the MOBIL lane-change decider and its safety overlay
//! - [`trajectory`] — quintic offset/velocity curves, steering-yaw
//!   animation, and the abort ease-out
//! - [`path`] — the read-only path/lane catalog vehicles drive along
//! - [`spatial`] — the per-tick neighbor index
//! - [`state_machine`] — the per-vehicle, per-tick update tying the above
//!   together
//! - [`scheduler`] — [`scheduler::SimulationCore`], the host-facing entry
//!   point: configuration, vehicle spawn/despawn, player snapshots, and
//!   `tick`
//! - [`verbose`] — structured `tracing`-backed logging, off the hot path
//!   unless enabled
//!
//! ## Example
//!
//! ```rust
//! use dense_traffic_core::agents::{DriverPersonality, VehicleKind};
//! use dense_traffic_core::path::{Path, PathCatalog, ZoneTag};
//! use dense_traffic_core::scheduler::{SimConfig, SimulationCore};
//!
//! let mut catalog = PathCatalog::new();
//! catalog.add_path(Path::new(1).with_length(5000.0).with_lane_count(2).with_zone(ZoneTag::Highway).build());
//!
//! let config = SimConfig::builder().build().unwrap();
//! let mut core = SimulationCore::new(catalog, config);
//! core.spawn_ai_vehicle(1, 0, 0.0, VehicleKind::Car, DriverPersonality::Normal).unwrap();
//!
//! core.tick();
//! assert_eq!(core.vehicle_count(), 1);
//! ```
pub mod agents;
pub mod control;
pub mod mobil;
pub mod path;
pub mod scheduler;
pub mod spatial;
pub mod state_machine;
pub mod trajectory;
pub mod verbose;
