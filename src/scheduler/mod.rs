//! # Scheduler Module
//!
//! The fixed-rate owner of all mutable simulation state.
//!
//! [`core::SimulationCore`] is constructed once from a [`crate::path::PathCatalog`]
//! and a validated [`config::SimConfig`], then ticked by a host-owned worker
//! at the configured cadence. `players` holds the latest-wins mailbox of
//! human-driven snapshots; `error` unifies every fallible operation the core
//! exposes.
pub mod config;
pub mod core;
pub mod error;
pub mod players;

pub use config::SimConfig;
pub use core::{SimulationCore, VehicleSnapshot};
pub use error::{ConfigError, CoreError, SpawnError};
pub use players::{PlayerId, PlayerMailbox, PlayerSnapshot};
