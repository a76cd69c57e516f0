//! # Agents Module
//!
//! Per-vehicle data model: vehicle kind, driver personality and derived
//! parameters, and the mutable [`VehicleState`] the state machine advances
//! each tick.
//!
//! ## Usage
//!
//! ```rust
//! use dense_traffic_core::agents::{VehicleState, VehicleKind, DriverPersonality, DriverDefaults, DriverParams};
//!
//! let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
//! let vehicle = VehicleState::new(1, VehicleKind::Car, params)
//!     .with_path(1)
//!     .with_lane(0)
//!     .build();
//! ```
pub mod driver_params;
pub mod personality;
pub mod vehicle;
pub mod vehicle_kind;
pub mod vehicle_storage;

pub use driver_params::{DriverDefaults, DriverParams};
pub use personality::DriverPersonality;
pub use vehicle::{
    spawn_ai_vehicle, Direction, LaneChangeManeuver, LaneChangePlan, Phase, VehicleId, VehicleState,
};
pub use vehicle_kind::VehicleKind;
pub use vehicle_storage::VehicleStorage;
