//! # Vehicle State Machine
//!
//! The per-vehicle, per-tick update: longitudinal IDM integration, MOBIL
//! plan/execute, and the `Cruise`/`Changing`/`Aborting` lateral motion and
//! transitions.
//!
//! [`tick::advance`] is the only entry point; `scheduler::core::SimulationCore`
//! calls it once per vehicle per tick.
pub mod tick;

pub use tick::{advance, VehicleFault};
