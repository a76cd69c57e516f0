//! # MOBIL Module
//!
//! The lane-change decision engine: the MOBIL incentive rule plus its
//! layered safety overlay (adjacent-vehicle check, chain-reaction cooldown,
//! follower-safety check).
//!
//! `decider::decide` is the only entry point a caller needs; `safety` and
//! `types` are exposed for targeted unit tests and for `state_machine` to
//! build a [`types::MobilContext`]/[`types::CandidateContext`] pair each
//! tick.
pub mod decider;
pub mod safety;
pub mod types;

pub use decider::{decide, evaluate_candidate};
pub use types::{AdjacentVehicle, CandidateContext, FollowerInfo, LeaderInfo, MobilContext, MobilDecision};
