//! # Control Module
//!
//! The longitudinal controller: a pure Intelligent Driver Model acceleration
//! function covering the free-road, interaction, and desired-dynamic-gap
//! terms in `f64` units.
pub mod idm;
