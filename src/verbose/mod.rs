//! # Logging Module
//!
//! Structured logging system for traffic simulation debugging and monitoring.
//!
//! This module provides hierarchical logging levels and structured event tracking
//! using the `tracing` crate with JSON output format.
//!
//! **Most of time end-developer should not use this module directly, except
//! for setting the global logging level and using logging macros.**
//!
//! ## Components
//!
//! - [`VerboseLevel`] - Hierarchical debug levels (None → Main → Additional → Detailed → All)
//! - [`verbose_log`] - Global logging functions
//! - Event constants - Predefined event types for simulation phases
//! - Macros - `log_main!`, `log_additional!`, `log_detailed!`
//!
//! ## Quick Start
//!
//! ```rust
//! use dense_traffic_core::verbose::{set_verbose_level, VerboseLevel, EVENT_TICK};
//! use dense_traffic_core::log_main;
//!
//! // Set global logging level
//! set_verbose_level(VerboseLevel::Main);
//!
//! // Log simulation events
//! log_main!(EVENT_TICK, "advancing simulation", tick = 42);
//! ```
//!
//! ## Logging Levels
//!
//! - `None` - No logging
//! - `Main` - Major simulation phases only
//! - `Additional` - Per-vehicle decisions (plan/execute/abort)
//! - `Detailed` - Per-tick neighbor resolution and fine IDM/MOBIL inputs
//! - `All` - Everything (trace level)
pub mod verbose;

pub use self::verbose::*;

use std::sync::Once;

static INIT: Once = Once::new();

pub fn ensure_logger_init() {
    INIT.call_once(|| {
        init_logger();
    });
}
