// src/verbose/verbose.rs
use std::fmt;
use std::sync::OnceLock;
use tracing::{info, debug, trace, Level};
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Hierarchical logging levels for simulation debugging.
///
/// Each level includes all lower levels, providing increasingly detailed output.
/// Uses JSON structured logging via the `tracing` crate.
///
/// # Examples
///
/// ```rust
/// use dense_traffic_core::verbose::{VerboseLevel, set_verbose_level};
///
/// // Set logging level
/// set_verbose_level(VerboseLevel::Main);
///
/// // Check current level
/// if VerboseLevel::Main.is_at_least(VerboseLevel::Additional) {
///     println!("Will log additional details");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum VerboseLevel {
    /// No debug at all
    None = 0,
    /// Major simulation phases - `info` level
    Main = 1,
    /// Per-vehicle decisions (lane-change plans, aborts) - `debug` level
    Additional = 2,
    /// Per-tick neighbor resolution and fine IDM/MOBIL inputs - `debug` level
    Detailed = 3,
    /// Everything including traces - `trace` level
    All = 4,
}

impl fmt::Display for VerboseLevel {
    /// Formats the verbosity level for display.
    ///
    /// Returns a short, lowercase string representation suitable for
    /// logging, debugging, and user interfaces.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_traffic_core::verbose::VerboseLevel;
    ///
    /// assert_eq!(format!("{}", VerboseLevel::None), "none");
    /// assert_eq!(format!("{}", VerboseLevel::Main), "main");
    /// assert_eq!(format!("{}", VerboseLevel::Additional), "additional");
    /// assert_eq!(format!("{}", VerboseLevel::Detailed), "detailed");
    /// assert_eq!(format!("{}", VerboseLevel::All), "all");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerboseLevel::None => "none",
            VerboseLevel::Main => "main",
            VerboseLevel::Additional => "additional",
            VerboseLevel::Detailed => "detailed",
            VerboseLevel::All => "all",
        };
        write!(f, "{}", s)
    }
}

impl From<VerboseLevel> for Level {
    fn from(level: VerboseLevel) -> Self {
        match level {
            VerboseLevel::None => Level::ERROR,
            VerboseLevel::Main => Level::INFO,
            VerboseLevel::Additional => Level::DEBUG,
            VerboseLevel::Detailed => Level::DEBUG,
            VerboseLevel::All => Level::TRACE,
        }
    }
}

// Event type constants - one per pipeline stage in `scheduler::core::SimulationCore::tick`.
pub const EVENT_TICK: &str = "tick";
pub const EVENT_SPAWN_VEHICLE: &str = "spawn_vehicle";
pub const EVENT_DESPAWN_VEHICLE: &str = "despawn_vehicle";
pub const EVENT_PLAYER_UPDATE: &str = "player_update";
pub const EVENT_PLAYER_STALE: &str = "player_stale";
pub const EVENT_NEIGHBORS: &str = "resolve_neighbors";
pub const EVENT_LANE_CHANGE_PLAN: &str = "lane_change_plan";
pub const EVENT_LANE_CHANGE_EXECUTE: &str = "lane_change_execute";
pub const EVENT_LANE_CHANGE_COMPLETE: &str = "lane_change_complete";
pub const EVENT_LANE_CHANGE_ABORT: &str = "lane_change_abort";
pub const EVENT_VEHICLE_FAULT: &str = "vehicle_fault";

// Global verbose level storage
static VERBOSE_LEVEL: OnceLock<VerboseLevel> = OnceLock::new();
static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Initialize the tracing logger once
pub fn init_logger() {
    if LOGGER_INITIALIZED.set(true).is_ok() {
        tracing_subscriber::registry()
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Sets the global verbose level and updates the tracing filter.
pub fn set_verbose_level(level: VerboseLevel) {
    let _ = VERBOSE_LEVEL.set(level);
    init_logger();
}

/// Gets the current global verbose level.
pub fn get_verbose_level() -> VerboseLevel {
    *VERBOSE_LEVEL.get().unwrap_or(&VerboseLevel::None)
}

/// Checks if the current global verbose level is at least the given level.
pub fn is_verbose_level(level: VerboseLevel) -> bool {
    get_verbose_level() >= level
}

/// Logs a message if the global verbose level allows it.
pub fn verbose_log(level: VerboseLevel, event: &str, message: &str) {
    if !is_verbose_level(level) {
        return;
    }
    match level {
        VerboseLevel::None => {}
        VerboseLevel::Main => info!(event = event, message),
        VerboseLevel::Additional => debug!(event = event, message),
        VerboseLevel::Detailed => debug!(event = event, message),
        VerboseLevel::All => trace!(event = event, message),
    }
}

/// Logs a message with additional fields using the global verbose level.
pub fn verbose_log_with_fields(
    level: VerboseLevel,
    event: &str,
    message: &str,
    fields: &[(&str, &dyn fmt::Display)],
) {
    if !is_verbose_level(level) {
        return;
    }
    let mut field_map = std::collections::HashMap::new();
    for (key, value) in fields {
        field_map.insert(*key, format!("{}", value));
    }
    match level {
        VerboseLevel::None => {}
        VerboseLevel::Main => info!(event = event, ?field_map, message),
        VerboseLevel::Additional => debug!(event = event, ?field_map, message),
        VerboseLevel::Detailed => debug!(event = event, ?field_map, message),
        VerboseLevel::All => trace!(event = event, ?field_map, message),
    }
}

impl VerboseLevel {
    /// Checks if this level is at least the minimum level.
    pub fn is_at_least(self, min_level: VerboseLevel) -> bool {
        self >= min_level
    }
}

/// Convenience macro for global verbose logging with a literal level/event/message.
#[macro_export]
macro_rules! verbose_log {
    ($level:expr, $event:expr, $msg:literal) => {
        $crate::verbose::verbose_log($level, $event, $msg)
    };
    ($level:expr, $event:expr, $msg:literal, $($key:literal => $value:expr),+) => {
        $crate::verbose::verbose_log_with_fields(
            $level,
            $event,
            $msg,
            &[$(($key, &$value)),+]
        )
    };
}

/// Logs at [`VerboseLevel::Main`] if the global level allows it.
#[macro_export]
macro_rules! log_main {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Main) {
            tracing::info!(event = $event, $($key = $value,)* $msg);
        }
    };
}

/// Logs at [`VerboseLevel::Additional`] if the global level allows it.
///
/// Use for per-vehicle decisions: lane-change plans, executions, and aborts.
#[macro_export]
macro_rules! log_additional {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Additional) {
            tracing::debug!(event = $event, $($key = $value,)* $msg);
        }
    };
}

/// Logs at [`VerboseLevel::Detailed`] if the global level allows it.
///
/// Use for per-tick neighbor resolution and fine-grained IDM/MOBIL inputs.
#[macro_export]
macro_rules! log_detailed {
    ($event:expr, $msg:literal, $($key:ident = $value:expr),* $(,)?) => {
        if $crate::verbose::is_verbose_level($crate::verbose::VerboseLevel::Detailed) {
            tracing::debug!(event = $event, $($key = $value,)* $msg);
        }
    };
}
