use std::fmt;

use crate::agents::VehicleId;
use crate::path::PathId;

/// Rejected at construction time: a nonpositive rate or a malformed
/// threshold pair the core refuses to start with.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// `update_tick_rate` must be strictly positive.
    NonPositiveTickRate { value: f64 },
    /// `lane_width` must be strictly positive.
    NonPositiveLaneWidth { value: f64 },
    /// `spatial_cell_size` must be strictly positive.
    NonPositiveCellSize { value: f64 },
    /// `lookahead_window` must be strictly positive.
    NonPositiveLookaheadWindow { value: f64 },
    /// A passive/aggressive threshold pair was malformed (negative, or the
    /// aggressive endpoint exceeding the passive one).
    MalformedThresholdPair { name: &'static str, passive: f64, aggressive: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveTickRate { value } => {
                write!(f, "update_tick_rate must be positive, got {}", value)
            }
            ConfigError::NonPositiveLaneWidth { value } => {
                write!(f, "lane_width must be positive, got {}", value)
            }
            ConfigError::NonPositiveCellSize { value } => {
                write!(f, "spatial_cell_size must be positive, got {}", value)
            }
            ConfigError::NonPositiveLookaheadWindow { value } => {
                write!(f, "lookahead_window must be positive, got {}", value)
            }
            ConfigError::MalformedThresholdPair { name, passive, aggressive } => write!(
                f,
                "{} threshold pair is malformed: passive={}, aggressive={}",
                name, passive, aggressive
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A `spawn_ai_vehicle` request failed. No state change occurs on this
/// error.
#[derive(Debug, Clone)]
pub enum SpawnError {
    /// The requested path id is not present in the core's `PathCatalog`.
    UnknownPath { path: PathId },
    /// The requested lane does not exist on the given path.
    InvalidLane { path: PathId, lane: u32 },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::UnknownPath { path } => write!(f, "spawn failed: unknown path '{}'", path),
            SpawnError::InvalidLane { path, lane } => {
                write!(f, "spawn failed: lane '{}' does not exist on path '{}'", lane, path)
            }
        }
    }
}

impl std::error::Error for SpawnError {}

/// Unifies every fallible public `SimulationCore` operation.
#[derive(Debug, Clone)]
pub enum CoreError {
    Config(ConfigError),
    Spawn(SpawnError),
    /// `despawn_ai_vehicle` was called with an id not present in storage.
    UnknownVehicle { vehicle_id: VehicleId },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Config(e) => write!(f, "{}", e),
            CoreError::Spawn(e) => write!(f, "{}", e),
            CoreError::UnknownVehicle { vehicle_id } => {
                write!(f, "despawn failed: unknown vehicle '{}'", vehicle_id)
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<SpawnError> for CoreError {
    fn from(e: SpawnError) -> Self {
        CoreError::Spawn(e)
    }
}
