use crate::agents::DriverDefaults;
use crate::mobil::safety::{
    DEFAULT_ADJACENT_MARGIN_AGGRESSIVE, DEFAULT_ADJACENT_MARGIN_PASSIVE, DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE,
    DEFAULT_CHAIN_COOLDOWN_PASSIVE,
};
use crate::path::DEFAULT_LANE_WIDTH;
use crate::scheduler::error::ConfigError;
use crate::spatial::DEFAULT_CELL_SIZE;

/// Default lookahead window in meters for `leader`/`follower` spatial
/// queries.
pub const DEFAULT_LOOKAHEAD_WINDOW: f64 = 300.0;
/// Default scheduler cadence in Hz (`Tick Δ = 1/UpdateRate`, default 1/50 s).
pub const DEFAULT_UPDATE_TICK_RATE: f64 = 50.0;

/// Immutable, validated configuration record, constructed once and shared
/// read-only by the scheduler, MOBIL decider, and spatial index.
///
/// Follows a validate-at-construction precedent: the only way to obtain a
/// `SimConfig` is [`SimConfigBuilder::build`], which rejects nonpositive
/// rates and malformed threshold pairs.
#[derive(Debug, Clone)]
pub struct SimConfig {
    update_tick_rate: f64,
    driver_defaults: DriverDefaults,
    lane_width: f64,
    is_left_hand_traffic: bool,
    adjacent_margin_passive: f64,
    adjacent_margin_aggressive: f64,
    chain_cooldown_passive: f64,
    chain_cooldown_aggressive: f64,
    spatial_cell_size: f64,
    lookahead_window: f64,
    /// Bounded per-driver parameter noise, off by default.
    driver_param_jitter: bool,
}

impl SimConfig {
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder {
            config: SimConfig {
                update_tick_rate: DEFAULT_UPDATE_TICK_RATE,
                driver_defaults: DriverDefaults::default(),
                lane_width: DEFAULT_LANE_WIDTH,
                is_left_hand_traffic: true,
                adjacent_margin_passive: DEFAULT_ADJACENT_MARGIN_PASSIVE,
                adjacent_margin_aggressive: DEFAULT_ADJACENT_MARGIN_AGGRESSIVE,
                chain_cooldown_passive: DEFAULT_CHAIN_COOLDOWN_PASSIVE,
                chain_cooldown_aggressive: DEFAULT_CHAIN_COOLDOWN_AGGRESSIVE,
                spatial_cell_size: DEFAULT_CELL_SIZE,
                lookahead_window: DEFAULT_LOOKAHEAD_WINDOW,
                driver_param_jitter: false,
            },
        }
    }

    /// Tick period in seconds, `1 / update_tick_rate`.
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.update_tick_rate
    }

    pub fn update_tick_rate(&self) -> f64 {
        self.update_tick_rate
    }

    pub fn driver_defaults(&self) -> &DriverDefaults {
        &self.driver_defaults
    }

    pub fn lane_width(&self) -> f64 {
        self.lane_width
    }

    pub fn is_left_hand_traffic(&self) -> bool {
        self.is_left_hand_traffic
    }

    pub fn adjacent_margin_passive(&self) -> f64 {
        self.adjacent_margin_passive
    }

    pub fn adjacent_margin_aggressive(&self) -> f64 {
        self.adjacent_margin_aggressive
    }

    pub fn chain_cooldown_passive(&self) -> f64 {
        self.chain_cooldown_passive
    }

    pub fn chain_cooldown_aggressive(&self) -> f64 {
        self.chain_cooldown_aggressive
    }

    pub fn spatial_cell_size(&self) -> f64 {
        self.spatial_cell_size
    }

    pub fn lookahead_window(&self) -> f64 {
        self.lookahead_window
    }

    pub fn driver_param_jitter(&self) -> bool {
        self.driver_param_jitter
    }
}

/// Builder for [`SimConfig`]; the only constructor is
/// [`build`](Self::build), which validates every field.
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    pub fn with_update_tick_rate(mut self, hz: f64) -> Self {
        self.config.update_tick_rate = hz;
        self
    }

    pub fn with_driver_defaults(mut self, defaults: DriverDefaults) -> Self {
        self.config.driver_defaults = defaults;
        self
    }

    pub fn with_lane_width(mut self, width: f64) -> Self {
        self.config.lane_width = width;
        self
    }

    pub fn with_left_hand_traffic(mut self, is_left_hand: bool) -> Self {
        self.config.is_left_hand_traffic = is_left_hand;
        self
    }

    pub fn with_adjacent_margins(mut self, passive: f64, aggressive: f64) -> Self {
        self.config.adjacent_margin_passive = passive;
        self.config.adjacent_margin_aggressive = aggressive;
        self
    }

    pub fn with_chain_reaction_cooldowns(mut self, passive: f64, aggressive: f64) -> Self {
        self.config.chain_cooldown_passive = passive;
        self.config.chain_cooldown_aggressive = aggressive;
        self
    }

    pub fn with_spatial_cell_size(mut self, cell_size: f64) -> Self {
        self.config.spatial_cell_size = cell_size;
        self
    }

    pub fn with_lookahead_window(mut self, window: f64) -> Self {
        self.config.lookahead_window = window;
        self
    }

    pub fn with_driver_param_jitter(mut self, enabled: bool) -> Self {
        self.config.driver_param_jitter = enabled;
        self
    }

    /// Validates every field and produces the immutable [`SimConfig`]:
    /// malformed threshold pairs and nonpositive rates are rejected at
    /// construction.
    pub fn build(self) -> Result<SimConfig, ConfigError> {
        let c = &self.config;

        if c.update_tick_rate <= 0.0 {
            return Err(ConfigError::NonPositiveTickRate { value: c.update_tick_rate });
        }
        if c.lane_width <= 0.0 {
            return Err(ConfigError::NonPositiveLaneWidth { value: c.lane_width });
        }
        if c.spatial_cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveCellSize { value: c.spatial_cell_size });
        }
        if c.lookahead_window <= 0.0 {
            return Err(ConfigError::NonPositiveLookaheadWindow { value: c.lookahead_window });
        }
        check_threshold_pair("adjacent_margin", c.adjacent_margin_passive, c.adjacent_margin_aggressive)?;
        check_threshold_pair("chain_cooldown", c.chain_cooldown_passive, c.chain_cooldown_aggressive)?;

        Ok(self.config)
    }
}

/// A passive/aggressive threshold pair is well-formed when both are
/// non-negative and the aggressive endpoint is no larger than the passive
/// one (aggressive drivers get *smaller* margins/cooldowns).
fn check_threshold_pair(name: &'static str, passive: f64, aggressive: f64) -> Result<(), ConfigError> {
    if passive < 0.0 || aggressive < 0.0 || aggressive > passive {
        return Err(ConfigError::MalformedThresholdPair { name, passive, aggressive });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builder_produces_valid_config() {
        let config = SimConfig::builder().build().expect("defaults must be valid");
        assert_eq!(config.update_tick_rate(), DEFAULT_UPDATE_TICK_RATE);
        assert!((config.tick_dt() - 1.0 / 50.0).abs() < 1e-12);
    }

    #[test]
    fn nonpositive_tick_rate_is_rejected() {
        let result = SimConfig::builder().with_update_tick_rate(0.0).build();
        assert!(matches!(result, Err(ConfigError::NonPositiveTickRate { .. })));
    }

    #[test]
    fn negative_tick_rate_is_rejected() {
        let result = SimConfig::builder().with_update_tick_rate(-10.0).build();
        assert!(matches!(result, Err(ConfigError::NonPositiveTickRate { .. })));
    }

    #[test]
    fn inverted_threshold_pair_is_rejected() {
        let result = SimConfig::builder().with_adjacent_margins(10.0, 20.0).build();
        assert!(matches!(result, Err(ConfigError::MalformedThresholdPair { .. })));
    }

    #[test]
    fn nonpositive_cell_size_is_rejected() {
        let result = SimConfig::builder().with_spatial_cell_size(0.0).build();
        assert!(matches!(result, Err(ConfigError::NonPositiveCellSize { .. })));
    }
}
