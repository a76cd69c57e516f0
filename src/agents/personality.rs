use std::fmt;

/// Discrete driver temperament a spawned vehicle is tagged with. Maps to a
/// scalar personality factor `f` that scales a handful of IDM parameters:
/// `v0 ← v0·f`, `a ← a·f`, `T ← T/f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPersonality {
    Timid,
    Normal,
    Aggressive,
    VeryAggressive,
}

impl fmt::Display for DriverPersonality {
    /// Formats the personality for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_traffic_core::agents::DriverPersonality;
    ///
    /// assert_eq!(format!("{}", DriverPersonality::Normal), "normal");
    /// assert_eq!(format!("{}", DriverPersonality::VeryAggressive), "very_aggressive");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            DriverPersonality::Timid => "timid",
            DriverPersonality::Normal => "normal",
            DriverPersonality::Aggressive => "aggressive",
            DriverPersonality::VeryAggressive => "very_aggressive",
        };
        write!(f, "{}", as_str)
    }
}

impl DriverPersonality {
    /// The personality scalar `f` used to scale `DesiredSpeed`, `MaxAcceleration`
    /// and `TimeHeadway`.
    pub fn factor(&self) -> f64 {
        match self {
            DriverPersonality::Timid => 0.8,
            DriverPersonality::Normal => 1.0,
            DriverPersonality::Aggressive => 1.2,
            DriverPersonality::VeryAggressive => 1.4,
        }
    }

    /// Normalizes [`factor`](Self::factor) onto `[0, 1]`, 0 at `Timid` and 1
    /// at `VeryAggressive`. Used by the MOBIL layer to interpolate the
    /// aggressiveness-scaled adjacent-vehicle margin and chain-reaction
    /// cooldown (20 m passive → 12 m aggressive, 3.0 s passive → 1.5 s
    /// aggressive).
    pub fn aggressiveness(&self) -> f64 {
        ((self.factor() - 0.8) / 0.6).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_matches_expected_scalars() {
        assert_eq!(DriverPersonality::Timid.factor(), 0.8);
        assert_eq!(DriverPersonality::Normal.factor(), 1.0);
        assert_eq!(DriverPersonality::Aggressive.factor(), 1.2);
        assert_eq!(DriverPersonality::VeryAggressive.factor(), 1.4);
    }

    #[test]
    fn aggressiveness_spans_unit_interval() {
        assert_eq!(DriverPersonality::Timid.aggressiveness(), 0.0);
        assert_eq!(DriverPersonality::VeryAggressive.aggressiveness(), 1.0);
        assert!(DriverPersonality::Normal.aggressiveness() > 0.0);
        assert!(DriverPersonality::Normal.aggressiveness() < DriverPersonality::Aggressive.aggressiveness());
    }
}
