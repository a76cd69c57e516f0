use std::fmt;

pub type PathId = u64;

/// Lane width used when a [`Path`] does not override it, in meters.
pub const DEFAULT_LANE_WIDTH: f64 = 3.5;

/// Gives meaning to a path in terms of the density/driver-mix hints an
/// external spawner may want to apply. The core itself never branches on
/// this value; it is carried through for `ZoneOverrides` consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTag {
    /// Default uninitialized state.
    Undefined = 0,
    Urban,
    Highway,
    Ramp,
    Residential,
}

impl fmt::Display for ZoneTag {
    /// Formats the zone tag for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_traffic_core::path::ZoneTag;
    ///
    /// assert_eq!(format!("{}", ZoneTag::Undefined), "undefined");
    /// assert_eq!(format!("{}", ZoneTag::Highway), "highway");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ZoneTag::Undefined => write!(f, "undefined"),
            ZoneTag::Urban => write!(f, "urban"),
            ZoneTag::Highway => write!(f, "highway"),
            ZoneTag::Ramp => write!(f, "ramp"),
            ZoneTag::Residential => write!(f, "residential"),
        }
    }
}

/// A named, multi-lane piecewise-linear road the core never renders — only
/// its arc-length parameterization matters.
///
/// Arc length is monotone along the path by construction: `length` is the
/// single scalar bound all vehicle arc-length positions are checked against.
/// Lanes are indexed `0..lane_count` from the inside.
#[derive(Debug, Clone)]
pub struct Path {
    id: PathId,
    length: f64,
    lane_count: u32,
    lane_width: f64,
    zone: ZoneTag,
    speed_limit_hint: Option<f64>,
}

impl Path {
    /// Constructs a new [`PathBuilder`] for building a `Path`.
    ///
    /// # Example
    /// ```rust
    /// use dense_traffic_core::path::{Path, ZoneTag};
    ///
    /// let path = Path::new(1)
    ///     .with_length(1200.0)
    ///     .with_lane_count(3)
    ///     .with_zone(ZoneTag::Highway)
    ///     .build();
    /// assert_eq!(path.lane_count(), 3);
    /// ```
    pub fn new(id: PathId) -> PathBuilder {
        PathBuilder {
            path: Path {
                id,
                length: 0.0,
                lane_count: 1,
                lane_width: DEFAULT_LANE_WIDTH,
                zone: ZoneTag::Undefined,
                speed_limit_hint: None,
            },
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn lane_count(&self) -> u32 {
        self.lane_count
    }

    pub fn lane_width(&self) -> f64 {
        self.lane_width
    }

    pub fn zone(&self) -> ZoneTag {
        self.zone
    }

    pub fn speed_limit_hint(&self) -> Option<f64> {
        self.speed_limit_hint
    }

    /// Whether `lane` is a valid lane index on this path.
    pub fn has_lane(&self, lane: u32) -> bool {
        lane < self.lane_count
    }

    /// Whether `s` is still on this path (has not exceeded its length).
    pub fn contains_arc_length(&self, s: f64) -> bool {
        s >= 0.0 && s <= self.length
    }
}

/// Builder for [`Path`], following the same `with_*`/`build` shape as the
/// rest of the crate's data-model builders.
pub struct PathBuilder {
    path: Path,
}

impl PathBuilder {
    pub fn with_length(mut self, length: f64) -> Self {
        self.path.length = length.max(0.0);
        self
    }

    pub fn with_lane_count(mut self, lane_count: u32) -> Self {
        self.path.lane_count = lane_count.max(1);
        self
    }

    pub fn with_lane_width(mut self, lane_width: f64) -> Self {
        self.path.lane_width = lane_width;
        self
    }

    pub fn with_zone(mut self, zone: ZoneTag) -> Self {
        self.path.zone = zone;
        self
    }

    pub fn with_speed_limit_hint(mut self, speed_limit_hint: f64) -> Self {
        self.path.speed_limit_hint = Some(speed_limit_hint);
        self
    }

    pub fn build(self) -> Path {
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_expected_values() {
        let path = Path::new(7).build();
        assert_eq!(path.id(), 7);
        assert_eq!(path.lane_count(), 1);
        assert_eq!(path.lane_width(), DEFAULT_LANE_WIDTH);
        assert_eq!(path.zone(), ZoneTag::Undefined);
        assert_eq!(path.speed_limit_hint(), None);
    }

    #[test]
    fn has_lane_respects_lane_count() {
        let path = Path::new(1).with_lane_count(3).build();
        assert!(path.has_lane(0));
        assert!(path.has_lane(2));
        assert!(!path.has_lane(3));
    }

    #[test]
    fn contains_arc_length_bounds() {
        let path = Path::new(1).with_length(100.0).build();
        assert!(path.contains_arc_length(0.0));
        assert!(path.contains_arc_length(100.0));
        assert!(!path.contains_arc_length(100.1));
        assert!(!path.contains_arc_length(-0.1));
    }
}
