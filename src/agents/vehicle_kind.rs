use std::fmt;

/// Distinguishes the physical class of a vehicle. Trucks follow with a
/// longer headway, accelerate more slowly, and occupy more road.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Car,
    Truck,
}

impl fmt::Display for VehicleKind {
    /// Formats the vehicle kind for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dense_traffic_core::agents::VehicleKind;
    ///
    /// assert_eq!(format!("{}", VehicleKind::Car), "car");
    /// assert_eq!(format!("{}", VehicleKind::Truck), "truck");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let as_str = match self {
            VehicleKind::Car => "car",
            VehicleKind::Truck => "truck",
        };
        write!(f, "{}", as_str)
    }
}

impl VehicleKind {
    /// Vehicle body length in meters, used by `gap` computations in the
    /// spatial index and IDM (4.5 m for cars, larger for trucks).
    pub fn length(&self) -> f64 {
        match self {
            VehicleKind::Car => 4.5,
            VehicleKind::Truck => 12.0,
        }
    }

    /// Per-kind scale applied to `DesiredSpeed` before personality scaling.
    pub fn desired_speed_scale(&self) -> f64 {
        match self {
            VehicleKind::Car => 1.0,
            VehicleKind::Truck => 0.82,
        }
    }

    /// Per-kind scale applied to `MaxAcceleration`.
    pub fn accel_scale(&self) -> f64 {
        match self {
            VehicleKind::Car => 1.0,
            VehicleKind::Truck => 0.6,
        }
    }

    /// Per-kind additive offset applied to `TimeHeadway`, in seconds.
    pub fn headway_offset(&self) -> f64 {
        match self {
            VehicleKind::Car => 0.0,
            VehicleKind::Truck => 0.6,
        }
    }

    /// Per-kind additive offset applied to `MinimumGap`, in meters.
    pub fn min_gap_offset(&self) -> f64 {
        match self {
            VehicleKind::Car => 0.0,
            VehicleKind::Truck => 1.5,
        }
    }
}
