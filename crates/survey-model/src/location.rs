use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::ModelError;

/// How an observation's location is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationMethodKind {
    /// Angle and distance from the observer's position and heading.
    AngleDistance,
    /// The device's current GPS fix.
    Gps,
    /// The point under the map's target reticle.
    MapTarget,
    /// The point the user touches on the map.
    MapTouch,
}

impl LocationMethodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMethodKind::AngleDistance => "angleDistance",
            LocationMethodKind::Gps => "gps",
            LocationMethodKind::MapTarget => "mapTarget",
            LocationMethodKind::MapTouch => "mapTouch",
        }
    }
}

impl fmt::Display for LocationMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationMethodKind {
    type Err = ModelError;

    /// Parses canonical names only; deprecated aliases are rewritten before
    /// decoding reaches this point.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angleDistance" => Ok(LocationMethodKind::AngleDistance),
            "gps" => Ok(LocationMethodKind::Gps),
            "mapTarget" => Ok(LocationMethodKind::MapTarget),
            "mapTouch" => Ok(LocationMethodKind::MapTouch),
            _ => Err(ModelError::UnknownValue {
                kind: "location method",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "cw")]
    Clockwise,
    #[serde(rename = "ccw")]
    CounterClockwise,
}

impl FromStr for Direction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cw" => Ok(Direction::Clockwise),
            "ccw" => Ok(Direction::CounterClockwise),
            _ => Err(ModelError::UnknownValue {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnits {
    Feet,
    #[default]
    Meters,
    Yards,
}

impl FromStr for DistanceUnits {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feet" => Ok(DistanceUnits::Feet),
            "meters" => Ok(DistanceUnits::Meters),
            "yards" => Ok(DistanceUnits::Yards),
            _ => Err(ModelError::UnknownValue {
                kind: "distance units",
                value: s.to_string(),
            }),
        }
    }
}

/// A permitted way of locating an observation of a feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationMethod {
    #[serde(rename = "type")]
    pub kind: LocationMethodKind,
    pub allow: bool,
    #[serde(rename = "default")]
    pub is_default: bool,
    /// Bearing, in degrees, that counts as straight ahead.
    #[serde(rename = "deadAhead")]
    pub dead_ahead: f64,
    pub direction: Direction,
    pub units: DistanceUnits,
}

impl LocationMethod {
    pub fn new(kind: LocationMethodKind) -> Self {
        Self {
            kind,
            allow: true,
            is_default: false,
            dead_ahead: 0.0,
            direction: Direction::default(),
            units: DistanceUnits::default(),
        }
    }
}
