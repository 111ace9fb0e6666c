use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point in decimal degrees.
///
/// Construction never validates. The distance functions are total over any
/// finite pair, so range checks are an explicit step taken by callers at the
/// boundary (see [`CoordinatePolicy`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        self.validate_accuracy()?;
        if self.latitude.abs() > MAX_LATITUDE {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if self.longitude.abs() > MAX_LONGITUDE {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    fn validate_accuracy(&self) -> Result<(), CoordinateError> {
        match self.accuracy_m {
            Some(accuracy_m) if !accuracy_m.is_finite() || accuracy_m < 0.0 => {
                Err(CoordinateError::InvalidAccuracy(accuracy_m))
            }
            _ => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Latitude is pinned to the poles, longitude is wrapped into [-180, 180].
    pub fn clamped(&self) -> Self {
        let latitude = self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let longitude = if self.longitude.abs() <= MAX_LONGITUDE {
            self.longitude
        } else {
            let wrapped = (self.longitude + MAX_LONGITUDE).rem_euclid(360.0) - MAX_LONGITUDE;
            if wrapped == -MAX_LONGITUDE && self.longitude > 0.0 {
                MAX_LONGITUDE
            } else {
                wrapped
            }
        };
        Self {
            latitude,
            longitude,
            accuracy_m: self.accuracy_m,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinate is not finite")]
    NonFinite,
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("accuracy {0} m must be a non-negative number")]
    InvalidAccuracy(f64),
}

/// What to do with a coordinate that breaks the latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatePolicy {
    Accept,
    Clamp,
    #[default]
    Reject,
}

impl CoordinatePolicy {
    /// Non-finite positions and bad accuracy readings are rejected under
    /// every policy; there is nothing meaningful to clamp them to.
    pub fn apply(&self, coordinate: Coordinate) -> Result<Coordinate, CoordinateError> {
        if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        coordinate.validate_accuracy()?;
        match self {
            Self::Accept => Ok(coordinate),
            Self::Clamp => Ok(coordinate.clamped()),
            Self::Reject => coordinate.validate().map(|()| coordinate),
        }
    }
}

impl FromStr for CoordinatePolicy {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "accept" | "passthrough" => Ok(Self::Accept),
            "clamp" => Ok(Self::Clamp),
            "reject" | "validate" => Ok(Self::Reject),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CoordinatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Accept => "accept",
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        };
        write!(f, "{}", value)
    }
}
