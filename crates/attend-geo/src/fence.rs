use crate::coordinate::Coordinate;
use crate::distance::{distance_meters, is_within_range};
use crate::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Non-negative radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProximityThreshold(f64);

impl ProximityThreshold {
    pub const DEFAULT: Self = Self(100.0);

    pub fn new(meters: f64) -> Result<Self, ThresholdError> {
        if !meters.is_finite() {
            return Err(ThresholdError::NonFinite);
        }
        if meters < 0.0 {
            return Err(ThresholdError::Negative(meters));
        }
        Ok(Self(meters))
    }

    pub fn meters(&self) -> f64 {
        self.0
    }
}

impl Default for ProximityThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for ProximityThreshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProximityThreshold> for f64 {
    fn from(value: ProximityThreshold) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ThresholdError {
    #[error("threshold is not finite")]
    NonFinite,
    #[error("threshold {0} is negative")]
    Negative(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Box enclosing every point within `radius_m` of `center`.
    ///
    /// Near the poles or across the antimeridian the box widens to the full
    /// longitude range instead of wrapping.
    pub fn around(center: Coordinate, radius_m: f64) -> Self {
        let angular = radius_m / (EARTH_RADIUS_KM * 1000.0);
        let delta_lat = angular.to_degrees();
        let north = (center.latitude + delta_lat).min(90.0);
        let south = (center.latitude - delta_lat).max(-90.0);

        let cos_lat = center.latitude.to_radians().cos();
        if north >= 90.0 || south <= -90.0 || cos_lat <= f64::EPSILON {
            return Self {
                north,
                south,
                east: 180.0,
                west: -180.0,
            };
        }

        let delta_lon = (angular.sin() / cos_lat).min(1.0).asin().to_degrees();
        let east = center.longitude + delta_lon;
        let west = center.longitude - delta_lon;
        if east > 180.0 || west < -180.0 {
            return Self {
                north,
                south,
                east: 180.0,
                west: -180.0,
            };
        }

        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.latitude <= self.north
            && coord.latitude >= self.south
            && coord.longitude <= self.east
            && coord.longitude >= self.west
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GeoFence {
    Circle {
        center: Coordinate,
        radius_m: ProximityThreshold,
    },
}

impl GeoFence {
    pub fn circle(center: Coordinate, radius_m: ProximityThreshold) -> Self {
        Self::Circle { center, radius_m }
    }

    pub fn center(&self) -> Coordinate {
        match self {
            Self::Circle { center, .. } => *center,
        }
    }

    pub fn radius_m(&self) -> f64 {
        match self {
            Self::Circle { radius_m, .. } => radius_m.meters(),
        }
    }

    pub fn distance_to(&self, point: Coordinate) -> f64 {
        distance_meters(point, self.center())
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        match self {
            Self::Circle { center, radius_m } => {
                is_within_range(point, *center, radius_m.meters())
            }
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::around(self.center(), self.radius_m())
    }
}
