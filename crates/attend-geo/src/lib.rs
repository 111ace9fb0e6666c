mod coordinate;
mod distance;
mod fence;

pub use coordinate::{Coordinate, CoordinateError, CoordinatePolicy};
pub use distance::{distance_meters, is_within_range, nearest, EARTH_RADIUS_KM};
pub use fence::{BoundingBox, GeoFence, ProximityThreshold, ThresholdError};
