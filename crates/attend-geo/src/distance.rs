use crate::coordinate::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in meters between two coordinates.
///
/// Total over finite input: no range validation, no special casing for
/// identical or antipodal points. Rounding can push the haversine term just
/// past 1 near antipodes, so it is clamped to `[0, 1]`.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Inclusive: a point exactly `threshold_m` away is in range.
pub fn is_within_range(point: Coordinate, reference: Coordinate, threshold_m: f64) -> bool {
    distance_meters(point, reference) <= threshold_m
}

/// Closest candidate that has a location, with its distance in meters.
pub fn nearest<'a, T, I, F>(point: Coordinate, candidates: I, locate: F) -> Option<(&'a T, f64)>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<Coordinate>,
{
    candidates
        .into_iter()
        .filter_map(|candidate| {
            locate(candidate).map(|location| (candidate, distance_meters(point, location)))
        })
        .min_by(|(_, left), (_, right)| left.total_cmp(right))
}
