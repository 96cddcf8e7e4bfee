use super::LatLng;

/// Quantization steps per degree of latitude/longitude (about 0.1 mm).
const COORD_STEPS_PER_DEGREE: f64 = 1e9;

/// Quantization steps per meter of radius.
const RADIUS_STEPS_PER_METER: f64 = 1e6;

/// Canonical, hashable identity of a sample point.
///
/// Coordinates and radius are rounded to fixed precision so that the same
/// point reached through different arithmetic (e.g. the midpoint of a shared
/// edge computed from either side) maps to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey {
    lat: i64,
    lng: i64,
    radius: i64,
}

impl CoordKey {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(coordinate: &LatLng, radius: f64) -> Self {
        Self {
            lat: (coordinate.lat * COORD_STEPS_PER_DEGREE).round() as i64,
            lng: (coordinate.lng * COORD_STEPS_PER_DEGREE).round() as i64,
            radius: radius_key(radius),
        }
    }
}

/// Quantizes a radius in meters to the precision used by [`CoordKey`].
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn radius_key(radius: f64) -> i64 {
    (radius * RADIUS_STEPS_PER_METER).round() as i64
}
