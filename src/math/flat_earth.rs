use super::{LatLng, Vector2, EARTH_CIRCUMFERENCE_M};

/// Flat-earth projection with a single longitude scale.
///
/// Meters per degree of latitude are constant; meters per degree of
/// longitude are scaled by the cosine of one reference latitude for the
/// whole region. Distortion grows away from that latitude, and the
/// projection is meaningless across the poles or the antimeridian.
#[derive(Debug, Clone, Copy)]
pub struct FlatEarth {
    reference_lat: f64,
}

impl FlatEarth {
    /// Creates a projection scaled at `reference_lat` (degrees).
    #[must_use]
    pub fn new(reference_lat: f64) -> Self {
        Self { reference_lat }
    }

    /// Creates the projection for a bounding box, using its pole-ward edge.
    #[must_use]
    pub fn for_region(sw: &LatLng, ne: &LatLng) -> Self {
        let reference_lat = if sw.lat.abs() > ne.lat.abs() {
            sw.lat
        } else {
            ne.lat
        };
        Self::new(reference_lat)
    }

    #[must_use]
    pub fn reference_lat(&self) -> f64 {
        self.reference_lat
    }

    #[must_use]
    pub fn meters_per_degree_lat(&self) -> f64 {
        EARTH_CIRCUMFERENCE_M / 360.0
    }

    #[must_use]
    pub fn meters_per_degree_lng(&self) -> f64 {
        self.meters_per_degree_lat() * self.reference_lat.to_radians().cos()
    }

    /// Offset from `a` to `b` in meters (`x` = north, `y` = east).
    #[must_use]
    pub fn offset_m(&self, a: &LatLng, b: &LatLng) -> Vector2 {
        Vector2::new(
            (b.lat - a.lat) * self.meters_per_degree_lat(),
            (b.lng - a.lng) * self.meters_per_degree_lng(),
        )
    }

    /// Distance between two coordinates in meters.
    #[must_use]
    pub fn distance_m(&self, a: &LatLng, b: &LatLng) -> f64 {
        self.offset_m(a, b).norm()
    }
}
