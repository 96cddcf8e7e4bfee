mod flat_earth;
mod key;

pub use flat_earth::FlatEarth;
pub use key::{radius_key, CoordKey};

/// 2D point type (`x` = latitude, `y` = longitude, both in degrees).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Equatorial circumference of the Earth, in meters.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Global tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the arithmetic mean of two coordinates.
    #[must_use]
    pub fn midpoint(&self, other: &LatLng) -> LatLng {
        nalgebra::center(&self.to_point(), &other.to_point()).into()
    }

    #[must_use]
    pub fn to_point(&self) -> Point2 {
        Point2::new(self.lat, self.lng)
    }
}

impl From<Point2> for LatLng {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(c: LatLng) -> Self {
        [c.lat, c.lng]
    }
}
