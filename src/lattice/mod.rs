//! Staggered triangular lattice over a lat/lng bounding box.
//!
//! Rows are laid out south to north at the height of an equilateral
//! triangle; odd rows are shifted east by half a column so that every
//! interior point has six neighbors at roughly the requested spacing.

mod stitch;

pub use stitch::stitch_rows;

use tracing::debug;

use crate::error::{LatticeError, Result};
use crate::math::{FlatEarth, LatLng};

/// Position of a lattice point: row (south to north), then column (west to east).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Output of [`GenerateLattice`]: rows of points plus their seed triangles.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Rows of points, south to north; odd rows are offset by half a column.
    pub rows: Vec<Vec<LatLng>>,
    /// Seed triangles stitched between consecutive rows.
    pub triangles: Vec<[GridIndex; 3]>,
    /// The requested spacing, in meters.
    pub spacing: f64,
    /// The projection the lattice was laid out with.
    pub projection: FlatEarth,
}

impl Lattice {
    /// Returns the point at `index`, if present.
    #[must_use]
    pub fn point(&self, index: GridIndex) -> Option<LatLng> {
        self.rows.get(index.row)?.get(index.col).copied()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// Lays out a triangular lattice of spacing `spacing` meters over a region.
pub struct GenerateLattice {
    sw: LatLng,
    ne: LatLng,
    spacing: f64,
}

impl GenerateLattice {
    /// Creates a new `GenerateLattice` operation.
    #[must_use]
    pub fn new(sw: LatLng, ne: LatLng, spacing: f64) -> Self {
        Self { sw, ne, spacing }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidRegion`] if `ne.lng < sw.lng`, and
    /// [`LatticeError::DegenerateStep`] if the spacing is zero, negative or
    /// not finite, or if `ne.lat < sw.lat`.
    pub fn execute(&self) -> Result<Lattice> {
        let (sw, ne) = (self.sw, self.ne);
        if ne.lng < sw.lng {
            return Err(LatticeError::InvalidRegion {
                sw_lng: sw.lng,
                ne_lng: ne.lng,
            }
            .into());
        }

        let projection = FlatEarth::for_region(&sw, &ne);
        let delta_lat = 0.75_f64.sqrt() * self.spacing / projection.meters_per_degree_lat();
        let delta_lng = self.spacing / projection.meters_per_degree_lng();

        let row_lats = step_range(sw.lat, ne.lat, delta_lat)?;
        let mut rows = Vec::with_capacity(row_lats.len());
        for (i, lat) in row_lats.into_iter().enumerate() {
            let start = if i % 2 == 1 {
                sw.lng + delta_lng / 2.0
            } else {
                sw.lng
            };
            // A narrow region may leave no room for the offset row.
            let lngs = if start > ne.lng {
                Vec::new()
            } else {
                step_range(start, ne.lng, delta_lng)?
            };
            rows.push(lngs.into_iter().map(|lng| LatLng::new(lat, lng)).collect());
        }

        let triangles = stitch_rows(&rows);
        let lattice = Lattice {
            rows,
            triangles,
            spacing: self.spacing,
            projection,
        };
        debug!(
            rows = lattice.rows.len(),
            points = lattice.vertex_count(),
            triangles = lattice.triangles.len(),
            delta_lat,
            delta_lng,
            "generated lattice"
        );
        Ok(lattice)
    }
}

/// Steps from `start` towards `stop` in increments of `step`, never overshooting.
///
/// Values are computed as `start + i * step` so rounding does not accumulate.
/// A zero-width interval yields `[start]`.
///
/// # Errors
///
/// Returns [`LatticeError::DegenerateStep`] if `step` is zero or not finite,
/// if either bound is not finite, or if `step` points away from `stop`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn step_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    let degenerate = || LatticeError::DegenerateStep { start, stop, step };
    if step == 0.0 || !step.is_finite() || !start.is_finite() || !stop.is_finite() {
        return Err(degenerate().into());
    }
    let span = stop - start;
    if span != 0.0 && span.signum() != step.signum() {
        return Err(degenerate().into());
    }

    // Slack so a bound that is an exact multiple of `step` is not lost to rounding.
    let count = (span / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
