use crate::math::LatLng;

use super::GridIndex;

/// Stitches consecutive rows of a staggered lattice into triangles.
///
/// In every pair of rows exactly one row is offset by half a column, and its
/// `j`-th point sits between points `j` and `j + 1` of the other row. Each
/// strip alternates "up" triangles (two points from the unshifted row) and
/// "down" triangles (two points from the shifted row), so the strip tiles
/// without gaps or overlaps. Odd rows are the shifted ones.
#[must_use]
pub fn stitch_rows(rows: &[Vec<LatLng>]) -> Vec<[GridIndex; 3]> {
    let mut triangles = Vec::new();
    for lower in 0..rows.len().saturating_sub(1) {
        let upper = lower + 1;
        let (plain, shifted) = if lower % 2 == 0 {
            (lower, upper)
        } else {
            (upper, lower)
        };
        let plain_len = rows[plain].len();
        let shifted_len = rows[shifted].len();

        for j in 0..plain_len {
            if j + 1 < plain_len && j < shifted_len {
                triangles.push([
                    GridIndex::new(plain, j),
                    GridIndex::new(plain, j + 1),
                    GridIndex::new(shifted, j),
                ]);
            }
            if j + 1 < shifted_len && j + 1 < plain_len {
                triangles.push([
                    GridIndex::new(shifted, j),
                    GridIndex::new(shifted, j + 1),
                    GridIndex::new(plain, j + 1),
                ]);
            }
        }
    }
    triangles
}
