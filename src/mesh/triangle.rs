use std::hash::{Hash, Hasher};

use crate::math::{radius_key, CoordKey};

use super::vertex::{Vertex, VertexId};

slotmap::new_key_type! {
    /// Unique identifier for a triangle in a [`Mesh`](super::Mesh).
    pub struct TriangleId;
}

/// Mesh-owned storage for a triangle.
#[derive(Debug, Clone, Copy)]
pub struct TriangleData {
    pub vertices: [VertexId; 3],
    /// Sampling radius in meters.
    pub radius: f64,
}

/// A triangle by value: three vertices plus a sampling radius.
///
/// Equality ignores vertex order.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub radius: f64,
}

/// Order-independent identity of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleKey {
    corners: [CoordKey; 3],
    radius: i64,
}

impl Triangle {
    #[must_use]
    pub fn new(vertices: [Vertex; 3], radius: f64) -> Self {
        Self { vertices, radius }
    }

    #[must_use]
    pub fn key(&self) -> TriangleKey {
        let mut corners = self.vertices.map(|v| v.key());
        corners.sort_unstable();
        TriangleKey {
            corners,
            radius: radius_key(self.radius),
        }
    }

    /// Splits the triangle into four by its edge midpoints.
    ///
    /// Midpoints and children carry half of this triangle's radius. Children
    /// are ordered as in [`quadrisect`].
    #[must_use]
    pub fn split(&self) -> [Triangle; 4] {
        let half = self.radius / 2.0;
        let mids = edge_midpoints(&self.vertices, half);
        quadrisect(self.vertices, mids).map(|vertices| Triangle::new(vertices, half))
    }
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Triangle {}

impl Hash for Triangle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Midpoints of edges `ab`, `bc` and `ca`, with the given radius.
pub(super) fn edge_midpoints(corners: &[Vertex; 3], radius: f64) -> [Vertex; 3] {
    [(0, 1), (1, 2), (2, 0)].map(|(i, j)| {
        Vertex::new(corners[i].coordinate.midpoint(&corners[j].coordinate), radius)
    })
}

/// Classic quadrisection of `[a, b, c]` given midpoints `[ab, bc, ca]`.
///
/// Returns the three corner triangles (at `a`, `b`, `c`) followed by the
/// central triangle.
pub(super) fn quadrisect<T: Copy>(corners: [T; 3], mids: [T; 3]) -> [[T; 3]; 4] {
    let [a, b, c] = corners;
    let [ab, bc, ca] = mids;
    [[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::LatLng;
    use std::collections::HashSet;

    fn v(lat: f64, lng: f64, r: f64) -> Vertex {
        Vertex::new(LatLng::new(lat, lng), r)
    }

    #[test]
    fn equality_ignores_vertex_order() {
        let a = v(0.0, 0.0, 10.0);
        let b = v(0.0, 1.0, 10.0);
        let c = v(1.0, 0.5, 10.0);
        assert_eq!(Triangle::new([a, b, c], 10.0), Triangle::new([c, a, b], 10.0));
        assert_ne!(Triangle::new([a, b, c], 10.0), Triangle::new([a, b, c], 5.0));
    }

    #[test]
    fn split_halves_radius() {
        let t = Triangle::new([v(0.0, 0.0, 8.0), v(0.0, 2.0, 8.0), v(2.0, 1.0, 8.0)], 8.0);
        let children = t.split();
        assert!(children.iter().all(|c| (c.radius - 4.0).abs() < 1e-12));
    }

    #[test]
    fn split_introduces_three_midpoints() {
        let corners = [v(0.0, 0.0, 8.0), v(0.0, 2.0, 8.0), v(2.0, 1.0, 8.0)];
        let children = Triangle::new(corners, 8.0).split();
        let all: HashSet<Vertex> = children.iter().flat_map(|c| c.vertices).collect();
        assert_eq!(all.len(), 6);
        for corner in corners {
            assert!(all.contains(&corner));
        }
        assert!(all.contains(&v(0.0, 1.0, 4.0)));
        assert!(all.contains(&v(1.0, 1.5, 4.0)));
        assert!(all.contains(&v(1.0, 0.5, 4.0)));
    }

    #[test]
    fn central_child_is_made_of_midpoints() {
        let [_, _, _, center] = quadrisect([0, 1, 2], [3, 4, 5]);
        assert_eq!(center, [3, 4, 5]);
    }
}
