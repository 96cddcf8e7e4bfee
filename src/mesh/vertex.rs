use std::hash::{Hash, Hasher};

use crate::math::{CoordKey, LatLng};

use super::triangle::TriangleId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a [`Mesh`](super::Mesh).
    pub struct VertexId;
}

/// A sample point: a coordinate plus the local sampling radius that produced it.
///
/// Equality and hashing go through [`CoordKey`], so two vertices computed by
/// different arithmetic paths compare equal when they round to the same key.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub coordinate: LatLng,
    /// Sampling spacing in meters.
    pub radius: f64,
}

impl Vertex {
    #[must_use]
    pub fn new(coordinate: LatLng, radius: f64) -> Self {
        Self { coordinate, radius }
    }

    #[must_use]
    pub fn key(&self) -> CoordKey {
        CoordKey::new(&self.coordinate, self.radius)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Mesh-owned storage for a vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    pub vertex: Vertex,
    /// Triangles currently incident to this vertex.
    pub(super) triangles: Vec<TriangleId>,
}

impl VertexData {
    pub(super) fn new(vertex: Vertex) -> Self {
        Self {
            vertex,
            triangles: Vec::new(),
        }
    }

    /// Returns the incidence list of this vertex.
    #[must_use]
    pub fn triangles(&self) -> &[TriangleId] {
        &self.triangles
    }
}
