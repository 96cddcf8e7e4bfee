//! Shared-vertex triangular mesh over a geographic region.
//!
//! Vertices and triangles live in generational arenas and refer to each other
//! by ID: a triangle names its three vertices, and every vertex keeps the
//! incidence list of the triangles that use it. All insertions and removals
//! go through the mesh so both directions stay consistent.

mod record;
mod refine;
mod triangle;
mod vertex;

pub use record::{MeshRecord, PointRecord, TriangleRecord};
pub use triangle::{Triangle, TriangleData, TriangleId, TriangleKey};
pub use vertex::{Vertex, VertexData, VertexId};

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::error::{MeshError, Result};
use crate::lattice::GenerateLattice;
use crate::math::{CoordKey, LatLng};

/// How to build a [`Mesh`].
#[derive(Debug, Clone)]
pub enum MeshSpec {
    /// Lay out a fresh lattice over a bounding box.
    Bounds {
        sw: LatLng,
        ne: LatLng,
        /// Target spacing in meters.
        spacing: f64,
    },
    /// Rebuild a previously exported mesh.
    Record(MeshRecord),
}

/// A triangular lattice whose interior vertices are shared between triangles.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: SlotMap<VertexId, VertexData>,
    triangles: SlotMap<TriangleId, TriangleData>,
    by_key: HashMap<CoordKey, VertexId>,
}

impl Mesh {
    /// Builds a mesh from either construction mode.
    ///
    /// # Errors
    ///
    /// See [`Mesh::from_bounds`] and [`Mesh::from_record`].
    pub fn from_spec(spec: MeshSpec) -> Result<Self> {
        match spec {
            MeshSpec::Bounds { sw, ne, spacing } => Self::from_bounds(sw, ne, spacing),
            MeshSpec::Record(record) => Self::from_record(&record),
        }
    }

    /// Lays out a lattice over the region and stitches it into a mesh.
    ///
    /// Every vertex and seed triangle carries `spacing` as its radius.
    ///
    /// # Errors
    ///
    /// Returns a [`LatticeError`](crate::error::LatticeError) if the region
    /// or spacing is rejected by the lattice generator.
    pub fn from_bounds(sw: LatLng, ne: LatLng, spacing: f64) -> Result<Self> {
        let lattice = GenerateLattice::new(sw, ne, spacing).execute()?;

        let mut mesh = Self::default();
        let ids: Vec<Vec<VertexId>> = lattice
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| mesh.insert_vertex(Vertex::new(*c, spacing)))
                    .collect::<Vec<_>>()
            })
            .collect();
        for tri in &lattice.triangles {
            let vertices = tri.map(|g| ids[g.row][g.col]);
            mesh.insert_triangle(vertices, spacing);
        }

        debug!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            spacing,
            "built mesh from bounds"
        );
        Ok(mesh)
    }

    /// Returns the current sample points.
    ///
    /// Ordering is stable for the lifetime of the mesh unless it is mutated.
    #[must_use]
    pub fn get_points(&self) -> Vec<Vertex> {
        self.vertices.values().map(|v| v.vertex).collect()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the vertex with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`] if the ID is not live.
    pub fn vertex(&self, id: VertexId) -> Result<Vertex> {
        self.vertex_data(id).map(|v| v.vertex)
    }

    /// Returns the triangles incident to a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`] if the ID is not live.
    pub fn incident_triangles(&self, id: VertexId) -> Result<&[TriangleId]> {
        self.vertex_data(id).map(VertexData::triangles)
    }

    /// Returns the triangle with the given ID, by value.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`] if the ID is not live.
    pub fn triangle(&self, id: TriangleId) -> Result<Triangle> {
        let data = self.triangle_data(id)?;
        let [a, b, c] = data.vertices;
        Ok(Triangle::new(
            [self.vertex(a)?, self.vertex(b)?, self.vertex(c)?],
            data.radius,
        ))
    }

    /// Returns the live triangles, derived from the vertices' incidence lists.
    #[must_use]
    pub fn triangle_ids(&self) -> Vec<TriangleId> {
        let mut seen = HashSet::new();
        self.vertices
            .values()
            .flat_map(|v| v.triangles.iter().copied())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Returns the live triangles by value.
    #[must_use]
    pub fn triangles(&self) -> Vec<Triangle> {
        self.triangle_ids()
            .into_iter()
            .filter_map(|id| self.triangle(id).ok())
            .collect()
    }

    /// Looks up a vertex by coordinate and radius.
    #[must_use]
    pub fn find_vertex(&self, coordinate: LatLng, radius: f64) -> Option<VertexId> {
        self.by_key
            .get(&CoordKey::new(&coordinate, radius))
            .copied()
    }

    /// Looks up a live triangle equal to `triangle`.
    #[must_use]
    pub fn find_triangle(&self, triangle: &Triangle) -> Option<TriangleId> {
        let [first, ..] = triangle.vertices;
        let vertex = self.find_vertex(first.coordinate, first.radius)?;
        let key = triangle.key();
        self.vertices.get(vertex)?.triangles.iter().copied().find(|id| {
            self.triangle(*id)
                .is_ok_and(|candidate| candidate.key() == key)
        })
    }

    /// Checks the incidence invariant in both directions.
    ///
    /// Every live triangle must be listed exactly once by each of its three
    /// vertices, and every listed triangle must be live and contain the
    /// vertex that lists it. No two live triangles may share all three
    /// vertices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshSpec`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let broken = |msg: String| -> Result<()> { Err(MeshError::InvalidMeshSpec(msg).into()) };

        let mut corners: HashMap<[VertexId; 3], TriangleId> = HashMap::new();
        for (tid, tri) in &self.triangles {
            let mut sorted = tri.vertices;
            sorted.sort_unstable();
            if let Some(other) = corners.insert(sorted, tid) {
                return broken(format!("{tid:?} duplicates {other:?}"));
            }
            for vid in tri.vertices {
                let Some(vertex) = self.vertices.get(vid) else {
                    return broken(format!("{tid:?} references missing vertex {vid:?}"));
                };
                let listed = vertex.triangles.iter().filter(|t| **t == tid).count();
                if listed != 1 {
                    return broken(format!("{vid:?} lists {tid:?} {listed} times"));
                }
            }
        }
        for (vid, vertex) in &self.vertices {
            for tid in &vertex.triangles {
                match self.triangles.get(*tid) {
                    None => return broken(format!("{vid:?} lists dead triangle {tid:?}")),
                    Some(tri) if !tri.vertices.contains(&vid) => {
                        return broken(format!("{vid:?} lists {tid:?} which does not use it"));
                    }
                    Some(_) => {}
                }
            }
            if self.by_key.get(&vertex.vertex.key()) != Some(&vid) {
                return broken(format!("{vid:?} is missing from the key index"));
            }
        }
        Ok(())
    }

    fn vertex_data(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices.get(id).ok_or_else(|| MeshError::NotInMesh.into())
    }

    fn triangle_data(&self, id: TriangleId) -> Result<&TriangleData> {
        self.triangles.get(id).ok_or_else(|| MeshError::NotInMesh.into())
    }

    /// Returns the existing vertex with the same key, or inserts a new one.
    fn insert_vertex(&mut self, vertex: Vertex) -> VertexId {
        let key = vertex.key();
        if let Some(id) = self.by_key.get(&key) {
            trace!(?key, "reusing vertex");
            return *id;
        }
        let id = self.vertices.insert(VertexData::new(vertex));
        self.by_key.insert(key, id);
        id
    }

    /// Inserts a triangle and registers it with all three vertices.
    fn insert_triangle(&mut self, vertices: [VertexId; 3], radius: f64) -> TriangleId {
        let id = self.triangles.insert(TriangleData { vertices, radius });
        for vid in vertices {
            if let Some(v) = self.vertices.get_mut(vid) {
                v.triangles.push(id);
            }
        }
        id
    }

    /// Removes a triangle and unregisters it from its vertices.
    fn remove_triangle(&mut self, id: TriangleId) -> Option<TriangleData> {
        let data = self.triangles.remove(id)?;
        for vid in data.vertices {
            if let Some(v) = self.vertices.get_mut(vid) {
                v.triangles.retain(|t| *t != id);
            }
        }
        Some(data)
    }
}

impl PartialEq for Mesh {
    /// Meshes are equal when they hold the same vertices and the same
    /// triangles, irrespective of IDs, insertion order or vertex order
    /// within a triangle.
    fn eq(&self, other: &Self) -> bool {
        let vertex_keys = |m: &Mesh| -> HashSet<CoordKey> { m.by_key.keys().copied().collect() };
        let triangle_keys =
            |m: &Mesh| -> HashSet<TriangleKey> { m.triangles().iter().map(Triangle::key).collect() };
        vertex_keys(self) == vertex_keys(other) && triangle_keys(self) == triangle_keys(other)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeolatticeError, LatticeError};

    fn ll(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng)
    }

    fn scenario() -> Mesh {
        Mesh::from_bounds(ll(0.0, 0.0), ll(0.1, 0.1), 5000.0).unwrap()
    }

    #[test]
    fn scenario_mesh_shares_vertices() {
        let mesh = scenario();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 6);
        // 6 triangles would need 18 corners if nothing were shared.
        let incidences: usize = mesh
            .vertices
            .values()
            .map(|v| v.triangles().len())
            .sum();
        assert_eq!(incidences, 18);
        assert!(mesh.vertices.values().any(|v| v.triangles().len() > 2));
        mesh.validate().unwrap();
    }

    #[test]
    fn points_carry_spacing_as_radius() {
        let mesh = scenario();
        assert!(mesh.get_points().iter().all(|p| (p.radius - 5000.0).abs() < 1e-12));
    }

    #[test]
    fn derived_triangles_match_storage() {
        let mesh = scenario();
        let derived: HashSet<TriangleId> = mesh.triangle_ids().into_iter().collect();
        let stored: HashSet<TriangleId> = mesh.triangles.keys().collect();
        assert_eq!(derived, stored);
    }

    #[test]
    fn find_triangle_by_value() {
        let mesh = scenario();
        let id = mesh.triangle_ids()[2];
        let mut value = mesh.triangle(id).unwrap();
        value.vertices.rotate_left(1);
        assert_eq!(mesh.find_triangle(&value), Some(id));
    }

    #[test]
    fn from_spec_dispatches() {
        let spec = MeshSpec::Bounds {
            sw: ll(0.0, 0.0),
            ne: ll(0.1, 0.1),
            spacing: 5000.0,
        };
        let mesh = Mesh::from_spec(spec).unwrap();
        assert_eq!(mesh, scenario());

        let rebuilt = Mesh::from_spec(MeshSpec::Record(mesh.to_record())).unwrap();
        assert_eq!(rebuilt, mesh);
    }

    #[test]
    fn bounds_errors_propagate() {
        let err = Mesh::from_bounds(ll(0.0, 1.0), ll(0.1, 0.5), 5000.0).unwrap_err();
        assert!(matches!(
            err,
            GeolatticeError::Lattice(LatticeError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn validate_detects_broken_incidence() {
        let mut mesh = scenario();
        let tid = mesh.triangle_ids()[0];
        let vid = mesh.triangles[tid].vertices[0];
        mesh.vertices[vid].triangles.retain(|t| *t != tid);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn validate_detects_duplicate_triangles() {
        let mut mesh = scenario();
        let tid = mesh.triangle_ids()[0];
        let data = mesh.triangles[tid];
        mesh.insert_triangle(data.vertices, data.radius);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn equality_detects_different_spacing() {
        let other = Mesh::from_bounds(ll(0.0, 0.0), ll(0.1, 0.1), 4000.0).unwrap();
        assert_ne!(scenario(), other);
    }
}
