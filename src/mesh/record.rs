use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::math::LatLng;

use super::{Mesh, Vertex, VertexId};

/// Index-based, serializable form of a [`Mesh`].
///
/// Field names follow the persisted document layout:
/// `{"points": [{"idx", "lat_lng", "r"}], "triangles": [{"tri_idx", "r"}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRecord {
    pub points: Vec<PointRecord>,
    pub triangles: Vec<TriangleRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(rename = "idx")]
    pub index: usize,
    /// `[lat, lng]` in degrees.
    #[serde(rename = "lat_lng")]
    pub coordinate: [f64; 2],
    #[serde(rename = "r")]
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleRecord {
    /// Indices into [`MeshRecord::points`] (by `idx`, not by position).
    #[serde(rename = "tri_idx")]
    pub point_indices: [usize; 3],
    #[serde(rename = "r")]
    pub radius: f64,
}

impl MeshRecord {
    /// Parses a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshSpec`] if the document is malformed or
    /// lacks the `points` or `triangles` key.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MeshError::InvalidMeshSpec(e.to_string()).into())
    }

    /// Serializes the record to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshSpec`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| MeshError::InvalidMeshSpec(e.to_string()).into())
    }

    /// Serializes the record to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshSpec`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MeshError::InvalidMeshSpec(e.to_string()).into())
    }
}

impl Mesh {
    /// Flattens the mesh: every vertex gets a unique index, every live
    /// triangle the indices of its three vertices.
    #[must_use]
    pub fn to_record(&self) -> MeshRecord {
        let mut index: SecondaryMap<VertexId, usize> = SecondaryMap::new();
        let mut points = Vec::with_capacity(self.vertex_count());
        for (i, (id, data)) in self.vertices.iter().enumerate() {
            index.insert(id, i);
            points.push(PointRecord {
                index: i,
                coordinate: data.vertex.coordinate.into(),
                radius: data.vertex.radius,
            });
        }

        let triangles = self
            .triangle_ids()
            .into_iter()
            .filter_map(|id| self.triangles.get(id))
            .filter_map(|tri| {
                let [a, b, c] = tri.vertices.map(|v| index.get(v).copied());
                Some(TriangleRecord {
                    point_indices: [a?, b?, c?],
                    radius: tri.radius,
                })
            })
            .collect();

        MeshRecord { points, triangles }
    }

    /// Rebuilds a mesh from its record.
    ///
    /// Indices need not be contiguous or ordered; only the structure they
    /// describe is restored.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshSpec`] if an index is duplicated,
    /// a triangle references an unknown index, repeats a vertex or lists
    /// the same three vertices as an earlier triangle, or a
    /// coordinate or radius is not finite. Nothing is returned on failure.
    pub fn from_record(record: &MeshRecord) -> Result<Self> {
        let invalid = MeshError::InvalidMeshSpec;

        let mut mesh = Mesh::default();
        let mut by_index: HashMap<usize, VertexId> = HashMap::with_capacity(record.points.len());
        for point in &record.points {
            let [lat, lng] = point.coordinate;
            if !(lat.is_finite() && lng.is_finite() && point.radius.is_finite()) {
                return Err(invalid(format!("point {} is not finite", point.index)).into());
            }
            let id = mesh.insert_vertex(Vertex::new(LatLng::new(lat, lng), point.radius));
            if by_index.insert(point.index, id).is_some() {
                return Err(invalid(format!("duplicate point index {}", point.index)).into());
            }
        }

        let mut seen: HashSet<[VertexId; 3]> = HashSet::with_capacity(record.triangles.len());
        for (n, tri) in record.triangles.iter().enumerate() {
            let mut vertices = [VertexId::default(); 3];
            for (slot, idx) in vertices.iter_mut().zip(tri.point_indices) {
                *slot = *by_index
                    .get(&idx)
                    .ok_or_else(|| invalid(format!("triangle {n} references unknown point {idx}")))?;
            }
            let [a, b, c] = vertices;
            if a == b || b == c || c == a {
                return Err(invalid(format!("triangle {n} repeats a vertex")).into());
            }
            if !tri.radius.is_finite() {
                return Err(invalid(format!("triangle {n} radius is not finite")).into());
            }
            let mut sorted = vertices;
            sorted.sort_unstable();
            if !seen.insert(sorted) {
                return Err(invalid(format!(
                    "triangle {n} duplicates an earlier triangle {:?}",
                    tri.point_indices
                ))
                .into());
            }
            mesh.insert_triangle(vertices, tri.radius);
        }

        debug!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "rebuilt mesh from record"
        );
        Ok(mesh)
    }

    /// Parses and rebuilds a mesh from a JSON record.
    ///
    /// # Errors
    ///
    /// See [`MeshRecord::from_json`] and [`Mesh::from_record`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_record(&MeshRecord::from_json(json)?)
    }

    /// Exports the mesh as a JSON record.
    ///
    /// # Errors
    ///
    /// See [`MeshRecord::to_json`].
    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }

    /// Exports the mesh as an indented JSON record.
    ///
    /// # Errors
    ///
    /// See [`MeshRecord::to_json_pretty`].
    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_record().to_json_pretty()
    }
}
