use tracing::debug;

use crate::error::{MeshError, Result};

use super::triangle::{edge_midpoints, quadrisect};
use super::{Mesh, Triangle, TriangleId};

impl Mesh {
    /// Replaces a triangle with the four triangles of its quadrisection.
    ///
    /// Each edge gets a midpoint vertex at half the parent's radius; a midpoint
    /// already present (from refining the neighbor across that edge) is reused,
    /// so shared edges never get two midpoints. The parent is unregistered
    /// from its vertices and the children registered with theirs in one step:
    /// the only failure is detected before anything is mutated.
    ///
    /// Returns the children as corner triangles at the parent's first,
    /// second and third vertex, followed by the central triangle.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`] if `id` is not a live triangle.
    pub fn refine(&mut self, id: TriangleId) -> Result<[TriangleId; 4]> {
        let corners = self.triangle_data(id)?.vertices;
        let parent = self.triangle(id)?;
        let half = parent.radius / 2.0;
        let mids = edge_midpoints(&parent.vertices, half);

        self.remove_triangle(id);
        let before = self.vertex_count();
        let mid_ids = mids.map(|m| self.insert_vertex(m));
        let children = quadrisect(corners, mid_ids).map(|tri| self.insert_triangle(tri, half));

        debug!(
            ?id,
            radius = half,
            new_vertices = self.vertex_count() - before,
            "refined triangle"
        );
        Ok(children)
    }

    /// Refines the live triangle equal to `triangle`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`] if no live triangle matches.
    pub fn refine_triangle(&mut self, triangle: &Triangle) -> Result<[TriangleId; 4]> {
        let id = self.find_triangle(triangle).ok_or(MeshError::NotInMesh)?;
        self.refine(id)
    }

    /// Refines every currently live triangle for which `predicate` holds.
    ///
    /// The predicate sees the mesh as it was before this call; children
    /// created here are not revisited. Returns all children created.
    ///
    /// # Errors
    ///
    /// Propagates [`Mesh::refine`] errors, which cannot occur for triangles
    /// that were live when the call started.
    pub fn refine_where<F>(&mut self, mut predicate: F) -> Result<Vec<TriangleId>>
    where
        F: FnMut(&Triangle) -> bool,
    {
        let targets: Vec<TriangleId> = self
            .triangle_ids()
            .into_iter()
            .filter(|id| self.triangle(*id).is_ok_and(|t| predicate(&t)))
            .collect();

        let mut children = Vec::with_capacity(targets.len() * 4);
        for id in targets {
            children.extend(self.refine(id)?);
        }
        Ok(children)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;

    use crate::error::GeolatticeError;
    use crate::math::LatLng;
    use crate::mesh::{Mesh, TriangleId, Vertex};

    use super::*;

    fn scenario() -> Mesh {
        Mesh::from_bounds(LatLng::new(0.0, 0.0), LatLng::new(0.1, 0.1), 5000.0).unwrap()
    }

    /// Two live triangles that share exactly one edge.
    fn adjacent_pair(mesh: &Mesh) -> (TriangleId, TriangleId) {
        let ids = mesh.triangle_ids();
        for (i, a) in ids.iter().enumerate() {
            let va: HashSet<Vertex> = mesh.triangle(*a).unwrap().vertices.into();
            for b in &ids[i + 1..] {
                let vb: HashSet<Vertex> = mesh.triangle(*b).unwrap().vertices.into();
                if va.intersection(&vb).count() == 2 {
                    return (*a, *b);
                }
            }
        }
        panic!("no adjacent triangles");
    }

    #[test]
    fn first_triangle_splits_into_four_half_radius_children() {
        let mut mesh = scenario();
        let first = mesh.triangle_ids()[0];
        let children = mesh.refine(first).unwrap();

        assert_eq!(children.len(), 4);
        for child in children {
            assert_relative_eq!(mesh.triangle(child).unwrap().radius, 2500.0);
        }
        mesh.validate().unwrap();
    }

    #[test]
    fn refinement_adds_three_triangles() {
        let mut mesh = scenario();
        let n = mesh.triangle_count();
        let id = mesh.triangle_ids()[3];
        mesh.refine(id).unwrap();
        assert_eq!(mesh.triangle_count(), n + 3);
        assert_eq!(mesh.triangle_ids().len(), n + 3);
        mesh.validate().unwrap();
    }

    #[test]
    fn children_cover_parent_corners_and_three_midpoints() {
        let mut mesh = scenario();
        let id = mesh.triangle_ids()[1];
        let parent = mesh.triangle(id).unwrap();
        let vertices_before = mesh.vertex_count();

        let children = mesh.refine(id).unwrap();
        let used: HashSet<Vertex> = children
            .iter()
            .flat_map(|c| mesh.triangle(*c).unwrap().vertices)
            .collect();

        assert_eq!(used.len(), 6);
        for corner in parent.vertices {
            assert!(used.contains(&corner));
        }
        let mids: Vec<&Vertex> = used.iter().filter(|v| v.radius < 5000.0).collect();
        assert_eq!(mids.len(), 3);
        assert_eq!(mesh.vertex_count(), vertices_before + 3);
    }

    #[test]
    fn central_child_uses_only_midpoints() {
        let mut mesh = scenario();
        let id = mesh.triangle_ids()[0];
        let [.., center] = mesh.refine(id).unwrap();
        let center = mesh.triangle(center).unwrap();
        assert!(center.vertices.iter().all(|v| (v.radius - 2500.0).abs() < 1e-9));
    }

    #[test]
    fn adjacent_refinements_share_one_midpoint() {
        let mut mesh = scenario();
        let (a, b) = adjacent_pair(&mesh);
        let before = mesh.vertex_count();

        mesh.refine(a).unwrap();
        mesh.refine(b).unwrap();

        assert_eq!(mesh.vertex_count(), before + 5);
        assert_eq!(mesh.triangle_count(), 6 + 6);
        mesh.validate().unwrap();
    }

    #[test]
    fn refined_triangle_is_gone() {
        let mut mesh = scenario();
        let id = mesh.triangle_ids()[0];
        let value = mesh.triangle(id).unwrap();
        mesh.refine(id).unwrap();

        let err = mesh.refine(id).unwrap_err();
        assert!(matches!(err, GeolatticeError::Mesh(MeshError::NotInMesh)));
        assert!(mesh.refine_triangle(&value).is_err());
        assert!(mesh.find_triangle(&value).is_none());
    }

    #[test]
    fn failed_refine_leaves_mesh_untouched() {
        let mut mesh = scenario();
        let snapshot = mesh.clone();
        let foreign = Triangle::new(
            [
                Vertex::new(LatLng::new(10.0, 10.0), 5000.0),
                Vertex::new(LatLng::new(10.0, 10.1), 5000.0),
                Vertex::new(LatLng::new(10.1, 10.05), 5000.0),
            ],
            5000.0,
        );
        let err = mesh.refine_triangle(&foreign).unwrap_err();
        assert!(matches!(err, GeolatticeError::Mesh(MeshError::NotInMesh)));
        assert_eq!(mesh, snapshot);
        mesh.validate().unwrap();
    }

    #[test]
    fn refine_by_value() {
        let mut mesh = scenario();
        let value = mesh.triangles()[4];
        let children = mesh.refine_triangle(&value).unwrap();
        let expected: HashSet<_> = value.split().into_iter().collect();
        let actual: HashSet<_> = children.iter().map(|c| mesh.triangle(*c).unwrap()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn nested_refinement_stays_consistent() {
        let mut mesh = scenario();
        let id = mesh.triangle_ids()[0];
        let [_, _, _, center] = mesh.refine(id).unwrap();
        let grandchildren = mesh.refine(center).unwrap();
        assert_relative_eq!(mesh.triangle(grandchildren[0]).unwrap().radius, 1250.0);
        assert_eq!(mesh.triangle_count(), 6 + 3 + 3);
        mesh.validate().unwrap();
    }

    #[test]
    fn refine_where_refines_matching_triangles_once() {
        let mut mesh = scenario();
        let n = mesh.triangle_count();
        let children = mesh
            .refine_where(|t| t.vertices.iter().any(|v| v.coordinate.lat == 0.0))
            .unwrap();
        // Only the southern strip touches latitude zero.
        assert_eq!(children.len(), 3 * 4);
        assert_eq!(mesh.triangle_count(), n + 3 * 3);
        mesh.validate().unwrap();
    }
}
