use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::Result;
use crate::mesh::{Mesh, MeshRecord, Triangle, TriangleId, Vertex};

/// A mesh shared between threads behind a single reader-writer lock.
///
/// Mutations (`refine*`, `replace_from_record`) hold the write lock for the
/// whole operation; queries may run concurrently with each other.
#[derive(Debug, Clone, Default)]
pub struct SharedMesh {
    inner: Arc<RwLock<Mesh>>,
}

impl SharedMesh {
    #[must_use]
    pub fn new(mesh: Mesh) -> Self {
        Self {
            inner: Arc::new(RwLock::new(mesh)),
        }
    }

    /// Locks the mesh for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Mesh> {
        self.inner.read()
    }

    #[must_use]
    pub fn get_points(&self) -> Vec<Vertex> {
        self.inner.read().get_points()
    }

    #[must_use]
    pub fn to_record(&self) -> MeshRecord {
        self.inner.read().to_record()
    }

    /// See [`Mesh::refine`].
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`](crate::error::MeshError::NotInMesh)
    /// if `id` is not live.
    pub fn refine(&self, id: TriangleId) -> Result<[TriangleId; 4]> {
        self.inner.write().refine(id)
    }

    /// See [`Mesh::refine_triangle`].
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NotInMesh`](crate::error::MeshError::NotInMesh)
    /// if no live triangle matches.
    pub fn refine_triangle(&self, triangle: &Triangle) -> Result<[TriangleId; 4]> {
        self.inner.write().refine_triangle(triangle)
    }

    /// Rebuilds the mesh from a record, replacing the current one.
    ///
    /// The new mesh is built before the lock is taken; on error the current
    /// mesh is kept.
    ///
    /// # Errors
    ///
    /// See [`Mesh::from_record`].
    pub fn replace_from_record(&self, record: &MeshRecord) -> Result<()> {
        let mesh = Mesh::from_record(record)?;
        *self.inner.write() = mesh;
        Ok(())
    }
}
