pub mod error;
pub mod lattice;
pub mod math;
pub mod mesh;
pub mod sampling;
pub mod shared;

pub use error::{GeolatticeError, Result};
pub use math::LatLng;
pub use mesh::{Mesh, MeshRecord, MeshSpec, Triangle, TriangleId, Vertex, VertexId};
pub use shared::SharedMesh;
