use thiserror::Error;

/// Top-level error type for the geolattice mesh engine.
#[derive(Debug, Error)]
pub enum GeolatticeError {
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

/// Errors raised while laying out the initial lattice.
#[derive(Debug, Error)]
pub enum LatticeError {
    /// The region's longitude span is negative (it would cross the antimeridian).
    #[error("invalid region: ne.lng = {ne_lng} is west of sw.lng = {sw_lng}")]
    InvalidRegion { sw_lng: f64, ne_lng: f64 },

    #[error("degenerate step {step} for interval [{start}, {stop}]")]
    DegenerateStep { start: f64, stop: f64, step: f64 },
}

/// Errors related to mesh construction and mutation.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("invalid mesh spec: {0}")]
    InvalidMeshSpec(String),

    #[error("triangle is not part of the mesh")]
    NotInMesh,
}

/// Errors reported by the places collaborator during sampling.
#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("places query at ({lat}, {lng}) failed")]
    Query {
        lat: f64,
        lng: f64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience type alias for results using [`GeolatticeError`].
pub type Result<T> = std::result::Result<T, GeolatticeError>;
