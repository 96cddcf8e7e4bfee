//! Querying a places service at every sample point.
//!
//! The HTTP client is not part of this crate: callers implement
//! [`PlacesSource`] for whatever service they use, and [`collect_places`]
//! drives it over the mesh's points and merges the answers.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{Result, SamplingError};
use crate::math::{LatLng, TOLERANCE};
use crate::mesh::Vertex;

/// Query radius used when neither the caller nor the vertex supplies one.
pub const DEFAULT_QUERY_RADIUS_M: f64 = 6000.0;

/// A place reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Service-assigned unique id.
    pub id: String,
    pub location: LatLng,
}

/// A places service that can be searched around one location at a time.
pub trait PlacesSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the places of the given types within `radius` meters of `location`.
    ///
    /// `place_types` is a `|`-separated list such as `"cafe|bar"`.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying service.
    fn search(
        &mut self,
        location: LatLng,
        radius: f64,
        place_types: &str,
    ) -> std::result::Result<Vec<Place>, Self::Error>;
}

/// What to ask the places service at each sample point.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// `|`-separated place types.
    pub place_types: String,
    /// Fixed query radius in meters; `None` uses each vertex's own radius.
    pub radius: Option<f64>,
}

impl SamplingParams {
    #[must_use]
    pub fn new(place_types: impl Into<String>) -> Self {
        Self {
            place_types: place_types.into(),
            radius: None,
        }
    }

    /// Builds params for several place types, joined with `|`.
    #[must_use]
    pub fn for_types(types: &[&str]) -> Self {
        Self::new(types.join("|"))
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    fn radius_for(&self, site: &Vertex) -> f64 {
        match self.radius {
            Some(r) => r,
            None if site.radius > TOLERANCE => site.radius,
            None => DEFAULT_QUERY_RADIUS_M,
        }
    }
}

/// Queries `source` at every site and merges the results by place id.
///
/// A place seen from several sites keeps the location reported last.
///
/// # Errors
///
/// Returns [`SamplingError::Query`] for the first site whose query fails;
/// no partial result is returned.
pub fn collect_places<S>(
    source: &mut S,
    params: &SamplingParams,
    sites: &[Vertex],
) -> Result<HashMap<String, LatLng>>
where
    S: PlacesSource + ?Sized,
{
    let mut places = HashMap::new();
    for site in sites {
        let radius = params.radius_for(site);
        let found = source
            .search(site.coordinate, radius, &params.place_types)
            .map_err(|e| SamplingError::Query {
                lat: site.coordinate.lat,
                lng: site.coordinate.lng,
                source: Box::new(e),
            })?;
        debug!(
            lat = site.coordinate.lat,
            lng = site.coordinate.lng,
            radius,
            found = found.len(),
            "queried site"
        );
        places.extend(found.into_iter().map(|p| (p.id, p.location)));
    }
    info!(
        sites = sites.len(),
        places = places.len(),
        types = %params.place_types,
        "collected places"
    );
    Ok(places)
}
