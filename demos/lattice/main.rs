//! Builds a small lattice, refines one triangle and prints the mesh record.
//!
//! Usage:
//! ```text
//! cargo run --example lattice                          # 0.1° box at the equator, 5 km spacing
//! cargo run --example lattice -- 47.5 8.4 47.6 8.6 2000  # sw_lat sw_lng ne_lat ne_lng spacing_m
//! RUST_LOG=geolattice=debug cargo run --example lattice
//! ```

use geolattice::{LatLng, Mesh, Result};

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for geolattice.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("lattice=info".parse().unwrap_or_default())
        .add_directive("geolattice=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<f64> = std::env::args()
        .skip(1)
        .filter_map(|a| a.parse().ok())
        .collect();
    let (sw, ne, spacing) = match args.as_slice() {
        [sw_lat, sw_lng, ne_lat, ne_lng, spacing] => (
            LatLng::new(*sw_lat, *sw_lng),
            LatLng::new(*ne_lat, *ne_lng),
            *spacing,
        ),
        _ => (LatLng::new(0.0, 0.0), LatLng::new(0.1, 0.1), 5000.0),
    };

    let mut mesh = Mesh::from_bounds(sw, ne, spacing)?;
    if let Some(first) = mesh.triangle_ids().first() {
        mesh.refine(*first)?;
    }
    tracing::info!(
        points = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh ready"
    );

    println!("{}", mesh.to_record().to_json_pretty()?);
    Ok(())
}
