//! Polygon area and minimum-area expansion.

use skybroker_core::error::GeometryError;
use skybroker_core::polygon::AreaPolygon;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Area of the polygon in km².
///
/// Vertices are projected onto a local plane centered on the centroid
/// (equirectangular, longitude scaled by cos of the centroid latitude to
/// correct for meridian convergence), then the shoelace formula is applied.
/// Deterministic, no side effects.
pub fn area_km2(polygon: &AreaPolygon) -> f64 {
    let (centroid_lon, centroid_lat) = polygon.centroid();
    let lat_scale = centroid_lat.to_radians().cos();
    let km_per_degree = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

    let projected: Vec<(f64, f64)> = polygon
        .vertices()
        .iter()
        .map(|&(lon, lat)| {
            (
                (lon - centroid_lon) * lat_scale * km_per_degree,
                (lat - centroid_lat) * km_per_degree,
            )
        })
        .collect();

    let n = projected.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += projected[i].0 * projected[j].1;
        area -= projected[j].0 * projected[i].1;
    }
    area.abs() / 2.0
}

/// Scale the polygon up from its centroid until it covers at least
/// `min_area_km2`.
///
/// A polygon already at or above the minimum is returned unchanged, so
/// repeated calls are a no-op. Shape and orientation are preserved: every
/// vertex offset from the centroid is multiplied by
/// sqrt(min_area / current_area). Degenerate (zero-area) rings are returned
/// unchanged; the ordering pipeline rejects them before expansion.
pub fn expand_to_minimum_area(
    polygon: &AreaPolygon,
    min_area_km2: f64,
) -> Result<AreaPolygon, GeometryError> {
    let current = area_km2(polygon);
    if current >= min_area_km2 || current <= 0.0 {
        return Ok(polygon.clone());
    }

    let factor = (min_area_km2 / current).sqrt();
    let (centroid_lon, centroid_lat) = polygon.centroid();

    tracing::debug!(
        current_km2 = current,
        min_km2 = min_area_km2,
        factor,
        "Expanding AOI to minimum area"
    );

    let expanded: Vec<(f64, f64)> = polygon
        .vertices()
        .iter()
        .map(|&(lon, lat)| {
            (
                centroid_lon + (lon - centroid_lon) * factor,
                centroid_lat + (lat - centroid_lat) * factor,
            )
        })
        .collect();

    AreaPolygon::new(expanded)
}
