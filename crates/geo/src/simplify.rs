//! Douglas-Peucker polygon simplification with byte-budget targeting.
//!
//! Vendor APIs reject AOI strings past a size limit, so oversized polygons
//! are thinned until their WKT fits. The tolerance is doubled until the
//! re-serialized polygon fits the budget; if no tolerance converges the
//! bounding box stands in as a last resort.

use skybroker_core::error::GeometryError;
use skybroker_core::polygon::AreaPolygon;

/// Minimum number of open-ring vertices a simplified polygon may have.
pub const MIN_RING_VERTICES: usize = 4;

/// Perpendicular distance from `point` to the line through `start`..`end`,
/// in degrees.
fn perpendicular_distance(point: (f64, f64), start: (f64, f64), end: (f64, f64)) -> f64 {
    let (x0, y0) = point;
    let (x1, y1) = start;
    let (x2, y2) = end;

    if x1 == x2 && y1 == y2 {
        return ((x0 - x1).powi(2) + (y0 - y1).powi(2)).sqrt();
    }

    let numerator = ((y2 - y1) * x0 - (x2 - x1) * y0 + x2 * y1 - y2 * x1).abs();
    let denominator = ((y2 - y1).powi(2) + (x2 - x1).powi(2)).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Recursive Douglas-Peucker over an open vertex sequence.
fn douglas_peucker(coords: &[(f64, f64)], epsilon: f64) -> Vec<(f64, f64)> {
    if coords.len() <= 2 {
        return coords.to_vec();
    }

    let first = coords[0];
    let last = coords[coords.len() - 1];

    let mut max_distance = 0.0;
    let mut max_index = 0;
    for (i, &point) in coords.iter().enumerate().take(coords.len() - 1).skip(1) {
        let distance = perpendicular_distance(point, first, last);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    if max_distance > epsilon {
        let mut left = douglas_peucker(&coords[..=max_index], epsilon);
        let right = douglas_peucker(&coords[max_index..], epsilon);
        left.pop(); // drop the duplicated split point
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Simplify with a fixed tolerance, padding back up to `MIN_RING_VERTICES`
/// from the original ring when the reduction overshoots.
fn simplify_with_tolerance(
    polygon: &AreaPolygon,
    tolerance: f64,
) -> Result<AreaPolygon, GeometryError> {
    let coords = polygon.vertices();
    let mut simplified = douglas_peucker(coords, tolerance);

    if simplified.len() < MIN_RING_VERTICES {
        simplified.clear();
        for &v in coords {
            if !simplified.contains(&v) {
                simplified.push(v);
            }
            if simplified.len() == MIN_RING_VERTICES {
                break;
            }
        }
    }

    AreaPolygon::new(simplified)
}

/// Default tolerance: 0.1% of the larger coordinate span.
fn span_tolerance(polygon: &AreaPolygon) -> f64 {
    let (min_lon, min_lat, max_lon, max_lat) = polygon.bounding_box();
    let span = (max_lon - min_lon).max(max_lat - min_lat);
    (span / 1000.0).max(1e-9)
}

/// Reduce the polygon to roughly `target_points` open-ring vertices.
///
/// The tolerance starts small and doubles until the ring is at or under the
/// target (clamped to `MIN_RING_VERTICES`). Polygons already at or under
/// the target are returned unchanged.
pub fn simplify_to_target(
    polygon: &AreaPolygon,
    target_points: usize,
) -> Result<AreaPolygon, GeometryError> {
    let target = target_points.max(MIN_RING_VERTICES);
    if polygon.len() <= target {
        return Ok(polygon.clone());
    }

    let coords = polygon.vertices();
    let mut tolerance = 1e-4;
    let mut simplified = douglas_peucker(coords, tolerance);
    while simplified.len() > target && tolerance < 1.0 {
        tolerance *= 2.0;
        simplified = douglas_peucker(coords, tolerance);
    }

    let before = polygon.len();
    let result = if simplified.len() < MIN_RING_VERTICES {
        simplify_with_tolerance(polygon, tolerance)?
    } else {
        AreaPolygon::new(simplified)?
    };
    tracing::debug!(before, after = result.len(), "Simplified polygon");
    Ok(result)
}

/// Simplify until the serialized WKT fits `max_bytes`.
///
/// Doubles the tolerance until the re-serialized polygon fits. When no
/// tolerance converges, the axis-aligned bounding box is returned instead
/// as a coarse but always-valid stand-in for the AOI.
pub fn simplify_to_bytes(
    polygon: &AreaPolygon,
    max_bytes: usize,
) -> Result<AreaPolygon, GeometryError> {
    if polygon.to_wkt().len() <= max_bytes {
        return Ok(polygon.clone());
    }

    let mut tolerance = span_tolerance(polygon);
    for _ in 0..32 {
        let candidate = simplify_with_tolerance(polygon, tolerance)?;
        if candidate.to_wkt().len() <= max_bytes {
            tracing::debug!(
                before = polygon.len(),
                after = candidate.len(),
                max_bytes,
                "Simplified polygon to byte budget"
            );
            return Ok(candidate);
        }
        tolerance *= 2.0;
    }

    tracing::warn!(max_bytes, "No tolerance converged; falling back to bounding box");
    let (min_lon, min_lat, max_lon, max_lat) = polygon.bounding_box();
    AreaPolygon::new(vec![
        (min_lon, min_lat),
        (max_lon, min_lat),
        (max_lon, max_lat),
        (min_lon, max_lat),
    ])
}
