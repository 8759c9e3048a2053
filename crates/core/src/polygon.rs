//! Area-of-interest polygon with a WKT codec.
//!
//! An `AreaPolygon` is a simple closed ring of (longitude, latitude) vertex
//! pairs. Callers may supply WKT where the first vertex is or is not
//! repeated as the last; both forms parse to the same polygon. Internally
//! the ring is stored open (no duplicated closing vertex); `to_wkt` always
//! emits the closed form.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A simple closed ring over (lon, lat) vertices, stored open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPolygon {
    vertices: Vec<(f64, f64)>,
}

impl AreaPolygon {
    /// Build a polygon from (lon, lat) vertices.
    ///
    /// A trailing vertex equal to the first is dropped. Fails when any
    /// coordinate is non-finite or fewer than 3 distinct vertices remain.
    /// Zero-area rings are accepted here; degenerate geometry is rejected
    /// by the ordering pipeline, not repaired.
    pub fn new(mut vertices: Vec<(f64, f64)>) -> Result<Self, GeometryError> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        for (index, &(lon, lat)) in vertices.iter().enumerate() {
            if !lon.is_finite() || !lat.is_finite() {
                return Err(GeometryError::NonFiniteCoordinate { index });
            }
        }

        let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(vertices.len());
        for v in &vertices {
            if !distinct.contains(v) {
                distinct.push(*v);
            }
        }
        if distinct.len() < 3 {
            return Err(GeometryError::TooFewVertices(distinct.len()));
        }

        Ok(Self { vertices })
    }

    /// Parse a `POLYGON((lon lat, lon lat, ...))` string.
    ///
    /// Only single-ring polygons are supported; holes and multipolygons are
    /// not part of this subsystem's contract.
    pub fn from_wkt(wkt: &str) -> Result<Self, GeometryError> {
        let trimmed = wkt.trim();
        let invalid = || GeometryError::InvalidWkt(trimmed.to_string());

        if trimmed.len() < 7 || !trimmed[..7].eq_ignore_ascii_case("POLYGON") {
            return Err(invalid());
        }
        let body = trimmed[7..].trim_start();
        let inner = body
            .strip_prefix("((")
            .and_then(|rest| rest.strip_suffix("))"))
            .ok_or_else(invalid)?;

        let mut vertices = Vec::new();
        for pair in inner.split(',') {
            let mut parts = pair.split_whitespace();
            let (lon, lat) = match (parts.next(), parts.next(), parts.next()) {
                (Some(lon), Some(lat), None) => (lon, lat),
                _ => return Err(invalid()),
            };
            let lon: f64 = lon.parse().map_err(|_| invalid())?;
            let lat: f64 = lat.parse().map_err(|_| invalid())?;
            vertices.push((lon, lat));
        }

        Self::new(vertices)
    }

    /// Serialize as WKT with the ring explicitly closed.
    pub fn to_wkt(&self) -> String {
        let mut coords: Vec<String> = self
            .vertices
            .iter()
            .map(|(lon, lat)| format!("{lon} {lat}"))
            .collect();
        if let Some(first) = coords.first().cloned() {
            coords.push(first);
        }
        format!("POLYGON(({}))", coords.join(", "))
    }

    /// The open ring (closing vertex not repeated).
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Number of distinct ring positions (open ring length).
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex-mean centroid of the open ring.
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.vertices.len() as f64;
        let (sum_lon, sum_lat) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(lon, lat)| (sx + lon, sy + lat));
        (sum_lon / n, sum_lat / n)
    }

    /// Axis-aligned bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut min_lon = f64::INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        for &(lon, lat) in &self.vertices {
            min_lon = min_lon.min(lon);
            min_lat = min_lat.min(lat);
            max_lon = max_lon.max(lon);
            max_lat = max_lat.max(lat);
        }
        (min_lon, min_lat, max_lon, max_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_open_and_closed_rings_equal() {
        let open = AreaPolygon::from_wkt("POLYGON((0 0, 1 0, 1 1, 0 1))").unwrap();
        let closed = AreaPolygon::from_wkt("POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
        assert_eq!(open, closed);
        assert_eq!(open.len(), 4);
    }

    #[test]
    fn to_wkt_closes_ring() {
        let poly = AreaPolygon::from_wkt("POLYGON((0 0, 1 0, 1 1))").unwrap();
        let wkt = poly.to_wkt();
        assert!(wkt.starts_with("POLYGON(("));
        assert!(wkt.ends_with("0 0))"));
        // Round-trips to the same polygon
        assert_eq!(AreaPolygon::from_wkt(&wkt).unwrap(), poly);
    }

    #[test]
    fn case_insensitive_keyword_and_whitespace() {
        let poly = AreaPolygon::from_wkt("  polygon ((0 0, 2 0, 2 2, 0 2))  ").unwrap();
        assert_eq!(poly.len(), 4);
    }

    #[test]
    fn rejects_missing_keyword() {
        let err = AreaPolygon::from_wkt("LINESTRING(0 0, 1 1)").unwrap_err();
        assert!(matches!(err, GeometryError::InvalidWkt(_)));
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        let err = AreaPolygon::from_wkt("POLYGON((0 0, abc 1, 1 1))").unwrap_err();
        assert!(matches!(err, GeometryError::InvalidWkt(_)));
    }

    #[test]
    fn rejects_too_few_distinct_vertices() {
        // A closed two-point "ring": 0 0, 1 1, 0 0 → two distinct vertices
        let err = AreaPolygon::from_wkt("POLYGON((0 0, 1 1, 0 0))").unwrap_err();
        assert_eq!(err, GeometryError::TooFewVertices(2));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let err = AreaPolygon::new(vec![(0.0, 0.0), (f64::NAN, 1.0), (1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::NonFiniteCoordinate { index: 1 }));
    }

    #[test]
    fn centroid_of_unit_square() {
        let poly = AreaPolygon::from_wkt("POLYGON((0 0, 1 0, 1 1, 0 1))").unwrap();
        let (lon, lat) = poly.centroid();
        assert!((lon - 0.5).abs() < 1e-12);
        assert!((lat - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_covers_ring() {
        let poly = AreaPolygon::from_wkt("POLYGON((-1 -2, 3 -2, 3 4, -1 4))").unwrap();
        assert_eq!(poly.bounding_box(), (-1.0, -2.0, 3.0, 4.0));
    }
}
