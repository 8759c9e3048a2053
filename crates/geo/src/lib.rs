//! Geometry engine for skybroker AOIs.
//!
//! Pure functions over `AreaPolygon`: area measurement on a local planar
//! projection, centroid-preserving expansion to a minimum billable area,
//! and Douglas-Peucker simplification with adaptive byte-size targeting.
//!
//! Accuracy is within a few percent for AOIs up to a few hundred km².
//! Polygons spanning large latitude ranges or crossing the antimeridian are
//! outside the supported envelope.

pub mod area;
pub mod simplify;

pub use area::{EARTH_RADIUS_KM, area_km2, expand_to_minimum_area};
pub use simplify::{MIN_RING_VERTICES, simplify_to_bytes, simplify_to_target};
