//! Geospatial predicates over building locations.
//!
//! Distance math leans on the `geo` crate; membership tests implement the
//! inclusive-boundary semantics the search engine relies on.
//! Nothing here validates coordinate ranges: pre-validation is the calling
//! layer's contract.

use crate::types::Coordinate;
use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

/// Great-circle distance between two coordinates in kilometers.
///
/// Uses the haversine formula on a spherical Earth (mean radius), which is
/// fast and accurate enough for directory-scale lookups.
///
/// # Examples
///
/// ```rust
/// use geodir::{Coordinate, spatial::distance_km};
///
/// let moscow = Coordinate::new(55.7558, 37.6173);
/// let spb = Coordinate::new(59.9343, 30.3351);
///
/// let dist = distance_km(&moscow, &spb);
/// assert!(dist > 600.0 && dist < 700.0);
/// ```
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    Haversine.distance(a.point(), b.point()) / 1000.0
}

/// Radius membership test, inclusive at the boundary.
pub fn within_radius(center: &Coordinate, location: &Coordinate, radius_km: f64) -> bool {
    distance_km(center, location) <= radius_km
}

/// An axis-aligned latitude/longitude box given by its north-east and
/// south-west corners.
///
/// Membership is inclusive on all four edges. A box whose west edge
/// exceeds its east edge numerically (or south above north) is treated as
/// empty rather than wrapped across the ±180° seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub north_east: Coordinate,
    pub south_west: Coordinate,
}

impl Rectangle {
    pub fn new(north_east: Coordinate, south_west: Coordinate) -> Self {
        if north_east.latitude < south_west.latitude
            || north_east.longitude < south_west.longitude
        {
            log::warn!(
                "degenerate rectangle: NE ({}, {}) not north-east of SW ({}, {})",
                north_east.latitude,
                north_east.longitude,
                south_west.latitude,
                south_west.longitude
            );
        }
        Self {
            north_east,
            south_west,
        }
    }

    /// Inclusive membership test.
    pub fn contains(&self, location: &Coordinate) -> bool {
        location.latitude >= self.south_west.latitude
            && location.latitude <= self.north_east.latitude
            && location.longitude >= self.south_west.longitude
            && location.longitude <= self.north_east.longitude
    }
}
