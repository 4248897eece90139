//! Geographic coordinate type.
//!
//! Distances are plain Euclidean distances over `(lat, lon)` degrees.  The
//! projection error is irrelevant for ranking candidate stations inside one
//! city, which is the only thing distances are used for.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.  Either component may be NaN when the source
/// row had no coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` when both components are finite numbers.
    #[inline]
    pub fn is_defined(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// `Some(self)` when defined, so a NaN point is stored as "no
    /// coordinate" and survives JSON, which has no NaN.
    #[inline]
    pub fn defined(self) -> Option<GeoPoint> {
        self.is_defined().then_some(self)
    }

    /// Euclidean distance in degrees.
    ///
    /// Returns NaN if either point is undefined.  NaN compares as neither
    /// less than nor greater than anything, so a `<`-based minimum search
    /// never selects it.
    pub fn distance(self, other: GeoPoint) -> f64 {
        if !self.is_defined() || !other.is_defined() {
            return f64::NAN;
        }
        let d_lat = self.lat - other.lat;
        let d_lon = self.lon - other.lon;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }

    /// Distance between two optional points, NaN if either is missing.
    pub fn distance_opt(a: Option<GeoPoint>, b: Option<GeoPoint>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => a.distance(b),
            _ => f64::NAN,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
