#![warn(missing_docs)]

//! Geodesic primitives for the geomark measurement kernel.
//!
//! All distance, bearing, and projection math in the workspace routes
//! through this crate so that every measurement shares one Earth model:
//! a sphere of mean radius [`EARTH_RADIUS_M`]. Inputs and outputs are
//! degrees; conversion to radians happens only inside this crate.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (spherical approximation).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic position in degrees on the WGS84-ish sphere.
///
/// Immutable value type: moving an entity produces a new `GeoPoint`
/// assigned to the owning record, never an in-place coordinate edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two points in meters (haversine).
///
/// Symmetric in its arguments; `distance(a, a)` is exactly 0.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `a` to `b` along the great circle, in radians.
///
/// Range is `(-PI, PI]` as produced by the two-argument arctangent.
/// For `a == b` the result is 0.0; callers should not rely on a
/// meaningful direction in that degenerate case.
pub fn bearing(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let x = d_lng.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    x.atan2(y)
}

/// Initial bearing from `a` to `b` in degrees, normalized to `[0, 360)`.
///
/// `azimuth(a, b)` and `azimuth(b, a)` differ by 180° modulo 360 for
/// distinct points (reverse bearing).
pub fn azimuth(a: GeoPoint, b: GeoPoint) -> f64 {
    wrap_degrees(bearing(a, b).to_degrees())
}

/// Forward geodesic projection: the point reached from `start` after
/// travelling `distance_m` meters along `bearing_rad` (radians,
/// clockwise from north).
pub fn destination(start: GeoPoint, distance_m: f64, bearing_rad: f64) -> GeoPoint {
    let lat1 = start.lat.to_radians();
    let lng1 = start.lng.to_radians();
    let ang = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * ang.cos() + lat1.cos() * ang.sin() * bearing_rad.cos()).asin();
    let lng2 = lng1
        + (bearing_rad.sin() * ang.sin() * lat1.cos())
            .atan2(ang.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lng2.to_degrees())
}

/// Arithmetic midpoint of two positions, used to anchor segment labels.
///
/// Deliberately the coordinate mean rather than the great-circle
/// midpoint: labels sit halfway along the rendered chord.
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    GeoPoint::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can yield exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Tolerances for comparing geodesic quantities.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear tolerance in meters.
    pub linear: f64,
    /// Angular tolerance in degrees.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances: 1e-3 m linear, 1e-6 degrees angular.
    pub const DEFAULT: Self = Self {
        linear: 1e-3,
        angular: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: GeoPoint, b: GeoPoint) -> bool {
        distance(a, b) < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
