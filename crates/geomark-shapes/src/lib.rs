#![warn(missing_docs)]

//! Area and perimeter math for closed point loops and circles.
//!
//! Perimeters are true great-circle sums; polygon areas use a planar
//! shoelace over raw degree coordinates scaled by a fixed
//! meters-per-degree constant. See [`polygon_area`] for the limits of
//! that approximation.

use std::f64::consts::PI;

use geomark_geodesy::{distance, GeoPoint};

/// Meters per degree of arc at the equator, used to scale the planar
/// shoelace area into square meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Area of a closed polygon in square meters.
///
/// Computed with the planar shoelace formula applied directly to
/// (longitude, latitude) degree pairs and scaled by
/// [`METERS_PER_DEGREE`] squared. This is an equatorial approximation:
/// accuracy degrades with polygon size and with distance from the
/// equator. The formula is kept as-is for compatibility with existing
/// measurements rather than replaced by a geodesic area.
///
/// Fewer than three vertices enclose nothing and yield 0.
pub fn polygon_area(points: &[GeoPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.lng * b.lat - b.lng * a.lat;
    }
    (sum / 2.0).abs() * METERS_PER_DEGREE * METERS_PER_DEGREE
}

/// Perimeter of a closed polygon in meters.
///
/// Sums great-circle distances over consecutive vertex pairs, treating
/// the sequence as closed (last vertex connects back to the first).
pub fn polygon_perimeter(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..points.len() {
        total += distance(points[i], points[(i + 1) % points.len()]);
    }
    total
}

/// Area of a circle in square meters.
pub fn circle_area(radius_m: f64) -> f64 {
    PI * radius_m * radius_m
}

/// Circumference of a circle in meters.
pub fn circle_circumference(radius_m: f64) -> f64 {
    2.0 * PI * radius_m
}

/// Side lengths and derived measurements of a three-point loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleMetrics {
    /// Great-circle length of side A-B in meters.
    pub side_ab: f64,
    /// Great-circle length of side B-C in meters.
    pub side_bc: f64,
    /// Great-circle length of side C-A in meters.
    pub side_ca: f64,
    /// Sum of the three sides in meters.
    pub perimeter: f64,
    /// Heron's-formula area over the side lengths, square meters.
    pub area: f64,
}

/// Measure a triangle from its three corners.
///
/// Legacy path retained for importing older triangulation data: side
/// lengths via great-circle distance, area via Heron's formula on
/// those lengths. New polygons go through [`polygon_area`] /
/// [`polygon_perimeter`] instead.
pub fn triangle_metrics(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> TriangleMetrics {
    let side_ab = distance(a, b);
    let side_bc = distance(b, c);
    let side_ca = distance(c, a);

    let perimeter = side_ab + side_bc + side_ca;
    let s = perimeter / 2.0;
    // Clamp: near-collinear corners can push the product slightly negative
    let area = (s * (s - side_ab) * (s - side_bc) * (s - side_ca)).max(0.0).sqrt();

    TriangleMetrics {
        side_ab,
        side_bc,
        side_ca,
        perimeter,
        area,
    }
}
