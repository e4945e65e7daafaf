//! Entity records stored in the graph.

use geomark_geodesy::GeoPoint;
use slotmap::new_key_type;

new_key_type! {
    /// Stable id of a point in the arena.
    pub struct PointId;
    /// Stable id of a multi-segment line.
    pub struct LineId;
    /// Stable id of a circle.
    pub struct CircleId;
    /// Stable id of a polygon.
    pub struct PolygonId;
    /// Stable id of an imported read-only boundary.
    pub struct BoundaryId;
}

/// Color assigned to newly created points.
pub const DEFAULT_POINT_COLOR: &str = "#e74c3c";

/// Which structure, if any, owns a point.
///
/// Ownership is exclusive: a point is standalone or belongs to exactly
/// one line, polygon, or circle. Resolved once at lookup time so edit
/// propagation never scans the collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Not referenced by any structure.
    Standalone,
    /// A vertex of the given line.
    Line(LineId),
    /// A vertex of the given polygon.
    Polygon(PolygonId),
    /// The center of the given circle.
    Circle(CircleId),
}

/// A named, user-visible point annotation.
#[derive(Debug, Clone)]
pub struct PointRecord {
    /// Geographic position.
    pub position: GeoPoint,
    /// Display name.
    pub name: String,
    /// Display color (CSS hex string).
    pub color: String,
    pub(crate) owner: Ownership,
}

impl PointRecord {
    /// The structure that owns this point, if any.
    pub fn owner(&self) -> Ownership {
        self.owner
    }
}

/// A derived edge between two adjacent line vertices.
///
/// Segments are never created independently: the graph synthesizes them
/// when a vertex is committed and rebuilds them when either endpoint
/// moves or disappears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Id of the segment's start vertex.
    pub start: PointId,
    /// Id of the segment's end vertex.
    pub end: PointId,
    /// Great-circle length in meters.
    pub distance: f64,
    /// Initial azimuth in degrees, `[0, 360)` clockwise from north.
    pub azimuth: f64,
    /// Chord midpoint, used by the UI to anchor the segment label.
    pub midpoint: GeoPoint,
}

/// A multi-segment measured line.
///
/// Invariant: a line with `n` vertices has exactly `n - 1` segments and
/// segment `i` connects vertex `i` to vertex `i + 1`.
#[derive(Debug, Clone)]
pub struct Line {
    pub(crate) points: Vec<PointId>,
    pub(crate) segments: Vec<Segment>,
    pub(crate) total_distance: f64,
    pub(crate) finalized: bool,
}

impl Line {
    /// Ordered vertex ids.
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// Derived segments, one per adjacent vertex pair.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Running total of segment distances in meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// True once the line has been frozen into the persistent set.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// A measured circle: an owned center point plus a radius.
#[derive(Debug, Clone)]
pub struct Circle {
    pub(crate) center: PointId,
    pub(crate) radius: f64,
}

impl Circle {
    /// Id of the center point.
    pub fn center(&self) -> PointId {
        self.center
    }

    /// Radius in meters, always >= 0.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Enclosed area in square meters.
    pub fn area(&self) -> f64 {
        geomark_shapes::circle_area(self.radius)
    }

    /// Circumference in meters.
    pub fn circumference(&self) -> f64 {
        geomark_shapes::circle_circumference(self.radius)
    }
}

/// A closed measured polygon (last vertex connects back to the first).
#[derive(Debug, Clone)]
pub struct Polygon {
    pub(crate) points: Vec<PointId>,
    pub(crate) area: f64,
    pub(crate) perimeter: f64,
}

impl Polygon {
    /// Ordered vertex ids of the closed loop.
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// Derived area in square meters.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Derived perimeter in meters.
    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }
}

/// A closed boundary imported from an external provider.
///
/// Boundaries store raw positions rather than arena points: they are
/// read-only and never participate in edit propagation.
#[derive(Debug, Clone)]
pub struct Boundary {
    /// Human-readable label for the boundary.
    pub label: String,
    /// Ordered closed loop of positions.
    pub points: Vec<GeoPoint>,
}

impl Boundary {
    /// Area of the boundary loop in square meters.
    pub fn area(&self) -> f64 {
        geomark_shapes::polygon_area(&self.points)
    }

    /// Perimeter of the boundary loop in meters.
    pub fn perimeter(&self) -> f64 {
        geomark_shapes::polygon_perimeter(&self.points)
    }
}
