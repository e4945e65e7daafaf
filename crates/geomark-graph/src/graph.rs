//! The entity graph: creation, ownership, and deletion authority.

use geomark_geodesy::{azimuth, distance, midpoint, GeoPoint};
use geomark_shapes::{polygon_area, polygon_perimeter};
use slotmap::SlotMap;
use tracing::debug;

use crate::entity::{
    Boundary, BoundaryId, Circle, CircleId, Line, LineId, Ownership, PointId, PointRecord,
    Polygon, PolygonId, Segment, DEFAULT_POINT_COLOR,
};
use crate::error::{GraphError, Result};
use crate::report::EditReport;

/// Minimum vertices for a line to be finalized or survive deletion.
pub(crate) const MIN_LINE_VERTICES: usize = 2;
/// Minimum vertices for a polygon to be finalized or survive deletion.
pub(crate) const MIN_POLYGON_VERTICES: usize = 3;

/// The sole mutable store of measurement entities.
///
/// All ids are slotmap keys allocated by this graph, so uniqueness is
/// structural rather than probabilistic. Every operation is synchronous
/// and leaves the graph unchanged on error.
#[derive(Debug, Default)]
pub struct EntityGraph {
    pub(crate) points: SlotMap<PointId, PointRecord>,
    pub(crate) lines: SlotMap<LineId, Line>,
    pub(crate) circles: SlotMap<CircleId, Circle>,
    pub(crate) polygons: SlotMap<PolygonId, Polygon>,
    pub(crate) boundaries: SlotMap<BoundaryId, Boundary>,
}

impl EntityGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- points ---

    /// Allocate a new standalone point.
    pub fn create_point(&mut self, position: GeoPoint, name: impl Into<String>) -> PointId {
        let id = self.points.insert(PointRecord {
            position,
            name: name.into(),
            color: DEFAULT_POINT_COLOR.to_string(),
            owner: Ownership::Standalone,
        });
        debug!(?id, lat = position.lat, lng = position.lng, "point created");
        id
    }

    /// Look up a point.
    pub fn point(&self, id: PointId) -> Option<&PointRecord> {
        self.points.get(id)
    }

    /// Iterate over all points.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &PointRecord)> {
        self.points.iter()
    }

    /// Change a point's display name.
    pub fn rename_point(&mut self, id: PointId, name: impl Into<String>) -> Result<()> {
        let point = self.points.get_mut(id).ok_or(GraphError::NotFound)?;
        point.name = name.into();
        Ok(())
    }

    /// Change a point's display color.
    pub fn recolor_point(&mut self, id: PointId, color: impl Into<String>) -> Result<()> {
        let point = self.points.get_mut(id).ok_or(GraphError::NotFound)?;
        point.color = color.into();
        Ok(())
    }

    /// Move a point and recompute everything derived from it.
    ///
    /// Same id, same ownership; only the position and the dependent
    /// derived quantities change. Returns a report of every structure
    /// the move touched.
    pub fn move_point(&mut self, id: PointId, new_position: GeoPoint) -> Result<EditReport> {
        let point = self.points.get_mut(id).ok_or(GraphError::NotFound)?;
        point.position = new_position;
        let owner = point.owner;
        debug!(?id, ?owner, "point moved");
        Ok(self.propagate_move(id, owner))
    }

    /// Delete a point and resolve the structural consequences.
    ///
    /// The owning structure (if any) is shrunk, reconnected, or
    /// destroyed as described in the report. Deleting an unknown id is
    /// reported as [`GraphError::NotFound`] with no other effect.
    pub fn delete_point(&mut self, id: PointId) -> Result<EditReport> {
        let owner = self.points.get(id).ok_or(GraphError::NotFound)?.owner;
        debug!(?id, ?owner, "point deleted");
        Ok(self.propagate_delete(id, owner))
    }

    // --- lines ---

    /// Start a new line at an existing standalone point.
    ///
    /// The line claims ownership of `first` and stays mutable until
    /// [`finalize_line`](Self::finalize_line).
    pub fn create_line(&mut self, first: PointId) -> Result<LineId> {
        self.ensure_standalone(first)?;
        let id = self.lines.insert(Line {
            points: vec![first],
            segments: Vec::new(),
            total_distance: 0.0,
            finalized: false,
        });
        self.points[first].owner = Ownership::Line(id);
        debug!(?id, "line started");
        Ok(id)
    }

    /// Append a vertex to an in-progress line.
    ///
    /// Synthesizes the segment from the previous last vertex, claims
    /// ownership of `next`, and updates the running total. Returns a
    /// copy of the new segment.
    pub fn commit_segment(&mut self, line: LineId, next: PointId) -> Result<Segment> {
        let record = self.lines.get(line).ok_or(GraphError::NotFound)?;
        if record.finalized {
            return Err(GraphError::Structural(
                "cannot append to a finalized line".into(),
            ));
        }
        let last = *record.points.last().expect("line always has >= 1 vertex");
        self.ensure_standalone(next)?;

        let segment = self.build_segment(last, next);
        self.points[next].owner = Ownership::Line(line);
        let record = &mut self.lines[line];
        record.points.push(next);
        record.segments.push(segment);
        record.total_distance += segment.distance;
        debug!(
            ?line,
            distance = segment.distance,
            azimuth = segment.azimuth,
            total = record.total_distance,
            "segment committed"
        );
        Ok(segment)
    }

    /// Freeze a line into the persistent collection.
    pub fn finalize_line(&mut self, line: LineId) -> Result<()> {
        let record = self.lines.get_mut(line).ok_or(GraphError::NotFound)?;
        if record.finalized {
            return Err(GraphError::Structural("line is already finalized".into()));
        }
        if record.points.len() < MIN_LINE_VERTICES {
            return Err(GraphError::InsufficientVertices {
                needed: MIN_LINE_VERTICES,
                got: record.points.len(),
            });
        }
        record.finalized = true;
        debug!(?line, segments = record.segments.len(), "line finalized");
        Ok(())
    }

    /// Discard an in-progress line and every point it owns.
    ///
    /// Only unfinalized lines can be discarded; this is how a drawing
    /// session cancels without side effects.
    pub fn discard_line(&mut self, line: LineId) -> Result<()> {
        let record = self.lines.get(line).ok_or(GraphError::NotFound)?;
        if record.finalized {
            return Err(GraphError::Structural(
                "cannot discard a finalized line".into(),
            ));
        }
        self.remove_line(line);
        Ok(())
    }

    /// Delete a line (finalized or not) and every point it owns.
    pub fn delete_line(&mut self, line: LineId) -> Result<()> {
        if !self.lines.contains_key(line) {
            return Err(GraphError::NotFound);
        }
        self.remove_line(line);
        Ok(())
    }

    /// Look up a line.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    /// Iterate over all lines.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines.iter()
    }

    // --- circles ---

    /// Create a circle around an existing standalone center point.
    pub fn create_circle(&mut self, center: PointId, radius: f64) -> Result<CircleId> {
        Self::validate_radius(radius)?;
        self.ensure_standalone(center)?;
        let id = self.circles.insert(Circle { center, radius });
        self.points[center].owner = Ownership::Circle(id);
        debug!(?id, radius, "circle created");
        Ok(id)
    }

    /// Explicitly change a committed circle's radius.
    pub fn set_circle_radius(&mut self, circle: CircleId, radius: f64) -> Result<()> {
        Self::validate_radius(radius)?;
        let record = self.circles.get_mut(circle).ok_or(GraphError::NotFound)?;
        record.radius = radius;
        Ok(())
    }

    /// Delete a circle and its center point.
    pub fn delete_circle(&mut self, circle: CircleId) -> Result<()> {
        let record = self.circles.remove(circle).ok_or(GraphError::NotFound)?;
        self.points.remove(record.center);
        Ok(())
    }

    /// Look up a circle.
    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.circles.get(id)
    }

    /// Iterate over all circles.
    pub fn circles(&self) -> impl Iterator<Item = (CircleId, &Circle)> {
        self.circles.iter()
    }

    // --- polygons ---

    /// Freeze an ordered closed loop of standalone points into a polygon.
    ///
    /// Requires at least three distinct standalone vertices; claims
    /// ownership of all of them and computes area and perimeter.
    pub fn finalize_polygon(&mut self, vertices: &[PointId]) -> Result<PolygonId> {
        if vertices.len() < MIN_POLYGON_VERTICES {
            return Err(GraphError::InsufficientVertices {
                needed: MIN_POLYGON_VERTICES,
                got: vertices.len(),
            });
        }
        // Validate everything before claiming anything, so a failure
        // leaves no vertex half-owned.
        for (i, &id) in vertices.iter().enumerate() {
            self.ensure_standalone(id)?;
            if vertices[..i].contains(&id) {
                return Err(GraphError::OwnershipViolation);
            }
        }

        let positions = self.positions_of(vertices);
        let polygon = Polygon {
            points: vertices.to_vec(),
            area: polygon_area(&positions),
            perimeter: polygon_perimeter(&positions),
        };
        let id = self.polygons.insert(polygon);
        for &point in vertices {
            self.points[point].owner = Ownership::Polygon(id);
        }
        debug!(?id, vertices = vertices.len(), "polygon finalized");
        Ok(id)
    }

    /// Delete a polygon and every point it owns.
    pub fn delete_polygon(&mut self, polygon: PolygonId) -> Result<()> {
        let record = self.polygons.remove(polygon).ok_or(GraphError::NotFound)?;
        for point in record.points {
            self.points.remove(point);
        }
        Ok(())
    }

    /// Look up a polygon.
    pub fn polygon(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons.get(id)
    }

    /// Iterate over all polygons.
    pub fn polygons(&self) -> impl Iterator<Item = (PolygonId, &Polygon)> {
        self.polygons.iter()
    }

    // --- boundaries ---

    /// Store an externally computed closed boundary.
    ///
    /// Boundaries are read-only: they own no arena points and edit
    /// propagation never touches them.
    pub fn create_boundary(
        &mut self,
        label: impl Into<String>,
        points: Vec<GeoPoint>,
    ) -> Result<BoundaryId> {
        if points.len() < MIN_POLYGON_VERTICES {
            return Err(GraphError::InsufficientVertices {
                needed: MIN_POLYGON_VERTICES,
                got: points.len(),
            });
        }
        let id = self.boundaries.insert(Boundary {
            label: label.into(),
            points,
        });
        debug!(?id, "boundary imported");
        Ok(id)
    }

    /// Look up a boundary.
    pub fn boundary(&self, id: BoundaryId) -> Option<&Boundary> {
        self.boundaries.get(id)
    }

    /// Iterate over all boundaries.
    pub fn boundaries(&self) -> impl Iterator<Item = (BoundaryId, &Boundary)> {
        self.boundaries.iter()
    }

    // --- whole-graph ---

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.circles.clear();
        self.polygons.clear();
        self.boundaries.clear();
        debug!("graph cleared");
    }

    /// True if the graph holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.boundaries.is_empty()
    }

    // --- internals ---

    /// Build the derived segment record between two arena points.
    pub(crate) fn build_segment(&self, start: PointId, end: PointId) -> Segment {
        let a = self.points[start].position;
        let b = self.points[end].position;
        Segment {
            start,
            end,
            distance: distance(a, b),
            azimuth: azimuth(a, b),
            midpoint: midpoint(a, b),
        }
    }

    pub(crate) fn positions_of(&self, ids: &[PointId]) -> Vec<GeoPoint> {
        ids.iter().map(|&id| self.points[id].position).collect()
    }

    pub(crate) fn remove_line(&mut self, line: LineId) {
        let record = self.lines.remove(line).expect("caller checked existence");
        for point in record.points {
            self.points.remove(point);
        }
    }

    fn ensure_standalone(&self, id: PointId) -> Result<()> {
        let point = self.points.get(id).ok_or(GraphError::NotFound)?;
        match point.owner {
            Ownership::Standalone => Ok(()),
            _ => Err(GraphError::OwnershipViolation),
        }
    }

    fn validate_radius(radius: f64) -> Result<()> {
        if radius.is_finite() && radius >= 0.0 {
            Ok(())
        } else {
            Err(GraphError::Structural(format!(
                "circle radius must be finite and >= 0, got {radius}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomark_geodesy::destination;

    fn p(graph: &mut EntityGraph, lat: f64, lng: f64) -> PointId {
        graph.create_point(GeoPoint::new(lat, lng), "")
    }

    #[test]
    fn test_create_point_is_standalone() {
        let mut graph = EntityGraph::new();
        let id = p(&mut graph, 48.0, 2.0);
        assert_eq!(graph.point(id).unwrap().owner(), Ownership::Standalone);
        assert_eq!(graph.point(id).unwrap().color, DEFAULT_POINT_COLOR);
    }

    #[test]
    fn test_line_segment_invariant() {
        let mut graph = EntityGraph::new();
        let start = p(&mut graph, 0.0, 0.0);
        let line = graph.create_line(start).unwrap();

        for i in 1..=4 {
            let next = p(&mut graph, 0.0, 0.01 * i as f64);
            graph.commit_segment(line, next).unwrap();
        }

        let record = graph.line(line).unwrap();
        assert_eq!(record.points().len(), 5);
        assert_eq!(record.segments().len(), 4);
        for (i, seg) in record.segments().iter().enumerate() {
            assert_eq!(seg.start, record.points()[i]);
            assert_eq!(seg.end, record.points()[i + 1]);
        }
        let sum: f64 = record.segments().iter().map(|s| s.distance).sum();
        assert_relative_eq!(record.total_distance(), sum, max_relative = 1e-12);
    }

    #[test]
    fn test_commit_after_finalize_is_structural_error() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        let c = p(&mut graph, 0.0, 0.02);
        let line = graph.create_line(a).unwrap();
        graph.commit_segment(line, b).unwrap();
        graph.finalize_line(line).unwrap();

        assert!(matches!(
            graph.commit_segment(line, c),
            Err(GraphError::Structural(_))
        ));
        // The rejected point stays standalone
        assert_eq!(graph.point(c).unwrap().owner(), Ownership::Standalone);
    }

    #[test]
    fn test_finalize_below_minimum() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let line = graph.create_line(a).unwrap();
        assert!(matches!(
            graph.finalize_line(line),
            Err(GraphError::InsufficientVertices { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_double_finalize_is_structural_error() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        let line = graph.create_line(a).unwrap();
        graph.commit_segment(line, b).unwrap();
        graph.finalize_line(line).unwrap();
        assert!(matches!(
            graph.finalize_line(line),
            Err(GraphError::Structural(_))
        ));
    }

    #[test]
    fn test_ownership_is_exclusive() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        let line = graph.create_line(a).unwrap();
        graph.commit_segment(line, b).unwrap();

        // A line vertex cannot also become a circle center
        assert!(matches!(
            graph.create_circle(b, 50.0),
            Err(GraphError::OwnershipViolation)
        ));
        // Nor the start of another line
        assert!(matches!(
            graph.create_line(a),
            Err(GraphError::OwnershipViolation)
        ));
    }

    #[test]
    fn test_polygon_rejects_duplicate_vertices() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        assert!(matches!(
            graph.finalize_polygon(&[a, b, a]),
            Err(GraphError::OwnershipViolation)
        ));
        // Failed finalize claimed nothing
        assert_eq!(graph.point(a).unwrap().owner(), Ownership::Standalone);
        assert_eq!(graph.point(b).unwrap().owner(), Ownership::Standalone);
    }

    #[test]
    fn test_polygon_below_minimum() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        assert!(matches!(
            graph.finalize_polygon(&[a, b]),
            Err(GraphError::InsufficientVertices { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn test_polygon_metrics_computed_on_finalize() {
        let mut graph = EntityGraph::new();
        let d = 1000.0 / geomark_shapes::METERS_PER_DEGREE;
        let ids = [
            p(&mut graph, 0.0, 0.0),
            p(&mut graph, 0.0, d),
            p(&mut graph, d, d),
            p(&mut graph, d, 0.0),
        ];
        let polygon = graph.finalize_polygon(&ids).unwrap();
        let record = graph.polygon(polygon).unwrap();
        assert_relative_eq!(record.area(), 1_000_000.0, max_relative = 1e-6);
        assert!((record.perimeter() - 4000.0).abs() < 20.0);
    }

    #[test]
    fn test_circle_radius_validation() {
        let mut graph = EntityGraph::new();
        let center = p(&mut graph, 10.0, 10.0);
        assert!(matches!(
            graph.create_circle(center, -1.0),
            Err(GraphError::Structural(_))
        ));
        let circle = graph.create_circle(center, 250.0).unwrap();
        assert!(matches!(
            graph.set_circle_radius(circle, f64::NAN),
            Err(GraphError::Structural(_))
        ));
        graph.set_circle_radius(circle, 300.0).unwrap();
        assert_relative_eq!(graph.circle(circle).unwrap().radius(), 300.0);
    }

    #[test]
    fn test_discard_line_removes_owned_points() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        let line = graph.create_line(a).unwrap();
        graph.commit_segment(line, b).unwrap();

        graph.discard_line(line).unwrap();
        assert!(graph.line(line).is_none());
        assert!(graph.point(a).is_none());
        assert!(graph.point(b).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_discard_finalized_line_rejected() {
        let mut graph = EntityGraph::new();
        let a = p(&mut graph, 0.0, 0.0);
        let b = p(&mut graph, 0.0, 0.01);
        let line = graph.create_line(a).unwrap();
        graph.commit_segment(line, b).unwrap();
        graph.finalize_line(line).unwrap();
        assert!(matches!(
            graph.discard_line(line),
            Err(GraphError::Structural(_))
        ));
        graph.delete_line(line).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_boundary_is_not_arena_backed() {
        let mut graph = EntityGraph::new();
        let loop_points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.01),
            GeoPoint::new(0.01, 0.01),
        ];
        let id = graph.create_boundary("15 min walk", loop_points).unwrap();
        assert_eq!(graph.points.len(), 0);
        assert!(graph.boundary(id).unwrap().area() > 0.0);
        assert!(matches!(
            graph.create_boundary("too small", vec![GeoPoint::new(0.0, 0.0)]),
            Err(GraphError::InsufficientVertices { .. })
        ));
    }

    #[test]
    fn test_segment_measurements() {
        let mut graph = EntityGraph::new();
        let start = GeoPoint::new(45.0, 6.0);
        let a = graph.create_point(start, "");
        let end = destination(start, 2500.0, 60.0_f64.to_radians());
        let b = graph.create_point(end, "");
        let line = graph.create_line(a).unwrap();
        let seg = graph.commit_segment(line, b).unwrap();

        assert_relative_eq!(seg.distance, 2500.0, max_relative = 1e-6);
        assert_relative_eq!(seg.azimuth, 60.0, epsilon = 1e-3);
        assert_relative_eq!(seg.midpoint.lat, (start.lat + end.lat) / 2.0);
    }

    #[test]
    fn test_rename_and_recolor() {
        let mut graph = EntityGraph::new();
        let id = p(&mut graph, 1.0, 1.0);
        graph.rename_point(id, "Summit").unwrap();
        graph.recolor_point(id, "#3498db").unwrap();
        let record = graph.point(id).unwrap();
        assert_eq!(record.name, "Summit");
        assert_eq!(record.color, "#3498db");

        graph.delete_point(id).unwrap();
        assert!(matches!(
            graph.rename_point(id, "gone"),
            Err(GraphError::NotFound)
        ));
    }
}
