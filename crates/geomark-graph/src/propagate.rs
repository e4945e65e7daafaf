//! Edit propagation: recomputing derived geometry after point edits.
//!
//! A point is owned by at most one structure, so each edit takes
//! exactly one of the branches below (or none, for standalone points).
//! The owner tag is resolved once at lookup time; nothing here scans
//! the collections.

use geomark_shapes::{polygon_area, polygon_perimeter};

use crate::entity::{Ownership, PointId};
use crate::graph::{EntityGraph, MIN_LINE_VERTICES, MIN_POLYGON_VERTICES};
use crate::report::{EditReport, GraphChange};

impl EntityGraph {
    /// Recompute everything that depends on a point that just moved.
    pub(crate) fn propagate_move(&mut self, id: PointId, owner: Ownership) -> EditReport {
        let mut report = EditReport::default();
        report.record(GraphChange::PointMoved(id));

        match owner {
            Ownership::Standalone => {}
            Ownership::Circle(circle) => {
                // Center follows the point automatically; radius and
                // area depend only on the radius and stay untouched.
                report.record(GraphChange::CircleUpdated(circle));
            }
            Ownership::Line(line) => {
                let points = self.lines[line].points.clone();
                let idx = vertex_index(&points, id);
                if idx > 0 {
                    let seg = self.build_segment(points[idx - 1], points[idx]);
                    self.lines[line].segments[idx - 1] = seg;
                }
                if idx + 1 < points.len() {
                    let seg = self.build_segment(points[idx], points[idx + 1]);
                    self.lines[line].segments[idx] = seg;
                }
                self.retotal_line(line);
                report.record(GraphChange::LineUpdated(line));
            }
            Ownership::Polygon(polygon) => {
                self.remeasure_polygon(polygon);
                report.record(GraphChange::PolygonUpdated(polygon));
            }
        }
        report
    }

    /// Remove a point and resolve the structural consequences.
    pub(crate) fn propagate_delete(&mut self, id: PointId, owner: Ownership) -> EditReport {
        let mut report = EditReport::default();

        match owner {
            Ownership::Standalone => {
                self.points.remove(id);
                report.record(GraphChange::PointRemoved(id));
            }
            Ownership::Circle(circle) => {
                // A circle cannot exist without its center.
                self.circles.remove(circle);
                self.points.remove(id);
                report.record(GraphChange::CircleRemoved(circle));
                report.record(GraphChange::PointRemoved(id));
            }
            Ownership::Line(line) => {
                if self.lines[line].points.len() == MIN_LINE_VERTICES {
                    let record = self.lines.remove(line).expect("owner tag is in sync");
                    report.record(GraphChange::LineRemoved(line));
                    for point in record.points {
                        self.points.remove(point);
                        report.record(GraphChange::PointRemoved(point));
                    }
                } else {
                    self.shrink_line(line, id);
                    self.points.remove(id);
                    report.record(GraphChange::LineUpdated(line));
                    report.record(GraphChange::PointRemoved(id));
                }
            }
            Ownership::Polygon(polygon) => {
                if self.polygons[polygon].points.len() == MIN_POLYGON_VERTICES {
                    let record = self.polygons.remove(polygon).expect("owner tag is in sync");
                    report.record(GraphChange::PolygonRemoved(polygon));
                    for point in record.points {
                        self.points.remove(point);
                        report.record(GraphChange::PointRemoved(point));
                    }
                } else {
                    let idx = vertex_index(&self.polygons[polygon].points, id);
                    self.polygons[polygon].points.remove(idx);
                    self.remeasure_polygon(polygon);
                    self.points.remove(id);
                    report.record(GraphChange::PolygonUpdated(polygon));
                    report.record(GraphChange::PointRemoved(id));
                }
            }
        }
        report
    }

    /// Remove vertex `id` from a line with more than two vertices,
    /// reconnecting across the gap when the vertex is interior.
    fn shrink_line(&mut self, line: crate::LineId, id: PointId) {
        let points = self.lines[line].points.clone();
        let idx = vertex_index(&points, id);
        let last = points.len() - 1;

        if idx == 0 {
            let record = &mut self.lines[line];
            record.points.remove(0);
            record.segments.remove(0);
        } else if idx == last {
            let record = &mut self.lines[line];
            record.points.pop();
            record.segments.pop();
        } else {
            // Interior vertex: both adjacent segments go away and one
            // new segment reconnects the former neighbors, taking the
            // slot of the first removed segment.
            let reconnect = self.build_segment(points[idx - 1], points[idx + 1]);
            let record = &mut self.lines[line];
            record.points.remove(idx);
            record.segments.remove(idx);
            record.segments[idx - 1] = reconnect;
        }
        self.retotal_line(line);
    }

    fn retotal_line(&mut self, line: crate::LineId) {
        let record = &mut self.lines[line];
        record.total_distance = record.segments.iter().map(|s| s.distance).sum();
    }

    fn remeasure_polygon(&mut self, polygon: crate::PolygonId) {
        let positions = self.positions_of(&self.polygons[polygon].points.clone());
        let record = &mut self.polygons[polygon];
        record.area = polygon_area(&positions);
        record.perimeter = polygon_perimeter(&positions);
    }
}

fn vertex_index(points: &[PointId], id: PointId) -> usize {
    points
        .iter()
        .position(|&p| p == id)
        .expect("owner tag guarantees membership")
}
