//! The drawing-session state machine.

use std::time::Instant;

use geomark_constraints::{resolve, ConstraintState};
use geomark_geodesy::{azimuth, distance, midpoint, GeoPoint};
use geomark_graph::{CircleId, EntityGraph, LineId, PolygonId, Segment};
use tracing::debug;

use crate::throttle::PreviewThrottle;
use crate::{LockPolicy, Result, SessionError};

/// Live measurement of the segment the cursor is currently defining.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    /// The constrained candidate endpoint.
    pub target: GeoPoint,
    /// Distance from the last committed vertex in meters.
    pub distance: f64,
    /// Azimuth from the last committed vertex in degrees.
    pub azimuth: f64,
    /// Label anchor halfway along the previewed segment.
    pub midpoint: GeoPoint,
    /// True if a lock overrode the raw cursor position.
    pub constrained: bool,
}

/// Recap of a finished line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSummary {
    /// Id of the finalized line.
    pub line: LineId,
    /// Number of segments.
    pub segments: usize,
    /// Number of vertices.
    pub points: usize,
    /// Total distance in meters.
    pub total_distance: f64,
}

/// Recap of a committed circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSummary {
    /// Id of the committed circle.
    pub circle: CircleId,
    /// Radius in meters.
    pub radius: f64,
    /// Enclosed area in square meters.
    pub area: f64,
    /// Circumference in meters.
    pub circumference: f64,
}

/// Recap of a finished polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonSummary {
    /// Id of the finalized polygon.
    pub polygon: PolygonId,
    /// Number of vertices in the closed loop.
    pub vertices: usize,
    /// Area in square meters.
    pub area: f64,
    /// Perimeter in meters.
    pub perimeter: f64,
}

#[derive(Debug)]
enum Draft {
    Idle,
    Line { line: LineId },
    Circle { center: GeoPoint, radius: f64 },
    Polygon { points: Vec<GeoPoint>, auto_close: Option<usize> },
}

/// One user's interactive drawing state over an owned [`EntityGraph`].
///
/// All operations are synchronous; the caller (UI event loop) decides
/// when to invoke them. Pointer-move previews are throttled through a
/// [`PreviewThrottle`]; everything else runs unconditionally.
#[derive(Debug)]
pub struct DrawingSession {
    graph: EntityGraph,
    constraints: ConstraintState,
    lock_policy: LockPolicy,
    throttle: PreviewThrottle,
    draft: Draft,
}

impl DrawingSession {
    /// Create a session over an empty graph.
    pub fn new() -> Self {
        Self::over(EntityGraph::new())
    }

    /// Create a session over an existing graph (e.g. a restored snapshot).
    pub fn over(graph: EntityGraph) -> Self {
        Self {
            graph,
            constraints: ConstraintState::default(),
            lock_policy: LockPolicy::default(),
            throttle: PreviewThrottle::default(),
            draft: Draft::Idle,
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Mutable access for direct edits (move, delete, rename) that are
    /// not part of a drafting workflow.
    pub fn graph_mut(&mut self) -> &mut EntityGraph {
        &mut self.graph
    }

    /// Consume the session, keeping the graph.
    pub fn into_graph(self) -> EntityGraph {
        self.graph
    }

    /// Current constraint lock state.
    pub fn constraints(&self) -> ConstraintState {
        self.constraints
    }

    /// Replace the constraint lock state (from the UI lock panel).
    pub fn set_constraints(&mut self, constraints: ConstraintState) {
        self.constraints = constraints;
    }

    /// Current lock policy.
    pub fn lock_policy(&self) -> LockPolicy {
        self.lock_policy
    }

    /// Choose what happens to locks after each committed segment.
    pub fn set_lock_policy(&mut self, policy: LockPolicy) {
        self.lock_policy = policy;
    }

    /// Replace the preview throttle (e.g. to tune the interval).
    pub fn set_throttle(&mut self, throttle: PreviewThrottle) {
        self.throttle = throttle;
    }

    /// True if no draft is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self.draft, Draft::Idle)
    }

    // --- line drafting ---

    /// Start a line at the clicked position.
    ///
    /// Locks reset here: each new line begins unconstrained.
    pub fn begin_line(&mut self, start: GeoPoint) -> Result<LineId> {
        self.ensure_idle()?;
        self.constraints = ConstraintState::default();
        let first = self.graph.create_point(start, "");
        let line = self.graph.create_line(first)?;
        self.draft = Draft::Line { line };
        self.throttle.reset();
        debug!(?line, "line draft started");
        Ok(line)
    }

    /// Throttled live preview of the next segment.
    ///
    /// Returns `Ok(None)` when the throttle swallows the event; the
    /// caller keeps showing the previous preview.
    pub fn preview_line(&mut self, cursor: GeoPoint, now: Instant) -> Result<Option<Preview>> {
        let line = self.active_line()?;
        if !self.throttle.ready(now) {
            return Ok(None);
        }
        let start = self.last_vertex_position(line);
        let target = resolve(start, cursor, &self.constraints);
        Ok(Some(Preview {
            target,
            distance: distance(start, target),
            azimuth: azimuth(start, target),
            midpoint: midpoint(start, target),
            constrained: self.constraints.any_active(),
        }))
    }

    /// Commit the next vertex at the constrained position.
    pub fn commit_vertex(&mut self, cursor: GeoPoint) -> Result<Segment> {
        let line = self.active_line()?;
        let start = self.last_vertex_position(line);
        let target = resolve(start, cursor, &self.constraints);
        let next = self.graph.create_point(target, "");
        let segment = self.graph.commit_segment(line, next)?;
        if self.lock_policy == LockPolicy::ResetAfterSegment {
            self.constraints = ConstraintState::default();
        }
        Ok(segment)
    }

    /// Finalize the in-progress line.
    pub fn finish_line(&mut self) -> Result<LineSummary> {
        let line = self.active_line()?;
        self.graph.finalize_line(line)?;
        let record = self.graph.line(line).ok_or(SessionError::NoActiveDraft("line"))?;
        let summary = LineSummary {
            line,
            segments: record.segments().len(),
            points: record.points().len(),
            total_distance: record.total_distance(),
        };
        self.draft = Draft::Idle;
        debug!(
            ?line,
            segments = summary.segments,
            total = summary.total_distance,
            "line draft finished"
        );
        Ok(summary)
    }

    // --- circle drafting ---

    /// Start a circle at the clicked center.
    pub fn begin_circle(&mut self, center: GeoPoint) -> Result<()> {
        self.ensure_idle()?;
        self.draft = Draft::Circle { center, radius: 0.0 };
        Ok(())
    }

    /// Preview-drag the radius toward the cursor. Returns the radius.
    pub fn drag_radius(&mut self, cursor: GeoPoint) -> Result<f64> {
        match &mut self.draft {
            Draft::Circle { center, radius } => {
                *radius = distance(*center, cursor);
                Ok(*radius)
            }
            _ => Err(SessionError::NoActiveDraft("circle")),
        }
    }

    /// Commit the circle with the radius defined by the closing click.
    pub fn finish_circle(&mut self, cursor: GeoPoint) -> Result<CircleSummary> {
        let center = match self.draft {
            Draft::Circle { center, .. } => center,
            _ => return Err(SessionError::NoActiveDraft("circle")),
        };
        let radius = distance(center, cursor);
        let center_point = self.graph.create_point(center, "");
        let circle = self.graph.create_circle(center_point, radius)?;
        self.draft = Draft::Idle;
        let record = self.graph.circle(circle).ok_or(SessionError::NoActiveDraft("circle"))?;
        debug!(?circle, radius, "circle committed");
        Ok(CircleSummary {
            circle,
            radius: record.radius(),
            area: record.area(),
            circumference: record.circumference(),
        })
    }

    // --- polygon drafting ---

    /// Start accumulating polygon vertices.
    pub fn begin_polygon(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.draft = Draft::Polygon {
            points: Vec::new(),
            auto_close: None,
        };
        Ok(())
    }

    /// Start the triangle tool: a polygon draft that closes itself on
    /// the third vertex.
    pub fn begin_triangle(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.draft = Draft::Polygon {
            points: Vec::new(),
            auto_close: Some(3),
        };
        Ok(())
    }

    /// Place the next polygon vertex.
    ///
    /// For auto-closing drafts, returns the finished summary once the
    /// target vertex count is reached.
    pub fn place_vertex(&mut self, position: GeoPoint) -> Result<Option<PolygonSummary>> {
        let close = match &mut self.draft {
            Draft::Polygon { points, auto_close } => {
                points.push(position);
                *auto_close == Some(points.len())
            }
            _ => return Err(SessionError::NoActiveDraft("polygon")),
        };
        if close {
            return self.finish_polygon().map(Some);
        }
        Ok(None)
    }

    /// Close and finalize the accumulated polygon.
    pub fn finish_polygon(&mut self) -> Result<PolygonSummary> {
        let positions = match &self.draft {
            Draft::Polygon { points, .. } => points.clone(),
            _ => return Err(SessionError::NoActiveDraft("polygon")),
        };
        // Check before creating any arena points, so a too-small draft
        // leaks nothing into the graph.
        if positions.len() < 3 {
            return Err(geomark_graph::GraphError::InsufficientVertices {
                needed: 3,
                got: positions.len(),
            }
            .into());
        }
        let ids: Vec<_> = positions
            .iter()
            .map(|&p| self.graph.create_point(p, ""))
            .collect();
        let polygon = self.graph.finalize_polygon(&ids)?;
        self.draft = Draft::Idle;
        let record = self.graph.polygon(polygon).ok_or(SessionError::NoActiveDraft("polygon"))?;
        debug!(?polygon, vertices = ids.len(), "polygon draft finished");
        Ok(PolygonSummary {
            polygon,
            vertices: ids.len(),
            area: record.area(),
            perimeter: record.perimeter(),
        })
    }

    // --- draft lifecycle ---

    /// Abandon the current draft, undoing anything it put in the graph.
    pub fn cancel(&mut self) {
        match std::mem::replace(&mut self.draft, Draft::Idle) {
            Draft::Line { line } => {
                // The draft line is ours and unfinalized by construction.
                let _ = self.graph.discard_line(line);
                debug!(?line, "line draft cancelled");
            }
            Draft::Circle { .. } | Draft::Polygon { .. } | Draft::Idle => {}
        }
        self.constraints = ConstraintState::default();
        self.throttle.reset();
    }

    /// Remove every entity and abandon any draft.
    pub fn clear_all(&mut self) {
        self.draft = Draft::Idle;
        self.constraints = ConstraintState::default();
        self.throttle.reset();
        self.graph.clear();
    }

    // --- internals ---

    fn ensure_idle(&self) -> Result<()> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(SessionError::Busy)
        }
    }

    fn active_line(&self) -> Result<LineId> {
        match self.draft {
            Draft::Line { line } => Ok(line),
            _ => Err(SessionError::NoActiveDraft("line")),
        }
    }

    fn last_vertex_position(&self, line: LineId) -> GeoPoint {
        let record = self.graph.line(line).expect("draft line exists");
        let last = *record.points().last().expect("line always has >= 1 vertex");
        self.graph.point(last).expect("vertex exists").position
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}
